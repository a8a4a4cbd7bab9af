//! Progress bar management for concurrent clones

use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use super::config::{PROGRESS_TEMPLATE, PROGRESS_TICK_MILLIS};

/// Shared progress display for one clone run
///
/// Every repository gets its own indeterminate byte spinner. When progress is
/// disabled the bars are still created so transports can write into them, but
/// nothing is drawn.
#[derive(Clone)]
pub struct ProgressReporter {
    multi_progress: MultiProgress,
    style: ProgressStyle,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Result<Self> {
        let multi_progress = if enabled {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        Ok(Self {
            multi_progress,
            style: create_progress_style()?,
            enabled,
        })
    }

    /// A reporter that never draws anything
    pub fn hidden() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            style: ProgressStyle::default_spinner(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn multi_progress(&self) -> &MultiProgress {
        &self.multi_progress
    }

    /// Creates the byte spinner for one repository, labelled `cloning <name>`
    pub fn create_clone_bar(&self, repo_name: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let pb = self.multi_progress.add(ProgressBar::no_length());
        pb.set_style(self.style.clone());
        pb.set_prefix(format!("cloning {repo_name}"));
        pb.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MILLIS));
        pb
    }

    /// Prints a line above the bars without tearing them
    pub fn println(&self, line: &str) {
        if self.enabled {
            let _ = self.multi_progress.println(line);
        }
    }
}

/// Creates a progress bar style configuration
pub(crate) fn create_progress_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_spinner().template(PROGRESS_TEMPLATE)?)
}

/// Marks a bar as finished with a status symbol
pub(crate) fn finish_clone_bar(pb: &ProgressBar, repo_name: &str, symbol: &str, message: &str) {
    pb.set_prefix(format!("{symbol} {repo_name}"));
    pb.finish_with_message(message.to_string());
}
