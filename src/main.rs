//! gsc: GitLab Structured Cloner
//! Clones all the repositories of a GitLab group so that they land on disk in
//! the same structure as they have in the group.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use gsc::commands::{handle_clone_command, CloneCommandConfig};
use gsc::core::{get_clone_concurrency, ProgressReporter, DEFAULT_GITLAB_HOST};
use gsc::gitlab::{AuthConfig, ListOptions};
use gsc::utils::init_logging;

const ABOUT: &str = "gsc - GitLab Structured Cloner";
const LONG_ABOUT: &str = "gsc is a tool to help you clone all the repositories from a GitLab \
group in a way that you see the repositories in the same structure as they are in the GitLab group.";

#[derive(Parser, Debug)]
#[command(name = "gsc", version, about = ABOUT, long_about = LONG_ABOUT)]
struct Cli {
    /// GitLab host URL
    #[arg(long, default_value = DEFAULT_GITLAB_HOST)]
    host: String,

    /// GitLab username for authentication
    #[arg(long, env = "GSC_USERNAME", default_value = "")]
    username: String,

    /// GitLab token for authentication
    #[arg(long, env = "GSC_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Allow insecure connections to your GitLab instance
    #[arg(long)]
    insecure: bool,

    /// Clone projects from the given group ID
    #[arg(long)]
    group: u64,

    /// Clone only projects whose name matches the given regex
    #[arg(long, default_value = "")]
    matcher: String,

    /// Include projects of all subgroups
    #[arg(long)]
    recursive: bool,

    /// Number of concurrent clones (default: 10, or GSC_CONCURRENCY)
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Clone one repository at a time
    #[arg(long, conflicts_with = "concurrency")]
    sequential: bool,

    /// Directory the group tree is created in
    #[arg(long, default_value = ".")]
    dest: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Hide progress bars
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = ProgressReporter::new(!cli.quiet)?;
    init_logging(cli.verbose, progress.multi_progress().clone())?;
    tracing::debug!(recursive = cli.recursive, "parsed arguments");

    let config = CloneCommandConfig {
        auth: AuthConfig {
            host: cli.host,
            token: cli.token,
            insecure: cli.insecure,
        },
        username: cli.username,
        list: ListOptions {
            group: cli.group,
            recursive: cli.recursive,
            matcher: cli.matcher,
        },
        concurrency: get_clone_concurrency(cli.concurrency, cli.sequential),
        destination: cli.dest,
    };

    handle_clone_command(config, progress).await
}
