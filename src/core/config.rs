//! Configuration constants and settings

// Concurrency Configuration
//
// Clones are network and disk bound. The default mirrors what most GitLab
// instances tolerate before throttling concurrent fetches from one client.

/// Default number of concurrent clone operations
pub const DEFAULT_CLONE_CONCURRENCY: usize = 10;

/// Environment variable that overrides the default concurrency
pub const CONCURRENCY_ENV_VAR: &str = "GSC_CONCURRENCY";

/// Determines the concurrency limit for clone operations based on CLI args
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --concurrency N flag → N (at least 1)
/// 3. GSC_CONCURRENCY env var → N
/// 4. Default → 10
pub fn get_clone_concurrency(concurrency: Option<usize>, sequential: bool) -> usize {
    if sequential {
        return 1;
    }

    if let Some(n) = concurrency {
        return n.max(1);
    }

    if let Ok(env_concurrency) = std::env::var(CONCURRENCY_ENV_VAR) {
        if let Ok(n) = env_concurrency.parse::<usize>() {
            if n > 0 {
                return n;
            }
        }
        tracing::warn!(
            value = %env_concurrency,
            "ignoring invalid {CONCURRENCY_ENV_VAR}, using default"
        );
    }

    DEFAULT_CLONE_CONCURRENCY
}

// GitLab API configuration
pub const DEFAULT_GITLAB_HOST: &str = "https://gitlab.com";
pub const GITLAB_API_PREFIX: &str = "/api/v4";
pub const GITLAB_PAGE_SIZE: u32 = 100;
pub const GITLAB_TOKEN_HEADER: &str = "private-token";
pub const GITLAB_NEXT_PAGE_HEADER: &str = "x-next-page";

/// Username used for token-only HTTP authentication against GitLab
pub const TOKEN_ONLY_USERNAME: &str = "oauth2";

// Timeout constants
pub const CLONE_TIMEOUT_SECS: u64 = 30 * 60;

// Progress bar configuration
pub const PROGRESS_TICK_MILLIS: u64 = 120;
pub const PROGRESS_TEMPLATE: &str = "{spinner} {prefix:.bold} {bytes} {wide_msg}";

// UI Constants
pub const LISTING_MESSAGE: &str = "🔍 Listing group projects...";

// Display formatting constants
pub const PATH_DISPLAY_WIDTH: usize = 30;
pub const ERROR_MESSAGE_MAX_LENGTH: usize = 60;
pub const ERROR_MESSAGE_TRUNCATE_LENGTH: usize = 57;
