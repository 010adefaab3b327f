//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Link not found, or config file missing.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments (bad hash, empty content or key).
    pub const INVALID_INPUT: i32 = 4;

    /// The link exists but did not open under the given key.
    pub const AUTH_FAILED: i32 = 5;

    /// The record store could not be reached or rejected the request.
    pub const STORAGE_FAILED: i32 = 6;
}

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "SLINK_LOG";

/// Environment overrides applied on top of the config file.
pub mod env {
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    pub const REPO_OWNER: &str = "SLINK_REPO_OWNER";
    pub const REPO_NAME: &str = "SLINK_REPO_NAME";
    pub const REPO_BRANCH: &str = "SLINK_REPO_BRANCH";
}
