use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use slink_core::VERSION;

/// Slink - encrypted short links stored as git commits
#[derive(Parser)]
#[command(name = "slink")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "SLINK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter config file
    Init(InitArgs),

    /// Encrypt content and store it as a new link
    Create(CreateArgs),

    /// Print the raw payload of a link, without decrypting it
    Resolve(ResolveArgs),

    /// Decrypt a link and print its content or redirect target
    Open(OpenArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Github,
    Local,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Storage backend
    #[arg(long, value_enum, default_value = "github")]
    pub backend: BackendArg,

    /// Directory for records (local backend)
    #[arg(long, value_name = "PATH")]
    pub local_path: Option<PathBuf>,

    /// Repository owner (github backend)
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name (github backend)
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch that receives link commits (github backend)
    #[arg(long)]
    pub branch: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// Content to encrypt (a URL or any text); read from stdin when omitted
    #[arg(value_name = "CONTENT")]
    pub content: Option<String>,

    /// Key to encrypt with (prompted when omitted)
    #[arg(short, long, env = "SLINK_KEY", hide_env_values = true)]
    pub key: Option<String>,
}

/// Arguments for the `resolve` command
#[derive(Args)]
pub struct ResolveArgs {
    /// Short or full commit hash
    #[arg(value_name = "HASH")]
    pub hash: String,
}

/// Arguments for the `open` command
#[derive(Args)]
pub struct OpenArgs {
    /// Short or full commit hash
    #[arg(value_name = "HASH")]
    pub hash: String,

    /// Key to decrypt with (prompted when omitted)
    #[arg(short, long, env = "SLINK_KEY", hide_env_values = true)]
    pub key: Option<String>,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_open_with_key() {
        let cli = Cli::try_parse_from(["slink", "--json", "open", "abc1234", "--key", "ab12"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::Open(args)) => {
                assert_eq!(args.hash, "abc1234");
                assert_eq!(args.key.as_deref(), Some("ab12"));
            }
            _ => panic!("expected open"),
        }
    }

    #[test]
    fn test_parse_init_local() {
        let cli = Cli::try_parse_from([
            "slink",
            "init",
            "--backend",
            "local",
            "--local-path",
            "/tmp/links",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Init(args)) => {
                assert_eq!(args.backend, BackendArg::Local);
                assert_eq!(args.local_path, Some(PathBuf::from("/tmp/links")));
            }
            _ => panic!("expected init"),
        }
    }
}
