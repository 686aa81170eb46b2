//! Command-line flags for the `slackinviter` server.
//!
//! Everything the server needs to run comes from configuration (see
//! `slackinviter-config`); the flags only pick the file and tune logging.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// slackinviter -- self-service Slack invitations
#[derive(Debug, Parser)]
#[command(
    name = "slackinviter",
    version,
    about = "Self-service Slack invitations with a live member-count badge",
    long_about = "Serves an invite form protected by reCAPTCHA, sends Slack invitations,\n\
        and keeps a member-count badge up to date by polling the Slack directory.\n\n\
        Settings come from SLACKINVITER_* environment variables (plus PORT),\n\
        optionally layered over a TOML file."
)]
pub struct Cli {
    /// TOML config file; environment variables override it
    #[arg(long, short = 'c', env = "SLACKINVITER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Validate configuration and exit
    #[arg(long)]
    pub check: bool,
}
