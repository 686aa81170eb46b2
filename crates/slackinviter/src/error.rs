//! Startup error types with miette diagnostics.
//!
//! Anything that stops the server from coming up is reported through
//! `CliError`, with help text pointing at the setting to fix.

use miette::Diagnostic;
use thiserror::Error;

use slackinviter_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const BIND: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(slackinviter::config),
        help(
            "Set the required SLACKINVITER_* variables (and PORT), or pass --config <file>.\n\
             Run with --check to validate settings without starting the server."
        )
    )]
    Config(#[from] ConfigError),

    // ── Clients ──────────────────────────────────────────────────────
    #[error("Could not build the {client} client")]
    #[diagnostic(code(slackinviter::client))]
    Client {
        client: &'static str,
        #[source]
        source: slackinviter_api::Error,
    },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(slackinviter::bind),
        help("Is another process using port {port}? Set PORT to choose another.")
    )]
    Bind {
        addr: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed")]
    #[diagnostic(code(slackinviter::serve))]
    Serve(#[source] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::Bind { .. } => exit_code::BIND,
            Self::Client { .. } | Self::Serve(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_config_code() {
        let err = CliError::from(ConfigError::Validation {
            field: "sync.page_size".into(),
            reason: "expected 1..=1000, got 0".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONFIG);
        assert_eq!(err.to_string(), "invalid sync.page_size: expected 1..=1000, got 0");
    }
}
