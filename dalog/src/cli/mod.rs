//! CLI module for dalog
//!
//! Provides the command-line interface for the data access log server.

/// serve subcommand arguments
pub mod serve;

use clap::{Parser, Subcommand};

/// Data access log - record why datasets are accessed and audit the history
#[derive(Parser, Debug)]
#[command(name = "dalog")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    DALOG_HOST               Bind address (default: 0.0.0.0)
    DALOG_PORT               Listen port (default: 32780)
    DALOG_LOG_LEVEL          Log level (default: info)
    DALOG_LOG_FILE           Log directory, or "off" (default: ~/.dalog/logs)
    DALOG_DATA_DIR           Data directory (default: ~/.dalog)
    DALOG_DATABASE_URL       Database URL (default: sqlite:~/.dalog/dalog.db)
    DALOG_JWT_SECRET         JWT signing key (auto-generated if not set)
    DALOG_SESSION_TTL_HOURS  Session lifetime in hours (default: 24)
    DALOG_ADMIN_USERNAME     Initial admin username (default: admin)
    DALOG_ADMIN_PASSWORD     Initial admin password (default: adminpass)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve(serve::ServeArgs),
    /// Create the default admin and sample datasets, then exit
    Seed,
}
