//! Command-line interface, parsed with clap.

mod commands;

use clap::{Parser, Subcommand};

/// Helpdesk - ticketing backend for clients and support staff
#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "web")]
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List registered client accounts
    #[command(alias = "ls")]
    Clients,
}

pub use commands::*;
