//! CLI module for tubeask.

pub mod commands;
mod output;

pub use output::Output;

use crate::agent::ContextTag;
use clap::{Parser, Subcommand};

/// tubeask - question answering over YouTube and a Pinecone knowledge base
///
/// Serves the HTTP API, asks one-off questions, and checks configuration.
#[derive(Parser, Debug)]
#[command(name = "tubeask")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long, global = true, env = "TUBEASK_ENV_FILE")]
    pub env_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question from the terminal
    Ask {
        /// The question to ask
        question: String,

        /// Question context: general (alias: chat) or youtube
        #[arg(long, default_value_t = ContextTag::General)]
        context: ContextTag,

        /// Shorthand for --context youtube
        #[arg(short, long, conflicts_with = "context")]
        youtube: bool,

        /// Print the JSON response envelope instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Check required environment variables and the Pinecone index
    Doctor,
}
