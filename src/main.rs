//! tubeask CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubeask::agent::ContextTag;
use tubeask::cli::{commands, Cli, Commands};
use tubeask::config::{load_dotenv, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The server logs request stages at info; one-off commands stay quiet.
    let base_level = match cli.command {
        Commands::Serve { .. } => 1,
        _ => 0,
    };
    let log_level = match base_level + cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("tubeask={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    load_dotenv(cli.env_file.as_deref().map(Settings::expand_path).as_deref());

    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Ask {
            question,
            context,
            youtube,
            json,
        } => {
            let context = if youtube { ContextTag::Youtube } else { context };
            commands::run_ask(&question, context, json, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings).await?;
        }
    }

    Ok(())
}
