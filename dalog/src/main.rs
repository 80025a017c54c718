//! dalog server entry point

use anyhow::Context;
use clap::Parser;
use dalog::cli::{Cli, Commands};
use dalog::config::{self, ServerConfig};
use dalog::{bootstrap, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init().context("failed to initialize logging")?;

    match cli.command {
        Some(Commands::Seed) => {
            let report = bootstrap::seed_only(&config::database_url())
                .await
                .context("failed to seed database")?;
            println!(
                "Seed complete: admin={}, datasets created={}",
                report.admin_created.as_deref().unwrap_or("(existing)"),
                report.datasets_created
            );
        }
        Some(Commands::Serve(args)) => {
            run_server(ServerConfig::from_args(args.host, args.port)).await?;
        }
        None => {
            // サブコマンドなしはserveとして扱う
            run_server(ServerConfig::from_env()).await?;
        }
    }

    Ok(())
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = bootstrap::initialize()
        .await
        .context("failed to initialize server")?;
    server::run(state, &config.bind_addr())
        .await
        .context("server terminated with an error")?;
    Ok(())
}
