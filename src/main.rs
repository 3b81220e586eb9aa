//! Insurance Premium Predictor - Main Entry Point
//!
//! Train the pipeline, serve predictions, or run the interactive client.

use clap::Parser;
use premium_predictor::cli::{cmd_client, cmd_interactive, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "premium_predictor=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train { data, target, output, trees, max_depth, seed, test_size, report }) => {
            cmd_train(&data, &target, &output, trees, max_depth, seed, test_size, report.as_deref())?;
        }
        Some(Commands::Serve { host, port, model }) => {
            cmd_serve(&host, port, &model).await?;
        }
        Some(Commands::Client { base_url }) => {
            cmd_client(base_url.as_deref()).await?;
        }
        None => {
            cmd_interactive().await?;
        }
    }

    Ok(())
}
