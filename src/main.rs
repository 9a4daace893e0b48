use anyhow::Result;
use clap::Parser;
use modelview::cli::{load_config, Cli, CliHandler};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.clone()).await?;

    // Set log level based on debug flag
    let log_level = if cli.debug || config.logging.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .init();

    tracing::debug!("Using API at {}", config.api.base_url);

    let handler = CliHandler::new(config);
    handler.handle_command(cli.command).await
}
