//! compass-enrich - refresh the company reference table from the registry.

use clap::Parser;
use compass_cli::{execute, load_config, logging, Cli};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Enrichment run failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> compass_cli::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    if let Some(path) = logging::init(cli.log_root.as_deref())? {
        tracing::info!(path = %path.display(), "Logging to file");
    }

    let metrics = execute(&config).await?;
    for line in metrics.summary().lines() {
        tracing::info!("{}", line);
    }
    Ok(())
}
