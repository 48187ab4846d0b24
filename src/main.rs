use clap::Parser;
use qualinfo::utils::{logger, validation::Validate};
use qualinfo::{Aggregator, CliConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose);

    tracing::info!("Starting qualinfo backend");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = cli.load()?;

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!(
            "💡 Set the data.go.kr service key via --service-key or the {} env var",
            qualinfo::config::SERVICE_KEY_ENV
        );
        std::process::exit(1);
    }

    let bind = config.server.bind.clone();
    tracing::info!("SPARQL endpoint: {}", config.sparql.endpoint);

    let aggregator = Arc::new(Aggregator::new(config)?);
    let app = qualinfo::app::router(aggregator);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("✅ Listening on {}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
