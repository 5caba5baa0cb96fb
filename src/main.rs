use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod model;
mod predictor;
mod server;

use config::Config;
use model::ChaseClassifier;
use predictor::Classifier;
use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Load the classifier once; it is shared read-only across requests.
    let classifier = ChaseClassifier::load(Path::new(&config.model_path))
        .with_context(|| format!("failed to load model artifact from {}", config.model_path))?;
    let metadata = classifier.metadata().clone();
    info!(
        "Model loaded: {} v{} (trained on {}, {} samples)",
        classifier.name(),
        metadata.version,
        metadata.trained_on,
        metadata.n_samples
    );

    if config.allow_same_team {
        warn!("Same-team validation disabled: batting and bowling side may match");
    }

    let state = AppState {
        classifier: Arc::new(classifier),
        metadata,
        allow_same_team: config.allow_same_team,
    };
    let app = server::router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Predictor listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
