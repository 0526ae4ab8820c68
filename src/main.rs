//! Dogmatch HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use dogmatch::breeds::{BreedClassifier, BreedMappingStore, StubBreedClassifier};
use dogmatch::config::{Config, ConfigError};
use dogmatch::embedding::{ImageTextEmbedder, StubEmbedder};
use dogmatch::gateway::{HandlerState, create_router_with_state};
use dogmatch::normalize::{GeminiGateway, NormalizationPipeline, RetryPolicy};
use dogmatch::similarity::SimilarityScorer;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr = SocketAddr::new(config.bind_addr, config.port);

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        max_retries = config.max_retries,
        backoff_base = config.backoff_base,
        "Dogmatch starting"
    );

    if !config.weights.sums_to_one() {
        tracing::warn!(
            sum = config.weights.sum(),
            "similarity weights do not sum to 1; scores are not normalized"
        );
    }

    let api_key = config.api_key().ok_or(ConfigError::MissingEnvVar {
        name: "GEMINI_API_KEY",
    })?;
    let gateway = GeminiGateway::new(
        config.gemini_api_url.clone(),
        api_key,
        config.temperature,
        config.request_timeout,
    )
    .context("failed to build generative-text client")?;
    let pipeline = Arc::new(NormalizationPipeline::new(
        Arc::new(gateway),
        RetryPolicy::new(config.max_retries, config.backoff_base),
    ));

    let scorer = Arc::new(SimilarityScorer::new(config.weights));

    tracing::warn!("No model backend configured, running classifier and embedder in stub mode");
    let classifier: Arc<dyn BreedClassifier> = Arc::new(StubBreedClassifier::new());
    let embedder: Arc<dyn ImageTextEmbedder> = Arc::new(StubEmbedder::new(config.embedding_dim)?);

    let breeds = BreedMappingStore::new();
    warm_up_classifier(classifier.clone(), breeds.clone()).await?;

    let state = HandlerState::new(
        pipeline,
        scorer,
        breeds,
        classifier,
        embedder,
        config.mix_label.clone(),
    );

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dogmatch shutdown complete");
    Ok(())
}

/// Runs the classifier warmup off the async workers, then seeds the label table.
async fn warm_up_classifier(
    classifier: Arc<dyn BreedClassifier>,
    breeds: BreedMappingStore,
) -> anyhow::Result<()> {
    tracing::info!("Warming up breed classifier...");
    let labels = tokio::task::spawn_blocking(move || {
        classifier.warmup()?;
        Ok::<_, dogmatch::ClassifierError>(classifier.labels())
    })
    .await
    .context("classifier warmup task failed")??;

    breeds.seed(labels);
    tracing::info!(labels = breeds.len(), "Breed classifier ready");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("DOGMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
