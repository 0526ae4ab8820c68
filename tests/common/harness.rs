//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use dogmatch::breeds::{BreedClassifier, BreedMappingStore, StubBreedClassifier};
use dogmatch::embedding::StubEmbedder;
use dogmatch::gateway::{HandlerState, create_router_with_state};
use dogmatch::normalize::{GenerativeTextGateway, NormalizationPipeline, RetryPolicy};
use dogmatch::similarity::SimilarityScorer;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub struct TestServerConfig {
    pub gateway: Arc<dyn GenerativeTextGateway>,
    pub classifier: StubBreedClassifier,
    pub retry: RetryPolicy,
    pub embedding_dim: usize,
    pub seed_breeds: bool,
}

impl TestServerConfig {
    pub fn with_gateway(gateway: Arc<dyn GenerativeTextGateway>) -> Self {
        Self {
            gateway,
            classifier: StubBreedClassifier::new(),
            retry: RetryPolicy::new(1, 1.2),
            embedding_dim: 64,
            seed_breeds: true,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api(&self, path: &str) -> String {
        format!("http://{}/api/v1{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => tokio::time::sleep(interval).await,
        }
    }
}

/// Spawns the full router on an ephemeral port with stub collaborators.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let breeds = BreedMappingStore::new();
    if config.seed_breeds {
        breeds.seed(config.classifier.labels());
    }

    let embedder = StubEmbedder::new(config.embedding_dim)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let state = HandlerState::new(
        Arc::new(NormalizationPipeline::new(config.gateway, config.retry)),
        Arc::new(SimilarityScorer::default()),
        breeds,
        Arc::new(config.classifier),
        Arc::new(embedder),
        "믹스",
    );

    let app = create_router_with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
