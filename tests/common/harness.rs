//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use flashmatch::config::Config;
use flashmatch::encoding::{FeatureEncoder, FeatureSchema};
use flashmatch::gateway::{HandlerState, cors_layer, create_router_with_state};
use flashmatch::identity::{InMemoryIdentityStore, NameCache};
use flashmatch::matching::MatchEngine;
use flashmatch::parser::{MockRecordParser, RecordParser};
use flashmatch::profile::load_demo_profiles;
use flashmatch::scoring::{ForestClassifier, MatchScorer};
use flashmatch::store::{InMemoryProfileStore, InMemoryRequestStore, ProfileStore, RequestStore};

use super::fixtures::{Artifacts, CALCULATOR_REQUEST, parsed_calculator_request, write_artifacts};

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _artifacts: Artifacts,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
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
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

/// Config pointing at the fixture artifacts.
pub fn test_config(artifacts: &Artifacts) -> Config {
    Config {
        port: 0,
        schema_path: artifacts.schema_path.clone(),
        model_path: artifacts.model_path.clone(),
        seed_profiles_path: Some(artifacts.demo_profiles_path.clone()),
        synthetic_dir: Some(artifacts.synthetic_dir.clone()),
        identity_path: Some(artifacts.identity_path.clone()),
        ..Default::default()
    }
}

/// Parser that knows the calculator request and nothing else.
pub fn test_parser() -> MockRecordParser {
    MockRecordParser::new().with_request(CALCULATOR_REQUEST, parsed_calculator_request())
}

/// Wires the full pipeline from on-disk artifacts, the way the binary does.
pub async fn build_state(
    config: &Config,
    parser: Arc<dyn RecordParser>,
) -> Result<HandlerState, ServerStartupError> {
    let failed = |e: &dyn std::fmt::Display| ServerStartupError::StartupFailed(e.to_string());

    config.validate().map_err(|e| failed(&e))?;

    let schema = FeatureSchema::load(&config.schema_path).map_err(|e| failed(&e))?;
    let classifier = ForestClassifier::load(&config.model_path).map_err(|e| failed(&e))?;
    let scorer = MatchScorer::new(FeatureEncoder::new(Arc::new(schema)), Arc::new(classifier))
        .map_err(|e| failed(&e))?;

    let identities = match &config.identity_path {
        Some(path) => InMemoryIdentityStore::load(path).map_err(|e| failed(&e))?,
        None => InMemoryIdentityStore::new(),
    };
    let names = Arc::new(NameCache::new(Arc::new(identities)));
    names.prewarm(100).await.map_err(|e| failed(&e))?;

    let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    let requests: Arc<dyn RequestStore> = Arc::new(InMemoryRequestStore::new());
    if let Some(path) = &config.seed_profiles_path {
        load_demo_profiles(profiles.as_ref(), path)
            .await
            .map_err(|e| failed(&e))?;
    }

    let engine = MatchEngine::new(Arc::new(scorer), profiles.clone(), requests.clone(), names)
        .with_ranking(config.ranking())
        .with_debug_feature_limit(config.debug_feature_limit)
        .with_artifact(config.model_artifact_name());

    Ok(
        HandlerState::new(Arc::new(engine), profiles, requests, parser)
            .with_synthetic_dir(config.synthetic_dir.clone()),
    )
}

/// Spawns a server over fresh fixture artifacts with a mocked parsing service.
pub async fn spawn_test_server() -> Result<TestServer, ServerStartupError> {
    let artifacts = write_artifacts();
    let config = test_config(&artifacts);
    let state = build_state(&config, Arc::new(test_parser())).await?;

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let app = create_router_with_state(state).layer(cors_layer(&config.cors_allow_origins));
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _artifacts: artifacts,
    })
}
