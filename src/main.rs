//! flash-match HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use flashmatch::config::Config;
use flashmatch::constants::NAME_PREWARM_LIMIT;
use flashmatch::encoding::{FeatureEncoder, FeatureSchema};
use flashmatch::gateway::{HandlerState, cors_layer, create_router_with_state};
use flashmatch::identity::{InMemoryIdentityStore, NameCache};
use flashmatch::matching::MatchEngine;
use flashmatch::parser::HttpRecordParser;
use flashmatch::profile::{load_builtin_demo_profiles, load_demo_profiles};
use flashmatch::scoring::{ForestClassifier, MatchScorer};
use flashmatch::store::{InMemoryProfileStore, InMemoryRequestStore, ProfileStore, RequestStore};

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
        "flash-match starting"
    );

    let schema = FeatureSchema::load(&config.schema_path)?;
    let classifier = ForestClassifier::load(&config.model_path)?;
    let scorer = MatchScorer::new(FeatureEncoder::new(Arc::new(schema)), Arc::new(classifier))?;

    let identities = match &config.identity_path {
        Some(path) => InMemoryIdentityStore::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load identity records: {}. Using formatted ids.", e);
            InMemoryIdentityStore::new()
        }),
        None => InMemoryIdentityStore::new(),
    };
    let names = Arc::new(NameCache::new(Arc::new(identities)));
    if let Err(e) = names.prewarm(NAME_PREWARM_LIMIT).await {
        tracing::warn!("Could not pre-warm display names: {}", e);
    }

    let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    let requests: Arc<dyn RequestStore> = Arc::new(InMemoryRequestStore::new());

    let demo = match &config.seed_profiles_path {
        Some(path) => load_demo_profiles(profiles.as_ref(), path).await,
        None => load_builtin_demo_profiles(profiles.as_ref()).await,
    };
    match demo {
        Ok(loaded) => tracing::info!(loaded, "Demo profiles loaded"),
        Err(e) => tracing::warn!("Failed to load demo profiles: {}. Starting empty.", e),
    }

    let parser = HttpRecordParser::new(config.parser_url.clone(), config.parser_timeout)?;

    let engine = MatchEngine::new(Arc::new(scorer), profiles.clone(), requests.clone(), names)
        .with_ranking(config.ranking())
        .with_debug_feature_limit(config.debug_feature_limit)
        .with_artifact(config.model_artifact_name());

    let state = HandlerState::new(Arc::new(engine), profiles, requests, Arc::new(parser))
        .with_synthetic_dir(config.synthetic_dir.clone());

    let app = create_router_with_state(state).layer(cors_layer(&config.cors_allow_origins));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("flash-match shutdown complete");
    Ok(())
}

/// Probes `/health` on the configured port. Exit code 0 when healthy.
async fn run_health_check() -> i32 {
    let port = std::env::var("FLASHMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    health_check_status(&format!("http://127.0.0.1:{}/health", port)).await
}

async fn health_check_status(url: &str) -> i32 {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    {
        Ok(client) => client,
        Err(_) => return 1,
    };

    match client.get(url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
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
