//! Diabetes prediction API entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use diabetes_learning::{ModelStore, Trainer};
use diabetes_server::{AppState, Args, ModelManager, ServerConfig, create_router};
use dotenv::dotenv;
use tracing::info;

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file
    dotenv().ok();

    init_logging(&args.log_level);

    let config = ServerConfig::from_env().with_args(&args);
    let trainer_config = config
        .trainer_config()
        .context("invalid training configuration")?;
    let addr = config
        .socket_addr()
        .with_context(|| format!("invalid bind address {:?}", config.host))?;

    info!("Starting Diabetes Prediction API...");
    info!(
        dataset = %config.dataset_path.display(),
        model = %config.model_path.display(),
        "Initializing model"
    );

    let manager = Arc::new(ModelManager::new(
        ModelStore::new(&config.model_path),
        &config.dataset_path,
        Trainer::new(trainer_config),
    ));

    // Startup training is CPU-bound; keep it off the async workers.
    let startup = Arc::clone(&manager);
    tokio::task::spawn_blocking(move || startup.initialize())
        .await
        .context("model initialization task failed")?
        .context("model initialization failed")?;

    let app = create_router(AppState::new(manager));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
