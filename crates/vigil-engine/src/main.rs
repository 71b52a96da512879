//! Vigil engine binary.
//!
//! Wires the governor telemetry stream into a [`SceneSyncEngine`] and
//! serves the observer API over the same engine.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `vigil-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the scene engine
//! 4. Start the observer API server
//! 5. Connect to NATS and start the governor ingest task
//! 6. Wait for `Ctrl-C` or the end of the subscription
//! 7. Tear the engine down

mod error;
mod ingest;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vigil_core::{LogFormat, LoggingConfig, SceneSyncEngine, VigilConfig};
use vigil_observer::{AppState, SharedEngine};

use crate::error::EngineError;
use crate::ingest::GovernorIngest;

const CONFIG_PATH: &str = "vigil-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the observer server or the NATS
/// connection cannot be set up.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("vigil-engine starting");
    info!(
        nats_url = %config.infrastructure.nats_url,
        governor_subject = %config.infrastructure.governor_subject,
        observer_port = config.infrastructure.observer_port,
        dedupe = config.history.dedupe,
        max_history = config.history.max_size.map(std::num::NonZeroUsize::get),
        log_capacity = config.events.log_capacity,
        "configuration loaded"
    );

    // 3. Build the scene engine.
    let engine: SharedEngine = Arc::new(Mutex::new(SceneSyncEngine::new(&config)));

    // 4. Start the observer API server.
    let observer_port = config.infrastructure.observer_port;
    let app_state = Arc::new(AppState::from_shared(Arc::clone(&engine)));
    let observer_handle = vigil_observer::spawn_observer(observer_port, app_state)?;
    info!(port = observer_port, "observer API server started");

    // 5. Connect to NATS and start ingesting.
    let ingest = GovernorIngest::connect(
        &config.infrastructure.nats_url,
        &config.infrastructure.governor_subject,
    )
    .await?;
    let mut ingest_handle = tokio::spawn(ingest.run(Arc::clone(&engine)));

    // 6. Run until interrupted or the subscription ends.
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("interrupt received, shutting down");
        }
        result = &mut ingest_handle => {
            match result {
                Ok(stats) => info!(applied = stats.applied, "governor subscription ended"),
                Err(e) => warn!(error = %e, "governor ingest task failed"),
            }
        }
    }

    // 7. Tear down. Late messages are dropped by the engine itself.
    engine.lock().await.teardown();
    ingest_handle.abort();
    observer_handle.abort();

    info!("vigil-engine shutdown complete");
    Ok(())
}

/// Load configuration from `vigil-config.yaml`, or defaults plus
/// environment overrides when the file is absent.
fn load_config() -> Result<VigilConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        return Ok(VigilConfig::from_file(config_path)?);
    }
    let mut config = VigilConfig::default();
    config.infrastructure.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
