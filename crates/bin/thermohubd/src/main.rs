//! # thermohubd: thermohub daemon
//!
//! Composition root that wires all adapters together, starts one poller per
//! configured sensor and serves the read-only HTTP view.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the reading source selected by `[source] kind`
//! - Reconcile configured sensors against the accessory cache and spawn pollers
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGINT): stop the server, then every poller
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use thermohub_adapter_http_axum::router;
use thermohub_adapter_http_axum::state::AppState;
use thermohub_adapter_mqtt::MqttReadingSource;
use thermohub_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteAccessoryRepository, SqliteCharacteristicStore,
    SqliteHistorySink,
};
use thermohub_adapter_virtual::VirtualReadingSource;
use thermohub_app::ports::ReadingSource;
use thermohub_app::services::{AccessoryRegistry, PollerContext};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, SourceKind};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_on_signal(cancel.clone()));

    match config.source.kind {
        SourceKind::Virtual => {
            let source = VirtualReadingSource::new(config.source.simulated.to_source_config()?);
            tracing::info!("using virtual reading source");
            run(&config, Arc::new(source), &cancel).await?;
        }
        SourceKind::Mqtt => {
            let (source, bridge) =
                MqttReadingSource::connect(&config.source.mqtt, cancel.child_token()).await?;
            let outcome = run(&config, Arc::new(source), &cancel).await;
            cancel.cancel();
            if let Err(err) = bridge.await {
                tracing::warn!(error = %err, "mqtt task ended abnormally");
            }
            outcome?;
        }
    }

    tracing::info!("thermohubd stopped");
    Ok(())
}

/// Serve until `cancel` fires, with pollers reading from `source`.
async fn run<S>(
    config: &Config,
    source: Arc<S>,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: ReadingSource + 'static,
{
    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let accessories = Arc::new(SqliteAccessoryRepository::new(pool.clone()));
    let characteristics = Arc::new(SqliteCharacteristicStore::new(pool.clone()));
    let history = Arc::new(SqliteHistorySink::new(pool));

    // Pollers
    let variant = config.platform.variant;
    let sensors = config.sensor_identities();
    tracing::info!(
        platform = %config.platform.name,
        ?variant,
        sensors = sensors.len(),
        "starting platform"
    );
    let ctx = PollerContext::new(
        source,
        Arc::clone(&characteristics),
        Arc::clone(&history),
        config.poller_settings(),
    );
    let registry = AccessoryRegistry::new(Arc::clone(&accessories), variant, ctx);
    let fleet = registry.start(&sensors, cancel).await?;

    // HTTP
    let state = AppState::new(accessories, characteristics, history, variant);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "thermohubd listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(cancel.clone().cancelled_owned())
        .await;

    cancel.cancel();
    fleet.shutdown().await;
    served?;
    Ok(())
}

async fn shutdown_on_signal(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => {
                tracing::info!("shutdown signal received");
                cancel.cancel();
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for shutdown signal"),
        },
        () = cancel.cancelled() => {}
    }
}
