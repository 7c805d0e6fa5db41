// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpline serve` command implementation.
//!
//! Wires the SQLite store, the room subscription table, the session router,
//! and the enrichment pipeline into the gateway server, then serves until a
//! shutdown signal arrives.

use std::sync::Arc;

use tracing::info;

use helpline_config::model::HelplineConfig;
use helpline_core::{ChatStore, HelplineError};
use helpline_enrich::{EnrichmentPipeline, IpinfoLookup};
use helpline_gateway::{start_server, GatewayState, ServerConfig};
use helpline_relay::{RoomRegistry, SessionRouter};
use helpline_storage::SqliteStore;

use crate::shutdown;

/// Runs the `helpline serve` command.
pub async fn run_serve(config: HelplineConfig) -> Result<(), HelplineError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting helpline serve");

    // Initialize storage; both ingress paths share this one store.
    let storage = {
        let storage = SqliteStore::new(config.storage.clone());
        storage.initialize().await?;
        Arc::new(storage)
    };

    // Session router over the explicit room subscription table.
    let rooms = Arc::new(RoomRegistry::new());
    let router = Arc::new(SessionRouter::new(
        storage.clone() as Arc<dyn ChatStore>,
        rooms,
    ));

    // Enrichment pipeline; the lookup is best-effort and bounded by the
    // configured timeout.
    let enrich = if config.geo.enabled {
        let lookup = IpinfoLookup::new(&config.geo)?;
        info!(
            endpoint = config.geo.endpoint.as_str(),
            timeout_secs = config.geo.timeout_secs,
            "geolocation lookup enabled"
        );
        Arc::new(EnrichmentPipeline::new(Arc::new(lookup)))
    } else {
        info!("geolocation lookup disabled by configuration");
        Arc::new(EnrichmentPipeline::without_geo())
    };

    let state = GatewayState {
        store: storage.clone(),
        router,
        enrich,
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    // Install signal handler and serve until cancelled.
    let cancel = shutdown::install_signal_handler();
    start_server(&server_config, state, cancel).await?;

    storage.close().await?;
    info!("helpline serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helpline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
