// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the relay surface.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use helpline_core::{ChatStore, HelplineError};
use helpline_enrich::EnrichmentPipeline;
use helpline_relay::SessionRouter;

use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Durable message log and user records.
    pub store: Arc<dyn ChatStore>,
    /// Session router over the room subscription table.
    pub router: Arc<SessionRouter>,
    /// Visitor enrichment pipeline run before chat handling.
    pub enrich: Arc<EnrichmentPipeline>,
}

/// Gateway server configuration (mirrors ServerConfig from helpline-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the full route table.
///
/// - POST /chat (guided steps and manual submissions)
/// - GET /admin/messages, GET /admin/analytics
/// - DELETE /admin/delete-chat/{identity}
/// - POST /admin/block-user/{identity}, POST /admin/resolve-issue/{identity}
/// - GET /ws (operator channel)
pub fn router(state: GatewayState) -> Router {
    let chat_routes = Router::new().route("/chat", post(handlers::post_chat));

    let admin_routes = Router::new()
        .route("/admin/messages", get(handlers::get_messages))
        .route("/admin/analytics", get(handlers::get_analytics))
        .route("/admin/delete-chat/{identity}", delete(handlers::delete_chat))
        .route("/admin/block-user/{identity}", post(handlers::block_user))
        .route(
            "/admin/resolve-issue/{identity}",
            post(handlers::resolve_issue),
        );

    let ws_routes = Router::new().route("/ws", get(ws::ws_handler));

    Router::new()
        .merge(chat_routes)
        .merge(admin_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP/WebSocket server.
///
/// Binds to the configured host:port and serves until the shutdown token is
/// cancelled. Peer addresses are propagated so the enrichment stage can
/// fall back to the raw connection address.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), HelplineError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HelplineError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Helpline gateway listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await
    .map_err(|e| HelplineError::Channel {
        message: format!("gateway server error: {e}"),
        source: Some(Box::new(e)),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpline_relay::RoomRegistry;
    use helpline_test_utils::MockChatStore;

    #[test]
    fn gateway_state_is_clone() {
        let store = Arc::new(MockChatStore::new());
        let state = GatewayState {
            store: store.clone(),
            router: Arc::new(SessionRouter::new(store, Arc::new(RoomRegistry::new()))),
            enrich: Arc::new(EnrichmentPipeline::without_geo()),
        };
        let _cloned = state.clone();
    }

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
