// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for the persistent operator channel.
//!
//! Each upgraded connection is registered with the session router for
//! global broadcasts; room membership is opted into per identity via the
//! `join` event. Events are dispatched to the router one at a time, so a
//! slow store call suspends only this connection's read loop.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use helpline_relay::ClientEvent;

use crate::server::GatewayState;

/// WebSocket upgrade handler.
///
/// Upgrades the HTTP connection to WebSocket and spawns a handler task.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle an individual operator connection.
///
/// Spawns a sender task forwarding relayed events to the socket, then reads
/// client events until the connection closes. Disconnection drops the
/// connection from the subscription table and nothing else: no presence
/// tracking, no queued-message replay.
async fn handle_socket(socket: WebSocket, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let conn_id = uuid::Uuid::new_v4().to_string();

    let (tx, mut rx) = mpsc::channel::<String>(64);
    state.router.connect_operator(&conn_id, tx.clone());

    let sender_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let event: ClientEvent = match serde_json::from_str(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(conn_id, error = %e, "invalid channel event");
                        continue;
                    }
                };
                if let Err(e) = state.router.handle_event(&conn_id, &tx, event).await {
                    // Persistence failures already suppressed the relay;
                    // the connection itself stays up.
                    tracing::error!(conn_id, error = %e, "channel event failed");
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping (handled by tungstenite layer)
        }
    }

    state.router.disconnect(&conn_id);
    sender_task.abort();
}
