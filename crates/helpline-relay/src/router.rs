// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session router: maps identities to rooms and relays messages.
//!
//! Two producers share the durable log behind one `ChatStore`: operator
//! replies arriving over the channel, and user submissions arriving over
//! HTTP. The router owns the ordering contract between persistence and
//! delivery -- a client must never see a message absent from the log, so
//! every relay awaits the store append first and is skipped when the append
//! fails.

use std::sync::Arc;

use tracing::{debug, warn};

use helpline_core::{ChatMessage, ChatStore, HelplineError};

use crate::events::{ClientEvent, ServerEvent};
use crate::rooms::{EventSender, RoomRegistry};

/// Routes channel events and user submissions between the store and rooms.
pub struct SessionRouter {
    store: Arc<dyn ChatStore>,
    rooms: Arc<RoomRegistry>,
}

impl SessionRouter {
    pub fn new(store: Arc<dyn ChatStore>, rooms: Arc<RoomRegistry>) -> Self {
        Self { store, rooms }
    }

    /// The underlying subscription table.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Track a freshly upgraded operator connection.
    pub fn connect_operator(&self, conn_id: &str, sender: EventSender) {
        self.rooms.register_operator(conn_id, sender);
        debug!(conn_id, "operator connected");
    }

    /// Forget a connection. No presence tracking, no queued replay.
    pub fn disconnect(&self, conn_id: &str) {
        self.rooms.disconnect(conn_id);
        debug!(conn_id, "operator disconnected");
    }

    /// Dispatch one inbound channel event from an operator connection.
    pub async fn handle_event(
        &self,
        conn_id: &str,
        sender: &EventSender,
        event: ClientEvent,
    ) -> Result<(), HelplineError> {
        match event {
            ClientEvent::Join { identity } => {
                self.rooms.join(&identity, conn_id, sender.clone());
                debug!(conn_id, identity = %identity, "joined room");
                Ok(())
            }
            ClientEvent::Typing {
                identity,
                is_typing,
            } => {
                self.relay_typing(&identity, is_typing).await;
                Ok(())
            }
            ClientEvent::OperatorMessage { identity, body } => {
                self.handle_operator_message(&identity, &body).await?;
                Ok(())
            }
        }
    }

    /// Relay a typing indicator to the identity's room only.
    pub async fn relay_typing(&self, identity: &str, is_typing: bool) -> usize {
        let payload = ServerEvent::Typing {
            identity: identity.to_string(),
            is_typing,
        }
        .payload();
        self.rooms.emit_to_room(identity, &payload).await
    }

    /// Persist an operator reply, then relay it to the identity's room.
    ///
    /// Log-then-relay ordering is mandatory: if the append fails the error
    /// propagates and no relay happens.
    pub async fn handle_operator_message(
        &self,
        identity: &str,
        body: &str,
    ) -> Result<ChatMessage, HelplineError> {
        let message = self.store.append_operator(identity, body).await.map_err(|e| {
            warn!(identity = %identity, error = %e, "operator message not persisted, relay suppressed");
            e
        })?;
        let payload = ServerEvent::Message(message.clone()).payload();
        self.rooms.emit_to_room(identity, &payload).await;
        Ok(message)
    }

    /// Push an already-persisted user message to every operator connection.
    ///
    /// Global broadcast, not room-scoped: any available operator should see
    /// new inbound traffic immediately.
    pub async fn broadcast_user_message(&self, message: &ChatMessage) -> usize {
        let payload = ServerEvent::Message(message.clone()).payload();
        self.rooms.broadcast(&payload).await
    }
}
