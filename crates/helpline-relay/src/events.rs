// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire events exchanged with operator connections.
//!
//! Operator -> Server (JSON):
//! ```json
//! {"event": "join", "data": {"identity": "u1"}}
//! {"event": "typing", "data": {"identity": "u1", "isTyping": true}}
//! {"event": "operatorMessage", "data": {"identity": "u1", "body": "hello"}}
//! ```
//!
//! Server -> Operator (JSON):
//! ```json
//! {"event": "message", "data": {"identity": "u1", "body": "...", "origin": "user", ...}}
//! {"event": "typing", "data": {"identity": "u1", "isTyping": true}}
//! ```

use serde::{Deserialize, Serialize};

use helpline_core::ChatMessage;

/// Event received from an operator connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Subscribe the connection to the room named after the identity.
    Join { identity: String },
    /// Typing indicator, relayed to the identity's room only.
    #[serde(rename_all = "camelCase")]
    Typing { identity: String, is_typing: bool },
    /// Operator reply: persisted first, then relayed to the room.
    OperatorMessage { identity: String, body: String },
}

/// Event pushed to operator connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A persisted chat message (room-scoped or broadcast).
    Message(ChatMessage),
    /// Typing indicator relayed within a room.
    #[serde(rename_all = "camelCase")]
    Typing { identity: String, is_typing: bool },
}

impl ServerEvent {
    /// Serialized wire form of the event.
    pub fn payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
