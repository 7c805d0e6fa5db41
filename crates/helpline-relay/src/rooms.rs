// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability-keyed subscription table for per-identity rooms.
//!
//! Room membership is tracked explicitly (identity -> connection id ->
//! sender) rather than leaning on any channel-library grouping, so the
//! room-scoped vs. global relay contract is enforced here and independently
//! testable. Delivery collects sender handles first and awaits outside the
//! map iteration: no shard guard is ever held across a suspension point.

use std::collections::HashMap;

use dashmap::DashMap;
use tokio::sync::mpsc;

/// Outbound handle for one operator connection.
pub type EventSender = mpsc::Sender<String>;

/// Subscription table mapping identities to their room members, plus the
/// flat set of all operator connections used for global broadcast.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, HashMap<String, EventSender>>,
    operators: DashMap<String, EventSender>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly connected operator for global broadcasts.
    pub fn register_operator(&self, conn_id: &str, sender: EventSender) {
        self.operators.insert(conn_id.to_string(), sender);
    }

    /// Subscribe a connection to the room named after `identity`.
    pub fn join(&self, identity: &str, conn_id: &str, sender: EventSender) {
        self.rooms
            .entry(identity.to_string())
            .or_default()
            .insert(conn_id.to_string(), sender);
    }

    /// Drop a connection from the operator set and every room it joined.
    /// Emptied rooms are removed. No other compensating action is taken.
    pub fn disconnect(&self, conn_id: &str) {
        self.operators.remove(conn_id);
        self.rooms.retain(|_, members| {
            members.remove(conn_id);
            !members.is_empty()
        });
    }

    /// Deliver a payload to every member of one room.
    ///
    /// Returns the number of connections the payload was handed to.
    /// Connections whose receiver has gone away are skipped.
    pub async fn emit_to_room(&self, identity: &str, payload: &str) -> usize {
        let senders: Vec<EventSender> = match self.rooms.get(identity) {
            Some(members) => members.values().cloned().collect(),
            None => Vec::new(),
        };
        deliver(senders, payload).await
    }

    /// Deliver a payload to every connected operator.
    pub async fn broadcast(&self, payload: &str) -> usize {
        let senders: Vec<EventSender> = self
            .operators
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        deliver(senders, payload).await
    }

    /// Number of connections subscribed to a room.
    pub fn room_size(&self, identity: &str) -> usize {
        self.rooms.get(identity).map(|m| m.len()).unwrap_or(0)
    }

    /// Number of connected operators.
    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }
}

async fn deliver(senders: Vec<EventSender>, payload: &str) -> usize {
    let mut delivered = 0;
    for sender in senders {
        if sender.send(payload.to_string()).await.is_ok() {
            delivered += 1;
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> (EventSender, mpsc::Receiver<String>) {
        mpsc::channel(16)
    }

    #[tokio::test]
    async fn room_emit_reaches_members_only() {
        let registry = RoomRegistry::new();
        let (tx_a, mut rx_a) = connection();
        let (tx_b, mut rx_b) = connection();
        registry.register_operator("a", tx_a.clone());
        registry.register_operator("b", tx_b);
        registry.join("u1", "a", tx_a);

        assert_eq!(registry.emit_to_room("u1", "hello").await, 1);
        assert_eq!(rx_a.recv().await.unwrap(), "hello");
        assert!(rx_b.try_recv().is_err(), "non-member must not receive");
    }

    #[tokio::test]
    async fn broadcast_reaches_every_operator() {
        let registry = RoomRegistry::new();
        let (tx_a, mut rx_a) = connection();
        let (tx_b, mut rx_b) = connection();
        registry.register_operator("a", tx_a);
        registry.register_operator("b", tx_b);

        assert_eq!(registry.broadcast("new message").await, 2);
        assert_eq!(rx_a.recv().await.unwrap(), "new message");
        assert_eq!(rx_b.recv().await.unwrap(), "new message");
    }

    #[tokio::test]
    async fn emit_to_absent_room_delivers_nothing() {
        let registry = RoomRegistry::new();
        assert_eq!(registry.emit_to_room("nobody", "hello").await, 0);
    }

    #[tokio::test]
    async fn disconnect_clears_membership_everywhere() {
        let registry = RoomRegistry::new();
        let (tx, _rx) = connection();
        registry.register_operator("a", tx.clone());
        registry.join("u1", "a", tx.clone());
        registry.join("u2", "a", tx);

        registry.disconnect("a");
        assert_eq!(registry.operator_count(), 0);
        assert_eq!(registry.room_size("u1"), 0);
        assert_eq!(registry.room_size("u2"), 0);
    }

    #[tokio::test]
    async fn closed_receivers_are_skipped() {
        let registry = RoomRegistry::new();
        let (tx_dead, rx_dead) = connection();
        let (tx_live, mut rx_live) = connection();
        drop(rx_dead);
        registry.register_operator("dead", tx_dead);
        registry.register_operator("live", tx_live);

        assert_eq!(registry.broadcast("still here").await, 1);
        assert_eq!(rx_live.recv().await.unwrap(), "still here");
    }

    #[tokio::test]
    async fn two_connections_share_a_room() {
        let registry = RoomRegistry::new();
        let (tx_a, mut rx_a) = connection();
        let (tx_b, mut rx_b) = connection();
        registry.join("u1", "a", tx_a);
        registry.join("u1", "b", tx_b);

        assert_eq!(registry.emit_to_room("u1", "both").await, 2);
        assert_eq!(rx_a.recv().await.unwrap(), "both");
        assert_eq!(rx_b.recv().await.unwrap(), "both");
    }
}
