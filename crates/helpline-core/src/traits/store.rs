// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document-store trait backing the durable message log and user records.

use async_trait::async_trait;

use crate::error::HelplineError;
use crate::types::{AnalyticsSnapshot, ChatMessage, LoggedMessage, UserRecord, VisitorInfo};

/// Durable append-only message log plus per-identity user records.
///
/// Both ingress paths (synchronous HTTP submission and the operator
/// channel) write through this single interface, preserving one ordering
/// surface for the log. Implementations must support concurrent independent
/// operations; there is no cross-operation transaction, so callers own any
/// ordering they need between round-trips.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Append a user-originated message. Fails on empty identity or body.
    async fn append_user(
        &self,
        identity: &str,
        body: &str,
    ) -> Result<ChatMessage, HelplineError>;

    /// Append an operator-originated message. Fails on empty identity or body.
    async fn append_operator(
        &self,
        identity: &str,
        body: &str,
    ) -> Result<ChatMessage, HelplineError>;

    /// Every message in creation order, left-joined with the author's
    /// last-known visitor metadata (missing user record yields `None`).
    async fn list_all(&self) -> Result<Vec<LoggedMessage>, HelplineError>;

    /// Delete every message for the identity, returning the deleted count.
    /// Idempotent: clearing an identity with no messages returns zero.
    async fn clear(&self, identity: &str) -> Result<u64, HelplineError>;

    /// Look up the user record for an identity, if one exists yet.
    async fn find_user(&self, identity: &str) -> Result<Option<UserRecord>, HelplineError>;

    /// Upsert the block flag, creating the record when absent.
    async fn set_blocked(&self, identity: &str, blocked: bool) -> Result<(), HelplineError>;

    /// Upsert the resolved flag, creating the record when absent.
    async fn set_resolved(&self, identity: &str, resolved: bool)
    -> Result<(), HelplineError>;

    /// Upsert the visitor metadata, creating the record when absent.
    async fn record_visitor_info(
        &self,
        identity: &str,
        info: &VisitorInfo,
    ) -> Result<(), HelplineError>;

    /// Aggregate counts for the admin analytics view.
    async fn analytics(&self) -> Result<AnalyticsSnapshot, HelplineError>;
}
