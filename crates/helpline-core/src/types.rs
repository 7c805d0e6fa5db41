// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Helpline relay.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::HelplineError;

/// Literal marker used for every visitor field that could not be derived.
pub const UNKNOWN: &str = "Unknown";

/// Who authored a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    User,
    Operator,
}

/// A single chat message in the durable log.
///
/// Messages are append-only: constructed once via [`ChatMessage::new`],
/// never mutated, and deleted only in bulk when an operator clears a
/// conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message id.
    pub id: String,
    /// The conversation this message belongs to.
    pub identity: String,
    /// Message text.
    pub body: String,
    /// Whether the end user or an operator authored it.
    pub origin: MessageOrigin,
    /// RFC 3339 timestamp stamped at construction.
    pub created_at: String,
}

impl ChatMessage {
    /// Construct a message, stamping a fresh id and creation time.
    ///
    /// This is the single validation point for both ingress paths: an empty
    /// or whitespace-only identity or body is rejected here, before any
    /// store round-trip.
    pub fn new(
        identity: &str,
        body: &str,
        origin: MessageOrigin,
    ) -> Result<Self, HelplineError> {
        if identity.trim().is_empty() {
            return Err(HelplineError::Validation(
                "message identity must not be empty".to_string(),
            ));
        }
        if body.trim().is_empty() {
            return Err(HelplineError::Validation(
                "message body must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            identity: identity.to_string(),
            body: body.to_string(),
            origin,
            created_at: now_rfc3339(),
        })
    }
}

/// Millisecond-precision UTC timestamp in RFC 3339 form.
///
/// The fixed width keeps lexicographic and chronological ordering identical,
/// which the message log's `ORDER BY created_at` relies on.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Derived metadata attached to an inbound session.
///
/// Every field defaults to the literal `"Unknown"` marker; the default
/// record is the fallback value the enrichment pipeline substitutes when
/// any sub-lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorInfo {
    pub network_origin: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub timezone: String,
    pub browser_name: String,
    pub browser_version: String,
    pub device_type: String,
    pub operating_system: String,
}

impl Default for VisitorInfo {
    fn default() -> Self {
        Self {
            network_origin: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            timezone: UNKNOWN.to_string(),
            browser_name: UNKNOWN.to_string(),
            browser_version: UNKNOWN.to_string(),
            device_type: UNKNOWN.to_string(),
            operating_system: UNKNOWN.to_string(),
        }
    }
}

/// Per-identity user record.
///
/// Created lazily by the first upsert (enrichment write or administrative
/// action). Absence of a record is equivalent to an unblocked, unresolved
/// user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub identity: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub visitor_info: Option<VisitorInfo>,
}

impl UserRecord {
    /// A fresh, unblocked, unresolved record for the given identity.
    pub fn new(identity: &str) -> Self {
        Self {
            identity: identity.to_string(),
            display_name: None,
            is_blocked: false,
            is_resolved: false,
            visitor_info: None,
        }
    }
}

/// A log entry as replayed to the analytics view: the message left-joined
/// with its author's last-known visitor metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedMessage {
    #[serde(flatten)]
    pub message: ChatMessage,
    /// `None` when no user record exists yet for the message's identity.
    pub visitor_info: Option<VisitorInfo>,
}

/// Aggregate counts for the admin analytics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_messages: u64,
    pub active_users: u64,
    pub resolved_issues: u64,
}

/// Raw geolocation answer from the external lookup collaborator.
///
/// Fields are individually optional; the enrichment pipeline substitutes
/// [`UNKNOWN`] per field on a successful lookup with gaps, and the whole
/// default [`VisitorInfo`] when the lookup itself fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}
