// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Helpline relay.

use thiserror::Error;

/// The primary error type used across all Helpline collaborator traits and
/// core operations.
///
/// Variants map one-to-one onto the relay's failure taxonomy: validation
/// failures reject the request, access denials reject it with an explicit
/// denial status, upstream lookup failures are consumed by the enrichment
/// fallback and never reach a caller, and store failures surface as
/// internal errors.
#[derive(Debug, Error)]
pub enum HelplineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A request carried a missing or empty required field.
    #[error("validation error: {0}")]
    Validation(String),

    /// The identity is flagged as blocked.
    #[error("identity {identity} is blocked")]
    AccessDenied { identity: String },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel errors (socket failure, malformed event, closed connection).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upstream lookup errors (geolocation transport, non-success status,
    /// malformed payload). Consumed by the enrichment fallback path.
    #[error("lookup error: {message}")]
    Lookup {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
