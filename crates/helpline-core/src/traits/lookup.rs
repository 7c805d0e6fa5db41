// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External geolocation lookup trait used by the enrichment pipeline.

use async_trait::async_trait;

use crate::error::HelplineError;
use crate::types::GeoInfo;

/// Resolves a network address to coarse geolocation data.
///
/// Implementations should bound the lookup with an explicit timeout; a
/// hanging upstream must not stall a request indefinitely. Errors from this
/// trait never propagate past the enrichment pipeline -- they select the
/// all-"Unknown" fallback record instead.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<GeoInfo, HelplineError>;
}
