// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The enrichment pipeline run before every session-originating request.
//!
//! The pipeline's defining invariant is that it never aborts request
//! processing: any failure in the geolocation lookup or the agent-string
//! classification replaces the whole record with the all-"Unknown" default
//! and the request continues. Partial fallback (defaulting only the failing
//! half) is deliberately not supported.

use std::net::IpAddr;
use std::sync::Arc;

use helpline_core::{GeoInfo, GeoLookup, HelplineError, VisitorInfo, UNKNOWN};

use crate::agent::parse_agent;

/// Address substituted when neither a forwarded header nor a peer address
/// is available.
const LOOPBACK: &str = "127.0.0.1";

/// Derives visitor metadata for an inbound session.
pub struct EnrichmentPipeline {
    geo: Option<Arc<dyn GeoLookup>>,
}

impl EnrichmentPipeline {
    /// Pipeline with an active geolocation collaborator.
    pub fn new(geo: Arc<dyn GeoLookup>) -> Self {
        Self { geo: Some(geo) }
    }

    /// Pipeline with the geolocation lookup switched off.
    ///
    /// Geo fields come back "Unknown" without any HTTP round-trip; agent
    /// classification still runs.
    pub fn without_geo() -> Self {
        Self { geo: None }
    }

    /// Enrich an inbound session from its network origin and declared agent
    /// string. Infallible: failures degrade to [`VisitorInfo::default`].
    pub async fn enrich(
        &self,
        forwarded_for: Option<&str>,
        peer_addr: Option<IpAddr>,
        agent: Option<&str>,
    ) -> VisitorInfo {
        let origin = network_origin(forwarded_for, peer_addr);
        match self.try_enrich(&origin, agent).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(error = %e, "visitor enrichment failed, using defaults");
                VisitorInfo::default()
            }
        }
    }

    async fn try_enrich(
        &self,
        origin: &str,
        agent: Option<&str>,
    ) -> Result<VisitorInfo, HelplineError> {
        let geo = match &self.geo {
            Some(lookup) => lookup.lookup(origin).await?,
            None => GeoInfo::default(),
        };

        let agent_str = agent.unwrap_or(UNKNOWN);
        let parsed = parse_agent(agent_str).ok_or_else(|| HelplineError::Lookup {
            message: format!("unrecognizable agent string: {agent_str}"),
            source: None,
        })?;

        Ok(VisitorInfo {
            network_origin: origin.to_string(),
            city: geo.city.unwrap_or_else(|| UNKNOWN.to_string()),
            region: geo.region.unwrap_or_else(|| UNKNOWN.to_string()),
            country: geo.country.unwrap_or_else(|| UNKNOWN.to_string()),
            timezone: geo.timezone.unwrap_or_else(|| UNKNOWN.to_string()),
            browser_name: parsed.browser_name,
            browser_version: parsed.browser_version,
            device_type: parsed.device_type,
            operating_system: parsed.operating_system,
        })
    }
}

/// Derive the network origin of a request.
///
/// Precedence: first entry of the forwarded-address header, then the raw
/// peer address, then the loopback literal.
pub fn network_origin(forwarded_for: Option<&str>, peer_addr: Option<IpAddr>) -> String {
    if let Some(header) = forwarded_for {
        let first = header.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }
    match peer_addr {
        Some(addr) => addr.to_string(),
        None => LOOPBACK.to_string(),
    }
}
