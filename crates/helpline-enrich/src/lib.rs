// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visitor enrichment pipeline for the Helpline relay.
//!
//! Annotates every inbound session with derived geolocation and device
//! metadata under a strict non-blocking fallback contract: enrichment never
//! fails, it degrades to an all-"Unknown" record.

pub mod agent;
pub mod geo;
pub mod pipeline;

pub use agent::{parse_agent, AgentInfo};
pub use geo::IpinfoLookup;
pub use pipeline::{network_origin, EnrichmentPipeline};
