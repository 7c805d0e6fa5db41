// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock geolocation lookup with a fixed answer or forced failure.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use helpline_core::{GeoInfo, GeoLookup, HelplineError};

/// A scripted `GeoLookup` for enrichment tests.
pub struct MockGeoLookup {
    answer: Option<GeoInfo>,
    calls: AtomicUsize,
}

impl MockGeoLookup {
    /// Lookup that always returns the given answer.
    pub fn answering(answer: GeoInfo) -> Self {
        Self {
            answer: Some(answer),
            calls: AtomicUsize::new(0),
        }
    }

    /// Lookup that always fails.
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many lookups were issued.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLookup for MockGeoLookup {
    async fn lookup(&self, _address: &str) -> Result<GeoInfo, HelplineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(answer) => Ok(answer.clone()),
            None => Err(HelplineError::Lookup {
                message: "injected lookup failure".to_string(),
                source: None,
            }),
        }
    }
}
