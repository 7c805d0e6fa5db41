// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ipinfo-compatible geolocation lookup over HTTP.

use std::time::Duration;

use async_trait::async_trait;

use helpline_config::model::GeoConfig;
use helpline_core::{GeoInfo, GeoLookup, HelplineError};

/// Geolocation lookup against an ipinfo-style JSON endpoint.
///
/// The reqwest client is built once with an explicit per-request timeout;
/// a hanging upstream therefore fails the lookup instead of stalling the
/// enrichment stage indefinitely. Timeout expiry, transport errors,
/// non-success statuses, and malformed payloads all surface as
/// [`HelplineError::Lookup`], which the enrichment pipeline consumes.
pub struct IpinfoLookup {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl IpinfoLookup {
    /// Build a lookup client from the geo config section.
    pub fn new(config: &GeoConfig) -> Result<Self, HelplineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HelplineError::Lookup {
                message: format!("failed to build geolocation HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl GeoLookup for IpinfoLookup {
    async fn lookup(&self, address: &str) -> Result<GeoInfo, HelplineError> {
        let url = format!("{}/{address}", self.endpoint);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token.as_str())]);
        }

        let response = request.send().await.map_err(|e| HelplineError::Lookup {
            message: format!("geolocation request to {url} failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HelplineError::Lookup {
                message: format!("geolocation lookup returned status {status}"),
                source: None,
            });
        }

        response.json::<GeoInfo>().await.map_err(|e| HelplineError::Lookup {
            message: format!("malformed geolocation payload: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, timeout_secs: u64) -> GeoConfig {
        GeoConfig {
            enabled: true,
            endpoint: server.uri(),
            token: Some("test-token".to_string()),
            timeout_secs,
        }
    }

    #[tokio::test]
    async fn successful_lookup_parses_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/203.0.113.7"))
            .and(query_param("token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ip": "203.0.113.7",
                "city": "Berlin",
                "region": "Berlin",
                "country": "DE",
                "timezone": "Europe/Berlin"
            })))
            .mount(&server)
            .await;

        let lookup = IpinfoLookup::new(&config_for(&server, 3)).unwrap();
        let info = lookup.lookup("203.0.113.7").await.unwrap();
        assert_eq!(info.city.as_deref(), Some("Berlin"));
        assert_eq!(info.country.as_deref(), Some("DE"));
        assert_eq!(info.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[tokio::test]
    async fn missing_fields_are_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"city": "Oslo"})),
            )
            .mount(&server)
            .await;

        let lookup = IpinfoLookup::new(&config_for(&server, 3)).unwrap();
        let info = lookup.lookup("203.0.113.8").await.unwrap();
        assert_eq!(info.city.as_deref(), Some("Oslo"));
        assert!(info.region.is_none());
        assert!(info.timezone.is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let lookup = IpinfoLookup::new(&config_for(&server, 3)).unwrap();
        let err = lookup.lookup("203.0.113.9").await.unwrap_err();
        assert!(matches!(err, HelplineError::Lookup { .. }));
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let lookup = IpinfoLookup::new(&config_for(&server, 3)).unwrap();
        let err = lookup.lookup("203.0.113.10").await.unwrap_err();
        assert!(matches!(err, HelplineError::Lookup { .. }));
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"city": "Late"}))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let lookup = IpinfoLookup::new(&config_for(&server, 1)).unwrap();
        let err = lookup.lookup("203.0.113.11").await.unwrap_err();
        assert!(matches!(err, HelplineError::Lookup { .. }));
    }
}
