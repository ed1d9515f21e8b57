// SPDX-License-Identifier: MIT
//
// Quantum Random SDK: Client for Quantum Randomness Services
// Copyright (c) 2025 Valer Bocan, PhD, CSSLP
// Email: valer.bocan@upt.ro
//
// Department of Computer and Information Technology
// Politehnica University of Timisoara
//
// https://github.com/vbocan/qrandom-sdk

//! HTTP client for fetching integers from the randomness service
//!
//! One GET per call, no retries. Non-success statuses are classified from the
//! status line alone; the body is only parsed on success.

use crate::{
    config::ClientConfig, mapper::validate_count, protocol::RandomResponse,
    Error, Result, API_KEY_HEADER,
};
use reqwest::header::HeaderValue;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Source of raw random integers
///
/// The facade is generic over this trait so tests and alternative transports
/// can stand in for the HTTP client.
pub trait RandomSource: Send + Sync {
    /// Fetch exactly `count` integers using `api_key`
    fn fetch_integers(
        &self,
        api_key: &str,
        count: u32,
    ) -> impl Future<Output = Result<Vec<i32>>> + Send;
}

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Service endpoint; `count` is appended as a query parameter
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl FetcherConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            user_agent: crate::default_user_agent(),
        }
    }

    /// Derive fetcher settings from a validated client configuration
    pub fn from_client_config(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("Invalid base_url '{}': {}", config.base_url, e)))?;

        Ok(Self {
            base_url,
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// HTTP client for the randomness service
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with configuration
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build request URL with the count query parameter
    fn build_request_url(&self, count: u32) -> Url {
        let mut url = self.config.base_url.clone();
        url.query_pairs_mut()
            .append_pair("count", &count.to_string());
        url
    }

    async fn fetch_once(&self, api_key: &str, count: u32) -> Result<Vec<i32>> {
        let mut key = HeaderValue::from_str(api_key).map_err(|_| {
            Error::InvalidArgument("API key contains characters not allowed in a header".to_string())
        })?;
        key.set_sensitive(true);

        let url = self.build_request_url(count);
        debug!("Requesting {} integers from {}", count, url);

        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach {}: {}", url, e);
                Error::from(e)
            })?;

        let status = response.status();
        if let Err(e) = classify_status(status) {
            warn!("HTTP error {}: {}", status, e);
            return Err(e);
        }

        let body = response.text().await?;
        let envelope = RandomResponse::from_json(&body).map_err(|e| {
            warn!("Malformed response body: {}", e);
            e
        })?;

        if let Some(proof) = &envelope.proof {
            debug!(
                source = %proof.source,
                pulse_uri = %proof.pulse_uri,
                timestamp = %proof.timestamp,
                "Response carries proof"
            );
        }

        let data = envelope.into_integers(count)?;
        debug!("Successfully fetched {} integers", data.len());
        Ok(data)
    }

    /// Get fetcher configuration
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }
}

impl RandomSource for HttpFetcher {
    #[instrument(skip(self, api_key))]
    async fn fetch_integers(&self, api_key: &str, count: u32) -> Result<Vec<i32>> {
        validate_count(count)?;

        let started = Instant::now();
        let result = self.fetch_once(api_key, count).await;
        let latency = started.elapsed().as_micros() as u64;

        match &result {
            Ok(data) => debug!(latency_micros = latency, integers = data.len(), "Request completed"),
            Err(e) => debug!(latency_micros = latency, error = %e, "Request failed"),
        }

        result
    }
}

/// Map a response status to an error without looking at the body
pub fn classify_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    Err(match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
        s if s.is_server_error() => Error::ServiceUnavailable,
        s => Error::NetworkOther {
            status: s.as_u16(),
            message: s.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFetcher {
        let config = FetcherConfig::new(Url::parse("https://example.com/random").unwrap());
        HttpFetcher::new(config).unwrap()
    }

    #[test]
    fn test_url_building() {
        let url = fetcher().build_request_url(25);
        assert_eq!(url.as_str(), "https://example.com/random?count=25");
    }

    #[test]
    fn test_url_building_keeps_existing_query() {
        let config = FetcherConfig::new(Url::parse("https://example.com/random?format=int").unwrap());
        let url = HttpFetcher::new(config).unwrap().build_request_url(1);
        assert_eq!(url.query(), Some("format=int&count=1"));
    }

    #[test]
    fn test_status_classification() {
        assert!(classify_status(StatusCode::OK).is_ok());
        assert!(matches!(classify_status(StatusCode::UNAUTHORIZED), Err(Error::Unauthorized)));
        assert!(matches!(classify_status(StatusCode::TOO_MANY_REQUESTS), Err(Error::RateLimited)));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(Error::ServiceUnavailable)
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE),
            Err(Error::ServiceUnavailable)
        ));
        match classify_status(StatusCode::NOT_FOUND) {
            Err(Error::NetworkOther { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("Not Found"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_client_config() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:9000/rng")
            .with_timeout(Duration::from_secs(3));
        let fetcher_config = FetcherConfig::from_client_config(&config).unwrap();
        assert_eq!(fetcher_config.timeout, Duration::from_secs(3));
        assert_eq!(fetcher_config.base_url.as_str(), "http://localhost:9000/rng");
    }

    #[tokio::test]
    async fn test_invalid_count_is_rejected_locally() {
        let fetcher = fetcher();
        assert!(matches!(
            fetcher.fetch_integers("key", 0).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            fetcher.fetch_integers("key", 1001).await,
            Err(Error::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_header_key_is_rejected_locally() {
        let fetcher = fetcher();
        assert!(matches!(
            fetcher.fetch_integers("bad\nkey", 1).await,
            Err(Error::InvalidArgument(_))
        ));
    }
}
