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

//! SDK facade
//!
//! [`QuantumRandom`] owns the API key and a [`RandomSource`]. It is either
//! uninitialized (no key) or ready. Every generation call checks readiness and
//! validates its arguments before touching the network, then performs at most
//! one round trip and maps the raw integers. The exception is
//! [`RangeMapping::Rejection`], which may refetch to replace rejected values.

use crate::{
    config::ClientConfig,
    fetcher::{FetcherConfig, HttpFetcher, RandomSource},
    mapper::{self, RangeMapping},
    Error, Result, MAX_COUNT,
};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Raw integers requested per round when rejection sampling a single value
pub const REJECTION_BATCH: u32 = 8;

/// Upper bound on round trips spent on rejection sampling
pub const MAX_REJECTION_ROUNDS: usize = 4;

/// Client for the quantum randomness service
pub struct QuantumRandom<S = HttpFetcher> {
    source: S,
    api_key: RwLock<Option<String>>,
    range_mapping: RangeMapping,
}

impl QuantumRandom<HttpFetcher> {
    /// Create a client talking HTTP to the configured endpoint.
    ///
    /// The client is ready immediately if the configuration carries an API key.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(FetcherConfig::from_client_config(&config)?)?;
        Ok(Self::with_source(fetcher, &config))
    }

    /// Create a client from `QRANDOM_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<S: RandomSource> QuantumRandom<S> {
    /// Create a client over any integer source
    pub fn with_source(source: S, config: &ClientConfig) -> Self {
        Self {
            source,
            api_key: RwLock::new(config.api_key.clone()),
            range_mapping: config.range_mapping,
        }
    }

    /// Record the API key, moving the client to the ready state.
    ///
    /// Calling this again replaces the key.
    pub fn initialize(&self, api_key: impl Into<String>) -> Result<()> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::InvalidArgument("API key cannot be empty".to_string()));
        }

        let previous = self.api_key.write().replace(api_key);
        if previous.is_some() {
            info!("API key replaced");
        } else {
            info!("SDK initialized");
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.api_key.read().is_some()
    }

    /// Forget the API key; generation calls fail until `initialize` is called again
    pub fn shutdown(&self) {
        if self.api_key.write().take().is_some() {
            info!("SDK shut down");
        }
    }

    /// Range mapping used by the range operations
    pub fn range_mapping(&self) -> RangeMapping {
        self.range_mapping
    }

    /// Underlying integer source
    pub fn source(&self) -> &S {
        &self.source
    }

    fn api_key(&self) -> Result<String> {
        self.api_key.read().clone().ok_or(Error::NotInitialized)
    }

    /// Fetch `count` raw integers (`1..=1000`)
    pub async fn get_integers(&self, count: u32) -> Result<Vec<i32>> {
        let api_key = self.api_key()?;
        mapper::validate_count(count)?;

        debug!("Fetching {} integers", count);
        self.source.fetch_integers(&api_key, count).await
    }

    /// Like [`get_integers`](Self::get_integers), but gives up with
    /// [`Error::Cancelled`] as soon as `token` fires
    pub async fn get_integers_cancellable(
        &self,
        count: u32,
        token: &CancellationToken,
    ) -> Result<Vec<i32>> {
        let api_key = self.api_key()?;
        mapper::validate_count(count)?;

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Request for {} integers cancelled", count);
                Err(Error::Cancelled)
            }
            result = self.source.fetch_integers(&api_key, count) => result,
        }
    }

    /// Fetch one integer mapped into `[min, max]`; requires `min < max`.
    ///
    /// With the default [`RangeMapping::Modulo`] this is a single
    /// `get_integers(1)` round trip. With [`RangeMapping::Rejection`] it asks
    /// for [`REJECTION_BATCH`] raws per round and may take up to
    /// [`MAX_REJECTION_ROUNDS`] round trips before giving up with
    /// [`Error::ApiRejected`].
    pub async fn get_integer_in_range(&self, min: i32, max: i32) -> Result<i32> {
        self.api_key()?;
        mapper::validate_range(min, max)?;

        match self.range_mapping {
            RangeMapping::Modulo => {
                let raw = self.get_integers(1).await?;
                first(&raw).and_then(|raw| mapper::to_range_value(raw, min, max))
            }
            RangeMapping::Rejection => {
                let values = self.sample_unbiased(1, min, max).await?;
                first(&values)
            }
        }
    }

    /// Fetch `count` integers mapped into `[min, max]` in a single request.
    ///
    /// [`RangeMapping::Rejection`] over-fetches and may need further round
    /// trips, as described on [`get_integer_in_range`](Self::get_integer_in_range).
    pub async fn get_integers_in_range(&self, count: u32, min: i32, max: i32) -> Result<Vec<i32>> {
        self.api_key()?;
        mapper::validate_count(count)?;
        mapper::validate_range(min, max)?;

        match self.range_mapping {
            RangeMapping::Modulo => {
                let raw = self.get_integers(count).await?;
                raw.into_iter()
                    .map(|raw| mapper::to_range_value(raw, min, max))
                    .collect()
            }
            RangeMapping::Rejection => self.sample_unbiased(count, min, max).await,
        }
    }

    /// Fetch one float in `[0.0, 1.0]`
    pub async fn get_float(&self) -> Result<f64> {
        let raw = self.get_integers(1).await?;
        first(&raw).map(mapper::to_unit_float)
    }

    /// Fetch `count` floats in `[0.0, 1.0]` in a single request
    pub async fn get_floats(&self, count: u32) -> Result<Vec<f64>> {
        let raw = self.get_integers(count).await?;
        Ok(raw.into_iter().map(mapper::to_unit_float).collect())
    }

    /// Rejection-sample `count` values, over-fetching to absorb rejected raws
    async fn sample_unbiased(&self, count: u32, min: i32, max: i32) -> Result<Vec<i32>> {
        let wanted = count as usize;
        let mut values = Vec::with_capacity(wanted);

        for round in 1..=MAX_REJECTION_ROUNDS {
            let missing = (wanted - values.len()) as u32;
            let request = missing.saturating_mul(2).max(REJECTION_BATCH).min(MAX_COUNT);

            let raw = self.get_integers(request).await?;
            let remaining = wanted - values.len();
            values.extend(
                mapper::accept_unbiased(&raw, min, max)?
                    .into_iter()
                    .take(remaining),
            );

            if values.len() == wanted {
                return Ok(values);
            }
            debug!(
                "Rejection round {}: {}/{} values accepted",
                round,
                values.len(),
                wanted
            );
        }

        warn!(
            "Rejection sampling gave up after {} rounds ({}/{} values)",
            MAX_REJECTION_ROUNDS,
            values.len(),
            wanted
        );
        Err(Error::ApiRejected(format!(
            "rejection sampling accepted only {} of {} values",
            values.len(),
            wanted
        )))
    }
}

fn first<T: Copy>(values: &[T]) -> Result<T> {
    values
        .first()
        .copied()
        .ok_or_else(|| Error::ApiRejected("response contained no integers".to_string()))
}
