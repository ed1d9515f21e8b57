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

//! Quantum Random SDK
//!
//! Thin client for a remote quantum randomness service. The service hands out
//! batches of 32-bit signed integers; this crate fetches them and derives
//! range-bounded integers and unit floats from them.
//!
//! # Architecture
//!
//! The library is organized into modules representing core concerns:
//! - `client`: `QuantumRandom` facade holding the API key and validating input
//! - `fetcher`: single-attempt HTTPS transport against the service endpoint
//! - `protocol`: JSON envelope returned by the service
//! - `mapper`: pure functions turning raw integers into the requested shape
//! - `config`: client configuration with validation
//! - `error`: unified error types
//!
//! # Example
//!
//! ```no_run
//! use qrandom_core::{ClientConfig, QuantumRandom};
//!
//! # async fn run() -> qrandom_core::Result<()> {
//! let client = QuantumRandom::new(ClientConfig::default().with_api_key("my-key"))?;
//! let roll = client.get_integer_in_range(1, 6).await?;
//! let unit = client.get_float().await?;
//! println!("{roll} {unit}");
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is retried, cached, or batched behind the caller's back: with the
//! default [`RangeMapping::Modulo`] each call performs at most one round trip
//! and surfaces every failure as an [`Error`]. [`RangeMapping::Rejection`]
//! trades that guarantee for uniform range values.

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod mapper;
pub mod protocol;

pub use client::QuantumRandom;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use mapper::RangeMapping;

/// Library version, reported in the default user agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest batch the service accepts in one request
pub const MAX_COUNT: u32 = 1000;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.quantumrandom.io/v1/random";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default `User-Agent` value (`<sdk-name>/<version>`)
pub fn default_user_agent() -> String {
    format!("qrandom-sdk/{}", VERSION)
}
