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

//! Error types for the Quantum Random SDK
//!
//! Provides a unified error taxonomy using `thiserror` for ergonomic error handling.
//! Every failure is handed back to the caller as-is; the SDK never retries.

pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SDK operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generation call was made before an API key was set
    #[error("SDK not initialized: call initialize() with an API key first")]
    NotInitialized,

    /// Count or range argument out of bounds
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// DNS, connection or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 401
    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    /// HTTP 429
    #[error("Rate limited: rate limit exceeded, retry later")]
    RateLimited,

    /// HTTP 5xx
    #[error("Service unavailable: service temporarily unavailable")]
    ServiceUnavailable,

    /// Any other non-success HTTP status
    #[error("HTTP error {status}: {message}")]
    NetworkOther { status: u16, message: String },

    /// Well-formed response that carries no usable data
    #[error("API rejected request: {0}")]
    ApiRejected(String),

    /// Malformed JSON or schema mismatch
    #[error("Failed to parse response: {0}")]
    ParseFailure(String),

    /// The caller cancelled the in-flight request
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration validation failed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Fieldless error category, handy for `match` in caller retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotInitialized,
    InvalidArgument,
    Network,
    Unauthorized,
    RateLimited,
    ServiceUnavailable,
    NetworkOther,
    ApiRejected,
    ParseFailure,
    Cancelled,
    Config,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotInitialized => ErrorKind::NotInitialized,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Network(_) => ErrorKind::Network,
            Error::Unauthorized => ErrorKind::Unauthorized,
            Error::RateLimited => ErrorKind::RateLimited,
            Error::ServiceUnavailable => ErrorKind::ServiceUnavailable,
            Error::NetworkOther { .. } => ErrorKind::NetworkOther,
            Error::ApiRejected(_) => ErrorKind::ApiRejected,
            Error::ParseFailure(_) => ErrorKind::ParseFailure,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if a caller-side retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::RateLimited | Error::ServiceUnavailable
        )
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }

    /// Check if error was raised locally, before any network I/O
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::NotInitialized | Error::InvalidArgument(_) | Error::Config(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Network(format!("request timed out: {}", e))
        } else if e.is_connect() {
            Error::Network(format!("connection failed: {}", e))
        } else {
            Error::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ParseFailure(e.to_string())
    }
}
