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

//! Wire format of the randomness service
//!
//! Each request is answered with a JSON envelope:
//!
//! ```text
//! { "success": true, "count": 2, "data": [17, -4],
//!   "proof": { "source": "...", "pulseUri": "...", "timestamp": "..." } }
//! ```

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope returned by the service for every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomResponse {
    pub success: bool,

    /// Number of integers the service claims to have sent
    #[serde(default)]
    pub count: u32,

    /// Raw integers; absent on some failure responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<i32>>,

    /// Provenance metadata; carried through, never verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

/// Provenance record attached to a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    pub source: String,
    #[serde(rename = "pulseUri")]
    pub pulse_uri: String,
    pub timestamp: String,
}

impl Proof {
    /// Parse the timestamp as RFC 3339, if it is one
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl RandomResponse {
    /// Parse an envelope from a response body
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Extract the integers, checking the envelope against the requested count
    pub fn into_integers(self, expected: u32) -> Result<Vec<i32>> {
        if !self.success {
            return Err(Error::ApiRejected("service reported failure".to_string()));
        }

        let data = self
            .data
            .ok_or_else(|| Error::ApiRejected("response missing data".to_string()))?;

        if data.len() != expected as usize {
            return Err(Error::ApiRejected(format!(
                "expected {} integers, received {}",
                expected,
                data.len()
            )));
        }

        Ok(data)
    }
}
