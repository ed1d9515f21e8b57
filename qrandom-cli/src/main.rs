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

//! qrandom - command-line front end for the Quantum Random SDK
//!
//! Settings come from `QRANDOM_*` environment variables and may be overridden
//! by flags. Values go to stdout one per line; logs go to stderr.
//!
//! ```text
//! qrandom --api-key KEY ints --count 5
//! qrandom range --min 1 --max 6 --count 3
//! qrandom float
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qrandom_core::{ClientConfig, Error, QuantumRandom, RangeMapping};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "qrandom")]
#[command(about = "Fetch random numbers from a quantum randomness service", long_about = None)]
struct Args {
    /// API key (overrides QRANDOM_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Service endpoint (overrides QRANDOM_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides QRANDOM_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Raw 32-bit integers
    Ints {
        #[arg(short, long, default_value = "1")]
        count: u32,
    },
    /// Integers in the inclusive range [min, max]
    Range {
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        min: i32,

        #[arg(short = 'M', long, default_value = "100", allow_negative_numbers = true)]
        max: i32,

        #[arg(short, long, default_value = "1")]
        count: u32,

        /// Use rejection sampling instead of the modulo mapping
        #[arg(long)]
        unbiased: bool,
    },
    /// Floats in [0, 1]
    Float {
        #[arg(short, long, default_value = "1")]
        count: u32,
    },
}

impl Args {
    /// Merge flags over the environment-derived configuration
    fn client_config(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Command::Range { unbiased: true, .. } = self.command {
            config = config.with_range_mapping(RangeMapping::Rejection);
        }
        config
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.client_config(
        ClientConfig::from_env().context("Failed to load configuration from environment")?,
    );
    let client = QuantumRandom::new(config).context("Failed to create client")?;

    if !client.is_initialized() {
        anyhow::bail!("No API key: pass --api-key or set QRANDOM_API_KEY");
    }

    match args.command {
        Command::Ints { count } => {
            let values = client.get_integers(count).await?;
            print_all(&values);
        }
        Command::Range { min, max, count, .. } => {
            let values = if count == 1 {
                vec![client.get_integer_in_range(min, max).await?]
            } else {
                client.get_integers_in_range(count, min, max).await?
            };
            print_all(&values);
        }
        Command::Float { count } => {
            let values = if count == 1 {
                vec![client.get_float().await?]
            } else {
                client.get_floats(count).await?
            };
            print_all(&values);
        }
    }
    Ok(())
}

/// Drive `work` to completion unless `token` fires first, in which case the
/// in-flight request is dropped and `Error::Cancelled` is returned
async fn until_cancelled<F, T>(work: F, token: &CancellationToken) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Cancelled.into()),
        result = work => result,
    }
}

fn print_all<T: std::fmt::Display>(values: &[T]) {
    for value in values {
        println!("{}", value);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::WARN);

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("qrandom v{}", env!("CARGO_PKG_VERSION"));

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C signal, cancelling request");
                token.cancel();
            }
        });
    }

    until_cancelled(run(args), &token).await
}
