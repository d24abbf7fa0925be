//! # Track CLI — Normalize a recorded provider response.
//!
//! ```bash
//! parcel track --response trackings.json --value UJ123456789SE
//! parcel track --response search.json --value order-1042 --mode order
//! ```
//!
//! Exit codes: `0` normalized, `2` no shipment in the response.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;

use parcel_eta::EtaConfig;
use parcel_tracking::{LookupMode, TrackingError, TrackingNormalizer};

use crate::{estimator, print_json, read_response};

/// Exit code when the response holds no shipment.
pub const EXIT_NO_SHIPMENT: u8 = 2;

/// Arguments for `parcel track`.
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Recorded provider response (JSON).
    #[arg(long)]
    pub response: PathBuf,

    /// The tracking number or order reference that was looked up.
    #[arg(long)]
    pub value: Option<String>,

    /// How the shipment was looked up.
    #[arg(long, value_enum, default_value_t = ModeArg::Tracking)]
    pub mode: ModeArg,
}

/// Lookup modes accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// By tracking number.
    Tracking,
    /// By order reference.
    Order,
}

impl From<ModeArg> for LookupMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Tracking => Self::Tracking,
            ModeArg::Order => Self::Order,
        }
    }
}

/// Execute `parcel track`.
pub fn run_track(args: &TrackArgs, config: &EtaConfig) -> Result<u8> {
    let response = read_response(&args.response)?;
    let normalizer = TrackingNormalizer::new(estimator(config));
    let requested = args.value.as_deref().unwrap_or_default();

    match normalizer.normalize(&response, requested, args.mode.into()) {
        Ok(normalized) => {
            print_json(&normalized)?;
            Ok(0)
        }
        Err(TrackingError::NoShipment) => {
            tracing::warn!(response = %args.response.display(), "no shipment in response");
            print_json(&json!({ "ok": false, "error": "No shipment found" }))?;
            Ok(EXIT_NO_SHIPMENT)
        }
        Err(e) => Err(e).with_context(|| {
            format!(
                "failed to normalize {} with rules from {}",
                args.response.display(),
                config.rules_path().display()
            )
        }),
    }
}
