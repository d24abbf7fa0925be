//! # parcel-cli — Parcel Tracking Command Line
//!
//! Provides the `parcel` command-line interface over the normalization and
//! ETA crates. Provider responses are read from recorded JSON files; no
//! network calls are made.
//!
//! ## Subcommands
//!
//! - `parcel track` — Normalize a provider response.
//! - `parcel rules list` — Print the rule table in evaluation order.
//! - `parcel rules check` — Validate the rule table.
//! - `parcel notify` — Classify the latest status for notification.
//!
//! ```bash
//! parcel track --response trackings.json --value UJ123456789SE
//! parcel track --response search.json --value order-1042 --mode order
//! PARCEL_ETA_RULES=rules.csv parcel rules check
//! parcel notify --response trackings.json --last-status in_transit
//! ```

pub mod notify;
pub mod rules;
pub mod track;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use parcel_eta::{EtaConfig, EtaEstimator, RuleStore};

/// Resolve the ETA configuration: an explicit `--rules` path wins over the
/// environment.
pub fn eta_config(rules: Option<&Path>) -> EtaConfig {
    match rules {
        Some(path) => EtaConfig::new(path),
        None => EtaConfig::from_env(),
    }
}

/// Build an estimator over the rule table named by `config`.
pub fn estimator(config: &EtaConfig) -> EtaEstimator {
    EtaEstimator::new(Arc::new(RuleStore::from_config(config)))
}

/// Read and parse a recorded provider response.
pub fn read_response(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read response file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("response file {} is not valid JSON", path.display()))
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Path of a file relative to the current directory, for messages.
pub fn display_path(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}
