//! # Notify CLI — Decide whether a customer notification is due.
//!
//! ```bash
//! parcel notify --response trackings.json --last-status in_transit
//! ```
//!
//! Prints the classified status, the notification kind and whether it is
//! due. Exit code `0` either way; sending is left to the caller.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use parcel_tracking::{decide_notification, NotificationKind, Tracking};

use crate::{print_json, read_response};

/// Arguments for `parcel notify`.
#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Recorded provider response (JSON).
    #[arg(long)]
    pub response: PathBuf,

    /// The notification kind last sent for this shipment.
    #[arg(long, value_enum)]
    pub last_status: Option<KindArg>,
}

/// Notification kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum KindArg {
    TrackingCreated,
    InTransit,
    PickupReady,
    Delivered,
}

impl From<KindArg> for NotificationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::TrackingCreated => Self::TrackingCreated,
            KindArg::InTransit => Self::InTransit,
            KindArg::PickupReady => Self::PickupReady,
            KindArg::Delivered => Self::Delivered,
        }
    }
}

/// Execute `parcel notify`.
pub fn run_notify(args: &NotifyArgs) -> Result<u8> {
    let response = read_response(&args.response)?;
    let Some(tracking) = Tracking::from_response(&response) else {
        anyhow::bail!("no shipment found in {}", args.response.display());
    };

    let decision = decide_notification(&tracking, args.last_status.map(NotificationKind::from));
    if decision.due {
        tracing::info!(
            kind = decision.kind.map(|k| k.as_str()).unwrap_or_default(),
            "notification due"
        );
    }
    print_json(&decision)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("response.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn classifies_latest_event() {
        let dir = tempfile::tempdir().unwrap();
        let args = NotifyArgs {
            response: response(
                &dir,
                r#"{"events":[{"datetime":"2024-01-01T00:00:00Z","statusCode":"delivery_delivered"}]}"#,
            ),
            last_status: Some(KindArg::InTransit),
        };
        assert_eq!(run_notify(&args).unwrap(), 0);
    }

    #[test]
    fn kind_args_use_notification_names() {
        for kind in KindArg::value_variants() {
            let name = kind.to_possible_value().unwrap();
            assert_eq!(name.get_name(), NotificationKind::from(*kind).as_str());
        }
    }

    #[test]
    fn missing_shipment_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = NotifyArgs {
            response: response(&dir, r#"{"data":[]}"#),
            last_status: None,
        };
        assert!(run_notify(&args).is_err());
    }
}
