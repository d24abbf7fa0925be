//! # parcel CLI entry point
//!
//! Parses command-line arguments, initialises logging and dispatches to the
//! subcommand handlers in the `parcel_cli` library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parcel_cli::eta_config;
use parcel_cli::notify::{run_notify, NotifyArgs};
use parcel_cli::rules::{run_rules, RulesArgs};
use parcel_cli::track::{run_track, TrackArgs};

/// Parcel tracking normalization and delivery estimates.
///
/// Normalizes recorded multi-carrier tracking responses, detects the
/// PostNord / CityMail last-mile carrier and estimates the delivery window
/// from a CSV rule table.
#[derive(Parser, Debug)]
#[command(name = "parcel", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// ETA rule table (CSV). Overrides PARCEL_ETA_RULES.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize a recorded tracking response and estimate delivery.
    Track(TrackArgs),

    /// Inspect or validate the ETA rule table.
    Rules(RulesArgs),

    /// Decide whether a customer notification is due.
    Notify(NotifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, takes precedence over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = eta_config(cli.rules.as_deref());
    tracing::debug!(rules = %config.rules_path().display(), "resolved ETA rule table");

    let result = match cli.command {
        Commands::Track(args) => run_track(&args, &config),
        Commands::Rules(args) => run_rules(&args, &config),
        Commands::Notify(args) => run_notify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_cli::rules::RulesCommand;
    use parcel_tracking::{LookupMode, NotificationKind};

    #[test]
    fn cli_parse_track_defaults() {
        let cli = Cli::try_parse_from(["parcel", "track", "--response", "r.json"]).unwrap();
        if let Commands::Track(args) = cli.command {
            assert_eq!(args.response, PathBuf::from("r.json"));
            assert_eq!(LookupMode::from(args.mode), LookupMode::Tracking);
            assert!(args.value.is_none());
        } else {
            panic!("expected track");
        }
        assert!(cli.rules.is_none());
    }

    #[test]
    fn cli_parse_track_order_mode() {
        let cli = Cli::try_parse_from([
            "parcel", "track", "--response", "r.json", "--value", "order-1", "--mode", "order",
            "--rules", "custom.csv",
        ])
        .unwrap();
        assert_eq!(cli.rules, Some(PathBuf::from("custom.csv")));
        if let Commands::Track(args) = cli.command {
            assert_eq!(LookupMode::from(args.mode), LookupMode::Order);
            assert_eq!(args.value.as_deref(), Some("order-1"));
        } else {
            panic!("expected track");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["parcel", "track", "--response", "r", "--mode", "email"]).is_err());
    }

    #[test]
    fn cli_parse_rejects_unknown_last_status() {
        let err = Cli::try_parse_from([
            "parcel", "notify", "--response", "r.json", "--last-status", "shipped",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn cli_parse_track_requires_response() {
        assert!(Cli::try_parse_from(["parcel", "track"]).is_err());
    }

    #[test]
    fn cli_parse_rules_list_carrier() {
        let cli = Cli::try_parse_from(["parcel", "rules", "list", "--carrier", "citymail"]).unwrap();
        if let Commands::Rules(args) = cli.command {
            assert!(matches!(
                args.command,
                RulesCommand::List { carrier: Some(ref c) } if c == "citymail"
            ));
        } else {
            panic!("expected rules");
        }
    }

    #[test]
    fn cli_parse_rules_check() {
        let cli = Cli::try_parse_from(["parcel", "-vv", "rules", "check"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Rules(_)));
    }

    #[test]
    fn cli_parse_notify_last_status() {
        let cli = Cli::try_parse_from([
            "parcel", "notify", "--response", "r.json", "--last-status", "pickup_ready",
        ])
        .unwrap();
        if let Commands::Notify(args) = cli.command {
            assert_eq!(
                args.last_status.map(NotificationKind::from),
                Some(NotificationKind::PickupReady)
            );
        } else {
            panic!("expected notify");
        }
    }
}
