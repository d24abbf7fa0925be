//! # Rules CLI — Inspect and validate the ETA rule table.
//!
//! ```bash
//! # Print the table in the order rules are evaluated:
//! parcel rules list
//! parcel rules list --carrier postnord
//!
//! # Validate the table and print per-carrier counts:
//! parcel rules check
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use parcel_core::Carrier;
use parcel_eta::{EtaConfig, MatchType, Rule, RuleStore};

use crate::display_path;

/// Rules subcommand arguments.
#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

/// Available rules subcommands.
#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Print the rule table in evaluation order.
    List {
        /// Only show rules for this carrier.
        #[arg(long)]
        carrier: Option<String>,
    },

    /// Load the rule table and report what would be evaluated.
    Check,
}

/// Execute the rules subcommand.
pub fn run_rules(args: &RulesArgs, config: &EtaConfig) -> Result<u8> {
    let store = RuleStore::from_config(config);
    let rules = store
        .rules()
        .with_context(|| format!("rule table {}", display_path(config.rules_path()).display()))?;

    match &args.command {
        RulesCommand::List { carrier } => run_list(&rules, carrier.as_deref()),
        RulesCommand::Check => run_check(&rules, config),
    }
}

fn run_list(rules: &[Rule], carrier: Option<&str>) -> Result<u8> {
    let selected: Vec<&Rule> = rules
        .iter()
        .filter(|r| carrier.map_or(true, |c| r.carrier().eq_ignore_ascii_case(c.trim())))
        .collect();

    println!(
        "  {:<10} {:>8}  {:<8} {:<7} {:<24} MATCH",
        "CARRIER", "PRIORITY", "TYPE", "DAYS", "LABEL"
    );
    for rule in &selected {
        println!("  {}", format_rule(rule));
    }
    println!();
    println!("Total: {} rules", selected.len());
    Ok(0)
}

fn format_rule(rule: &Rule) -> String {
    let days = format!(
        "{}-{}",
        rule.eta_min_business_days(),
        rule.eta_max_business_days()
    );
    format!(
        "{:<10} {:>8}  {:<8} {:<7} {:<24} {}",
        rule.carrier(),
        rule.priority(),
        rule.match_type().as_str(),
        days,
        rule.eta_label().unwrap_or("-"),
        rule.match_value()
    )
}

/// Counts and problems found in a loaded table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RuleReport {
    pub per_carrier: BTreeMap<String, usize>,
    pub unsupported: usize,
    pub broken_patterns: usize,
    pub inverted_windows: usize,
    /// Rules for carriers that detection never reports.
    pub unreachable: usize,
}

impl RuleReport {
    pub fn from_rules(rules: &[Rule]) -> Self {
        let mut report = Self::default();
        for rule in rules {
            *report.per_carrier.entry(rule.carrier().to_string()).or_default() += 1;
            match rule.match_type() {
                MatchType::Unsupported(_) => report.unsupported += 1,
                MatchType::Regex if rule.pattern().is_none() => report.broken_patterns += 1,
                _ => {}
            }
            if rule.eta_min_business_days() > rule.eta_max_business_days() {
                report.inverted_windows += 1;
            }
            if !Carrier::known().iter().any(|c| c.as_str() == rule.carrier()) {
                report.unreachable += 1;
            }
        }
        report
    }

    /// Whether every rule can match as written.
    pub fn is_clean(&self) -> bool {
        self.unsupported == 0
            && self.broken_patterns == 0
            && self.inverted_windows == 0
            && self.unreachable == 0
    }
}

fn run_check(rules: &[Rule], config: &EtaConfig) -> Result<u8> {
    let report = RuleReport::from_rules(rules);

    println!("Rule table: {}", display_path(config.rules_path()).display());
    for (carrier, count) in &report.per_carrier {
        println!("  {carrier:<10} {count} rules");
    }
    if report.unsupported > 0 {
        println!("  {} rules use an unsupported match type (evaluated as contains)", report.unsupported);
    }
    if report.broken_patterns > 0 {
        println!("  {} regex rules failed to compile and never match", report.broken_patterns);
    }
    if report.inverted_windows > 0 {
        println!("  {} rules have a minimum above their maximum", report.inverted_windows);
    }

    if report.unreachable > 0 {
        println!("  {} rules name a carrier that is never detected", report.unreachable);
    }

    if rules.is_empty() {
        tracing::warn!("rule table has no usable rules");
        return Ok(1);
    }
    Ok(if report.is_clean() { 0 } else { 1 })
}
