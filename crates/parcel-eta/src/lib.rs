//! # parcel-eta — Delivery-Window Estimation
//!
//! Estimates when a parcel will arrive from the text of its latest tracking
//! event, using a rule table maintained as CSV.
//!
//! ## Architecture
//!
//! - **Rule** (`rule.rs`): one table row, validated and with its regex
//!   pattern compiled at construction.
//!
//! - **Store** (`store.rs`): reads the table through a [`RuleSource`],
//!   parses it, sorts it and caches it for the lifetime of the store.
//!
//! - **Matching** (`matching.rs`): `contains` / `equals` / `regex` tests of a
//!   status text against a rule.
//!
//! - **Estimate** (`estimate.rs`): walks a carrier's rules in order and
//!   returns the first match, or a defined fallback.
//!
//! ## Rule Precedence
//!
//! Evaluation is **first match wins**, in the order carrier name, then
//! `priority` ascending, then row order in the file. There is no
//! best-match or specificity scoring. A broad `contains` rule with a low
//! priority number shadows every narrower rule behind it, so rule-table
//! maintainers must give specific rules the smaller numbers.
//!
//! ## Crate Policy
//!
//! - Depends on `parcel-core` only.
//! - Only rule-table loading can fail. Malformed rows, unsupported match
//!   types and broken regex patterns degrade instead of erroring.

pub mod config;
pub mod error;
pub mod estimate;
pub mod matching;
pub mod rule;
pub mod store;

pub use config::EtaConfig;
pub use error::{EtaError, RuleRowError};
pub use estimate::{estimate_from_rules, EtaEstimate, EtaEstimator, EtaQuery};
pub use rule::{MatchType, Rule, RuleIdentity};
pub use store::{parse_rule_table, FileRuleSource, InlineRuleSource, RuleSource, RuleStore};
