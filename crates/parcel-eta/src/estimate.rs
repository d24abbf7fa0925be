//! # ETA Estimation
//!
//! Turns a carrier, the text of the latest tracking event and the
//! provider milestone into an [`EtaEstimate`].
//!
//! 1. Take the rules whose carrier equals the detected carrier, ignoring
//!    case, in stored order.
//! 2. Return the first rule that matches the status text.
//! 3. Without a match, a delivered shipment gets a zero-day estimate.
//! 4. Otherwise the estimate is marked unavailable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EtaError;
use crate::rule::{Rule, RuleIdentity};
use crate::store::RuleStore;

/// Label for a delivered shipment.
pub const DELIVERED_LABEL: &str = "Levererad";

/// Label when no rule covers the current status.
pub const UNAVAILABLE_LABEL: &str = "Beräknad leverans saknas för denna status";

/// Note attached to an unavailable estimate.
pub const UNAVAILABLE_NOTE: &str = "Uppskattning baserad på nuvarande status";

/// Input to an estimate.
#[derive(Debug, Clone, Copy)]
pub struct EtaQuery<'a> {
    /// Detected carrier, as used in the rule table (`postnord`, `citymail`).
    pub carrier: &'a str,
    /// Status text of the latest event. Empty when there are no events.
    pub latest_status_text: &'a str,
    /// Provider milestone, if reported.
    pub milestone: Option<&'a str>,
}

/// Estimated delivery window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtaEstimate {
    pub estimated_delivery: String,
    pub eta_min_business_days: Option<u32>,
    pub eta_max_business_days: Option<u32>,
    pub eta_note: Option<String>,
    pub matched_rule: Option<RuleIdentity>,
}

impl EtaEstimate {
    fn from_rule(rule: &Rule) -> Self {
        let min = rule.eta_min_business_days();
        let max = rule.eta_max_business_days();
        Self {
            estimated_delivery: rule
                .eta_label()
                .map_or_else(|| format!("{min}–{max} arbetsdagar"), str::to_string),
            eta_min_business_days: Some(min),
            eta_max_business_days: Some(max),
            eta_note: rule.note().map(str::to_string),
            matched_rule: Some(rule.identity()),
        }
    }

    fn delivered() -> Self {
        Self {
            estimated_delivery: DELIVERED_LABEL.to_string(),
            eta_min_business_days: Some(0),
            eta_max_business_days: Some(0),
            eta_note: None,
            matched_rule: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            estimated_delivery: UNAVAILABLE_LABEL.to_string(),
            eta_min_business_days: None,
            eta_max_business_days: None,
            eta_note: Some(UNAVAILABLE_NOTE.to_string()),
            matched_rule: None,
        }
    }

    /// Whether the estimate came from a rule rather than a fallback.
    pub fn is_rule_based(&self) -> bool {
        self.matched_rule.is_some()
    }
}

/// Estimates delivery windows from a shared [`RuleStore`].
#[derive(Debug, Clone)]
pub struct EtaEstimator {
    store: Arc<RuleStore>,
}

impl EtaEstimator {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Estimate the delivery window for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`EtaError::ConfigLoad`] if the rule table cannot be loaded.
    pub fn estimate(&self, query: &EtaQuery<'_>) -> Result<EtaEstimate, EtaError> {
        let rules = self.store.rules()?;
        Ok(estimate_from_rules(&rules, query))
    }
}

/// Evaluate `query` against an already-sorted rule list.
pub fn estimate_from_rules(rules: &[Rule], query: &EtaQuery<'_>) -> EtaEstimate {
    let matched = rules
        .iter()
        .filter(|rule| rule.carrier().eq_ignore_ascii_case(query.carrier.trim()))
        .find(|rule| rule.matches(query.latest_status_text));

    if let Some(rule) = matched {
        tracing::debug!(
            carrier = %rule.carrier(),
            priority = rule.priority(),
            match_value = %rule.match_value(),
            "ETA rule matched"
        );
        return EtaEstimate::from_rule(rule);
    }

    let delivered = query
        .milestone
        .is_some_and(|m| m.trim().eq_ignore_ascii_case("delivered"));
    if delivered {
        EtaEstimate::delivered()
    } else {
        tracing::debug!(carrier = %query.carrier, "no ETA rule matched");
        EtaEstimate::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::MatchType;

    fn rules() -> Vec<Rule> {
        vec![
            Rule::new("postnord", 1, MatchType::Contains, "transit", 1, 3).unwrap(),
            Rule::new("postnord", 2, MatchType::Contains, "parcel", 4, 6)
                .unwrap()
                .with_label("Snart")
                .with_note("Generisk regel"),
            Rule::new("citymail", 1, MatchType::Contains, "transit", 2, 2).unwrap(),
        ]
    }

    fn query<'a>(carrier: &'a str, text: &'a str, milestone: Option<&'a str>) -> EtaQuery<'a> {
        EtaQuery {
            carrier,
            latest_status_text: text,
            milestone,
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let est = estimate_from_rules(&rules(), &query("postnord", "Parcel is in transit", None));
        assert_eq!(est.eta_min_business_days, Some(1));
        assert_eq!(est.eta_max_business_days, Some(3));
        assert_eq!(est.estimated_delivery, "1–3 arbetsdagar");
        let matched = est.matched_rule.unwrap();
        assert_eq!(matched.priority, 1);
        assert_eq!(matched.match_type, "contains");
    }

    #[test]
    fn label_and_note_are_used_when_present() {
        let est = estimate_from_rules(&rules(), &query("postnord", "Parcel registered", None));
        assert_eq!(est.estimated_delivery, "Snart");
        assert_eq!(est.eta_note.as_deref(), Some("Generisk regel"));
    }

    #[test]
    fn carrier_filter_ignores_case() {
        let est = estimate_from_rules(&rules(), &query("CityMail", "in transit", None));
        assert_eq!(est.matched_rule.unwrap().carrier, "citymail");
    }

    #[test]
    fn other_carriers_rules_are_not_used() {
        let est = estimate_from_rules(&rules(), &query("unknown", "in transit", None));
        assert!(!est.is_rule_based());
    }

    #[test]
    fn delivered_fallback_is_zero_days() {
        let est = estimate_from_rules(&rules(), &query("postnord", "Utdelad", Some("delivered")));
        assert_eq!(est.estimated_delivery, DELIVERED_LABEL);
        assert_eq!(est.eta_min_business_days, Some(0));
        assert_eq!(est.eta_max_business_days, Some(0));
        assert_eq!(est.matched_rule, None);
    }

    #[test]
    fn rule_beats_delivered_fallback() {
        let est = estimate_from_rules(&rules(), &query("postnord", "transit", Some("delivered")));
        assert!(est.is_rule_based());
    }

    #[test]
    fn unavailable_fallback_has_no_window() {
        let est = estimate_from_rules(&rules(), &query("postnord", "Okänd", Some("in_transit")));
        assert_eq!(est.estimated_delivery, UNAVAILABLE_LABEL);
        assert_eq!(est.eta_min_business_days, None);
        assert_eq!(est.eta_max_business_days, None);
        assert_eq!(est.eta_note.as_deref(), Some(UNAVAILABLE_NOTE));
        assert_eq!(est.matched_rule, None);
    }

    #[test]
    fn estimator_propagates_load_errors() {
        let store = RuleStore::new(crate::store::FileRuleSource::new("/nonexistent/rules.csv"));
        let estimator = EtaEstimator::new(Arc::new(store));
        let err = estimator
            .estimate(&query("postnord", "transit", None))
            .unwrap_err();
        assert!(matches!(err, EtaError::ConfigLoad { .. }));
    }

    #[test]
    fn serialized_estimate_uses_snake_case_keys() {
        let est = estimate_from_rules(&rules(), &query("postnord", "in transit", None));
        let json = serde_json::to_value(&est).unwrap();
        assert_eq!(json["eta_min_business_days"], 1);
        assert_eq!(json["matched_rule"]["match_value"], "transit");
    }
}
