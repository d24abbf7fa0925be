//! # Rule Definitions
//!
//! A [`Rule`] maps a status-text pattern, scoped to one carrier, to a
//! delivery window in business days.
//!
//! Rules are immutable once built. The regex pattern of a `regex` rule is
//! compiled in [`Rule::new`]; a pattern that does not compile leaves the
//! rule in the table but it never matches.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::RuleRowError;

/// Priority given to rows whose `priority` column is absent or not a number.
pub const DEFAULT_PRIORITY: i64 = 9999;

/// How a rule's `match_value` is tested against a status text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// Case-insensitive substring containment.
    Contains,
    /// Case-insensitive equality after trimming.
    Equals,
    /// Case-insensitive regular expression.
    Regex,
    /// A value the table used that is not one of the above. Evaluated as
    /// [`MatchType::Contains`]; the raw value is kept for diagnostics.
    Unsupported(String),
}

impl MatchType {
    /// Parse the `match_type` column. Blank means `contains`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "contains" => Self::Contains,
            "equals" => Self::Equals,
            "regex" => Self::Regex,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// The identifier as written in the rule table.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::Regex => "regex",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of the ETA rule table.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    carrier: String,
    priority: i64,
    match_type: MatchType,
    match_value: String,
    eta_min_business_days: u32,
    eta_max_business_days: u32,
    eta_label: Option<String>,
    note: Option<String>,
    #[serde(skip)]
    pattern: Option<Regex>,
}

impl Rule {
    /// Build a rule, trimming and lowercasing the carrier and trimming the
    /// match value.
    ///
    /// # Errors
    ///
    /// Returns [`RuleRowError`] if `carrier` or `match_value` is blank.
    pub fn new(
        carrier: &str,
        priority: i64,
        match_type: MatchType,
        match_value: &str,
        eta_min_business_days: u32,
        eta_max_business_days: u32,
    ) -> Result<Self, RuleRowError> {
        let carrier = carrier.trim().to_lowercase();
        if carrier.is_empty() {
            return Err(RuleRowError::MissingCarrier);
        }
        let match_value = match_value.trim().to_string();
        if match_value.is_empty() {
            return Err(RuleRowError::MissingMatchValue);
        }

        let pattern = match match_type {
            MatchType::Regex => compile_pattern(&carrier, priority, &match_value),
            _ => None,
        };

        Ok(Self {
            carrier,
            priority,
            match_type,
            match_value,
            eta_min_business_days,
            eta_max_business_days,
            eta_label: None,
            note: None,
            pattern,
        })
    }

    /// Attach the customer-facing label. Blank labels are ignored.
    pub fn with_label(mut self, label: &str) -> Self {
        self.eta_label = non_blank(label);
        self
    }

    /// Attach an explanatory note. Blank notes are ignored.
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = non_blank(note);
        self
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn match_type(&self) -> &MatchType {
        &self.match_type
    }

    pub fn match_value(&self) -> &str {
        &self.match_value
    }

    pub fn eta_min_business_days(&self) -> u32 {
        self.eta_min_business_days
    }

    pub fn eta_max_business_days(&self) -> u32 {
        self.eta_max_business_days
    }

    pub fn eta_label(&self) -> Option<&str> {
        self.eta_label.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// The compiled pattern of a `regex` rule, `None` for other match types
    /// or when the pattern failed to compile.
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// The subset of fields reported back with an estimate.
    pub fn identity(&self) -> RuleIdentity {
        RuleIdentity {
            carrier: self.carrier.clone(),
            priority: self.priority,
            match_type: self.match_type.as_str().to_string(),
            match_value: self.match_value.clone(),
        }
    }
}

/// Identifies the rule that produced an estimate, for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleIdentity {
    pub carrier: String,
    pub priority: i64,
    pub match_type: String,
    pub match_value: String,
}

fn compile_pattern(carrier: &str, priority: i64, pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(
                carrier = %carrier,
                priority,
                pattern = %pattern,
                error = %e,
                "regex rule does not compile; it will never match"
            );
            None
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
