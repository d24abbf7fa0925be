//! # Status Text Matching
//!
//! Tests a status text against one rule.
//!
//! | Match type | Test |
//! |------------|------|
//! | `equals` | trimmed, lowercased text equals the lowercased match value |
//! | `regex` | compiled case-insensitive pattern finds a match in the *untrimmed* text |
//! | `contains` / unsupported | lowercased text contains the lowercased match value |
//!
//! A blank status text matches nothing, whatever the match type.

use crate::rule::{MatchType, Rule};

impl Rule {
    /// Whether `status_text` satisfies this rule.
    pub fn matches(&self, status_text: &str) -> bool {
        let text = normalize(status_text);
        let value = normalize(self.match_value());
        if text.is_empty() || value.is_empty() {
            return false;
        }

        match self.match_type() {
            MatchType::Equals => text == value,
            MatchType::Regex => self
                .pattern()
                .is_some_and(|re| re.is_match(status_text)),
            MatchType::Contains => text.contains(&value),
            MatchType::Unsupported(raw) => {
                tracing::debug!(
                    carrier = %self.carrier(),
                    priority = self.priority(),
                    match_type = %raw,
                    "unsupported match type, evaluating as contains"
                );
                text.contains(&value)
            }
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
