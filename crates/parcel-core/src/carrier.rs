//! # Last-Mile Carriers
//!
//! Defines the `Carrier` enum and the identifier formats used to recognize
//! each carrier from the tracking numbers the provider reports.
//!
//! ## Identifier Formats
//!
//! | Carrier | Format | Strength |
//! |---------|--------|----------|
//! | PostNord | starts with `UJ` and ends with `SE` | primary |
//! | PostNord | starts with `003` | secondary |
//! | CityMail | starts with `BC`, ends with `CN`, at least 8 characters | primary |
//!
//! Matching is done on the trimmed, ASCII-uppercased value. The same
//! format table is used for secondary identifiers and for the primary
//! tracking number, so extraction and detection cannot disagree.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParcelError;

/// Minimum length of a CityMail identifier. Shorter `BC…CN` strings are
/// treated as noise.
pub const CITYMAIL_MIN_LEN: usize = 8;

/// The last-mile carrier responsible for a shipment.
///
/// `Unknown` is a regular value, not an error: detection degrades to it
/// whenever no identifier format matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    /// CityMail (Sweden).
    Citymail,
    /// PostNord (Sweden/Nordics).
    Postnord,
    /// No known carrier could be inferred.
    Unknown,
}

/// How strongly an identifier matches a carrier format.
///
/// When several identifiers match the same carrier, a `Primary` match is
/// preferred over a `Secondary` one regardless of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatMatch {
    /// The carrier's canonical identifier format.
    Primary,
    /// A weaker, prefix-only format.
    Secondary,
}

impl Carrier {
    /// The carriers that have an identifier format, in detection order.
    pub fn known() -> &'static [Carrier] {
        &[Self::Citymail, Self::Postnord]
    }

    /// Returns the lowercase identifier used in rule tables and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citymail => "citymail",
            Self::Postnord => "postnord",
            Self::Unknown => "unknown",
        }
    }

    /// Classify `value` against this carrier's identifier format.
    pub fn format_match(&self, value: &str) -> Option<FormatMatch> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return None;
        }
        match self {
            Self::Postnord => {
                if normalized.starts_with("UJ") && normalized.ends_with("SE") {
                    Some(FormatMatch::Primary)
                } else if normalized.starts_with("003") {
                    Some(FormatMatch::Secondary)
                } else {
                    None
                }
            }
            Self::Citymail => {
                let shaped = normalized.starts_with("BC") && normalized.ends_with("CN");
                (shaped && normalized.chars().count() >= CITYMAIL_MIN_LEN)
                    .then_some(FormatMatch::Primary)
            }
            Self::Unknown => None,
        }
    }

    /// Whether `value` matches this carrier's identifier format at all.
    pub fn matches_format(&self, value: &str) -> bool {
        self.format_match(value).is_some()
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Carrier {
    type Err = ParcelError;

    /// Parse a carrier name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "citymail" => Ok(Self::Citymail),
            "postnord" => Ok(Self::Postnord),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParcelError::UnknownCarrier(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postnord_uj_se_is_primary() {
        assert_eq!(
            Carrier::Postnord.format_match("UJ123456789SE"),
            Some(FormatMatch::Primary)
        );
    }

    #[test]
    fn postnord_003_prefix_is_secondary() {
        assert_eq!(
            Carrier::Postnord.format_match("00370712345678901234"),
            Some(FormatMatch::Secondary)
        );
    }

    #[test]
    fn postnord_requires_se_suffix_for_uj() {
        assert_eq!(Carrier::Postnord.format_match("UJ123456789DK"), None);
    }

    #[test]
    fn citymail_requires_minimum_length() {
        assert!(Carrier::Citymail.matches_format("BC123456CN"));
        assert!(!Carrier::Citymail.matches_format("BC12CN"));
        assert!(!Carrier::Citymail.matches_format("BCCN"));
    }

    #[test]
    fn formats_are_case_and_whitespace_insensitive() {
        assert!(Carrier::Citymail.matches_format("  bc123456cn "));
        assert!(Carrier::Postnord.matches_format("uj123456se"));
    }

    #[test]
    fn unknown_matches_nothing() {
        assert!(!Carrier::Unknown.matches_format("UJ123456SE"));
        assert!(!Carrier::Unknown.matches_format(""));
    }

    #[test]
    fn empty_value_matches_no_carrier() {
        for carrier in Carrier::known() {
            assert!(!carrier.matches_format("   "));
        }
    }

    #[test]
    fn from_str_roundtrip() {
        for carrier in [Carrier::Citymail, Carrier::Postnord, Carrier::Unknown] {
            let parsed: Carrier = carrier.as_str().parse().unwrap();
            assert_eq!(parsed, carrier);
        }
        assert_eq!("PostNord".parse::<Carrier>().unwrap(), Carrier::Postnord);
        assert!("dhl".parse::<Carrier>().is_err());
    }

    #[test]
    fn serde_format_matches_as_str() {
        for carrier in [Carrier::Citymail, Carrier::Postnord, Carrier::Unknown] {
            let json = serde_json::to_string(&carrier).unwrap();
            assert_eq!(json, format!("\"{}\"", carrier.as_str()));
        }
    }
}
