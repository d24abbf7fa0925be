//! # Carrier Identifier Newtypes
//!
//! Newtype wrappers for the secondary identifiers that last-mile carriers
//! assign to a parcel. These prevent identifier confusion: a `PostnordId`
//! cannot be passed where a `CitymailId` is expected, and neither can be
//! built from a string that fails its carrier's format check.
//!
//! The wrapped value is the identifier as reported upstream, trimmed but
//! otherwise unchanged, so it can be shown to the customer and used in
//! carrier lookups verbatim.

use serde::{Deserialize, Serialize};

use crate::carrier::{Carrier, FormatMatch};
use crate::error::ParcelError;

/// A PostNord shipment identifier (`UJ…SE` or `003…`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostnordId(String);

/// A CityMail shipment identifier (`BC…CN`, at least 8 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitymailId(String);

impl PostnordId {
    /// Validate and wrap a PostNord identifier.
    pub fn parse(value: &str) -> Result<Self, ParcelError> {
        validated(Carrier::Postnord, value).map(Self)
    }

    /// Whether this is a canonical `UJ…SE` identifier or a `003…` one.
    pub fn strength(&self) -> FormatMatch {
        Carrier::Postnord
            .format_match(&self.0)
            .unwrap_or(FormatMatch::Secondary)
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the identifier string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl CitymailId {
    /// Validate and wrap a CityMail identifier.
    pub fn parse(value: &str) -> Result<Self, ParcelError> {
        validated(Carrier::Citymail, value).map(Self)
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the identifier string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn validated(carrier: Carrier, value: &str) -> Result<String, ParcelError> {
    let trimmed = value.trim();
    if carrier.matches_format(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ParcelError::InvalidIdentifier {
            carrier: carrier.to_string(),
            value: value.to_string(),
        })
    }
}

impl std::fmt::Display for PostnordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for CitymailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postnord_parse_trims() {
        let id = PostnordId::parse("  UJ123456789SE ").unwrap();
        assert_eq!(id.as_str(), "UJ123456789SE");
        assert_eq!(id.strength(), FormatMatch::Primary);
    }

    #[test]
    fn postnord_003_is_secondary_strength() {
        let id = PostnordId::parse("00370712345").unwrap();
        assert_eq!(id.strength(), FormatMatch::Secondary);
    }

    #[test]
    fn citymail_rejects_postnord_value() {
        let err = CitymailId::parse("UJ123456789SE").unwrap_err();
        assert!(matches!(err, ParcelError::InvalidIdentifier { .. }));
    }

    #[test]
    fn serde_is_transparent() {
        let id = CitymailId::parse("BC123456CN").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"BC123456CN\"");
    }
}
