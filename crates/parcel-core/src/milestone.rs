//! # Status Milestones
//!
//! Defines the `Milestone` enum: the coarse lifecycle stages the tracking
//! provider reports for a shipment, and the fixed Swedish display label for
//! each of them.
//!
//! Only one locale is modelled. The label table is the single place where
//! customer-facing status text is decided.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParcelError;

/// Label shown for a missing or unrecognized milestone.
pub const UNKNOWN_STATUS_LABEL: &str = "Okänd status";

/// Provider lifecycle milestones.
///
/// | Milestone | Label |
/// |-----------|-------|
/// | `info_received` | Information mottagen (försändelsen är registrerad men ej skickad än) |
/// | `in_transit` | På väg |
/// | `out_for_delivery` | Ute för leverans |
/// | `available_for_pickup` | Klar för upphämtning hos ombud |
/// | `delivered` | Levererad |
/// | `failed_attempt` | Misslyckat leveransförsök |
/// | `exception` | Problem med försändelsen |
/// | `pending` | Ingen spårningsinformation ännu |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// Shipment registered, not yet handed over.
    InfoReceived,
    /// Moving through the carrier network.
    InTransit,
    /// On the delivery vehicle.
    OutForDelivery,
    /// Waiting at a pickup point.
    AvailableForPickup,
    /// Delivered to the recipient.
    Delivered,
    /// Delivery attempted and failed.
    FailedAttempt,
    /// Something went wrong with the shipment.
    Exception,
    /// No tracking information yet.
    Pending,
}

impl Milestone {
    /// Returns all milestones in lifecycle order.
    pub fn all() -> &'static [Milestone] {
        &[
            Self::InfoReceived,
            Self::InTransit,
            Self::OutForDelivery,
            Self::AvailableForPickup,
            Self::Delivered,
            Self::FailedAttempt,
            Self::Exception,
            Self::Pending,
        ]
    }

    /// Returns the provider's snake_case identifier for this milestone.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InfoReceived => "info_received",
            Self::InTransit => "in_transit",
            Self::OutForDelivery => "out_for_delivery",
            Self::AvailableForPickup => "available_for_pickup",
            Self::Delivered => "delivered",
            Self::FailedAttempt => "failed_attempt",
            Self::Exception => "exception",
            Self::Pending => "pending",
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InfoReceived => {
                "Information mottagen (försändelsen är registrerad men ej skickad än)"
            }
            Self::InTransit => "På väg",
            Self::OutForDelivery => "Ute för leverans",
            Self::AvailableForPickup => "Klar för upphämtning hos ombud",
            Self::Delivered => "Levererad",
            Self::FailedAttempt => "Misslyckat leveransförsök",
            Self::Exception => "Problem med försändelsen",
            Self::Pending => "Ingen spårningsinformation ännu",
        }
    }
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Milestone {
    type Err = ParcelError;

    /// Parse a milestone from the provider's identifier. Case-sensitive, as
    /// the provider always emits lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParcelError::UnknownMilestone(s.to_string()))
    }
}

/// Map a raw provider milestone to its display label.
///
/// Total: `None` and unrecognized values map to [`UNKNOWN_STATUS_LABEL`].
pub fn display_label(milestone: Option<&str>) -> &'static str {
    milestone
        .and_then(|m| m.parse::<Milestone>().ok())
        .map_or(UNKNOWN_STATUS_LABEL, |m| m.label())
}
