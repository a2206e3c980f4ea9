//! Order status enums as reported by the Storefront API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order fulfillment status (`OrderFulfillmentStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    PartiallyFulfilled,
    Fulfilled,
    Restocked,
    PendingFulfillment,
    Open,
    InProgress,
    OnHold,
    Scheduled,
}

impl FulfillmentStatus {
    /// Human-readable label for order pages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unfulfilled => "Unfulfilled",
            Self::PartiallyFulfilled => "Partially fulfilled",
            Self::Fulfilled => "Fulfilled",
            Self::Restocked => "Restocked",
            Self::PendingFulfillment => "Pending",
            Self::Open => "Open",
            Self::InProgress => "In progress",
            Self::OnHold => "On hold",
            Self::Scheduled => "Scheduled",
        }
    }

    /// Whether the order has shipped in full.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Fulfilled)
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Order financial status (`OrderFinancialStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    Expired,
}

impl FinancialStatus {
    /// Human-readable label for order pages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Authorized => "Authorized",
            Self::PartiallyPaid => "Partially paid",
            Self::Paid => "Paid",
            Self::PartiallyRefunded => "Partially refunded",
            Self::Refunded => "Refunded",
            Self::Voided => "Voided",
            Self::Expired => "Expired",
        }
    }
}

impl fmt::Display for FinancialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fulfillment_status_wire_format() {
        let status: FulfillmentStatus = serde_json::from_str("\"PARTIALLY_FULFILLED\"").unwrap();
        assert_eq!(status, FulfillmentStatus::PartiallyFulfilled);
        assert_eq!(status.to_string(), "Partially fulfilled");
        assert!(!status.is_complete());
    }

    #[test]
    fn test_financial_status_wire_format() {
        let status: FinancialStatus = serde_json::from_str("\"PARTIALLY_REFUNDED\"").unwrap();
        assert_eq!(status, FinancialStatus::PartiallyRefunded);
        assert_eq!(
            serde_json::to_string(&FinancialStatus::Paid).unwrap(),
            "\"PAID\""
        );
    }
}
