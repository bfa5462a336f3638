//! Status enums for catalog entities.
//!
//! Statuses are persisted as lower-case text; repositories decode them
//! through `FromStr` and treat unknown values as data corruption.

use serde::{Deserialize, Serialize};

/// Error returned when a persisted status string is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid {kind} status: {value}")]
pub struct StatusParseError {
    /// Entity kind the status belongs to ("product" or "campaign").
    pub kind: &'static str,
    /// The offending value.
    pub value: String,
}

/// Lifecycle status of a product.
///
/// Only `Active` products are purchasable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Listed and purchasable (campaign status permitting).
    Active,
    /// Hidden from purchase but retained in the catalog.
    Inactive,
    /// Created by the brand but not yet published.
    Draft,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Draft => write!(f, "draft"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "draft" => Ok(Self::Draft),
            _ => Err(StatusParseError {
                kind: "product",
                value: s.to_owned(),
            }),
        }
    }
}

/// Lifecycle status of a campaign.
///
/// Products are only purchasable while their owning campaign is `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Running; products under it may be purchased.
    Active,
    /// Temporarily paused by the brand.
    Paused,
    /// Reached its end date or sales target.
    Completed,
    /// Cancelled before completion.
    Cancelled,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError {
                kind: "campaign",
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_roundtrip() {
        for status in [
            ProductStatus::Active,
            ProductStatus::Inactive,
            ProductStatus::Draft,
        ] {
            let parsed: ProductStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_campaign_status_roundtrip() {
        for status in [
            CampaignStatus::Active,
            CampaignStatus::Paused,
            CampaignStatus::Completed,
            CampaignStatus::Cancelled,
        ] {
            let parsed: CampaignStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let err = "retired".parse::<ProductStatus>().unwrap_err();
        assert_eq!(err.kind, "product");
        assert!("archived".parse::<CampaignStatus>().is_err());
    }
}
