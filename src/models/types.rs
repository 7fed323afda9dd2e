//! Common domain type definitions
//!
//! Enum types shared across models and analyses.

use serde::{Deserialize, Serialize};

/// Gender of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male gender
    Male,
    /// Female gender
    Female,
    /// Unknown or not specified
    Unknown,
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "1" => Self::Male,
            "f" | "female" | "2" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl Gender {
    /// Canonical label used in cleaned output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

/// Ordered stages of the purchase funnel
///
/// The derived `Ord` follows declaration order, so `Purchase` is the
/// furthest stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FunnelStage {
    /// Landing on the home page
    Home,
    /// Viewing a product detail page
    ProductView,
    /// Adding a product to the cart
    AddToCart,
    /// Starting checkout
    Checkout,
    /// Completing a purchase
    Purchase,
}

impl FunnelStage {
    /// All stages in funnel order
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::ProductView,
        Self::AddToCart,
        Self::Checkout,
        Self::Purchase,
    ];

    /// Display label for the stage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::ProductView => "Product View",
            Self::AddToCart => "Add to Cart",
            Self::Checkout => "Checkout",
            Self::Purchase => "Purchase",
        }
    }
}

/// Churn risk tier based on days since the last order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChurnRisk {
    /// Ordered recently
    Active,
    /// Slightly stale
    LowRisk,
    /// Getting stale
    MediumRisk,
    /// No recent activity at all
    HighRisk,
}

impl ChurnRisk {
    /// Display label for the tier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::LowRisk => "Low Risk",
            Self::MediumRisk => "Medium Risk",
            Self::HighRisk => "High Risk",
        }
    }
}

/// Purchase-frequency tier based on lifetime order count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseFrequency {
    /// No orders at all
    Never,
    /// Exactly one order
    OneTime,
    /// More than one order
    Repeat,
    /// At or above the VIP order count
    Vip,
}

impl PurchaseFrequency {
    /// Display label for the tier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "Never Purchased",
            Self::OneTime => "One-Time",
            Self::Repeat => "Repeat",
            Self::Vip => "VIP",
        }
    }
}

/// RFM customer segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfmSegment {
    /// Recent, frequent, high-spending customers
    Champions,
    /// Frequent customers worth retaining
    Loyal,
    /// Previously frequent customers going quiet
    AtRisk,
    /// Neither recent nor frequent
    Lost,
    /// Everyone else
    NeedAttention,
}

impl RfmSegment {
    /// Display label for the segment
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Champions => "Champions",
            Self::Loyal => "Loyal",
            Self::AtRisk => "At Risk",
            Self::Lost => "Lost",
            Self::NeedAttention => "Need Attention",
        }
    }
}

/// Anomaly level of a single transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyLevel {
    /// Within the customer's normal range
    Normal,
    /// More than the medium z-score cutoff from the mean
    Medium,
    /// More than the high z-score cutoff from the mean
    High,
}

impl AnomalyLevel {
    /// Display label for the level
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Affinity level of a product pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffinityLevel {
    /// Weak co-occurrence
    Low,
    /// Noticeable co-occurrence
    Medium,
    /// Strong co-occurrence
    High,
}

impl AffinityLevel {
    /// Display label for the level
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_string() {
        assert_eq!(Gender::from("M"), Gender::Male);
        assert_eq!(Gender::from("male"), Gender::Male);
        assert_eq!(Gender::from(" F "), Gender::Female);
        assert_eq!(Gender::from("2"), Gender::Female);
        assert_eq!(Gender::from("other"), Gender::Unknown);
        assert_eq!(Gender::from(""), Gender::Unknown);
    }

    #[test]
    fn test_funnel_stage_ordering() {
        assert!(FunnelStage::Home < FunnelStage::ProductView);
        assert!(FunnelStage::Checkout < FunnelStage::Purchase);
        assert_eq!(FunnelStage::ALL.len(), 5);
        let mut sorted = FunnelStage::ALL;
        sorted.sort();
        assert_eq!(sorted, FunnelStage::ALL);
    }
}
