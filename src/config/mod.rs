//! Configuration for the analytics suite.
//!
//! Every business threshold (churn windows, z-score cutoffs, affinity
//! ratios, RFM reference date) lives here as a named, serializable value
//! rather than as an inline literal in the analysis code.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration shared by all analyses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Fixed reference date for recency calculations (RFM and churn)
    pub reference_date: NaiveDate,
    /// Patient-record cleaning settings
    pub cleaning: CleaningConfig,
    /// RFM / CLV settings
    pub rfm: RfmConfig,
    /// Anomaly detection settings
    pub anomaly: AnomalyConfig,
    /// Churn risk settings
    pub churn: ChurnConfig,
    /// Market-basket affinity settings
    pub affinity: AffinityConfig,
    /// Cohort retention settings
    pub cohort: CohortConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            cleaning: CleaningConfig::default(),
            rfm: RfmConfig::default(),
            anomaly: AnomalyConfig::default(),
            churn: ChurnConfig::default(),
            affinity: AffinityConfig::default(),
            cohort: CohortConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: format!("failed to read file: {e}"),
        })?;
        let config = serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: format!("failed to parse JSON: {e}"),
        })?;
        Ok(config)
    }
}

fn default_reference_date() -> NaiveDate {
    // Analyses are batch reports over a static dataset, so recency is
    // measured against a fixed date rather than the wall clock.
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Settings for patient-record cleaning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Date formats tried in order when parsing free-text admission dates
    pub date_formats: Vec<String>,
    /// Value substituted for a null or empty phone number
    pub missing_phone_sentinel: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%d-%m-%Y".to_string(),
                "%B %d, %Y".to_string(),
            ],
            missing_phone_sentinel: "000-000-0000".to_string(),
        }
    }
}

/// Settings for RFM segmentation and CLV prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RfmConfig {
    /// Assumed customer lifespan for CLV projection, in days
    pub lifespan_days: u32,
}

impl Default for RfmConfig {
    fn default() -> Self {
        Self { lifespan_days: 365 }
    }
}

/// Settings for transaction anomaly detection
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Minimum transactions a customer needs before z-scores are computed
    pub min_transactions: usize,
    /// Absolute z-score above which a transaction is a high anomaly
    pub high_z: f64,
    /// Absolute z-score above which a transaction is a medium anomaly
    pub medium_z: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_transactions: 3,
            high_z: 3.0,
            medium_z: 2.0,
        }
    }
}

/// Settings for churn risk classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurnConfig {
    /// A customer ordering within this many days is active
    pub active_within_days: i64,
    /// Upper bound of the low-risk window, in days
    pub low_risk_within_days: i64,
    /// Upper bound of the medium-risk window, in days
    pub medium_risk_within_days: i64,
    /// Order count at which a customer becomes a VIP
    pub vip_min_orders: usize,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            active_within_days: 30,
            low_risk_within_days: 60,
            medium_risk_within_days: 90,
            vip_min_orders: 10,
        }
    }
}

/// Settings for market-basket affinity classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Ratio above which a product pair has high affinity
    pub high_ratio: f64,
    /// Ratio above which a product pair has medium affinity
    pub medium_ratio: f64,
    /// Number of top pairs to report
    pub top_n: usize,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            high_ratio: 0.20,
            medium_ratio: 0.10,
            top_n: 20,
        }
    }
}

/// Settings for cohort retention analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortConfig {
    /// Largest month offset from signup to track (inclusive)
    pub max_offset_months: u32,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            max_offset_months: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.churn.active_within_days, 30);
        assert_eq!(config.churn.low_risk_within_days, 60);
        assert_eq!(config.churn.medium_risk_within_days, 90);
        assert_eq!(config.anomaly.min_transactions, 3);
        assert!((config.affinity.high_ratio - 0.20).abs() < f64::EPSILON);
        assert_eq!(config.rfm.lifespan_days, 365);
        assert_eq!(config.cohort.max_offset_months, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalyticsConfig =
            serde_json::from_str(r#"{"churn": {"vip_min_orders": 5}}"#).unwrap();
        assert_eq!(config.churn.vip_min_orders, 5);
        // Untouched fields keep their defaults
        assert_eq!(config.churn.active_within_days, 30);
        assert_eq!(config.anomaly.min_transactions, 3);
    }

    #[test]
    fn test_round_trip() {
        let config = AnalyticsConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalyticsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reference_date, config.reference_date);
        assert_eq!(back.cleaning.date_formats, config.cleaning.date_formats);
    }
}
