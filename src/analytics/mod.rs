//! The analysis contracts: one module per report.
//!
//! Each analysis is a pure function over typed rows; thresholds come from
//! [`crate::config`] and undefined ratios are `None`, never a panic.

pub mod anomaly;
pub mod basket;
pub mod churn;
pub mod cleaning;
pub mod cohort;
pub mod funnel;
pub mod paths;
pub mod rfm;

pub use anomaly::{CustomerTransactionStats, ScoredTransaction, customer_stats, score_transactions};
pub use basket::{ProductPairAffinity, analyze_affinity};
pub use churn::{ChurnAssessment, assess_churn};
pub use cleaning::clean_patient_records;
pub use cohort::{CohortRetention, analyze_cohorts};
pub use funnel::{FunnelReport, FunnelStageMetrics, analyze_funnel};
pub use paths::{PathPattern, analyze_paths};
pub use rfm::{RfmScore, SegmentSummary, score_customers, summarize_segments};
