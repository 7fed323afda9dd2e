//! A Rust library for batch customer analytics over Arrow record batches:
//! patient-record cleaning, funnel and path analysis, cohort retention,
//! RFM/CLV segmentation, churn risk, transaction anomaly detection and
//! market-basket affinity.

pub mod analytics;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::AnalyticsConfig;
pub use error::{Error, Result};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Analyses
pub use analytics::{
    analyze_affinity, analyze_cohorts, analyze_funnel, analyze_paths, assess_churn,
    clean_patient_records, score_customers, score_transactions, summarize_segments,
};

// Report views
pub use report::{build_customer_view, build_fraud_view};

// IO
pub use io::{find_parquet_files, load_parquet_files_parallel, read_parquet, write_parquet};
