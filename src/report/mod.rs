//! Persisted report views
//!
//! The two tabular views downstream reporting tools query: a per-customer
//! analytics view and a fraud monitoring view. Each is assembled as a
//! `RecordBatch` and written out as parquet.

pub mod customer_view;
pub mod fraud_view;

pub use customer_view::{build_customer_view, customer_view_schema};
pub use fraud_view::{build_fraud_view, fraud_view_schema};
