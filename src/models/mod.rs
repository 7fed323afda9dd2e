//! Typed row models extracted from Arrow record batches.
//!
//! Each model mirrors one source table and knows how to read itself out of
//! a record batch. Derived metrics (RFM scores, churn risk, funnel counts)
//! are not models: they exist only as the output of an analysis.

pub mod customer;
pub mod order;
pub mod page_event;
pub mod patient;
pub mod transaction;
pub mod types;

pub use customer::Customer;
pub use order::{Order, OrderItem};
pub use page_event::PageEvent;
pub use patient::{CleanPatientRecord, PatientRecord};
pub use transaction::FinancialTransaction;
pub use types::{
    AffinityLevel, AnomalyLevel, ChurnRisk, FunnelStage, Gender, PurchaseFrequency, RfmSegment,
};
