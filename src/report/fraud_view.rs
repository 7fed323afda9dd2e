//! Fraud monitoring view
//!
//! Scored transactions alongside the owning customer's spending profile,
//! filtered by default to rows worth a second look: anomalous levels or
//! transactions already flagged as fraud.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::analytics::anomaly::{CustomerTransactionStats, ScoredTransaction};
use crate::error::Result;
use crate::models::types::AnomalyLevel;

/// Schema of the fraud monitoring view
#[must_use]
pub fn fraud_view_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("transaction_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("amount", DataType::Float64, false),
        Field::new("z_score", DataType::Float64, true),
        Field::new("anomaly_level", DataType::Utf8, false),
        Field::new("customer_mean", DataType::Float64, true),
        Field::new("customer_stddev", DataType::Float64, true),
        Field::new("customer_txn_count", DataType::Int64, true),
        Field::new("is_fraud", DataType::Boolean, false),
    ]))
}

/// Build the fraud monitoring view
///
/// With `include_normal` false (the default posture), only transactions
/// at `Medium` or `High` anomaly level or carrying the fraud flag appear.
pub fn build_fraud_view(
    scored: &[ScoredTransaction],
    stats: &[CustomerTransactionStats],
    include_normal: bool,
) -> Result<RecordBatch> {
    let stats_by_id: FxHashMap<&str, &CustomerTransactionStats> = stats
        .iter()
        .map(|s| (s.customer_id.as_str(), s))
        .collect();

    let rows: Vec<&ScoredTransaction> = scored
        .iter()
        .filter(|txn| include_normal || txn.level != AnomalyLevel::Normal || txn.is_fraud)
        .collect();

    let mut txn_ids = Vec::with_capacity(rows.len());
    let mut customer_ids = Vec::with_capacity(rows.len());
    let mut amounts = Vec::with_capacity(rows.len());
    let mut z_scores = Vec::with_capacity(rows.len());
    let mut levels = Vec::with_capacity(rows.len());
    let mut means = Vec::with_capacity(rows.len());
    let mut stddevs = Vec::with_capacity(rows.len());
    let mut counts = Vec::with_capacity(rows.len());
    let mut fraud_flags = Vec::with_capacity(rows.len());

    for txn in rows {
        let profile = stats_by_id.get(txn.customer_id.as_str()).copied();
        txn_ids.push(txn.transaction_id.as_str());
        customer_ids.push(txn.customer_id.as_str());
        amounts.push(txn.amount);
        z_scores.push(txn.z_score);
        levels.push(txn.level.as_str());
        means.push(profile.map(|p| p.mean));
        stddevs.push(profile.and_then(|p| p.stddev));
        counts.push(profile.map(|p| p.count as i64));
        fraud_flags.push(txn.is_fraud);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(txn_ids)),
        Arc::new(StringArray::from(customer_ids)),
        Arc::new(Float64Array::from(amounts)),
        Arc::new(Float64Array::from(z_scores)),
        Arc::new(StringArray::from(levels)),
        Arc::new(Float64Array::from(means)),
        Arc::new(Float64Array::from(stddevs)),
        Arc::new(Int64Array::from(counts)),
        Arc::new(BooleanArray::from(fraud_flags)),
    ];

    Ok(RecordBatch::try_new(fraud_view_schema(), columns)?)
}
