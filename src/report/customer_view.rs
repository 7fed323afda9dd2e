//! Customer analytics view
//!
//! Per-customer outer join of the RFM scores and the churn assessment.
//! A customer present in only one input still gets a row, with the other
//! side's columns null.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::analytics::churn::ChurnAssessment;
use crate::analytics::rfm::RfmScore;
use crate::error::Result;

/// Schema of the customer analytics view
#[must_use]
pub fn customer_view_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("recency_days", DataType::Int64, true),
        Field::new("frequency", DataType::Int64, true),
        Field::new("monetary", DataType::Float64, true),
        Field::new("r_score", DataType::Int32, true),
        Field::new("f_score", DataType::Int32, true),
        Field::new("m_score", DataType::Int32, true),
        Field::new("segment", DataType::Utf8, true),
        Field::new("predicted_clv", DataType::Float64, true),
        Field::new("days_since_last_order", DataType::Int64, true),
        Field::new("order_count", DataType::Int64, true),
        Field::new("churn_risk", DataType::Utf8, true),
        Field::new("purchase_frequency", DataType::Utf8, true),
    ]))
}

/// Build the customer analytics view from the two per-customer analyses
pub fn build_customer_view(
    rfm_scores: &[RfmScore],
    churn: &[ChurnAssessment],
) -> Result<RecordBatch> {
    let rfm_by_id: FxHashMap<&str, &RfmScore> = rfm_scores
        .iter()
        .map(|score| (score.customer_id.as_str(), score))
        .collect();
    let churn_by_id: FxHashMap<&str, &ChurnAssessment> = churn
        .iter()
        .map(|assessment| (assessment.customer_id.as_str(), assessment))
        .collect();

    let customer_ids: Vec<&str> = rfm_by_id
        .keys()
        .chain(churn_by_id.keys())
        .copied()
        .unique()
        .sorted()
        .collect();

    let mut recency = Vec::with_capacity(customer_ids.len());
    let mut frequency = Vec::with_capacity(customer_ids.len());
    let mut monetary = Vec::with_capacity(customer_ids.len());
    let mut r_scores = Vec::with_capacity(customer_ids.len());
    let mut f_scores = Vec::with_capacity(customer_ids.len());
    let mut m_scores = Vec::with_capacity(customer_ids.len());
    let mut segments = Vec::with_capacity(customer_ids.len());
    let mut clv = Vec::with_capacity(customer_ids.len());
    let mut last_order_days = Vec::with_capacity(customer_ids.len());
    let mut order_counts = Vec::with_capacity(customer_ids.len());
    let mut risks = Vec::with_capacity(customer_ids.len());
    let mut frequencies = Vec::with_capacity(customer_ids.len());

    for id in &customer_ids {
        let rfm = rfm_by_id.get(id).copied();
        let assessment = churn_by_id.get(id).copied();

        recency.push(rfm.map(|s| s.recency_days));
        frequency.push(rfm.map(|s| s.frequency as i64));
        monetary.push(rfm.map(|s| s.monetary));
        r_scores.push(rfm.map(|s| i32::from(s.r_score)));
        f_scores.push(rfm.map(|s| i32::from(s.f_score)));
        m_scores.push(rfm.map(|s| i32::from(s.m_score)));
        segments.push(rfm.map(|s| s.segment.as_str()));
        clv.push(rfm.map(|s| s.predicted_clv));
        last_order_days.push(assessment.and_then(|a| a.days_since_last_order));
        order_counts.push(assessment.map(|a| a.order_count as i64));
        risks.push(assessment.map(|a| a.risk.as_str()));
        frequencies.push(assessment.map(|a| a.frequency.as_str()));
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(customer_ids)),
        Arc::new(Int64Array::from(recency)),
        Arc::new(Int64Array::from(frequency)),
        Arc::new(Float64Array::from(monetary)),
        Arc::new(Int32Array::from(r_scores)),
        Arc::new(Int32Array::from(f_scores)),
        Arc::new(Int32Array::from(m_scores)),
        Arc::new(StringArray::from(segments)),
        Arc::new(Float64Array::from(clv)),
        Arc::new(Int64Array::from(last_order_days)),
        Arc::new(Int64Array::from(order_counts)),
        Arc::new(StringArray::from(risks)),
        Arc::new(StringArray::from(frequencies)),
    ];

    Ok(RecordBatch::try_new(customer_view_schema(), columns)?)
}
