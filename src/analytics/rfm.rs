//! RFM segmentation and customer lifetime value
//!
//! Scores each customer on recency, frequency and monetary value over
//! completed purchase transactions, buckets each metric into quintiles,
//! maps the scores to a segment through a fixed decision table, and
//! projects lifetime value from the customer's observed spend rate.

use chrono::NaiveDate;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::config::RfmConfig;
use crate::models::FinancialTransaction;
use crate::models::types::RfmSegment;
use crate::utils::stats::ntile;

/// Quintile scores range over 1..=5
const QUINTILES: usize = 5;

// Segment decision table bounds, checked in precedence order: the
// highest-combined-score conditions come first.
const CHAMPION_MIN: u8 = 4;
const LOYAL_FREQUENCY_MIN: u8 = 4;
const LOYAL_ALL_MIN: u8 = 3;
const DORMANT_RECENCY_MAX: u8 = 2;
const AT_RISK_FREQUENCY_MIN: u8 = 3;
const LOST_FREQUENCY_MAX: u8 = 2;

/// Per-customer RFM result
#[derive(Debug, Clone)]
pub struct RfmScore {
    /// Customer identifier
    pub customer_id: String,
    /// Days from the last transaction to the reference date
    pub recency_days: i64,
    /// Number of qualifying transactions
    pub frequency: usize,
    /// Total qualifying spend
    pub monetary: f64,
    /// Recency quintile, 5 = most recent
    pub r_score: u8,
    /// Frequency quintile, 5 = most frequent
    pub f_score: u8,
    /// Monetary quintile, 5 = highest spend
    pub m_score: u8,
    /// Segment from the decision table
    pub segment: RfmSegment,
    /// Projected spend over the assumed lifespan
    pub predicted_clv: f64,
}

/// Aggregate view of one segment
#[derive(Debug, Clone)]
pub struct SegmentSummary {
    /// The segment
    pub segment: RfmSegment,
    /// Customers in the segment
    pub customers: usize,
    /// Average total spend
    pub avg_monetary: f64,
    /// Average transaction count
    pub avg_frequency: f64,
    /// avg monetary x avg frequency over the assumed one-year lifespan
    pub projected_clv: f64,
}

/// Map quintile scores to a segment
///
/// Conditions are checked highest-value first, so a customer matching
/// several rows lands in the best one.
#[must_use]
pub fn segment_for(r: u8, f: u8, m: u8) -> RfmSegment {
    if r >= CHAMPION_MIN && f >= CHAMPION_MIN && m >= CHAMPION_MIN {
        RfmSegment::Champions
    } else if f >= LOYAL_FREQUENCY_MIN
        || (r >= LOYAL_ALL_MIN && f >= LOYAL_ALL_MIN && m >= LOYAL_ALL_MIN)
    {
        RfmSegment::Loyal
    } else if r <= DORMANT_RECENCY_MAX && f >= AT_RISK_FREQUENCY_MIN {
        RfmSegment::AtRisk
    } else if r <= DORMANT_RECENCY_MAX && f <= LOST_FREQUENCY_MAX {
        RfmSegment::Lost
    } else {
        RfmSegment::NeedAttention
    }
}

struct CustomerAggregate {
    customer_id: String,
    first: NaiveDate,
    last: NaiveDate,
    frequency: usize,
    monetary: f64,
}

/// Compute RFM scores and predicted CLV for every qualifying customer
///
/// Only completed, non-refund transactions with a timestamp count.
/// Customers with no qualifying transactions are absent from the result.
#[must_use]
pub fn score_customers(
    transactions: &[FinancialTransaction],
    config: &RfmConfig,
    reference_date: NaiveDate,
) -> Vec<RfmScore> {
    let mut aggregates: FxHashMap<&str, CustomerAggregate> = FxHashMap::default();
    for txn in transactions {
        if txn.is_refund() || !txn.is_completed() {
            continue;
        }
        let (Some(timestamp), Some(amount)) = (txn.timestamp, txn.amount) else {
            continue;
        };
        let date = timestamp.date();
        aggregates
            .entry(txn.customer_id.as_str())
            .and_modify(|agg| {
                agg.first = agg.first.min(date);
                agg.last = agg.last.max(date);
                agg.frequency += 1;
                agg.monetary += amount;
            })
            .or_insert_with(|| CustomerAggregate {
                customer_id: txn.customer_id.clone(),
                first: date,
                last: date,
                frequency: 1,
                monetary: amount,
            });
    }

    // Stable customer order so quintile tie-breaking is deterministic
    let aggregates: Vec<CustomerAggregate> = aggregates
        .into_values()
        .sorted_by(|a, b| a.customer_id.cmp(&b.customer_id))
        .collect();

    // Recency is inverted: fewer days since the last transaction should
    // score higher, so rank on the negated day count
    let recency_metric: Vec<f64> = aggregates
        .iter()
        .map(|agg| -((reference_date - agg.last).num_days() as f64))
        .collect();
    let frequency_metric: Vec<f64> = aggregates.iter().map(|agg| agg.frequency as f64).collect();
    let monetary_metric: Vec<f64> = aggregates.iter().map(|agg| agg.monetary).collect();

    let r_scores = ntile(&recency_metric, QUINTILES);
    let f_scores = ntile(&frequency_metric, QUINTILES);
    let m_scores = ntile(&monetary_metric, QUINTILES);

    aggregates
        .into_iter()
        .enumerate()
        .map(|(i, agg)| {
            let (r, f, m) = (r_scores[i], f_scores[i], m_scores[i]);
            RfmScore {
                recency_days: (reference_date - agg.last).num_days(),
                predicted_clv: predicted_clv(
                    agg.monetary,
                    agg.first,
                    agg.last,
                    config.lifespan_days,
                ),
                customer_id: agg.customer_id,
                frequency: agg.frequency,
                monetary: agg.monetary,
                r_score: r,
                f_score: f,
                m_score: m,
                segment: segment_for(r, f, m),
            }
        })
        .collect()
}

/// Project lifetime value from the observed spend rate
///
/// Spend per lifetime day, extrapolated over the assumed lifespan. A
/// single-day history counts as one day so the rate is always defined.
#[must_use]
pub fn predicted_clv(monetary: f64, first: NaiveDate, last: NaiveDate, lifespan_days: u32) -> f64 {
    let lifetime_days = (last - first).num_days().max(1);
    monetary / lifetime_days as f64 * f64::from(lifespan_days)
}

/// Summarize scores per segment
#[must_use]
pub fn summarize_segments(scores: &[RfmScore], config: &RfmConfig) -> Vec<SegmentSummary> {
    let mut grouped: FxHashMap<RfmSegment, Vec<&RfmScore>> = FxHashMap::default();
    for score in scores {
        grouped.entry(score.segment).or_default().push(score);
    }

    grouped
        .into_iter()
        .map(|(segment, members)| {
            let count = members.len();
            let avg_monetary = members.iter().map(|s| s.monetary).sum::<f64>() / count as f64;
            let avg_frequency =
                members.iter().map(|s| s.frequency as f64).sum::<f64>() / count as f64;
            SegmentSummary {
                segment,
                customers: count,
                avg_monetary,
                avg_frequency,
                projected_clv: avg_monetary * avg_frequency * f64::from(config.lifespan_days)
                    / 365.0,
            }
        })
        .sorted_by(|a, b| b.customers.cmp(&a.customers))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn txn(customer: &str, amount: f64, date: NaiveDate) -> FinancialTransaction {
        FinancialTransaction {
            transaction_id: format!("t-{customer}-{date}"),
            customer_id: customer.to_string(),
            amount: Some(amount),
            timestamp: date.and_hms_opt(10, 0, 0),
            txn_type: Some("purchase".to_string()),
            status: Some("completed".to_string()),
            merchant_category: None,
            device_type: None,
            location: None,
            is_fraud: false,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_segment_decision_table() {
        assert_eq!(segment_for(5, 5, 5), RfmSegment::Champions);
        assert_eq!(segment_for(4, 4, 4), RfmSegment::Champions);
        assert_eq!(segment_for(3, 5, 2), RfmSegment::Loyal);
        assert_eq!(segment_for(3, 3, 3), RfmSegment::Loyal);
        assert_eq!(segment_for(1, 3, 3), RfmSegment::AtRisk);
        assert_eq!(segment_for(2, 2, 5), RfmSegment::Lost);
        assert_eq!(segment_for(3, 1, 5), RfmSegment::NeedAttention);
    }

    #[test]
    fn test_clv_spend_rate_example() {
        // $500 over a 100-day lifetime projects to 1825 over a year
        let clv = predicted_clv(500.0, day(2023, 1, 1), day(2023, 4, 11), 365);
        assert!((clv - 1825.0).abs() < 1e-9);
    }

    #[test]
    fn test_clv_single_day_lifetime() {
        let clv = predicted_clv(100.0, day(2023, 1, 1), day(2023, 1, 1), 365);
        assert!((clv - 36500.0).abs() < 1e-9);
    }

    #[test]
    fn test_quintiles_partition_evenly() {
        let reference = day(2024, 1, 1);
        let transactions: Vec<FinancialTransaction> = (0..25)
            .map(|i| {
                txn(
                    &format!("c{i:02}"),
                    10.0 + f64::from(i),
                    day(2023, 1, 1) + chrono::TimeDelta::days(i64::from(i) * 10),
                )
            })
            .collect();
        let scores = score_customers(&transactions, &RfmConfig::default(), reference);
        assert_eq!(scores.len(), 25);
        for quintile in 1..=5u8 {
            assert_eq!(
                scores.iter().filter(|s| s.m_score == quintile).count(),
                5,
                "monetary quintile {quintile} should hold 5 customers"
            );
            assert_eq!(scores.iter().filter(|s| s.r_score == quintile).count(), 5);
        }
    }

    #[test]
    fn test_recency_inversion() {
        let reference = day(2024, 1, 1);
        let transactions = vec![
            txn("old", 50.0, day(2023, 1, 1)),
            txn("recent", 50.0, day(2023, 12, 20)),
        ];
        let scores = score_customers(&transactions, &RfmConfig::default(), reference);
        let old = scores.iter().find(|s| s.customer_id == "old").unwrap();
        let recent = scores.iter().find(|s| s.customer_id == "recent").unwrap();
        assert!(recent.r_score > old.r_score);
        assert!(recent.recency_days < old.recency_days);
    }

    #[test]
    fn test_refunds_and_incomplete_excluded() {
        let reference = day(2024, 1, 1);
        let mut refund = txn("c1", 40.0, day(2023, 6, 1));
        refund.txn_type = Some("refund".to_string());
        let mut pending = txn("c1", 60.0, day(2023, 6, 2));
        pending.status = Some("pending".to_string());
        let transactions = vec![txn("c1", 25.0, day(2023, 6, 3)), refund, pending];

        let scores = score_customers(&transactions, &RfmConfig::default(), reference);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].frequency, 1);
        assert!((scores[0].monetary - 25.0).abs() < 1e-9);
    }
}
