//! Transaction anomaly detection
//!
//! Scores each transaction against the owning customer's spending
//! profile: z = (amount - mean) / stddev. Customers need a minimum
//! transaction count before a profile is computed, and a zero or missing
//! deviation yields no score rather than an error.

use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::AnomalyConfig;
use crate::models::FinancialTransaction;
use crate::models::types::AnomalyLevel;
use crate::utils::stats::{mean, sample_stddev, z_score};

/// A customer's transaction-amount profile
#[derive(Debug, Clone)]
pub struct CustomerTransactionStats {
    /// Customer identifier
    pub customer_id: String,
    /// Transactions with an amount
    pub count: usize,
    /// Mean transaction amount
    pub mean: f64,
    /// Sample standard deviation; `None` when undefined
    pub stddev: Option<f64>,
}

/// A transaction scored against its customer's profile
#[derive(Debug, Clone)]
pub struct ScoredTransaction {
    /// Transaction identifier
    pub transaction_id: String,
    /// Customer identifier
    pub customer_id: String,
    /// Transaction amount
    pub amount: f64,
    /// Standard deviations from the customer's mean; `None` when the
    /// customer has no profile or a degenerate one
    pub z_score: Option<f64>,
    /// Anomaly classification
    pub level: AnomalyLevel,
    /// Confirmed-fraud flag carried through from the source row
    pub is_fraud: bool,
}

/// Classify an optional z-score against the configured cutoffs
fn level_for(z: Option<f64>, config: &AnomalyConfig) -> AnomalyLevel {
    match z {
        Some(z) if z.abs() > config.high_z => AnomalyLevel::High,
        Some(z) if z.abs() > config.medium_z => AnomalyLevel::Medium,
        _ => AnomalyLevel::Normal,
    }
}

/// Score every transaction against its customer's spending profile
///
/// Customers with fewer than `min_transactions` amounts get no profile;
/// their transactions come back unscored at `Normal` level. Output is
/// ordered by customer id, then input order.
#[must_use]
pub fn score_transactions(
    transactions: &[FinancialTransaction],
    config: &AnomalyConfig,
) -> Vec<ScoredTransaction> {
    let mut by_customer: FxHashMap<&str, Vec<&FinancialTransaction>> = FxHashMap::default();
    for txn in transactions {
        by_customer
            .entry(txn.customer_id.as_str())
            .or_default()
            .push(txn);
    }

    let groups: Vec<(&str, Vec<&FinancialTransaction>)> = by_customer
        .into_iter()
        .sorted_by_key(|(id, _)| *id)
        .collect();

    groups
        .into_par_iter()
        .flat_map(|(customer_id, group)| {
            let amounts: Vec<f64> = group.iter().filter_map(|t| t.amount).collect();
            let profile = if amounts.len() >= config.min_transactions {
                mean(&amounts).map(|m| (m, sample_stddev(&amounts)))
            } else {
                None
            };

            group
                .into_iter()
                .filter_map(|txn| {
                    let amount = txn.amount?;
                    let z = profile.and_then(|(m, sd)| z_score(amount, m, sd));
                    Some(ScoredTransaction {
                        transaction_id: txn.transaction_id.clone(),
                        customer_id: customer_id.to_string(),
                        amount,
                        z_score: z,
                        level: level_for(z, config),
                        is_fraud: txn.is_fraud,
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Compute the per-customer profiles on their own
///
/// Used by the fraud monitoring view, which reports the profile next to
/// each flagged transaction.
#[must_use]
pub fn customer_stats(
    transactions: &[FinancialTransaction],
    config: &AnomalyConfig,
) -> Vec<CustomerTransactionStats> {
    let mut by_customer: FxHashMap<&str, Vec<f64>> = FxHashMap::default();
    for txn in transactions {
        if let Some(amount) = txn.amount {
            by_customer
                .entry(txn.customer_id.as_str())
                .or_default()
                .push(amount);
        }
    }

    by_customer
        .into_iter()
        .filter(|(_, amounts)| amounts.len() >= config.min_transactions)
        .sorted_by_key(|(id, _)| *id)
        .filter_map(|(customer_id, amounts)| {
            mean(&amounts).map(|m| CustomerTransactionStats {
                customer_id: customer_id.to_string(),
                count: amounts.len(),
                mean: m,
                stddev: sample_stddev(&amounts),
            })
        })
        .collect()
}
