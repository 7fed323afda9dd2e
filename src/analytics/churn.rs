//! Churn risk classification
//!
//! Tiers every customer by how long ago they last ordered and by how
//! many orders they have placed. Customers with no orders at all fall
//! into the highest risk tier with an undefined recency.

use chrono::NaiveDate;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::config::ChurnConfig;
use crate::models::types::{ChurnRisk, PurchaseFrequency};
use crate::models::{Customer, Order};

/// Churn assessment for one customer
#[derive(Debug, Clone)]
pub struct ChurnAssessment {
    /// Customer identifier
    pub customer_id: String,
    /// Days from the last order to the reference date; `None` when the
    /// customer never ordered
    pub days_since_last_order: Option<i64>,
    /// Lifetime order count
    pub order_count: usize,
    /// Recency-based risk tier
    pub risk: ChurnRisk,
    /// Count-based frequency tier
    pub frequency: PurchaseFrequency,
}

/// Classify recency into a risk tier
#[must_use]
pub fn risk_for(days_since_last_order: Option<i64>, config: &ChurnConfig) -> ChurnRisk {
    match days_since_last_order {
        Some(days) if days <= config.active_within_days => ChurnRisk::Active,
        Some(days) if days <= config.low_risk_within_days => ChurnRisk::LowRisk,
        Some(days) if days <= config.medium_risk_within_days => ChurnRisk::MediumRisk,
        // Stale or never ordered
        _ => ChurnRisk::HighRisk,
    }
}

/// Classify an order count into a frequency tier
#[must_use]
pub fn frequency_for(order_count: usize, config: &ChurnConfig) -> PurchaseFrequency {
    if order_count == 0 {
        PurchaseFrequency::Never
    } else if order_count == 1 {
        PurchaseFrequency::OneTime
    } else if order_count < config.vip_min_orders {
        PurchaseFrequency::Repeat
    } else {
        PurchaseFrequency::Vip
    }
}

/// Assess churn risk for every customer
///
/// Output order follows the customer list; every customer gets a row,
/// ordered or not.
#[must_use]
pub fn assess_churn(
    customers: &[Customer],
    orders: &[Order],
    config: &ChurnConfig,
    reference_date: NaiveDate,
) -> Vec<ChurnAssessment> {
    let mut last_order: FxHashMap<&str, NaiveDate> = FxHashMap::default();
    let mut order_counts: FxHashMap<&str, usize> = FxHashMap::default();
    for order in orders {
        let id = order.customer_id.as_str();
        *order_counts.entry(id).or_default() += 1;
        if let Some(date) = order.order_date {
            last_order
                .entry(id)
                .and_modify(|latest| *latest = (*latest).max(date))
                .or_insert(date);
        }
    }

    customers
        .iter()
        .map(|customer| {
            let id = customer.customer_id.as_str();
            let days_since_last_order = last_order
                .get(id)
                .map(|&last| (reference_date - last).num_days());
            let order_count = order_counts.get(id).copied().unwrap_or(0);
            ChurnAssessment {
                customer_id: customer.customer_id.clone(),
                days_since_last_order,
                order_count,
                risk: risk_for(days_since_last_order, config),
                frequency: frequency_for(order_count, config),
            }
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_boundaries() {
        let config = ChurnConfig::default();
        assert_eq!(risk_for(Some(0), &config), ChurnRisk::Active);
        assert_eq!(risk_for(Some(30), &config), ChurnRisk::Active);
        assert_eq!(risk_for(Some(31), &config), ChurnRisk::LowRisk);
        assert_eq!(risk_for(Some(60), &config), ChurnRisk::LowRisk);
        assert_eq!(risk_for(Some(61), &config), ChurnRisk::MediumRisk);
        assert_eq!(risk_for(Some(90), &config), ChurnRisk::MediumRisk);
        assert_eq!(risk_for(Some(91), &config), ChurnRisk::HighRisk);
        assert_eq!(risk_for(None, &config), ChurnRisk::HighRisk);
    }

    #[test]
    fn test_frequency_tiers() {
        let config = ChurnConfig::default();
        assert_eq!(frequency_for(0, &config), PurchaseFrequency::Never);
        assert_eq!(frequency_for(1, &config), PurchaseFrequency::OneTime);
        assert_eq!(frequency_for(2, &config), PurchaseFrequency::Repeat);
        assert_eq!(frequency_for(9, &config), PurchaseFrequency::Repeat);
        assert_eq!(frequency_for(10, &config), PurchaseFrequency::Vip);
    }

    #[test]
    fn test_customer_without_orders() {
        let customers = vec![Customer {
            customer_id: "c1".to_string(),
            name: None,
            signup_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            acquisition_channel: None,
            income_bracket: None,
            credit_score: None,
            country: None,
        }];
        let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let assessments = assess_churn(&customers, &[], &ChurnConfig::default(), reference);
        assert_eq!(assessments.len(), 1);
        assert_eq!(assessments[0].days_since_last_order, None);
        assert_eq!(assessments[0].risk, ChurnRisk::HighRisk);
        assert_eq!(assessments[0].frequency, PurchaseFrequency::Never);
    }

    #[test]
    fn test_latest_order_wins() {
        let customers = vec![Customer {
            customer_id: "c1".to_string(),
            name: None,
            signup_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            acquisition_channel: None,
            income_bracket: None,
            credit_score: None,
            country: None,
        }];
        let orders = vec![
            Order {
                order_id: "o1".to_string(),
                customer_id: "c1".to_string(),
                order_date: NaiveDate::from_ymd_opt(2023, 2, 1),
                status: None,
                total_amount: Some(10.0),
            },
            Order {
                order_id: "o2".to_string(),
                customer_id: "c1".to_string(),
                order_date: NaiveDate::from_ymd_opt(2023, 12, 20),
                status: None,
                total_amount: Some(20.0),
            },
        ];
        let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let assessments = assess_churn(&customers, &orders, &ChurnConfig::default(), reference);
        assert_eq!(assessments[0].days_since_last_order, Some(12));
        assert_eq!(assessments[0].risk, ChurnRisk::Active);
        assert_eq!(assessments[0].order_count, 2);
        assert_eq!(assessments[0].frequency, PurchaseFrequency::Repeat);
    }
}
