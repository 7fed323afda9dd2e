//! Cohort retention analysis
//!
//! Groups customers into signup-month cohorts and tracks how many stay
//! active (place at least one order) at month offsets from signup.

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{Customer, Order};
use crate::utils::stats::safe_div;

/// Retention figures for a single signup cohort
#[derive(Debug, Clone)]
pub struct CohortRetention {
    /// Cohort label, `YYYY-MM` of signup
    pub cohort: String,
    /// Customers who signed up in the cohort month
    pub customers: usize,
    /// Active customers at each month offset, starting at offset 0
    pub active: Vec<usize>,
    /// Retention percentage per offset: active(m) / active(0) * 100;
    /// `None` when no one was active in the signup month
    pub retention_pct: Vec<Option<f64>>,
}

/// Month index used for offset arithmetic
fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Analyze cohort retention for month offsets `0..=max_offset_months`
#[must_use]
pub fn analyze_cohorts(
    customers: &[Customer],
    orders: &[Order],
    max_offset_months: u32,
) -> Vec<CohortRetention> {
    // Months in which each customer placed an order
    let mut active_months: FxHashMap<&str, FxHashSet<i32>> = FxHashMap::default();
    for order in orders {
        if let Some(date) = order.order_date {
            active_months
                .entry(order.customer_id.as_str())
                .or_default()
                .insert(month_index(date));
        }
    }

    // Cohort -> member customer ids
    let mut cohorts: FxHashMap<i32, Vec<&str>> = FxHashMap::default();
    for customer in customers {
        if let Some(signup) = customer.signup_date {
            cohorts
                .entry(month_index(signup))
                .or_default()
                .push(customer.customer_id.as_str());
        }
    }

    cohorts
        .into_iter()
        .sorted_by_key(|(month, _)| *month)
        .map(|(cohort_month, members)| {
            let active: Vec<usize> = (0..=max_offset_months as i32)
                .map(|offset| {
                    members
                        .iter()
                        .filter(|id| {
                            active_months
                                .get(*id)
                                .is_some_and(|months| months.contains(&(cohort_month + offset)))
                        })
                        .count()
                })
                .collect();

            let base = active[0];
            let retention_pct = active
                .iter()
                .map(|&count| safe_div(count as f64, base as f64).map(|r| r * 100.0))
                .collect();

            CohortRetention {
                cohort: format!("{:04}-{:02}", cohort_month.div_euclid(12), cohort_month.rem_euclid(12) + 1),
                customers: members.len(),
                active,
                retention_pct,
            }
        })
        .collect()
}
