//! Market-basket affinity analysis
//!
//! Counts how often every unordered pair of products lands in the same
//! order and relates the count to each product's own order volume.

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::AffinityConfig;
use crate::models::OrderItem;
use crate::models::types::AffinityLevel;
use crate::utils::stats::safe_div;

/// Affinity between one unordered product pair
#[derive(Debug, Clone)]
pub struct ProductPairAffinity {
    /// Lexicographically smaller product of the pair
    pub product_a: String,
    /// Lexicographically larger product of the pair
    pub product_b: String,
    /// Orders containing both products
    pub co_occurrences: usize,
    /// Co-occurrences relative to product A's order count
    pub affinity_a: Option<f64>,
    /// Co-occurrences relative to product B's order count
    pub affinity_b: Option<f64>,
    /// Classification on the stronger of the two ratios
    pub level: AffinityLevel,
}

/// Classify the stronger ratio against the configured cutoffs
fn level_for(affinity_a: Option<f64>, affinity_b: Option<f64>, config: &AffinityConfig) -> AffinityLevel {
    let strongest = match (affinity_a, affinity_b) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return AffinityLevel::Low,
    };
    if strongest > config.high_ratio {
        AffinityLevel::High
    } else if strongest > config.medium_ratio {
        AffinityLevel::Medium
    } else {
        AffinityLevel::Low
    }
}

/// Compute product-pair affinity over order lines
///
/// Returns the top pairs by co-occurrence count (ties broken by product
/// ids), truncated to `config.top_n`.
#[must_use]
pub fn analyze_affinity(items: &[OrderItem], config: &AffinityConfig) -> Vec<ProductPairAffinity> {
    // Distinct products per order; a product repeated on several lines
    // of one order counts once
    let mut baskets: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
    for item in items {
        baskets
            .entry(item.order_id.as_str())
            .or_default()
            .insert(item.product_id.as_str());
    }

    let mut product_orders: FxHashMap<&str, usize> = FxHashMap::default();
    let mut pair_counts: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    for basket in baskets.values() {
        for product in basket {
            *product_orders.entry(*product).or_default() += 1;
        }
        for pair in basket.iter().copied().sorted().combinations(2) {
            *pair_counts.entry((pair[0], pair[1])).or_default() += 1;
        }
    }

    pair_counts
        .into_iter()
        .map(|((a, b), co_occurrences)| {
            let affinity_a = safe_div(
                co_occurrences as f64,
                product_orders.get(a).copied().unwrap_or(0) as f64,
            );
            let affinity_b = safe_div(
                co_occurrences as f64,
                product_orders.get(b).copied().unwrap_or(0) as f64,
            );
            ProductPairAffinity {
                product_a: a.to_string(),
                product_b: b.to_string(),
                co_occurrences,
                affinity_a,
                affinity_b,
                level: level_for(affinity_a, affinity_b, config),
            }
        })
        .sorted_by(|x, y| {
            y.co_occurrences
                .cmp(&x.co_occurrences)
                .then_with(|| x.product_a.cmp(&y.product_a))
                .then_with(|| x.product_b.cmp(&y.product_b))
        })
        .take(config.top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(order: &str, product: &str) -> OrderItem {
        OrderItem {
            order_id: order.to_string(),
            product_id: product.to_string(),
            quantity: Some(1),
            unit_price: Some(9.99),
        }
    }

    #[test]
    fn test_pair_counting() {
        let items = vec![
            item("o1", "bread"),
            item("o1", "butter"),
            item("o2", "bread"),
            item("o2", "butter"),
            item("o3", "bread"),
        ];
        let pairs = analyze_affinity(&items, &AffinityConfig::default());
        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert_eq!(pair.product_a, "bread");
        assert_eq!(pair.product_b, "butter");
        assert_eq!(pair.co_occurrences, 2);
        // bread appears in 3 orders, butter in 2
        assert!((pair.affinity_a.unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert!((pair.affinity_b.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(pair.level, AffinityLevel::High);
    }

    #[test]
    fn test_repeated_lines_count_once() {
        let items = vec![
            item("o1", "bread"),
            item("o1", "bread"),
            item("o1", "butter"),
        ];
        let pairs = analyze_affinity(&items, &AffinityConfig::default());
        assert_eq!(pairs[0].co_occurrences, 1);
    }

    #[test]
    fn test_level_thresholds() {
        let config = AffinityConfig::default();
        // 1 co-occurrence over 20 orders of each product: ratio 0.05
        let mut items = vec![item("shared", "a"), item("shared", "b")];
        for i in 0..19 {
            items.push(item(&format!("solo-a-{i}"), "a"));
            items.push(item(&format!("solo-b-{i}"), "b"));
        }
        let pairs = analyze_affinity(&items, &config);
        assert_eq!(pairs[0].level, AffinityLevel::Low);

        // 1 co-occurrence over 8 orders: ratio 0.125 -> medium
        let mut items = vec![item("shared", "a"), item("shared", "b")];
        for i in 0..7 {
            items.push(item(&format!("solo-a-{i}"), "a"));
            items.push(item(&format!("solo-b-{i}"), "b"));
        }
        let pairs = analyze_affinity(&items, &config);
        assert_eq!(pairs[0].level, AffinityLevel::Medium);
    }

    #[test]
    fn test_top_n_by_co_occurrence() {
        let mut items = Vec::new();
        // (x, y) together in 3 orders; (x, z) in 1
        for i in 0..3 {
            items.push(item(&format!("o{i}"), "x"));
            items.push(item(&format!("o{i}"), "y"));
        }
        items.push(item("o9", "x"));
        items.push(item("o9", "z"));

        let config = AffinityConfig {
            top_n: 1,
            ..AffinityConfig::default()
        };
        let pairs = analyze_affinity(&items, &config);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].product_a, "x");
        assert_eq!(pairs[0].product_b, "y");
        assert_eq!(pairs[0].co_occurrences, 3);
    }

    #[test]
    fn test_three_product_basket_yields_all_pairs() {
        let items = vec![item("o1", "a"), item("o1", "b"), item("o1", "c")];
        let pairs = analyze_affinity(&items, &AffinityConfig::default());
        assert_eq!(pairs.len(), 3);
    }
}
