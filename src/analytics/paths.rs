//! Clickstream path analysis
//!
//! Concatenates each session's ordered distinct page categories into a
//! path string, groups identical paths, and ranks them by frequency and
//! conversion rate.

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::models::PageEvent;
use crate::models::types::FunnelStage;
use crate::utils::stats::safe_div;

/// Separator between page categories in a path string
pub const PATH_SEPARATOR: &str = " > ";

/// An aggregated navigation path
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// Distinct page categories in first-visit order
    pub path: String,
    /// Sessions that followed this path
    pub sessions: usize,
    /// Share of those sessions that purchased
    pub conversion_rate: Option<f64>,
}

/// Build the path string for one session's events
///
/// Events are ordered by timestamp (events without one sort first, in
/// input order); each category appears once, at its first visit.
fn session_path(events: &mut [&PageEvent]) -> Option<String> {
    events.sort_by_key(|e| e.timestamp);

    let mut seen = Vec::new();
    for event in events.iter() {
        if let Some(category) = event.page_category() {
            if !seen.iter().any(|s| s == category) {
                seen.push(category.to_string());
            }
        }
    }
    if seen.is_empty() {
        None
    } else {
        Some(seen.join(PATH_SEPARATOR))
    }
}

/// Analyze navigation paths over a set of page events
///
/// Returns the `top_n` paths ranked by session count descending, then
/// conversion rate descending.
#[must_use]
pub fn analyze_paths(events: &[PageEvent], top_n: usize) -> Vec<PathPattern> {
    let mut sessions: FxHashMap<&str, Vec<&PageEvent>> = FxHashMap::default();
    for event in events {
        sessions
            .entry(event.session_id.as_str())
            .or_default()
            .push(event);
    }

    // path -> (session count, purchasing session count)
    let mut paths: FxHashMap<String, (usize, usize)> = FxHashMap::default();
    for (_, mut session_events) in sessions {
        let purchased = session_events
            .iter()
            .any(|e| e.funnel_stage() == Some(FunnelStage::Purchase));
        if let Some(path) = session_path(&mut session_events) {
            let entry = paths.entry(path).or_insert((0, 0));
            entry.0 += 1;
            if purchased {
                entry.1 += 1;
            }
        }
    }

    paths
        .into_iter()
        .map(|(path, (count, purchases))| PathPattern {
            path,
            sessions: count,
            conversion_rate: safe_div(purchases as f64, count as f64),
        })
        .sorted_by(|a, b| {
            b.sessions
                .cmp(&a.sessions)
                .then_with(|| {
                    b.conversion_rate
                        .partial_cmp(&a.conversion_rate)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.path.cmp(&b.path))
        })
        .take(top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event_at(session: &str, url: &str, event_type: &str, minute: u32) -> PageEvent {
        PageEvent {
            session_id: session.to_string(),
            customer_id: None,
            page_url: Some(url.to_string()),
            event_type: Some(event_type.to_string()),
            timestamp: NaiveDate::from_ymd_opt(2023, 5, 1)
                .unwrap()
                .and_hms_opt(12, minute, 0),
        }
    }

    #[test]
    fn test_path_is_ordered_and_distinct() {
        // Product page visited twice; the path keeps one entry at its
        // first position
        let events = vec![
            event_at("s1", "/", "page_view", 0),
            event_at("s1", "/product/1", "page_view", 1),
            event_at("s1", "/cart", "add_to_cart", 2),
            event_at("s1", "/product/2", "page_view", 3),
        ];
        let patterns = analyze_paths(&events, 10);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].path, "home > product > cart");
    }

    #[test]
    fn test_ordering_follows_timestamps_not_input() {
        let events = vec![
            event_at("s1", "/cart", "add_to_cart", 2),
            event_at("s1", "/", "page_view", 0),
            event_at("s1", "/product/1", "page_view", 1),
        ];
        let patterns = analyze_paths(&events, 10);
        assert_eq!(patterns[0].path, "home > product > cart");
    }

    #[test]
    fn test_ranked_by_frequency_then_conversion() {
        let mut events = Vec::new();
        // Path A: 2 sessions, no purchases
        for session in ["a1", "a2"] {
            events.push(event_at(session, "/", "page_view", 0));
            events.push(event_at(session, "/product/1", "page_view", 1));
        }
        // Path B: 2 sessions, both purchase
        for session in ["b1", "b2"] {
            events.push(event_at(session, "/", "page_view", 0));
            events.push(event_at(session, "/checkout", "checkout", 1));
            events.push(event_at(session, "/confirmation", "purchase", 2));
        }
        // Path C: 1 session
        events.push(event_at("c1", "/", "page_view", 0));

        let patterns = analyze_paths(&events, 10);
        assert_eq!(patterns.len(), 3);
        // B ties A on frequency but wins on conversion
        assert_eq!(patterns[0].path, "home > checkout > confirmation");
        assert_eq!(patterns[0].conversion_rate, Some(1.0));
        assert_eq!(patterns[1].path, "home > product");
        assert_eq!(patterns[2].path, "home");
    }

    #[test]
    fn test_top_n_truncation() {
        let events = vec![
            event_at("s1", "/", "page_view", 0),
            event_at("s2", "/product/1", "page_view", 0),
            event_at("s3", "/cart", "page_view", 0),
        ];
        assert_eq!(analyze_paths(&events, 2).len(), 2);
    }
}
