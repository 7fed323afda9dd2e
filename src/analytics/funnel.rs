//! Purchase funnel analysis
//!
//! Classifies each session by the furthest funnel stage it reached and
//! computes stage-to-stage conversion rates. A stage's session count is
//! the number of sessions whose furthest stage is at or past it, so the
//! counts are monotonically non-increasing down the funnel.

use rustc_hash::FxHashMap;

use crate::models::PageEvent;
use crate::models::types::FunnelStage;
use crate::utils::stats::safe_div;

/// Session counts and conversion for a single funnel stage
#[derive(Debug, Clone)]
pub struct FunnelStageMetrics {
    /// The stage
    pub stage: FunnelStage,
    /// Sessions that reached this stage or further
    pub sessions: usize,
    /// Sessions here / sessions at the previous stage; `None` for the
    /// first stage and whenever the previous stage saw no sessions
    pub conversion_from_previous: Option<f64>,
}

/// Full funnel report
#[derive(Debug, Clone)]
pub struct FunnelReport {
    /// Distinct sessions observed, classified or not
    pub total_sessions: usize,
    /// Per-stage metrics in funnel order
    pub stages: Vec<FunnelStageMetrics>,
    /// Purchasing sessions / total sessions
    pub overall_conversion: Option<f64>,
}

impl FunnelReport {
    /// Sessions that completed a purchase
    #[must_use]
    pub fn purchases(&self) -> usize {
        self.stages.last().map_or(0, |s| s.sessions)
    }
}

/// Analyze the funnel over a set of page events
#[must_use]
pub fn analyze_funnel(events: &[PageEvent]) -> FunnelReport {
    // Furthest stage per session; sessions with no classifiable event
    // still count toward the total
    let mut furthest: FxHashMap<&str, Option<FunnelStage>> = FxHashMap::default();
    for event in events {
        let stage = event.funnel_stage();
        furthest
            .entry(event.session_id.as_str())
            .and_modify(|current| {
                if stage > *current {
                    *current = stage;
                }
            })
            .or_insert(stage);
    }

    let total_sessions = furthest.len();
    let reached = |stage: FunnelStage| {
        furthest
            .values()
            .filter(|s| s.is_some_and(|max| max >= stage))
            .count()
    };

    let mut stages = Vec::with_capacity(FunnelStage::ALL.len());
    let mut previous: Option<usize> = None;
    for stage in FunnelStage::ALL {
        let sessions = reached(stage);
        let conversion_from_previous =
            previous.and_then(|prev| safe_div(sessions as f64, prev as f64));
        stages.push(FunnelStageMetrics {
            stage,
            sessions,
            conversion_from_previous,
        });
        previous = Some(sessions);
    }

    let purchases = stages.last().map_or(0, |s| s.sessions);
    let overall_conversion = safe_div(purchases as f64, total_sessions as f64);

    FunnelReport {
        total_sessions,
        stages,
        overall_conversion,
    }
}
