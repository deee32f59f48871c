//! Coach module - progress analysis and rule-based advice
//!
//! Features:
//! - Progress percentage and weekly pacing
//! - Ordered coaching cards with diet/workout adaptations
//! - Weight trend prediction using linear regression (linfa)

pub mod advisor;
pub mod analyzer;
pub mod predictor;

pub use advisor::{Adaptation, AdviceCategory, AdviceItem, PlanTarget, Priority, select_advice};
pub use analyzer::{Goal, Pacing, ProgressSnapshot, analyze, validate_weight};
pub use predictor::{PaceSummary, WeightTrendPredictor};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{Database, WeightEntry};

/// Everything the coach knows at one point in time
#[derive(Debug, Clone)]
pub struct CoachReport {
    pub current_weight: f64,
    pub snapshot: ProgressSnapshot,
    pub advice: Vec<AdviceItem>,
    /// Present once the first weight has been logged
    pub pace: Option<PaceSummary>,
}

impl CoachReport {
    /// Build a report from history. Without history the current weight
    /// is the goal's start weight.
    pub fn build(goal: &Goal, history: &[WeightEntry], today: NaiveDate) -> Self {
        let current_weight = history.last().map(|e| e.weight).unwrap_or(goal.start_weight);
        let snapshot = analyze(goal, current_weight, history);
        let advice = select_advice(&snapshot, today);
        let pace = history
            .first()
            .map(|first| PaceSummary::compute(goal, current_weight, first.date, today));

        Self {
            current_weight,
            snapshot,
            advice,
            pace,
        }
    }

    /// Cards that carry an adaptation, with their position in `advice`
    pub fn adaptations(&self) -> Vec<(usize, &Adaptation)> {
        self.advice
            .iter()
            .enumerate()
            .filter_map(|(i, item)| item.adaptation.as_ref().map(|a| (i, a)))
            .collect()
    }
}

/// Adaptation the user accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAdaptation {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub target: PlanTarget,
    pub changes: Vec<String>,
    pub applied: bool,
}

/// Persist the adaptation as the last applied one and return a summary line
pub fn apply_adaptation(db: &Database, adaptation: &Adaptation, now: DateTime<Utc>) -> Result<String> {
    let applied = AppliedAdaptation {
        date: now,
        target: adaptation.target,
        changes: adaptation.changes.clone(),
        applied: true,
    };
    db.save_adaptation(&applied)?;

    info!(
        target_plan = adaptation.target.name(),
        changes = adaptation.changes.len(),
        "adaptation applied"
    );

    Ok(format!(
        "🤖 {} Plan Updated! Applied {} intelligent modifications based on your progress.",
        adaptation.target.name(),
        adaptation.changes.len()
    ))
}
