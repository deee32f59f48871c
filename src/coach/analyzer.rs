//! Progress analysis - how far along the goal we are and how fast we move

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::db::WeightEntry;

/// Default plan: 135 kg down to 90 kg
pub const DEFAULT_START_WEIGHT: f64 = 135.0;
pub const DEFAULT_TARGET_WEIGHT: f64 = 90.0;

/// Upper bound accepted for any logged weight (kg)
pub const MAX_WEIGHT: f64 = 300.0;

/// Plan horizon: 6 months
pub const PLAN_WEEKS: f64 = 26.0;

/// Entries considered for the weekly change rate
const PACING_WINDOW: usize = 7;

/// Share of the target rate that still counts as on track
const ON_TRACK_RATIO: f64 = 0.8;

/// Above this share of the target rate the loss is too fast
const TOO_FAST_RATIO: f64 = 1.5;

/// Reject anything that is not a plausible body weight in kg
pub fn validate_weight(weight: f64) -> Result<f64> {
    if !weight.is_finite() || weight <= 0.0 || weight > MAX_WEIGHT {
        bail!("Invalid weight: enter a value greater than 0 and at most 300 kg (got {})", weight);
    }
    Ok(weight)
}

/// Weight-loss goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub start_weight: f64,
    pub target_weight: f64,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            start_weight: DEFAULT_START_WEIGHT,
            target_weight: DEFAULT_TARGET_WEIGHT,
        }
    }
}

impl Goal {
    /// Build a validated goal
    pub fn new(start_weight: f64, target_weight: f64) -> Result<Self> {
        let start_weight = validate_weight(start_weight)?;
        let target_weight = validate_weight(target_weight)?;
        if start_weight == target_weight {
            bail!("Start and target weight must differ ({} kg)", start_weight);
        }
        Ok(Self { start_weight, target_weight })
    }

    /// Total kg to lose over the whole plan
    pub fn total_to_lose(&self) -> f64 {
        self.start_weight - self.target_weight
    }

    /// Expected loss per week to finish within the plan horizon
    pub fn target_weekly_loss(&self) -> f64 {
        self.total_to_lose() / PLAN_WEEKS
    }

    /// Unclamped progress percentage for a given weight
    pub fn progress_percentage(&self, current_weight: f64) -> f64 {
        (self.start_weight - current_weight) / self.total_to_lose() * 100.0
    }
}

/// Weekly pacing, only known with at least two history entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// kg lost across the recent window (positive = loss)
    pub weekly_change_rate: f64,
    pub target_weekly_loss: f64,
    pub is_on_track: bool,
    pub is_too_fast: bool,
}

/// Derived progress, recomputed on every read of the history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub weight_lost: f64,
    /// May be negative (weight regain) or above 100 (past target)
    pub progress_percentage: f64,
    pub pacing: Option<Pacing>,
}

impl ProgressSnapshot {
    /// Percentage for progress bars
    pub fn clamped_percentage(&self) -> f64 {
        self.progress_percentage.clamp(0.0, 100.0)
    }

    /// Missing pacing counts as not on track
    pub fn is_on_track(&self) -> bool {
        self.pacing.is_some_and(|p| p.is_on_track)
    }

    pub fn is_too_fast(&self) -> bool {
        self.pacing.is_some_and(|p| p.is_too_fast)
    }
}

/// Analyze progress. `history` must be ordered by date ascending.
///
/// Never fails: NaN or infinite inputs flow through to the snapshot.
/// Use [`validate_weight`] and [`Goal::new`] at the input boundary.
pub fn analyze(goal: &Goal, current_weight: f64, history: &[WeightEntry]) -> ProgressSnapshot {
    let weight_lost = goal.start_weight - current_weight;
    let progress_percentage = goal.progress_percentage(current_weight);

    let pacing = if history.len() < 2 {
        None
    } else {
        let window = &history[history.len().saturating_sub(PACING_WINDOW)..];
        let first = window[0].weight;
        let last = window[window.len() - 1].weight;
        let weekly_change_rate = -(last - first);
        let target_weekly_loss = goal.target_weekly_loss();

        Some(Pacing {
            weekly_change_rate,
            target_weekly_loss,
            is_on_track: weekly_change_rate >= target_weekly_loss * ON_TRACK_RATIO,
            is_too_fast: weekly_change_rate > target_weekly_loss * TOO_FAST_RATIO,
        })
    };

    ProgressSnapshot {
        weight_lost,
        progress_percentage,
        pacing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_history(weights: &[(u32, f64)]) -> Vec<WeightEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        weights
            .iter()
            .map(|(day, weight)| WeightEntry {
                date: start + chrono::Duration::days(*day as i64),
                weight: *weight,
            })
            .collect()
    }

    #[test]
    fn test_no_progress_at_start_weight() {
        let snapshot = analyze(&Goal::default(), 135.0, &[]);
        assert_eq!(snapshot.progress_percentage, 0.0);
        assert_eq!(snapshot.weight_lost, 0.0);
    }

    #[test]
    fn test_full_progress_at_target_weight() {
        let snapshot = analyze(&Goal::default(), 90.0, &[]);
        assert_eq!(snapshot.progress_percentage, 100.0);
        assert_eq!(snapshot.weight_lost, 45.0);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let goal = Goal::default();
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=45 {
            let weight = 135.0 - step as f64;
            let pct = analyze(&goal, weight, &[]).progress_percentage;
            assert!(pct > previous, "{} should exceed {}", pct, previous);
            previous = pct;
        }
    }

    #[test]
    fn test_regain_gives_negative_percentage() {
        let snapshot = analyze(&Goal::default(), 140.0, &[]);
        assert!(snapshot.progress_percentage < 0.0);
        assert_eq!(snapshot.clamped_percentage(), 0.0);
    }

    #[test]
    fn test_clamped_above_target() {
        let snapshot = analyze(&Goal::default(), 85.0, &[]);
        assert!(snapshot.progress_percentage > 100.0);
        assert_eq!(snapshot.clamped_percentage(), 100.0);
    }

    #[test]
    fn test_pacing_needs_two_entries() {
        let history = create_history(&[(0, 135.0)]);
        let snapshot = analyze(&Goal::default(), 135.0, &history);
        assert!(snapshot.pacing.is_none());
        assert!(!snapshot.is_on_track());
        assert!(!snapshot.is_too_fast());
    }

    #[test]
    fn test_pacing_week_example() {
        let history = create_history(&[(0, 135.0), (7, 132.0)]);
        let snapshot = analyze(&Goal::default(), 132.0, &history);
        let pacing = snapshot.pacing.unwrap();

        assert_eq!(pacing.weekly_change_rate, 3.0);
        assert!((pacing.target_weekly_loss - 45.0 / 26.0).abs() < 1e-9);
        assert!(pacing.is_on_track);
        assert!(pacing.is_too_fast);
    }

    #[test]
    fn test_pacing_uses_last_seven_entries() {
        // First entry falls out of the window
        let history = create_history(&[
            (0, 150.0),
            (1, 135.0),
            (2, 134.8),
            (3, 134.6),
            (4, 134.4),
            (5, 134.2),
            (6, 134.0),
            (7, 133.5),
        ]);
        let pacing = analyze(&Goal::default(), 133.5, &history).pacing.unwrap();
        assert!((pacing.weekly_change_rate - 1.5).abs() < 1e-9);
        assert!(pacing.is_on_track);
        assert!(!pacing.is_too_fast);
    }

    #[test]
    fn test_weight_gain_is_not_on_track() {
        let history = create_history(&[(0, 130.0), (3, 131.0)]);
        let pacing = analyze(&Goal::default(), 131.0, &history).pacing.unwrap();
        assert_eq!(pacing.weekly_change_rate, -1.0);
        assert!(!pacing.is_on_track);
        assert!(!pacing.is_too_fast);
    }

    #[test]
    fn test_nan_propagates() {
        let snapshot = analyze(&Goal::default(), f64::NAN, &[]);
        assert!(snapshot.progress_percentage.is_nan());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(80.5).is_ok());
        assert!(validate_weight(300.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-5.0).is_err());
        assert!(validate_weight(300.1).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_weight_message_matches_range() {
        assert_eq!(validate_weight(0.5).unwrap(), 0.5);
        let err = validate_weight(0.0).unwrap_err().to_string();
        assert!(err.contains("greater than 0 and at most 300 kg"), "Error: {}", err);
    }

    #[test]
    fn test_goal_new() {
        let goal = Goal::new(120.0, 80.0).unwrap();
        assert_eq!(goal.total_to_lose(), 40.0);
        assert!(Goal::new(100.0, 100.0).is_err());
        assert!(Goal::new(400.0, 80.0).is_err());
    }
}
