//! Weight trend prediction using linear regression (linfa)
//! and plan pace summary

use chrono::NaiveDate;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

use super::analyzer::{Goal, PLAN_WEEKS};
use crate::db::WeightEntry;

/// Minimum data points required for training
const MIN_DATA_POINTS: usize = 3;

/// Plan length in days (6 months)
pub const PLAN_DAYS: f64 = 180.0;

/// Calendar pace of the plan, independent of the regression
#[derive(Debug, Clone, PartialEq)]
pub struct PaceSummary {
    pub days_elapsed: i64,
    /// Share of the plan duration already used (unclamped)
    pub time_progress_percentage: f64,
    pub weekly_goal: f64,
    pub actual_weekly_loss: f64,
    /// Where the current pace lands after 26 weeks
    pub projected_final_weight: f64,
    pub kg_to_go: f64,
}

impl PaceSummary {
    pub fn compute(goal: &Goal, current_weight: f64, start_date: NaiveDate, today: NaiveDate) -> Self {
        let days_elapsed = (today - start_date).num_days();
        let weight_lost = goal.start_weight - current_weight;

        let actual_weekly_loss = if days_elapsed > 0 {
            weight_lost / (days_elapsed as f64 / 7.0)
        } else {
            0.0
        };

        Self {
            days_elapsed,
            time_progress_percentage: days_elapsed as f64 / PLAN_DAYS * 100.0,
            weekly_goal: goal.target_weekly_loss(),
            actual_weekly_loss,
            projected_final_weight: goal.start_weight - actual_weekly_loss * PLAN_WEEKS,
            kg_to_go: current_weight - goal.target_weight,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "Day {} of {:.0} ({:.0}%)\n\
            Weekly goal: {:.1} kg\n\
            Actual pace: {:.1} kg/week\n\
            Projected in 26 weeks: {:.1} kg\n\
            To go: {:.1} kg",
            self.days_elapsed,
            PLAN_DAYS,
            self.time_progress_percentage.clamp(0.0, 100.0),
            self.weekly_goal,
            self.actual_weekly_loss,
            self.projected_final_weight,
            self.kg_to_go,
        )
    }
}

/// Weight trend fitted over the logged history
pub struct WeightTrendPredictor {
    slope: f64,
    intercept: f64,
    r2_score: f64,
    data_points: usize,
    first_date: NaiveDate,
}

impl WeightTrendPredictor {
    /// Fit a trend, X = days since the first entry, Y = weight
    pub fn train(history: &[WeightEntry]) -> Option<Self> {
        if history.len() < MIN_DATA_POINTS {
            return None;
        }

        let first_date = history.iter().map(|e| e.date).min()?;

        let x_data: Vec<f64> = history
            .iter()
            .map(|e| (e.date - first_date).num_days() as f64)
            .collect();
        let y_data: Vec<f64> = history.iter().map(|e| e.weight).collect();

        let n_samples = x_data.len();
        let records = Array2::from_shape_vec((n_samples, 1), x_data).ok()?;
        let targets = Array1::from_vec(y_data);
        let dataset = Dataset::new(records, targets);

        let model = LinearRegression::default().fit(&dataset).ok()?;

        let slope = model.params()[0];
        let intercept = model.intercept();

        let predictions = model.predict(&dataset);
        let r2_score = predictions.r2(&dataset).unwrap_or(0.0);

        Some(Self {
            slope,
            intercept,
            r2_score,
            data_points: n_samples,
            first_date,
        })
    }

    /// Predicted weight `days_ahead` days after `today`
    pub fn predict_weight(&self, today: NaiveDate, days_ahead: i64) -> f64 {
        let day = (today - self.first_date).num_days() + days_ahead;
        self.slope * day as f64 + self.intercept
    }

    /// kg per day, negative when losing
    pub fn daily_change(&self) -> f64 {
        self.slope
    }

    pub fn r2_score(&self) -> f64 {
        self.r2_score
    }

    pub fn data_points(&self) -> usize {
        self.data_points
    }

    /// Days from `today` until the trend line reaches `target`.
    /// None when the trend is flat or going up.
    pub fn days_to_target(&self, today: NaiveDate, target: f64) -> Option<i64> {
        if self.slope >= 0.0 {
            return None;
        }
        let now = self.predict_weight(today, 0);
        if now <= target {
            return Some(0);
        }
        Some(((target - now) / self.slope).ceil() as i64)
    }

    pub fn format_prediction(&self, today: NaiveDate, target: f64) -> String {
        let trend = if self.slope >= 0.0 {
            format!("+{:.2}", self.slope)
        } else {
            format!("{:.2}", self.slope)
        };

        let mut lines = vec![
            "--- Trend ---".to_string(),
            format!("Trend: {} kg/day ({} points, R² {:.2})", trend, self.data_points, self.r2_score),
            format!("In 1 week: {:.1} kg", self.predict_weight(today, 7)),
            format!("In 30 days: {:.1} kg", self.predict_weight(today, 30)),
        ];

        match self.days_to_target(today, target) {
            Some(days) => lines.push(format!("Target reached in ~{} days", days)),
            None => lines.push("Target not reachable at the current trend".to_string()),
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(n)
    }

    fn create_history(points: &[(i64, f64)]) -> Vec<WeightEntry> {
        points
            .iter()
            .map(|(d, w)| WeightEntry { date: day(*d), weight: *w })
            .collect()
    }

    #[test]
    fn test_predictor_insufficient_data() {
        let history = create_history(&[(0, 135.0), (7, 134.0)]);
        assert!(WeightTrendPredictor::train(&history).is_none());
    }

    #[test]
    fn test_predictor_linear_trend() {
        // 1 kg per week down
        let history = create_history(&[(0, 135.0), (7, 134.0), (14, 133.0)]);
        let predictor = WeightTrendPredictor::train(&history).unwrap();

        let daily = predictor.daily_change();
        assert!((daily + 1.0 / 7.0).abs() < 1e-6, "Daily change: {}", daily);
        assert!(predictor.r2_score() > 0.9, "R2 score: {}", predictor.r2_score());
        assert_eq!(predictor.data_points(), 3);
    }

    #[test]
    fn test_predict_future_weight() {
        let history = create_history(&[(0, 135.0), (7, 134.0), (14, 133.0)]);
        let predictor = WeightTrendPredictor::train(&history).unwrap();

        let current = predictor.predict_weight(day(14), 0);
        assert!((current - 133.0).abs() < 0.01, "Current: {}", current);

        let week = predictor.predict_weight(day(14), 7);
        assert!((week - 132.0).abs() < 0.01, "Week: {}", week);
    }

    #[test]
    fn test_days_to_target() {
        let history = create_history(&[(0, 135.0), (7, 134.0), (14, 133.0)]);
        let predictor = WeightTrendPredictor::train(&history).unwrap();

        // 43 kg at 1 kg/week
        let days = predictor.days_to_target(day(14), 90.0).unwrap();
        assert!((300..=302).contains(&days), "Days: {}", days);
    }

    #[test]
    fn test_days_to_target_rising_trend() {
        let history = create_history(&[(0, 130.0), (7, 131.0), (14, 132.0)]);
        let predictor = WeightTrendPredictor::train(&history).unwrap();
        assert!(predictor.daily_change() > 0.0);
        assert!(predictor.days_to_target(day(14), 90.0).is_none());
    }

    #[test]
    fn test_format_prediction() {
        let history = create_history(&[(0, 135.0), (7, 134.0), (14, 133.0)]);
        let predictor = WeightTrendPredictor::train(&history).unwrap();
        let formatted = predictor.format_prediction(day(14), 90.0);

        assert!(formatted.contains("Trend:"), "Format: {}", formatted);
        assert!(formatted.contains("In 1 week:"), "Format: {}", formatted);
        assert!(formatted.contains("Target reached"), "Format: {}", formatted);
    }

    #[test]
    fn test_pace_summary() {
        let goal = Goal::default();
        let pace = PaceSummary::compute(&goal, 131.0, day(0), day(28));

        assert_eq!(pace.days_elapsed, 28);
        assert!((pace.actual_weekly_loss - 1.0).abs() < 1e-9);
        assert!((pace.projected_final_weight - 109.0).abs() < 1e-9);
        assert!((pace.kg_to_go - 41.0).abs() < 1e-9);
        assert!((pace.time_progress_percentage - 28.0 / 180.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pace_summary_first_day() {
        let pace = PaceSummary::compute(&Goal::default(), 135.0, day(0), day(0));
        assert_eq!(pace.actual_weekly_loss, 0.0);
        assert_eq!(pace.projected_final_weight, 135.0);
        assert!(pace.format().contains("Day 0 of 180"));
    }
}
