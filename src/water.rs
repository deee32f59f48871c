//! Water intake tracking - daily 4L goal

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Daily goal in ml (4L)
pub const DAILY_GOAL_ML: u32 = 4000;

/// Largest single add; one glass never exceeds the whole day's goal
pub const MAX_ADD_ML: u32 = DAILY_GOAL_ML;

/// Quick-add buttons
pub const QUICK_AMOUNTS_ML: [u32; 4] = [250, 500, 750, 1000];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    /// Wall-clock time, "HH:MM"
    pub time: String,
    pub amount: u32,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationStatus {
    Excellent,
    Good,
    Fair,
    Low,
    Critical,
}

impl HydrationStatus {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 100.0 {
            HydrationStatus::Excellent
        } else if pct >= 75.0 {
            HydrationStatus::Good
        } else if pct >= 50.0 {
            HydrationStatus::Fair
        } else if pct >= 25.0 {
            HydrationStatus::Low
        } else {
            HydrationStatus::Critical
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HydrationStatus::Excellent => "Excellent",
            HydrationStatus::Good => "Good",
            HydrationStatus::Fair => "Fair",
            HydrationStatus::Low => "Low",
            HydrationStatus::Critical => "Critical",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            HydrationStatus::Excellent => "💪",
            HydrationStatus::Good => "😊",
            HydrationStatus::Fair => "🙂",
            HydrationStatus::Low => "😐",
            HydrationStatus::Critical => "😟",
        }
    }
}

pub fn hydration_tip(pct: f64) -> &'static str {
    if pct < 25.0 {
        "Start your day with 500ml of water!"
    } else if pct < 50.0 {
        "Keep sipping throughout the day"
    } else if pct < 75.0 {
        "You're doing great! Stay consistent"
    } else if pct < 100.0 {
        "Almost there! Finish strong!"
    } else {
        "Perfect hydration! Your metabolism is optimized!"
    }
}

/// Result of a single add
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterAddOutcome {
    pub total_ml: u32,
    pub percentage: f64,
    /// True only for the add that crossed the goal
    pub goal_reached: bool,
}

impl WaterAddOutcome {
    pub fn format(&self, amount: u32) -> String {
        let mut text = format!(
            "💧 Added {}ml water!\nTotal: {}ml / {}ml ({:.1}%)",
            amount, self.total_ml, DAILY_GOAL_ML, self.percentage
        );
        if self.goal_reached {
            text.push_str("\n🎉 Daily Water Goal Achieved! Excellent hydration!");
        }
        text
    }
}

/// One day of water entries
#[derive(Debug, Clone, Default)]
pub struct WaterDay {
    entries: Vec<WaterEntry>,
}

impl WaterDay {
    pub fn new(entries: Vec<WaterEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WaterEntry] {
        &self.entries
    }

    pub fn total_ml(&self) -> u32 {
        self.entries.iter().fold(0u32, |acc, e| acc.saturating_add(e.amount))
    }

    /// Unclamped share of the daily goal
    pub fn progress_percentage(&self) -> f64 {
        self.total_ml() as f64 / DAILY_GOAL_ML as f64 * 100.0
    }

    pub fn status(&self) -> HydrationStatus {
        HydrationStatus::from_percentage(self.progress_percentage())
    }

    pub fn add(&mut self, amount: u32, now: DateTime<Local>) -> WaterAddOutcome {
        let before = self.total_ml();
        self.entries.push(WaterEntry {
            time: now.format("%H:%M").to_string(),
            amount,
            timestamp: now,
        });
        let total_ml = before.saturating_add(amount);

        WaterAddOutcome {
            total_ml,
            percentage: self.progress_percentage(),
            goal_reached: before < DAILY_GOAL_ML && total_ml >= DAILY_GOAL_ML,
        }
    }

    /// Last `n` entries, newest first
    pub fn recent(&self, n: usize) -> Vec<&WaterEntry> {
        self.entries.iter().rev().take(n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn test_empty_day() {
        let day = WaterDay::default();
        assert_eq!(day.total_ml(), 0);
        assert_eq!(day.progress_percentage(), 0.0);
        assert_eq!(day.status(), HydrationStatus::Critical);
    }

    #[test]
    fn test_add_records_time() {
        let mut day = WaterDay::default();
        let outcome = day.add(500, at(8, 5));

        assert_eq!(outcome.total_ml, 500);
        assert_eq!(outcome.percentage, 12.5);
        assert!(!outcome.goal_reached);
        assert_eq!(day.entries()[0].time, "08:05");
    }

    #[test]
    fn test_goal_reached_only_once() {
        let mut day = WaterDay::default();
        day.add(1000, at(8, 0));
        day.add(1000, at(12, 0));
        day.add(1000, at(16, 0));

        let crossing = day.add(1000, at(20, 0));
        assert!(crossing.goal_reached);
        assert_eq!(crossing.total_ml, DAILY_GOAL_ML);

        let after = day.add(250, at(21, 0));
        assert!(!after.goal_reached);
        assert!(after.percentage > 100.0);
        assert_eq!(day.status(), HydrationStatus::Excellent);
    }

    #[test]
    fn test_total_saturates_on_huge_entries() {
        let mut day = WaterDay::new(vec![WaterEntry {
            time: "08:00".to_string(),
            amount: u32::MAX,
            timestamp: at(8, 0),
        }]);
        let outcome = day.add(1, at(9, 0));
        assert_eq!(outcome.total_ml, u32::MAX);
        assert_eq!(day.total_ml(), u32::MAX);
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(HydrationStatus::from_percentage(24.9), HydrationStatus::Critical);
        assert_eq!(HydrationStatus::from_percentage(25.0), HydrationStatus::Low);
        assert_eq!(HydrationStatus::from_percentage(50.0), HydrationStatus::Fair);
        assert_eq!(HydrationStatus::from_percentage(75.0), HydrationStatus::Good);
        assert_eq!(HydrationStatus::from_percentage(100.0), HydrationStatus::Excellent);
    }

    #[test]
    fn test_hydration_tips() {
        assert_eq!(hydration_tip(0.0), "Start your day with 500ml of water!");
        assert_eq!(hydration_tip(60.0), "You're doing great! Stay consistent");
        assert_eq!(hydration_tip(120.0), "Perfect hydration! Your metabolism is optimized!");
    }

    #[test]
    fn test_recent_newest_first() {
        let mut day = WaterDay::default();
        for (i, amount) in [250, 500, 750].into_iter().enumerate() {
            day.add(amount, at(9 + i as u32, 0));
        }
        let recent: Vec<_> = day.recent(2).iter().map(|e| e.amount).collect();
        assert_eq!(recent, vec![750, 500]);
    }

    #[test]
    fn test_outcome_format() {
        let mut day = WaterDay::default();
        day.add(3500, at(8, 0));
        let outcome = day.add(500, at(9, 0));
        let text = outcome.format(500);
        assert!(text.contains("Total: 4000ml / 4000ml (100.0%)"), "Format: {}", text);
        assert!(text.contains("Goal Achieved"), "Format: {}", text);
    }
}
