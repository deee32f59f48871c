//! Tracker - day-to-day operations shared by the CLI, TUI and bot

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::info;

use crate::coach::{self, CoachReport, Goal, validate_weight};
use crate::db::Database;
use crate::reminders::ReminderSettings;
use crate::tasks::TaskList;
use crate::water::{MAX_ADD_ML, WaterAddOutcome, WaterDay};

pub struct Tracker {
    db: Database,
    goal: Goal,
}

impl Tracker {
    pub fn new(db: Database, goal: Goal) -> Self {
        Self { db, goal }
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Validate and store the weight for a day
    pub fn log_weight(&self, date: NaiveDate, weight: f64) -> Result<()> {
        let weight = validate_weight(weight)?;
        self.db.log_weight(date, weight)?;
        info!(%date, weight, "weight logged");
        Ok(())
    }

    pub fn report(&self, today: NaiveDate) -> Result<CoachReport> {
        let history = self.db.weight_history()?;
        Ok(CoachReport::build(&self.goal, &history, today))
    }

    /// Apply the adaptation of the card at `index` in today's advice
    pub fn apply_adaptation(&self, today: NaiveDate, index: usize, now: DateTime<Utc>) -> Result<String> {
        let report = self.report(today)?;
        let Some(item) = report.advice.get(index) else {
            bail!("No advice card #{} (have {})", index, report.advice.len());
        };
        let Some(adaptation) = &item.adaptation else {
            bail!("Advice card #{} has no plan changes", index);
        };
        coach::apply_adaptation(&self.db, adaptation, now)
    }

    pub fn water(&self, date: NaiveDate) -> Result<WaterDay> {
        Ok(WaterDay::new(self.db.water_entries(date)?))
    }

    pub fn add_water(&self, amount: u32, now: DateTime<Local>) -> Result<WaterAddOutcome> {
        if amount == 0 {
            bail!("Water amount must be greater than 0");
        }
        if amount > MAX_ADD_ML {
            bail!("Water amount must be at most {}ml", MAX_ADD_ML);
        }
        let date = now.date_naive();
        let mut day = self.water(date)?;
        let outcome = day.add(amount, now);
        self.db.set_water_entries(date, day.entries())?;

        info!(amount, total = outcome.total_ml, "water added");
        if outcome.goal_reached {
            info!("daily water goal reached");
        }
        Ok(outcome)
    }

    pub fn tasks(&self, date: NaiveDate) -> Result<TaskList> {
        Ok(TaskList::load_or_default(self.db.tasks(date)?))
    }

    pub fn set_task(&self, date: NaiveDate, id: &str, completed: bool) -> Result<TaskList> {
        let mut list = self.tasks(date)?;
        if !list.set_completed(id, completed) {
            bail!("Unknown task '{}'", id);
        }
        self.db.set_tasks(date, list.tasks())?;
        Ok(list)
    }

    pub fn toggle_task(&self, date: NaiveDate, id: &str) -> Result<TaskList> {
        let completed = self
            .tasks(date)?
            .tasks()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.completed);
        match completed {
            Some(done) => self.set_task(date, id, !done),
            None => bail!("Unknown task '{}'", id),
        }
    }

    pub fn reset_tasks(&self, date: NaiveDate) -> Result<TaskList> {
        let mut list = self.tasks(date)?;
        list.reset();
        self.db.set_tasks(date, list.tasks())?;
        Ok(list)
    }

    pub fn reminder_settings(&self) -> Result<ReminderSettings> {
        Ok(ReminderSettings::load_or_default(self.db.reminder_settings()?))
    }

    /// Flip a reminder and persist; returns the new state
    pub fn toggle_reminder(&self, id: &str) -> Result<bool> {
        let mut settings = self.reminder_settings()?;
        let Some(enabled) = settings.toggle(id) else {
            bail!("Unknown reminder '{}'", id);
        };
        self.db.set_reminder_settings(settings.as_map())?;
        info!(id, enabled, "reminder toggled");
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tracker() -> Tracker {
        Tracker::new(Database::open(":memory:").unwrap(), Goal::default())
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    #[test]
    fn test_log_weight_rejects_invalid() {
        let t = tracker();
        assert!(t.log_weight(day(2), 0.0).is_err());
        assert!(t.log_weight(day(2), 301.0).is_err());
        assert!(t.db().weight_history().unwrap().is_empty());
    }

    #[test]
    fn test_report_after_logging() {
        let t = tracker();
        t.log_weight(day(2), 135.0).unwrap();
        t.log_weight(day(9), 132.0).unwrap();

        let report = t.report(day(9)).unwrap();
        assert_eq!(report.current_weight, 132.0);
        let pacing = report.snapshot.pacing.unwrap();
        assert_eq!(pacing.weekly_change_rate, 3.0);
        assert!(pacing.is_too_fast);
    }

    #[test]
    fn test_apply_adaptation_by_index() {
        let t = tracker();
        t.log_weight(day(2), 135.0).unwrap();
        t.log_weight(day(9), 132.0).unwrap();

        // card 0: early progress band, card 1: pace adjustment (diet)
        let summary = t.apply_adaptation(day(9), 1, Utc::now()).unwrap();
        assert!(summary.contains("Diet Plan Updated"), "Summary: {}", summary);

        assert!(t.apply_adaptation(day(9), 0, Utc::now()).is_err());
        assert!(t.apply_adaptation(day(9), 99, Utc::now()).is_err());
    }

    #[test]
    fn test_add_water_persists() {
        let t = tracker();
        let now = Local.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        t.add_water(500, now).unwrap();
        let outcome = t.add_water(750, now).unwrap();

        assert_eq!(outcome.total_ml, 1250);
        assert_eq!(t.water(day(3)).unwrap().total_ml(), 1250);
        assert_eq!(t.water(day(4)).unwrap().total_ml(), 0);
        assert!(t.add_water(0, now).is_err());
    }

    #[test]
    fn test_add_water_rejects_oversized_amount() {
        let t = tracker();
        let now = Local.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        assert!(t.add_water(u32::MAX, now).is_err());
        assert!(t.add_water(MAX_ADD_ML + 1, now).is_err());
        assert_eq!(t.water(day(3)).unwrap().total_ml(), 0);

        t.add_water(MAX_ADD_ML, now).unwrap();
        let outcome = t.add_water(1, now).unwrap();
        assert_eq!(outcome.total_ml, MAX_ADD_ML + 1);
    }

    #[test]
    fn test_tasks_flow() {
        let t = tracker();
        assert_eq!(t.tasks(day(2)).unwrap().completed_count(), 0);

        t.set_task(day(2), "workout", true).unwrap();
        t.toggle_task(day(2), "lunch").unwrap();
        assert_eq!(t.tasks(day(2)).unwrap().completed_count(), 2);

        t.toggle_task(day(2), "lunch").unwrap();
        assert_eq!(t.tasks(day(2)).unwrap().completed_count(), 1);

        assert!(t.set_task(day(2), "nap", true).is_err());

        t.reset_tasks(day(2)).unwrap();
        assert_eq!(t.tasks(day(2)).unwrap().completed_count(), 0);
    }

    #[test]
    fn test_toggle_reminder_persists() {
        let t = tracker();
        assert!(!t.toggle_reminder("dinner").unwrap());
        assert!(!t.reminder_settings().unwrap().is_enabled("dinner"));
        assert!(t.reminder_settings().unwrap().is_enabled("lunch"));
        assert!(t.toggle_reminder("siesta").is_err());
    }
}
