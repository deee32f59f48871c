//! Database module - SQLite key-value storage for tracker data
//!
//! Every record is a JSON value under a string key. Per-day data uses
//! date-stamped keys (`water-2024-01-01`), the rest fixed names.
//! Writes are last-write-wins.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::coach::AppliedAdaptation;
use crate::tasks::Task;
use crate::water::WaterEntry;

const WEIGHT_LOG_KEY: &str = "weightLog";
const REMINDER_SETTINGS_KEY: &str = "reminderSettings";
const LAST_ADAPTATION_KEY: &str = "last-adaptation";

fn water_key(date: NaiveDate) -> String {
    format!("water-{}", date.format("%Y-%m-%d"))
}

fn tasks_key(date: NaiveDate) -> String {
    format!("tasks-{}", date.format("%Y-%m-%d"))
}

/// Logged body weight for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read a raw JSON string
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a raw JSON string, replacing any previous value
    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    /// Read and decode a JSON value
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .with_context(|| format!("Corrupt value under key '{}'", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    // === Weight ===

    /// Date -> weight map as stored
    pub fn weight_log(&self) -> Result<BTreeMap<NaiveDate, f64>> {
        Ok(self.get_json(WEIGHT_LOG_KEY)?.unwrap_or_default())
    }

    /// Store weight for a day, replacing an earlier entry for the same day
    pub fn log_weight(&self, date: NaiveDate, weight: f64) -> Result<()> {
        let mut log = self.weight_log()?;
        log.insert(date, weight);
        self.set_json(WEIGHT_LOG_KEY, &log)
    }

    /// Weight history ordered by date ascending
    pub fn weight_history(&self) -> Result<Vec<WeightEntry>> {
        Ok(self
            .weight_log()?
            .into_iter()
            .map(|(date, weight)| WeightEntry { date, weight })
            .collect())
    }

    /// Latest logged weight
    pub fn current_weight(&self) -> Result<Option<f64>> {
        Ok(self.weight_log()?.into_iter().next_back().map(|(_, w)| w))
    }

    // === Water ===

    pub fn water_entries(&self, date: NaiveDate) -> Result<Vec<WaterEntry>> {
        Ok(self.get_json(&water_key(date))?.unwrap_or_default())
    }

    pub fn set_water_entries(&self, date: NaiveDate, entries: &[WaterEntry]) -> Result<()> {
        self.set_json(&water_key(date), entries)
    }

    // === Tasks ===

    /// Saved tasks for a day, None if the day was never touched
    pub fn tasks(&self, date: NaiveDate) -> Result<Option<Vec<Task>>> {
        self.get_json(&tasks_key(date))
    }

    pub fn set_tasks(&self, date: NaiveDate, tasks: &[Task]) -> Result<()> {
        self.set_json(&tasks_key(date), tasks)
    }

    // === Reminders ===

    pub fn reminder_settings(&self) -> Result<Option<HashMap<String, bool>>> {
        self.get_json(REMINDER_SETTINGS_KEY)
    }

    pub fn set_reminder_settings(&self, settings: &HashMap<String, bool>) -> Result<()> {
        self.set_json(REMINDER_SETTINGS_KEY, settings)
    }

    // === Adaptations ===

    pub fn last_adaptation(&self) -> Result<Option<AppliedAdaptation>> {
        self.get_json(LAST_ADAPTATION_KEY)
    }

    pub fn save_adaptation(&self, adaptation: &AppliedAdaptation) -> Result<()> {
        self.set_json(LAST_ADAPTATION_KEY, adaptation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_missing_key() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.get_raw("nope").unwrap().is_none());
        assert!(db.get_json::<Vec<i32>>("nope").unwrap().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let db = Database::open(":memory:").unwrap();
        db.set_json("key", &1).unwrap();
        db.set_json("key", &2).unwrap();
        assert_eq!(db.get_json::<i32>("key").unwrap(), Some(2));
    }

    #[test]
    fn test_corrupt_value_is_error() {
        let db = Database::open(":memory:").unwrap();
        db.set_raw("weightLog", "{not json").unwrap();
        assert!(db.weight_log().is_err());
    }

    #[test]
    fn test_weight_log_format() {
        let db = Database::open(":memory:").unwrap();
        db.log_weight(date(2), 134.5).unwrap();
        let raw = db.get_raw("weightLog").unwrap().unwrap();
        assert_eq!(raw, r#"{"2024-01-02":134.5}"#);
    }

    #[test]
    fn test_last_adaptation_format() {
        use crate::coach::PlanTarget;

        let db = Database::open(":memory:").unwrap();
        let applied = AppliedAdaptation {
            date: Utc::now(),
            target: PlanTarget::Diet,
            changes: vec!["Reduce daily calories by 150-200".to_string()],
            applied: true,
        };
        db.save_adaptation(&applied).unwrap();

        let raw = db.get_raw("last-adaptation").unwrap().unwrap();
        assert!(raw.contains(r#""type":"diet""#), "Raw: {}", raw);
        assert!(!raw.contains("target"), "Raw: {}", raw);
        assert_eq!(db.last_adaptation().unwrap(), Some(applied));
    }

    #[test]
    fn test_weight_history_sorted() {
        let db = Database::open(":memory:").unwrap();
        db.log_weight(date(9), 133.0).unwrap();
        db.log_weight(date(1), 135.0).unwrap();
        db.log_weight(date(5), 134.0).unwrap();

        let history = db.weight_history().unwrap();
        let dates: Vec<_> = history.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(1), date(5), date(9)]);
        assert_eq!(db.current_weight().unwrap(), Some(133.0));
    }

    #[test]
    fn test_same_day_weight_replaced() {
        let db = Database::open(":memory:").unwrap();
        db.log_weight(date(1), 135.0).unwrap();
        db.log_weight(date(1), 134.2).unwrap();

        let history = db.weight_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].weight, 134.2);
    }

    #[test]
    fn test_empty_weight_history() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.weight_history().unwrap().is_empty());
        assert_eq!(db.current_weight().unwrap(), None);
    }

    #[test]
    fn test_day_keys_are_separate() {
        let db = Database::open(":memory:").unwrap();
        db.set_tasks(date(1), &crate::tasks::default_tasks()).unwrap();

        assert!(db.tasks(date(1)).unwrap().is_some());
        assert!(db.tasks(date(2)).unwrap().is_none());
        assert!(db.get_raw("tasks-2024-01-01").unwrap().is_some());
    }

    #[test]
    fn test_reminder_settings_roundtrip() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.reminder_settings().unwrap().is_none());

        let mut settings = HashMap::new();
        settings.insert("wake".to_string(), false);
        db.set_reminder_settings(&settings).unwrap();

        let loaded = db.reminder_settings().unwrap().unwrap();
        assert_eq!(loaded.get("wake"), Some(&false));
    }
}
