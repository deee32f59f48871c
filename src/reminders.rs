//! Meal and sleep reminders

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    Daily,
    Meal,
}

impl ReminderKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReminderKind::Daily => "⏰ Daily",
            ReminderKind::Meal => "🍽️ Meal",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: &'static str,
    pub hour: u32,
    pub minute: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: ReminderKind,
}

impl Reminder {
    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Today at the reminder time if still ahead, otherwise tomorrow
    pub fn next_occurrence(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.time());
        if today <= now { today + Duration::days(1) } else { today }
    }

    pub fn message(&self) -> String {
        format!("{} {}\n{}", self.kind.label(), self.title, self.description)
    }
}

const fn reminder(
    id: &'static str,
    hour: u32,
    minute: u32,
    title: &'static str,
    description: &'static str,
    kind: ReminderKind,
) -> Reminder {
    Reminder { id, hour, minute, title, description, kind }
}

pub static REMINDERS: [Reminder; 9] = [
    reminder("wake", 5, 0, "Wake Up", "Start your day strong!", ReminderKind::Daily),
    reminder("preworkout", 5, 15, "Pre-Workout Meal", "Banana + Black Coffee", ReminderKind::Meal),
    reminder("postworkout", 7, 30, "Post-Workout", "Protein Shake + Almonds", ReminderKind::Meal),
    reminder("breakfast", 8, 0, "Breakfast", "Oatmeal + Berries + Yogurt", ReminderKind::Meal),
    reminder("snack1", 11, 0, "School Snack", "Apple + Peanut Butter", ReminderKind::Meal),
    reminder("lunch", 13, 30, "Lunch", "Chicken + Rice + Vegetables", ReminderKind::Meal),
    reminder("snack2", 16, 30, "Evening Snack", "Carrots + Hummus", ReminderKind::Meal),
    reminder("dinner", 20, 0, "Dinner", "Fish + Quinoa + Broccoli", ReminderKind::Meal),
    reminder("sleep", 21, 45, "Sleep Reminder", "Wind down for bed", ReminderKind::Daily),
];

pub fn find_reminder(id: &str) -> Option<&'static Reminder> {
    REMINDERS.iter().find(|r| r.id == id)
}

/// Enabled flag per reminder id
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderSettings {
    enabled: HashMap<String, bool>,
}

impl Default for ReminderSettings {
    /// Everything on
    fn default() -> Self {
        Self {
            enabled: REMINDERS.iter().map(|r| (r.id.to_string(), true)).collect(),
        }
    }
}

impl ReminderSettings {
    pub fn load_or_default(saved: Option<HashMap<String, bool>>) -> Self {
        saved.map(|enabled| Self { enabled }).unwrap_or_default()
    }

    pub fn as_map(&self) -> &HashMap<String, bool> {
        &self.enabled
    }

    /// Ids missing from saved settings count as disabled
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.get(id).copied().unwrap_or(false)
    }

    /// Flip a reminder; returns the new state, None for an unknown id
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        find_reminder(id)?;
        let state = !self.is_enabled(id);
        self.enabled.insert(id.to_string(), state);
        Some(state)
    }

    /// Enabled reminders whose time falls in `(from, to]`
    pub fn due_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<&'static Reminder> {
        REMINDERS
            .iter()
            .filter(|r| self.is_enabled(r.id))
            .filter(|r| r.next_occurrence(from) <= to)
            .collect()
    }

    pub fn format(&self) -> String {
        REMINDERS
            .iter()
            .map(|r| {
                format!(
                    "{} {} {:>8} {} - {} ({})",
                    if self.is_enabled(r.id) { "[on] " } else { "[off]" },
                    r.time().format("%H:%M"),
                    r.kind.label(),
                    r.title,
                    r.description,
                    r.id
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
