//! Daily task checklist

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Workout,
    Diet,
    Water,
    General,
}

impl TaskCategory {
    pub fn emoji(&self) -> &'static str {
        match self {
            TaskCategory::Workout => "💪",
            TaskCategory::Diet => "🍽️",
            TaskCategory::Water => "💧",
            TaskCategory::General => "✅",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TaskCategory::Workout => "Workout Tasks",
            TaskCategory::Diet => "Diet Tasks",
            TaskCategory::Water => "Water Goals",
            TaskCategory::General => "General Tasks",
        }
    }

    /// Display order of the checklist sections
    pub fn all() -> &'static [TaskCategory] {
        &[
            TaskCategory::Water,
            TaskCategory::Workout,
            TaskCategory::Diet,
            TaskCategory::General,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub category: TaskCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

fn task(id: &str, title: &str, category: TaskCategory, time: Option<&str>) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        completed: false,
        category,
        time: time.map(|t| t.to_string()),
    }
}

/// Fresh checklist for a day nobody touched yet
pub fn default_tasks() -> Vec<Task> {
    use TaskCategory::*;

    vec![
        task("weight-log", "Log morning weight", General, None),
        task("workout", "Complete today's workout", Workout, None),
        task("water-1", "Drink 1L water (morning)", Water, Some("Before 12 PM")),
        task("water-2", "Drink 1L water (afternoon)", Water, Some("12 PM - 6 PM")),
        task("water-3", "Drink 1L water (evening)", Water, Some("6 PM - 9 PM")),
        task("water-4", "Drink 1L water (night)", Water, Some("After 9 PM")),
        task("breakfast", "Eat planned breakfast", Diet, Some("8:00 AM")),
        task("lunch", "Eat planned lunch", Diet, Some("1:30 PM")),
        task("dinner", "Eat planned dinner", Diet, Some("8:00 PM")),
        task("sleep", "Sleep by 10:00 PM", General, Some("10:00 PM")),
    ]
}

/// Checklist for one day
#[derive(Debug, Clone, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self { tasks: default_tasks() }
    }
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Saved tasks, or the defaults when the day has none
    pub fn load_or_default(saved: Option<Vec<Task>>) -> Self {
        saved.map(Self::new).unwrap_or_default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns false for an unknown id
    pub fn set_completed(&mut self, id: &str, completed: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        for task in &mut self.tasks {
            task.completed = false;
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn completion_percentage(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.tasks.len() as f64 * 100.0
    }

    pub fn by_category(&self, category: TaskCategory) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.category == category).collect()
    }

    /// Checklist grouped by section
    pub fn format(&self) -> String {
        let mut lines = vec![format!(
            "Today's tasks: {}/{} {}",
            self.completed_count(),
            self.tasks.len(),
            if self.completion_percentage() == 100.0 { "🎉" } else { "📝" }
        )];

        for category in TaskCategory::all() {
            let tasks = self.by_category(*category);
            if tasks.is_empty() {
                continue;
            }
            lines.push(format!("\n{} {}", category.emoji(), category.title()));
            for t in tasks {
                let mark = if t.completed { "[x]" } else { "[ ]" };
                match &t.time {
                    Some(time) => lines.push(format!("{} {} ({}) - {}", mark, t.title, time, t.id)),
                    None => lines.push(format!("{} {} - {}", mark, t.title, t.id)),
                }
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tasks() {
        let list = TaskList::default();
        assert_eq!(list.tasks().len(), 10);
        assert_eq!(list.completed_count(), 0);
        assert_eq!(list.by_category(TaskCategory::Water).len(), 4);
        assert_eq!(list.by_category(TaskCategory::Diet).len(), 3);
        assert_eq!(list.by_category(TaskCategory::General).len(), 2);
        assert_eq!(list.by_category(TaskCategory::Workout).len(), 1);
    }

    #[test]
    fn test_complete_and_reset() {
        let mut list = TaskList::default();
        assert!(list.set_completed("workout", true));
        assert!(list.set_completed("lunch", true));
        assert_eq!(list.completed_count(), 2);
        assert_eq!(list.completion_percentage(), 20.0);

        list.reset();
        assert_eq!(list.completed_count(), 0);
    }

    #[test]
    fn test_unknown_task_id() {
        let mut list = TaskList::default();
        assert!(!list.set_completed("yoga", true));
        assert_eq!(list.completed_count(), 0);
    }

    #[test]
    fn test_empty_list_percentage() {
        let list = TaskList::new(vec![]);
        assert_eq!(list.completion_percentage(), 0.0);
    }

    #[test]
    fn test_load_or_default() {
        let mut saved = default_tasks();
        saved[0].completed = true;
        let list = TaskList::load_or_default(Some(saved));
        assert_eq!(list.completed_count(), 1);

        let list = TaskList::load_or_default(None);
        assert_eq!(list.completed_count(), 0);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&default_tasks()[0]).unwrap();
        assert_eq!(
            json,
            r#"{"id":"weight-log","title":"Log morning weight","completed":false,"category":"general"}"#
        );
    }

    #[test]
    fn test_format_marks_done() {
        let mut list = TaskList::default();
        list.set_completed("sleep", true);
        let text = list.format();
        assert!(text.contains("1/10"), "Format: {}", text);
        assert!(text.contains("[x] Sleep by 10:00 PM"), "Format: {}", text);
    }
}
