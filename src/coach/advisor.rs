//! Advice selection - turns a progress snapshot into coaching cards
//!
//! Advice is produced by an ordered rule table. Every rule is evaluated
//! independently and the output keeps table order, so the first card is
//! always the progress band card (when the percentage is a number) and the
//! last one is always the hydration card.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::analyzer::ProgressSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceCategory {
    Motivation,
    Workout,
    Nutrition,
    Progress,
    Adaptation,
}

impl AdviceCategory {
    pub fn emoji(&self) -> &'static str {
        match self {
            AdviceCategory::Motivation => "💪",
            AdviceCategory::Workout => "🏋️",
            AdviceCategory::Nutrition => "🥗",
            AdviceCategory::Progress => "📈",
            AdviceCategory::Adaptation => "🤖",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdviceCategory::Motivation => "motivation",
            AdviceCategory::Workout => "workout",
            AdviceCategory::Nutrition => "nutrition",
            AdviceCategory::Progress => "progress",
            AdviceCategory::Adaptation => "adaptation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Which plan an adaptation rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTarget {
    Diet,
    Workout,
}

impl PlanTarget {
    pub fn name(&self) -> &'static str {
        match self {
            PlanTarget::Diet => "Diet",
            PlanTarget::Workout => "Workout",
        }
    }
}

/// Suggested plan changes attached to a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adaptation {
    pub target: PlanTarget,
    pub changes: Vec<String>,
}

/// Single coaching card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceItem {
    pub category: AdviceCategory,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub actionable: bool,
    pub adaptation: Option<Adaptation>,
}

impl AdviceItem {
    fn new(category: AdviceCategory, priority: Priority, title: &str, message: impl Into<String>) -> Self {
        Self {
            category,
            title: title.to_string(),
            message: message.into(),
            priority,
            actionable: false,
            adaptation: None,
        }
    }

    fn with_adaptation(mut self, target: PlanTarget, changes: Vec<String>) -> Self {
        self.actionable = true;
        self.adaptation = Some(Adaptation { target, changes });
        self
    }

    /// Multi-line text for CLI and bot output
    pub fn format(&self) -> String {
        let mut lines = vec![format!("{} {}", self.category.emoji(), self.title)];
        if self.priority == Priority::High {
            lines[0].push_str(" [high]");
        }
        lines.push(self.message.clone());

        if let Some(adaptation) = &self.adaptation {
            lines.push(format!("Suggested {} changes:", adaptation.target.name().to_lowercase()));
            for change in &adaptation.changes {
                lines.push(format!("  • {}", change));
            }
        }

        lines.join("\n")
    }
}

// Workout adaptation change sets
const WORKOUT_BEHIND_PACE: [&str; 3] = [
    "Increase workout intensity by 10-15%",
    "Add 10 minutes of cardio to each session",
    "Reduce rest time between sets by 15 seconds",
];
const WORKOUT_PAST_QUARTER: [&str; 2] = [
    "Progress to intermediate exercises",
    "Add resistance bands or light weights",
];
const WORKOUT_PAST_HALF: [&str; 2] = [
    "Introduce compound movements",
    "Add high-intensity interval training (HIIT)",
];

// Diet adaptation change sets
const DIET_BEHIND_PACE: [&str; 3] = [
    "Reduce daily calories by 100-150",
    "Increase protein intake by 20g daily",
    "Add more fiber-rich vegetables",
];
const DIET_TOO_FAST: [&str; 3] = [
    "Increase daily calories by 100-200",
    "Add healthy fats (nuts, avocado)",
    "Include more complex carbohydrates",
];
const DIET_PAST_FORTY: [&str; 2] = [
    "Implement intermittent fasting (16:8)",
    "Focus on whole, unprocessed foods",
];

/// Workout plan changes, 0 to 7 strings in fixed order
pub fn workout_changes(snapshot: &ProgressSnapshot) -> Vec<String> {
    let pct = snapshot.progress_percentage;
    let mut changes = Vec::new();

    if !snapshot.is_on_track() {
        changes.extend(WORKOUT_BEHIND_PACE.iter().map(|s| s.to_string()));
    }
    if pct > 25.0 {
        changes.extend(WORKOUT_PAST_QUARTER.iter().map(|s| s.to_string()));
    }
    if pct > 50.0 {
        changes.extend(WORKOUT_PAST_HALF.iter().map(|s| s.to_string()));
    }

    changes
}

/// Diet plan changes, 0 to 8 strings in fixed order
pub fn diet_changes(snapshot: &ProgressSnapshot) -> Vec<String> {
    let mut changes = Vec::new();

    if !snapshot.is_on_track() {
        changes.extend(DIET_BEHIND_PACE.iter().map(|s| s.to_string()));
    }
    if snapshot.is_too_fast() {
        changes.extend(DIET_TOO_FAST.iter().map(|s| s.to_string()));
    }
    if snapshot.progress_percentage > 40.0 {
        changes.extend(DIET_PAST_FORTY.iter().map(|s| s.to_string()));
    }

    changes
}

/// Progress band: half-open percentage range selecting the lead card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    JustStarted,
    EarlyProgress,
    Adapting,
    PastHalfway,
}

/// Lower bound inclusive, upper bound exclusive, `None` = unbounded
const BANDS: [(Band, Option<f64>, Option<f64>); 4] = [
    (Band::JustStarted, None, Some(5.0)),
    (Band::EarlyProgress, Some(5.0), Some(20.0)),
    (Band::Adapting, Some(20.0), Some(50.0)),
    (Band::PastHalfway, Some(50.0), None),
];

impl Band {
    /// Band for an unclamped percentage; NaN has no band
    pub fn for_percentage(pct: f64) -> Option<Band> {
        BANDS
            .iter()
            .find(|(_, lower, upper)| {
                lower.is_none_or(|l| pct >= l) && upper.is_none_or(|u| pct < u)
            })
            .map(|(band, _, _)| *band)
    }

    fn advice(&self, snapshot: &ProgressSnapshot) -> AdviceItem {
        match self {
            Band::JustStarted => AdviceItem::new(
                AdviceCategory::Motivation,
                Priority::High,
                "Your Journey Begins! 🚀",
                "The first step is always the hardest. Your body is already starting to adapt to the new routine. Focus on consistency over perfection.",
            ),
            Band::EarlyProgress => AdviceItem::new(
                AdviceCategory::Progress,
                Priority::Medium,
                "Early Progress Detected! 📈",
                "Great job! Your metabolism is responding. This is the critical phase - maintain your routine for compound benefits.",
            ),
            Band::Adapting => AdviceItem::new(
                AdviceCategory::Adaptation,
                Priority::High,
                "Time for Progressive Changes 🔄",
                "Your body has adapted to the current routine. Let me suggest some modifications to keep your progress optimal.",
            )
            .with_adaptation(PlanTarget::Workout, workout_changes(snapshot)),
            Band::PastHalfway => AdviceItem::new(
                AdviceCategory::Motivation,
                Priority::High,
                "Incredible Transformation! 🌟",
                "You're past the halfway point! Your dedication is remarkable. Let's fine-tune everything for the final push.",
            )
            .with_adaptation(PlanTarget::Diet, diet_changes(snapshot)),
        }
    }
}

/// Inputs shared by every rule
struct AdviceContext<'a> {
    snapshot: &'a ProgressSnapshot,
    date: NaiveDate,
}

struct Rule {
    name: &'static str,
    fire: fn(&AdviceContext) -> Option<AdviceItem>,
}

const RULES: &[Rule] = &[
    Rule { name: "band", fire: band_card },
    Rule { name: "behind_pace", fire: behind_pace_card },
    Rule { name: "too_fast", fire: too_fast_card },
    Rule { name: "monday", fire: monday_card },
    Rule { name: "hydration", fire: hydration_card },
];

fn band_card(ctx: &AdviceContext) -> Option<AdviceItem> {
    Band::for_percentage(ctx.snapshot.progress_percentage).map(|band| band.advice(ctx.snapshot))
}

fn behind_pace_card(ctx: &AdviceContext) -> Option<AdviceItem> {
    let pacing = ctx.snapshot.pacing?;
    (!pacing.is_on_track).then(|| {
        AdviceItem::new(
            AdviceCategory::Adaptation,
            Priority::High,
            "Progress Needs Acceleration ⚡",
            format!(
                "Your current weekly loss ({:.1}kg) is below target ({:.1}kg). Let me suggest adjustments.",
                pacing.weekly_change_rate, pacing.target_weekly_loss
            ),
        )
        .with_adaptation(PlanTarget::Diet, diet_changes(ctx.snapshot))
    })
}

fn too_fast_card(ctx: &AdviceContext) -> Option<AdviceItem> {
    let pacing = ctx.snapshot.pacing?;
    pacing.is_too_fast.then(|| {
        AdviceItem::new(
            AdviceCategory::Nutrition,
            Priority::High,
            "Pace Adjustment Needed ⚖️",
            "You're losing weight faster than recommended. Let's add some healthy calories to ensure you maintain muscle mass.",
        )
        .with_adaptation(PlanTarget::Diet, diet_changes(ctx.snapshot))
    })
}

fn monday_card(ctx: &AdviceContext) -> Option<AdviceItem> {
    (ctx.date.weekday() == Weekday::Mon).then(|| {
        AdviceItem::new(
            AdviceCategory::Motivation,
            Priority::Medium,
            "Monday Momentum! 💪",
            "New week, new opportunities! Start strong with chest day. Your weekend recovery has prepared your muscles for growth.",
        )
    })
}

fn hydration_card(_ctx: &AdviceContext) -> Option<AdviceItem> {
    Some(AdviceItem::new(
        AdviceCategory::Nutrition,
        Priority::Medium,
        "Hydration = Fat Burning 💧",
        "Proper hydration increases your metabolic rate by up to 30%. Aim for your 4L daily goal - your weight loss depends on it!",
    ))
}

/// Produce coaching cards for a snapshot on a given day
pub fn select_advice(snapshot: &ProgressSnapshot, date: NaiveDate) -> Vec<AdviceItem> {
    let ctx = AdviceContext { snapshot, date };

    RULES
        .iter()
        .filter_map(|rule| {
            let item = (rule.fire)(&ctx);
            if item.is_some() {
                debug!(rule = rule.name, "advice rule fired");
            }
            item
        })
        .collect()
}
