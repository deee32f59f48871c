//! fitjourney - Personal weight-loss tracker with a rule-based coach

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use fitjourney::coach::Goal;
use fitjourney::coach::analyzer::{DEFAULT_START_WEIGHT, DEFAULT_TARGET_WEIGHT};
use fitjourney::db::Database;
use fitjourney::plan;
use fitjourney::tips;
use fitjourney::tracker::Tracker;
use fitjourney::tui::App;
use fitjourney::water;

#[derive(Parser)]
#[command(name = "fitjourney")]
#[command(author, version, about = "💪 FitJourney - weight-loss tracker with a smart coach")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "FITJOURNEY_DB", default_value = "fitjourney.db")]
    db: String,

    /// Weight at the start of the plan (kg)
    #[arg(long, global = true, env = "FITJOURNEY_START_WEIGHT", default_value_t = DEFAULT_START_WEIGHT)]
    start_weight: f64,

    /// Goal weight (kg)
    #[arg(long, global = true, env = "FITJOURNEY_TARGET_WEIGHT", default_value_t = DEFAULT_TARGET_WEIGHT)]
    target_weight: f64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Weight log
    Weight {
        #[command(subcommand)]
        action: WeightAction,
    },

    /// Show progress and pace
    Progress,

    /// Smart coach advice
    Coach {
        /// Day to advise for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Apply the plan changes of advice card N
        #[arg(long)]
        apply: Option<usize>,
    },

    /// Water intake
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },

    /// Daily checklist
    Tasks {
        #[command(subcommand)]
        action: Option<TaskAction>,
    },

    /// Workout plan for a weekday (default: today)
    Workout {
        /// mon, tue, ... or full name
        day: Option<String>,
    },

    /// Diet plan with the next meal marked
    Diet,

    /// Meal and sleep reminders
    Reminders {
        #[command(subcommand)]
        action: Option<ReminderAction>,
    },

    /// Random coaching tip
    Tip,

    /// Start Telegram bot
    Bot {
        /// Telegram bot token (or set TELOXIDE_TOKEN env var)
        #[arg(short, long, env = "TELOXIDE_TOKEN")]
        token: String,
    },
}

#[derive(Subcommand)]
enum WeightAction {
    /// Log weight in kg
    Log {
        weight: f64,

        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List logged weights, newest first
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum WaterAction {
    /// Add water in ml
    Add { amount: u32 },
    /// Show today's intake
    Show,
}

#[derive(Subcommand)]
enum TaskAction {
    /// Show today's checklist
    Show,
    /// Mark a task done
    Done { id: String },
    /// Mark a task not done
    Undo { id: String },
    /// Uncheck everything
    Reset,
}

#[derive(Subcommand)]
enum ReminderAction {
    /// List reminders
    List,
    /// Turn a reminder on or off
    Toggle { id: String },
}

fn parse_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
        None => Ok(Local::now().date_naive()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let goal = Goal::new(cli.start_weight, cli.target_weight)?;
    let db = Database::open(&cli.db)?;
    let tracker = Tracker::new(db, goal);
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(tracker)?;
            app.run()?;
        }

        Some(Commands::Weight { action: WeightAction::Log { weight, date } }) => {
            let date = parse_date(date)?;
            tracker.log_weight(date, weight)?;
            println!("Weight Logged! 🎉 {:.1} kg for {}", weight, date.format("%Y-%m-%d"));
        }

        Some(Commands::Weight { action: WeightAction::History { limit } }) => {
            let history = tracker.db().weight_history()?;
            if history.is_empty() {
                println!("No weight entries yet. Use `fitjourney weight log <kg>`.");
            } else {
                println!("Recent weights:");
                println!("{:-<30}", "");
                for entry in history.iter().rev().take(limit) {
                    println!("{} | {:>6.1} kg", entry.date.format("%Y-%m-%d"), entry.weight);
                }
            }
        }

        Some(Commands::Progress) => {
            let report = tracker.report(today)?;
            let snapshot = &report.snapshot;

            println!("Progress");
            println!("{:-<40}", "");
            println!("Start: {:.1} kg | Current: {:.1} kg | Target: {:.1} kg",
                goal.start_weight, report.current_weight, goal.target_weight);
            println!("Lost: {:.1} kg ({:.1}%)", snapshot.weight_lost, snapshot.clamped_percentage());

            if let Some(pacing) = snapshot.pacing {
                println!(
                    "Recent change: {:.1} kg (target {:.1} kg/week) | on track: {} | too fast: {}",
                    pacing.weekly_change_rate, pacing.target_weekly_loss,
                    pacing.is_on_track, pacing.is_too_fast
                );
            }
            if let Some(pace) = &report.pace {
                println!("\n{}", pace.format());
            }

            let history = tracker.db().weight_history()?;
            if let Some(predictor) = fitjourney::coach::WeightTrendPredictor::train(&history) {
                println!("\n{}", predictor.format_prediction(today, goal.target_weight));
            }
        }

        Some(Commands::Coach { date, apply }) => {
            let date = parse_date(date)?;

            if let Some(index) = apply {
                let summary = tracker.apply_adaptation(date, index, Utc::now())?;
                println!("{}", summary);
                return Ok(());
            }

            let report = tracker.report(date)?;
            println!("🤖 Smart Coach - {}", date.format("%A, %Y-%m-%d"));
            for (i, item) in report.advice.iter().enumerate() {
                println!("\n#{} {}", i, item.format());
            }
            for (i, adaptation) in report.adaptations() {
                println!(
                    "\n→ `fitjourney coach --apply {}` updates the {} plan ({} changes)",
                    i,
                    adaptation.target.name(),
                    adaptation.changes.len()
                );
            }

            if let Some(last) = tracker.db().last_adaptation()? {
                println!(
                    "\nLast applied: {} plan, {} changes on {}",
                    last.target.name(),
                    last.changes.len(),
                    last.date.format("%Y-%m-%d")
                );
            }
        }

        Some(Commands::Water { action: WaterAction::Add { amount } }) => {
            let outcome = tracker.add_water(amount, Local::now())?;
            println!("{}", outcome.format(amount));
        }

        Some(Commands::Water { action: WaterAction::Show }) => {
            let day = tracker.water(today)?;
            let pct = day.progress_percentage();
            let status = day.status();

            println!("{:.1}L / {:.1}L ({:.0}%) {} {}",
                day.total_ml() as f64 / 1000.0,
                water::DAILY_GOAL_ML as f64 / 1000.0,
                pct, status.name(), status.emoji());
            println!("{}", water::hydration_tip(pct));
            for entry in day.recent(5) {
                println!("  {} +{}ml", entry.time, entry.amount);
            }
        }

        Some(Commands::Tasks { action }) => {
            let list = match action {
                None | Some(TaskAction::Show) => tracker.tasks(today)?,
                Some(TaskAction::Done { id }) => tracker.set_task(today, &id, true)?,
                Some(TaskAction::Undo { id }) => tracker.set_task(today, &id, false)?,
                Some(TaskAction::Reset) => tracker.reset_tasks(today)?,
            };
            println!("{}", list.format());
        }

        Some(Commands::Workout { day }) => {
            let weekday = match day {
                Some(s) => match plan::parse_weekday(&s) {
                    Some(d) => d,
                    None => bail!("Unknown day '{}'", s),
                },
                None => today.weekday(),
            };
            println!("{}", plan::workout_for(weekday).format());
        }

        Some(Commands::Diet) => {
            println!("{}", plan::format_diet(Local::now().time()));
        }

        Some(Commands::Reminders { action }) => {
            if let Some(ReminderAction::Toggle { id }) = action {
                let enabled = tracker.toggle_reminder(&id)?;
                println!("Reminder '{}' {}", id, if enabled { "enabled" } else { "disabled" });
            }
            println!("{}", tracker.reminder_settings()?.format());
        }

        Some(Commands::Tip) => {
            println!("{}", tips::format_tip(tips::get_random_tip()));
        }

        Some(Commands::Bot { token }) => {
            println!("Starting Telegram bot...");
            println!("Database: {}", cli.db);
            fitjourney::bot::run_bot(token, tracker).await?;
        }
    }

    Ok(())
}
