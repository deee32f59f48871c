//! Telegram bot module - remote logging, coaching and meal reminders

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use chrono::{Local, NaiveDateTime, Utc};
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup},
    utils::command::BotCommands,
    dispatching::dialogue::{InMemStorage, Dialogue},
};
use tokio::sync::Mutex;
use tracing::{info, error};

use crate::tips;
use crate::tracker::Tracker;
use crate::water::QUICK_AMOUNTS_ML;

type MyDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type Subscribers = Arc<Mutex<HashSet<ChatId>>>;
type SharedTracker = Arc<Mutex<Tracker>>;

/// How often the reminder task looks for due reminders
const REMINDER_CHECK_SECS: u64 = 60;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    /// Waiting for today's weight
    WaitingForWeight,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "Start")]
    Start,
    #[command(description = "Show help")]
    Help,
    #[command(description = "Log today's weight")]
    Weight,
    #[command(description = "Progress and pace")]
    Progress,
    #[command(description = "Smart coach advice")]
    Coach,
    #[command(description = "Add water, e.g. /water 500")]
    Water(String),
    #[command(description = "Today's checklist")]
    Tasks,
    #[command(description = "Random tip")]
    Tip,
    #[command(description = "Enable meal and sleep reminders")]
    Remind,
    #[command(description = "Disable reminders")]
    Stop,
}

fn make_water_keyboard() -> InlineKeyboardMarkup {
    let row: Vec<InlineKeyboardButton> = QUICK_AMOUNTS_ML
        .iter()
        .map(|ml| InlineKeyboardButton::callback(format!("+{}ml", ml), format!("water:{}", ml)))
        .collect();
    InlineKeyboardMarkup::new(vec![row])
}

fn make_tasks_keyboard(tracker: &Tracker) -> anyhow::Result<InlineKeyboardMarkup> {
    let list = tracker.tasks(Local::now().date_naive())?;
    let buttons: Vec<Vec<InlineKeyboardButton>> = list
        .tasks()
        .chunks(2)
        .map(|chunk| {
            chunk.iter().map(|t| {
                let mark = if t.completed { "✅" } else { "⬜" };
                InlineKeyboardButton::callback(format!("{} {}", mark, t.title), format!("task:{}", t.id))
            }).collect()
        })
        .collect();
    Ok(InlineKeyboardMarkup::new(buttons))
}

/// Background task that sends enabled reminders when their time comes
async fn reminder_task(bot: Bot, tracker: SharedTracker, subscribers: Subscribers) {
    info!("Reminder task started (check every {} seconds)", REMINDER_CHECK_SECS);

    let mut last_check: NaiveDateTime = Local::now().naive_local();

    loop {
        tokio::time::sleep(Duration::from_secs(REMINDER_CHECK_SECS)).await;

        let now = Local::now().naive_local();
        let due = {
            let tracker = tracker.lock().await;
            match tracker.reminder_settings() {
                Ok(settings) => settings.due_between(last_check, now),
                Err(e) => {
                    error!("Failed to load reminder settings: {}", e);
                    Vec::new()
                }
            }
        };
        last_check = now;

        if due.is_empty() {
            continue;
        }

        let subs = subscribers.lock().await;
        if subs.is_empty() {
            continue;
        }

        info!("Sending {} reminders to {} subscribers", due.len(), subs.len());

        for reminder in due {
            for chat_id in subs.iter() {
                let result = bot.send_message(*chat_id, reminder.message()).await;
                if let Err(e) = result {
                    error!("Failed to send reminder to {}: {}", chat_id, e);
                }
            }
        }
    }
}

/// Start the Telegram bot with reminders
pub async fn run_bot(token: String, tracker: Tracker) -> anyhow::Result<()> {
    let bot = Bot::new(token);
    let tracker: SharedTracker = Arc::new(Mutex::new(tracker));
    let subscribers: Subscribers = Arc::new(Mutex::new(HashSet::new()));

    // Start reminder background task
    let reminder_bot = bot.clone();
    let reminder_tracker = tracker.clone();
    let reminder_subs = subscribers.clone();
    tokio::spawn(async move {
        reminder_task(reminder_bot, reminder_tracker, reminder_subs).await;
    });

    let handler = dptree::entry()
        .enter_dialogue::<Update, InMemStorage<State>, State>()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            Update::filter_message()
                .endpoint(handle_message),
        )
        .branch(
            Update::filter_callback_query()
                .endpoint(handle_callback),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<State>::new(), tracker, subscribers])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: MyDialogue,
    tracker: SharedTracker,
    subscribers: Subscribers,
) -> HandlerResult {
    match cmd {
        Command::Start => {
            let text = "💪 FitJourney\n\n\
                Your weight-loss coach\n\n\
                /weight - log today's weight\n\
                /progress - progress and pace\n\
                /coach - smart coach advice\n\
                /water - add water\n\
                /tasks - today's checklist\n\
                /remind - meal and sleep reminders\n\
                /stop - turn reminders off";
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }

        Command::Weight => {
            dialogue.update(State::WaitingForWeight).await?;
            bot.send_message(msg.chat.id, "📊 Today's weight in kg?").await?;
        }

        Command::Progress => {
            let tracker = tracker.lock().await;
            let today = Local::now().date_naive();
            let report = tracker.report(today)?;
            let goal = tracker.goal();

            let mut text = format!(
                "📈 Progress\n\n\
                Current: {:.1} kg\n\
                Target: {:.1} kg\n\
                Lost: {:.1} kg ({:.0}%)\n",
                report.current_weight,
                goal.target_weight,
                report.snapshot.weight_lost,
                report.snapshot.clamped_percentage(),
            );
            if let Some(pace) = &report.pace {
                text.push('\n');
                text.push_str(&pace.format());
            }
            bot.send_message(msg.chat.id, text).await?;
        }

        Command::Coach => {
            let report = {
                let tracker = tracker.lock().await;
                tracker.report(Local::now().date_naive())?
            };

            for (index, item) in report.advice.iter().enumerate() {
                let request = bot.send_message(msg.chat.id, item.format());
                if let Some(adaptation) = &item.adaptation {
                    let button = InlineKeyboardButton::callback(
                        format!("Apply {} Changes", adaptation.target.name()),
                        format!("apply:{}", index),
                    );
                    request
                        .reply_markup(InlineKeyboardMarkup::new(vec![vec![button]]))
                        .await?;
                } else {
                    request.await?;
                }
            }
        }

        Command::Water(arg) => {
            let arg = arg.trim();
            if arg.is_empty() {
                bot.send_message(msg.chat.id, "💧 How much?")
                    .reply_markup(make_water_keyboard())
                    .await?;
            } else if let Ok(amount) = arg.trim_end_matches("ml").parse::<u32>() {
                let result = tracker.lock().await.add_water(amount, Local::now());
                let text = match result {
                    Ok(outcome) => outcome.format(amount),
                    Err(e) => e.to_string(),
                };
                bot.send_message(msg.chat.id, text).await?;
            } else {
                bot.send_message(msg.chat.id, "Usage: /water 500").await?;
            }
        }

        Command::Tasks => {
            let (text, keyboard) = {
                let tracker = tracker.lock().await;
                let list = tracker.tasks(Local::now().date_naive())?;
                (list.format(), make_tasks_keyboard(&tracker)?)
            };
            bot.send_message(msg.chat.id, text)
                .reply_markup(keyboard)
                .await?;
        }

        Command::Tip => {
            let tip = tips::get_random_tip();
            bot.send_message(msg.chat.id, tips::format_tip(tip)).await?;
        }

        Command::Remind => {
            let mut subs = subscribers.lock().await;
            subs.insert(msg.chat.id);
            let count = subs.len();

            let settings = tracker.lock().await.reminder_settings()?;
            bot.send_message(
                msg.chat.id,
                format!(
                    "🔔 Reminders enabled!\n\n{}\n\n\
                    /stop - turn off\n\n\
                    Active subscribers: {}",
                    settings.format(),
                    count
                )
            ).await?;

            info!("User {} subscribed to reminders", msg.chat.id);
        }

        Command::Stop => {
            let mut subs = subscribers.lock().await;
            let was_subscribed = subs.remove(&msg.chat.id);

            if was_subscribed {
                bot.send_message(msg.chat.id, "🔕 Reminders disabled.\n\n/remind - turn on again")
                    .await?;
                info!("User {} unsubscribed from reminders", msg.chat.id);
            } else {
                bot.send_message(msg.chat.id, "Reminders are already off.\n\n/remind - turn on")
                    .await?;
            }
        }
    }

    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    _dialogue: MyDialogue,
    tracker: SharedTracker,
    _subscribers: Subscribers,
) -> HandlerResult {
    if let Some(data) = &q.data {
        let tracker = tracker.lock().await;
        let today = Local::now().date_naive();

        let reply = if let Some(amount) = data.strip_prefix("water:") {
            let amount: u32 = amount.parse()?;
            Some(tracker.add_water(amount, Local::now())?.format(amount))
        } else if let Some(task_id) = data.strip_prefix("task:") {
            let list = tracker.toggle_task(today, task_id)?;
            let keyboard = make_tasks_keyboard(&tracker)?;
            if let Some(msg) = &q.message {
                bot.edit_message_text(msg.chat().id, msg.id(), list.format())
                    .reply_markup(keyboard)
                    .await?;
            }
            None
        } else if let Some(index) = data.strip_prefix("apply:") {
            let index: usize = index.parse()?;
            Some(tracker.apply_adaptation(today, index, Utc::now())?)
        } else {
            None
        };

        if let (Some(text), Some(msg)) = (reply, &q.message) {
            bot.send_message(msg.chat().id, text).await?;
        }
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    tracker: SharedTracker,
    _subscribers: Subscribers,
) -> HandlerResult {
    let state = dialogue.get().await?.unwrap_or_default();

    match state {
        State::WaitingForWeight => {
            if let Some(text) = msg.text() {
                if let Ok(weight) = text.trim().replace(',', ".").parse::<f64>() {
                    let tracker = tracker.lock().await;
                    let today = Local::now().date_naive();

                    let logged = tracker.log_weight(today, weight);
                    if let Err(e) = logged {
                        bot.send_message(msg.chat.id, format!("{}\n\nTry again", e)).await?;
                        return Ok(());
                    }

                    let report = tracker.report(today)?;
                    let response = format!(
                        "Weight Logged! 🎉\n\n\
                        Current weight: {:.1} kg\n\
                        Progress: {:.0}%\n\n\
                        /coach - see what's next",
                        weight,
                        report.snapshot.clamped_percentage()
                    );
                    bot.send_message(msg.chat.id, response).await?;
                    dialogue.reset().await?;
                } else {
                    bot.send_message(msg.chat.id, "Enter weight in kg (number)").await?;
                }
            }
        }

        State::Start => {
            bot.send_message(msg.chat.id, "Send /weight to log today's weight or /coach for advice")
                .await?;
        }
    }

    Ok(())
}
