//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use chrono::{Datelike, Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use std::io::{stdout, Stdout};

use crate::coach::{CoachReport, Priority};
use crate::db::WeightEntry;
use crate::plan::{self, DIET_PLAN};
use crate::tasks::TaskList;
use crate::tracker::Tracker;
use crate::water::{self, QUICK_AMOUNTS_ML, WaterDay};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TAB_TITLES: [&str; 6] = ["Dashboard", "Workout", "Diet", "Water", "Tasks", "Coach"];

const TAB_TASKS: usize = 4;
const TAB_COACH: usize = 5;

/// Weigh-ins listed on the dashboard
const RECENT_WEIGHTS: usize = 7;

/// App state for TUI
pub struct App {
    tracker: Tracker,
    report: CoachReport,
    water: WaterDay,
    tasks: TaskList,
    recent_weights: Vec<WeightEntry>,
    /// Digits typed after `w`, until Enter or Esc
    weight_input: Option<String>,
    tab: usize,
    task_state: ListState,
    advice_state: ListState,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(tracker: Tracker) -> Result<Self> {
        let today = Local::now().date_naive();
        let report = tracker.report(today)?;
        let water = tracker.water(today)?;
        let tasks = tracker.tasks(today)?;
        let recent_weights = recent_weights(&tracker)?;

        Ok(Self {
            tracker,
            report,
            water,
            tasks,
            recent_weights,
            weight_input: None,
            tab: 0,
            task_state: ListState::default().with_selected(Some(0)),
            advice_state: ListState::default().with_selected(Some(0)),
            status: "Analyzing your progress data".to_string(),
            should_quit: false,
        })
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        with_restore(|| self.event_loop(&mut terminal), restore_terminal)
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            if let Err(e) = self.handle_events() {
                self.status = format!("Error: {}", e);
            }
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        let today = Local::now().date_naive();
        self.report = self.tracker.report(today)?;
        self.water = self.tracker.water(today)?;
        self.tasks = self.tracker.tasks(today)?;
        self.recent_weights = recent_weights(&self.tracker)?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let tabs = Tabs::new(TAB_TITLES.to_vec())
            .select(self.tab)
            .highlight_style(Style::default().fg(Color::Cyan).bold())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("💪 FitJourney - {}", Local::now().format("%A, %B %-d, %Y"))),
            );
        frame.render_widget(tabs, chunks[0]);

        match self.tab {
            0 => self.render_dashboard(frame, chunks[1]),
            1 => self.render_workout(frame, chunks[1]),
            2 => self.render_diet(frame, chunks[1]),
            3 => self.render_water(frame, chunks[1]),
            TAB_TASKS => self.render_tasks(frame, chunks[1]),
            _ => self.render_coach(frame, chunks[1]),
        }

        // Footer
        let (footer_text, footer_style) = match &self.weight_input {
            Some(input) => (
                format!("Today's weight (kg): {}_ | Enter: save | Esc: cancel", input),
                Style::default().fg(Color::Yellow),
            ),
            None => (
                format!(
                    "q: quit | ←/→: tab | r: refresh | w: log weight | 1-4: add water | space: task | a: apply | {}",
                    self.status
                ),
                Style::default().fg(Color::DarkGray),
            ),
        };
        let footer = Paragraph::new(footer_text)
            .style(footer_style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        let snapshot = &self.report.snapshot;
        let goal = self.tracker.goal();
        let ratio = snapshot.clamped_percentage() / 100.0;
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Overall Progress"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(if ratio.is_nan() { 0.0 } else { ratio })
            .label(format!(
                "{:.1} kg → {:.1} kg ({:.0}%)",
                self.report.current_weight,
                goal.target_weight,
                snapshot.clamped_percentage()
            ));
        frame.render_widget(gauge, chunks[0]);

        let mut lines = vec![
            format!("Start: {:.1} kg   Current: {:.1} kg   Target: {:.1} kg",
                goal.start_weight, self.report.current_weight, goal.target_weight),
            format!("Lost: {:.1} kg", snapshot.weight_lost),
        ];
        if let Some(pacing) = snapshot.pacing {
            lines.push(format!(
                "Last week: {:.1} kg (target {:.1} kg) {}",
                pacing.weekly_change_rate,
                pacing.target_weekly_loss,
                if pacing.is_too_fast { "⚖️ too fast" } else if pacing.is_on_track { "✅ on track" } else { "⚡ behind" }
            ));
        }
        if let Some(pace) = &self.report.pace {
            lines.push(String::new());
            lines.extend(pace.format().lines().map(String::from));
        }
        lines.push(String::new());
        lines.push(format!(
            "Water: {:.1}L {}   Tasks: {}/{}",
            self.water.total_ml() as f64 / 1000.0,
            self.water.status().emoji(),
            self.tasks.completed_count(),
            self.tasks.tasks().len()
        ));

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        let summary = Paragraph::new(lines.join("\n"))
            .block(Block::default().borders(Borders::ALL).title("Summary"));
        frame.render_widget(summary, bottom[0]);

        let items: Vec<ListItem> = self
            .recent_weights
            .iter()
            .map(|e| ListItem::new(format!("{}  {:>6.1} kg", e.date.format("%b %-d"), e.weight)))
            .collect();
        let weights = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Recent Weigh-ins (w: log)"));
        frame.render_widget(weights, bottom[1]);
    }

    fn render_workout(&self, frame: &mut Frame, area: Rect) {
        let day = plan::workout_for(Local::now().weekday());
        let items: Vec<ListItem> = day
            .exercises
            .iter()
            .map(|e| ListItem::new(format!("{:20} {:>7}  {}", e.name, e.sets, e.video)))
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} - {}", day.day, day.focus)),
        );
        frame.render_widget(list, area);
    }

    fn render_diet(&self, frame: &mut Frame, area: Rect) {
        let current = plan::current_meal_index(Local::now().time());
        let items: Vec<ListItem> = DIET_PLAN
            .iter()
            .enumerate()
            .map(|(i, meal)| {
                let foods: Vec<_> = meal.items.iter().map(|f| f.food).collect();
                let text = format!("{} {:14} {:>4} cal  {}", meal.time, meal.name, meal.calories(), foods.join(", "));
                let style = if i == current {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default()
                };
                ListItem::new(text).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Diet Plan - {} cal", plan::total_calories())),
        );
        frame.render_widget(list, area);
    }

    fn render_water(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        let pct = self.water.progress_percentage();
        let status = self.water.status();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Water Intake"))
            .gauge_style(Style::default().fg(Color::Blue))
            .ratio(pct.min(100.0) / 100.0)
            .label(format!(
                "{}ml / {}ml - {} {}",
                self.water.total_ml(),
                water::DAILY_GOAL_ML,
                status.name(),
                status.emoji()
            ));
        frame.render_widget(gauge, chunks[0]);

        let mut lines = vec![water::hydration_tip(pct).to_string(), String::new()];
        let keys: Vec<_> = QUICK_AMOUNTS_ML
            .iter()
            .enumerate()
            .map(|(i, ml)| format!("{}: +{}ml", i + 1, ml))
            .collect();
        lines.push(keys.join("   "));
        lines.push(String::new());
        for entry in self.water.recent(5) {
            lines.push(format!("{}  {}ml", entry.time, entry.amount));
        }

        let log = Paragraph::new(lines.join("\n"))
            .block(Block::default().borders(Borders::ALL).title("Today's Water Log"));
        frame.render_widget(log, chunks[1]);
    }

    fn render_tasks(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .tasks
            .tasks()
            .iter()
            .map(|t| {
                let mark = if t.completed { "[x]" } else { "[ ]" };
                let time = t.time.as_deref().unwrap_or("");
                let style = if t.completed {
                    Style::default().fg(Color::DarkGray).crossed_out()
                } else {
                    Style::default()
                };
                ListItem::new(format!("{} {} {} {}", mark, t.category.emoji(), t.title, time)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Daily Tasks {}/{}",
                self.tasks.completed_count(),
                self.tasks.tasks().len()
            )))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.task_state);
    }

    fn render_coach(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let items: Vec<ListItem> = self
            .report
            .advice
            .iter()
            .map(|a| {
                let style = if a.priority == Priority::High {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{} {}", a.category.emoji(), a.title)).style(style)
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("🤖 Smart Coach"))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[0], &mut self.advice_state);

        let detail = self
            .advice_state
            .selected()
            .and_then(|i| self.report.advice.get(i))
            .map(|a| a.format())
            .unwrap_or_default();
        let detail = Paragraph::new(detail)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(detail, chunks[1]);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    self.handle_key(key.code)?;
                }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        if self.weight_input.is_some() {
            return self.handle_weight_key(code);
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('w') => self.weight_input = Some(String::new()),
            KeyCode::Right | KeyCode::Tab => {
                self.tab = (self.tab + 1) % TAB_TITLES.len();
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.tab = (self.tab + TAB_TITLES.len() - 1) % TAB_TITLES.len();
            }
            KeyCode::Char('r') => {
                self.refresh()?;
                self.status = "Fresh insights based on your latest progress data".to_string();
            }
            KeyCode::Char(c @ '1'..='4') => {
                let amount = QUICK_AMOUNTS_ML[(c as u8 - b'1') as usize];
                let outcome = self.tracker.add_water(amount, Local::now())?;
                self.status = outcome.format(amount).replace('\n', " ");
                self.refresh()?;
            }
            KeyCode::Up => self.select_prev(),
            KeyCode::Down => self.select_next(),
            KeyCode::Char(' ') if self.tab == TAB_TASKS => {
                if let Some(task) = self.task_state.selected().and_then(|i| self.tasks.tasks().get(i)) {
                    let id = task.id.clone();
                    self.tasks = self.tracker.toggle_task(Local::now().date_naive(), &id)?;
                }
            }
            KeyCode::Char('a') if self.tab == TAB_COACH => {
                if let Some(index) = self.advice_state.selected() {
                    self.status = self.tracker.apply_adaptation(
                        Local::now().date_naive(),
                        index,
                        Utc::now(),
                    )?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_weight_key(&mut self, code: KeyCode) -> Result<()> {
        let Some(input) = self.weight_input.as_mut() else {
            return Ok(());
        };
        match code {
            KeyCode::Char(c @ ('0'..='9' | '.' | ',')) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => self.weight_input = None,
            KeyCode::Enter => self.submit_weight()?,
            _ => {}
        }
        Ok(())
    }

    /// Log the typed weight for today; invalid input stays in `status`
    fn submit_weight(&mut self) -> Result<()> {
        let Some(input) = self.weight_input.take() else {
            return Ok(());
        };
        let weight = match input.replace(',', ".").parse::<f64>() {
            Ok(w) => w,
            Err(_) => {
                self.status = format!("Invalid weight '{}'", input);
                return Ok(());
            }
        };
        match self.tracker.log_weight(Local::now().date_naive(), weight) {
            Ok(()) => {
                self.refresh()?;
                self.status = format!("Weight Logged! 🎉 {:.1} kg", weight);
            }
            Err(e) => self.status = e.to_string(),
        }
        Ok(())
    }

    fn select_next(&mut self) {
        match self.tab {
            TAB_TASKS => self.task_state.select_next(),
            TAB_COACH => self.advice_state.select_next(),
            _ => {}
        }
    }

    fn select_prev(&mut self) {
        match self.tab {
            TAB_TASKS => self.task_state.select_previous(),
            TAB_COACH => self.advice_state.select_previous(),
            _ => {}
        }
    }
}

fn recent_weights(tracker: &Tracker) -> Result<Vec<WeightEntry>> {
    let history = tracker.db().weight_history()?;
    Ok(history.into_iter().rev().take(RECENT_WEIGHTS).collect())
}

/// Run `body`, then `restore` whether or not `body` failed
fn with_restore<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let result = body();
    restore()?;
    result
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::Goal;
    use crate::db::Database;
    use anyhow::bail;
    use std::cell::Cell;

    fn app() -> App {
        let tracker = Tracker::new(Database::open(":memory:").unwrap(), Goal::default());
        App::new(tracker).unwrap()
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(KeyCode::Char(c)).unwrap();
        }
    }

    #[test]
    fn test_log_weight_from_input() {
        let mut app = app();
        type_keys(&mut app, "w80,5");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(app.weight_input.is_none());
        assert_eq!(app.tracker.db().current_weight().unwrap(), Some(80.5));
        assert_eq!(app.recent_weights.len(), 1);
        assert_eq!(app.report.current_weight, 80.5);
        assert!(app.status.contains("Weight Logged"), "Status: {}", app.status);
    }

    #[test]
    fn test_invalid_weight_shows_error() {
        let mut app = app();
        type_keys(&mut app, "w999");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(app.status.contains("Invalid weight"), "Status: {}", app.status);
        assert!(app.tracker.db().weight_history().unwrap().is_empty());
    }

    #[test]
    fn test_weight_input_keys_do_not_trigger_commands() {
        let mut app = app();
        type_keys(&mut app, "wq1");
        app.handle_key(KeyCode::Backspace).unwrap();
        assert_eq!(app.weight_input.as_deref(), Some(""));
        assert!(!app.should_quit);
        assert_eq!(app.water.total_ml(), 0);

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.weight_input.is_none());
        assert!(app.tracker.db().weight_history().unwrap().is_empty());
    }

    #[test]
    fn test_recent_weights_newest_first() {
        let tracker = Tracker::new(Database::open(":memory:").unwrap(), Goal::default());
        for day in 1..=9 {
            let date = chrono::NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
            tracker.log_weight(date, 136.0 - day as f64).unwrap();
        }
        let recent = recent_weights(&tracker).unwrap();
        assert_eq!(recent.len(), RECENT_WEIGHTS);
        assert_eq!(recent[0].weight, 127.0);
        assert_eq!(recent[6].weight, 133.0);
    }

    #[test]
    fn test_restore_runs_when_body_fails() {
        let restored = Cell::new(false);
        let result: Result<()> = with_restore(
            || bail!("draw failed"),
            || {
                restored.set(true);
                Ok(())
            },
        );
        assert!(result.is_err());
        assert!(restored.get());
    }
}
