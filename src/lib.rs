//! fitjourney - Personal weight-loss tracker
//!
//! Weight log, workout and diet plan, water and task tracking, and a
//! rule-based coach that adapts the plan to the measured pace.

pub mod bot;
pub mod coach;
pub mod db;
pub mod plan;
pub mod reminders;
pub mod tasks;
pub mod tips;
pub mod tracker;
pub mod tui;
pub mod water;

pub use db::Database;
pub use tracker::Tracker;
