//! Schedule entries, the sole entity of the schedule manager.
//!
//! Dates and times are held as typed chrono values. Their text forms
//! (`YYYY-MM-DD` and 24-hour `HH:MM`, both zero-padded) are fixed, so sorting
//! the text forms lexicographically yields chronological order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// `chrono` format string for the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `chrono` format string for the `time` field.
pub const TIME_FORMAT: &str = "%H:%M";

// ─── Enumerations ────────────────────────────────────────────────────────────

/// How urgent an entry is.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
pub enum Priority {
  High,
  #[default]
  Normal,
  Low,
}

/// Completion status. Entries only ever move from `Incomplete` to `Done`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
pub enum Status {
  #[default]
  Incomplete,
  Done,
}

/// User-facing grouping of entries.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
pub enum Category {
  #[default]
  Default,
  Work,
  Study,
  Life,
  Other,
}

// ─── ScheduleEntry ───────────────────────────────────────────────────────────

/// A persisted schedule entry.
///
/// `id` and `created_at` are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
  pub id:          i64,
  pub title:       String,
  pub date:        NaiveDate,
  pub time:        NaiveTime,
  pub description: String,
  pub priority:    Priority,
  pub status:      Status,
  pub category:    Category,
  pub reminder:    bool,
  pub created_at:  DateTime<Utc>,
}

impl ScheduleEntry {
  /// The local wall-clock moment the entry is scheduled for.
  pub fn scheduled_at(&self) -> NaiveDateTime { self.date.and_time(self.time) }

  pub fn is_done(&self) -> bool { self.status == Status::Done }

  /// The `date` field in its stored text form.
  pub fn date_text(&self) -> String { self.date.format(DATE_FORMAT).to_string() }

  /// The `time` field in its stored text form.
  pub fn time_text(&self) -> String { self.time.format(TIME_FORMAT).to_string() }
}
