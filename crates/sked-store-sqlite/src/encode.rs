//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates and times use their fixed zero-padded text forms so that `ORDER BY
//! date, time` is chronological. `create_time` is RFC 3339; the bare
//! `CURRENT_TIMESTAMP` form left by older files is accepted on read.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sked_core::{
  draft::{parse_date, parse_time},
  entry::{DATE_FORMAT, ScheduleEntry, TIME_FORMAT},
};

use crate::{Error, Result};

/// Columns selected for every entry read, in [`RawEntry`] field order.
pub const ENTRY_COLUMNS: &str = "id, title, date, time, description, priority, \
                                 status, category, reminder, create_time";

/// Format of the `date || ' ' || time` expression compared against `due_by`.
const MOMENT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format SQLite uses for `CURRENT_TIMESTAMP`.
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Date / time ─────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  parse_date(s).ok_or_else(|| Error::Decode {
    column: "date",
    value:  s.to_owned(),
  })
}

pub fn encode_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  parse_time(s).ok_or_else(|| Error::Decode {
    column: "time",
    value:  s.to_owned(),
  })
}

/// Truncates to the minute, matching the resolution of stored times.
pub fn encode_moment(m: NaiveDateTime) -> String {
  m.format(MOMENT_FORMAT).to_string()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .or_else(|_| {
      NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
    })
    .map_err(|_| Error::Decode {
      column: "create_time",
      value:  s.to_owned(),
    })
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn encode_enum<T: Into<&'static str>>(value: T) -> &'static str {
  value.into()
}

/// Decode an enum column; `NULL` decodes to the type's default.
pub fn decode_enum<T>(column: &'static str, raw: Option<String>) -> Result<T>
where
  T: FromStr + Default,
{
  match raw {
    None => Ok(T::default()),
    Some(s) => s.parse().map_err(|_| Error::Decode { column, value: s }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `schedules` row.
pub struct RawEntry {
  pub id:          i64,
  pub title:       String,
  pub date:        String,
  pub time:        String,
  pub description: Option<String>,
  pub priority:    Option<String>,
  pub status:      Option<String>,
  pub category:    Option<String>,
  pub reminder:    Option<i64>,
  pub create_time: Option<String>,
}

impl RawEntry {
  /// Map a row selected with [`ENTRY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      title:       row.get(1)?,
      date:        row.get(2)?,
      time:        row.get(3)?,
      description: row.get(4)?,
      priority:    row.get(5)?,
      status:      row.get(6)?,
      category:    row.get(7)?,
      reminder:    row.get(8)?,
      create_time: row.get(9)?,
    })
  }

  pub fn into_entry(self) -> Result<ScheduleEntry> {
    let created_at = match self.create_time.as_deref() {
      Some(s) => decode_dt(s)?,
      None => DateTime::<Utc>::default(),
    };

    Ok(ScheduleEntry {
      id: self.id,
      date: decode_date(&self.date)?,
      time: decode_time(&self.time)?,
      title: self.title,
      description: self.description.unwrap_or_default(),
      priority: decode_enum("priority", self.priority)?,
      status: decode_enum("status", self.status)?,
      category: decode_enum("category", self.category)?,
      reminder: self.reminder.unwrap_or(0) != 0,
      created_at,
    })
  }
}
