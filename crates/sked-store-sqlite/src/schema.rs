//! SQL schema for the sked SQLite store.
//!
//! [`SCHEMA`] runs on every open. Upgrades of older files are gated on
//! `PRAGMA user_version` in [`migrate`].

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, Transaction};
use sked_core::entry::{DATE_FORMAT, TIME_FORMAT};

/// Current `user_version` written after a successful migration.
pub const VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS schedules (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    date        TEXT NOT NULL,                      -- YYYY-MM-DD
    time        TEXT NOT NULL,                      -- HH:MM, 24-hour
    description TEXT,
    priority    TEXT DEFAULT 'Normal',
    status      TEXT DEFAULT 'Incomplete',
    category    TEXT DEFAULT 'Default',
    reminder    INTEGER DEFAULT 0,
    create_time TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS schedules_when_idx ON schedules(date, time);
";

/// Columns that files written without category support are missing.
const ADDED_COLUMNS: &[(&str, &str)] = &[
  ("category", "TEXT DEFAULT 'Default'"),
  ("reminder", "INTEGER DEFAULT 0"),
];

/// Localised values written by earlier releases, and their canonical form.
const LEGACY_VALUES: &[(&str, &str, &str)] = &[
  ("priority", "高", "High"),
  ("priority", "普通", "Normal"),
  ("priority", "低", "Low"),
  ("status", "未完成", "Incomplete"),
  ("status", "已完成", "Done"),
  ("category", "默认", "Default"),
  ("category", "工作", "Work"),
  ("category", "学习", "Study"),
  ("category", "生活", "Life"),
  ("category", "其他", "Other"),
];

/// Bring the `schedules` table up to [`VERSION`]. Returns the version the
/// file was at before, or `None` if it was already current.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<Option<i64>> {
  let version: i64 =
    conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
  if version >= VERSION {
    return Ok(None);
  }

  let tx = conn.transaction()?;

  let existing: Vec<String> = {
    let mut stmt = tx.prepare("SELECT name FROM pragma_table_info('schedules')")?;
    stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<_>>()?
  };

  for (column, decl) in ADDED_COLUMNS {
    if !existing.iter().any(|c| c == column) {
      tx.execute_batch(&format!(
        "ALTER TABLE schedules ADD COLUMN {column} {decl};"
      ))?;
    }
  }

  for (column, legacy, canonical) in LEGACY_VALUES {
    tx.execute(
      &format!("UPDATE schedules SET {column} = ?1 WHERE {column} = ?2"),
      rusqlite::params![canonical, legacy],
    )?;
  }

  pad_moments(&tx)?;

  tx.pragma_update(None, "user_version", VERSION)?;
  tx.commit()?;

  Ok(Some(version))
}

/// Rewrite dates and times stored without zero padding (`2024-3-1`, `9:00`)
/// into their fixed forms so text ordering stays chronological. Values that
/// do not parse at all are left for the decoder to reject.
fn pad_moments(tx: &Transaction<'_>) -> rusqlite::Result<()> {
  let rows: Vec<(i64, String, String)> = {
    let mut stmt = tx.prepare("SELECT id, date, time FROM schedules")?;
    stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
      .collect::<rusqlite::Result<_>>()?
  };

  for (id, date, time) in rows {
    let padded_date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
      .map(|d| d.format(DATE_FORMAT).to_string())
      .unwrap_or_else(|_| date.clone());
    let padded_time = NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
      .map(|t| t.format(TIME_FORMAT).to_string())
      .unwrap_or_else(|_| time.clone());

    if padded_date != date || padded_time != time {
      tx.execute(
        "UPDATE schedules SET date = ?1, time = ?2 WHERE id = ?3",
        rusqlite::params![padded_date, padded_time, id],
      )?;
    }
  }
  Ok(())
}
