//! [`SqliteStore`] — the SQLite implementation of [`ScheduleStore`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use sked_core::{
  draft::{EntryDraft, ValidDraft},
  entry::{ScheduleEntry, Status},
  store::{CategoryFilter, EntryFilter, EntryKey, ScheduleStore},
};
use tracing::{debug, info};

use crate::{
  encode::{
    ENTRY_COLUMNS, RawEntry, encode_date, encode_dt, encode_enum, encode_moment,
    encode_time,
  },
  schema::{SCHEMA, VERSION, migrate},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A schedule store backed by a single SQLite file.
///
/// Clones share one reference-counted connection, so statements never run
/// concurrently.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// The parent directory is created if missing. Any failure is reported as
  /// [`Error::Unavailable`].
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let unavailable = |source: Box<dyn std::error::Error + Send + Sync>| {
      Error::Unavailable { path: path.clone(), source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| unavailable(e.into()))?;
    }

    let conn = tokio_rusqlite::Connection::open(&path)
      .await
      .map_err(|e| unavailable(e.into()))?;
    let store = Self { conn };
    store.init_schema().await.map_err(|e| unavailable(e.into()))?;

    debug!(path = %path.display(), "opened schedule store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Default location of the store file inside a data directory.
  pub fn file_in(data_dir: &Path) -> PathBuf { data_dir.join("schedule.db") }

  async fn init_schema(&self) -> Result<()> {
    let migrated_from = self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(migrate(conn)?)
      })
      .await?;

    if let Some(from) = migrated_from {
      info!(from, to = VERSION, "upgraded schedule store schema");
    }
    Ok(())
  }

  /// Run a `SELECT` over [`ENTRY_COLUMNS`] and decode every row.
  async fn query_entries(
    &self,
    sql: String,
    params: Vec<Value>,
  ) -> Result<Vec<ScheduleEntry>> {
    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  /// Run a single-row mutation keyed by [`EntryKey`]; returns rows affected.
  async fn execute_keyed(
    &self,
    action: &str,
    key: &EntryKey,
    extra: Option<Value>,
  ) -> Result<usize> {
    let (clause, mut params) = match key {
      EntryKey::Id(id) => ("id = ?", vec![Value::Integer(*id)]),
      EntryKey::TitleDate { title, date } => {
        let params = vec![Value::Text(title.clone()), Value::Text(encode_date(*date))];
        ("title = ? AND date = ?", params)
      }
    };
    // Positional `?` parameters bind in order; the SET value comes first.
    if let Some(value) = extra {
      params.insert(0, value);
    }
    let sql = format!("{action} WHERE {clause}");

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(affected)
  }
}

/// Positional parameters for the writable columns of a validated draft.
fn draft_params(draft: &ValidDraft) -> [Value; 7] {
  [
    Value::Text(draft.title().to_owned()),
    Value::Text(encode_date(draft.date())),
    Value::Text(encode_time(draft.time())),
    Value::Text(draft.description().to_owned()),
    Value::Text(encode_enum(draft.priority()).to_owned()),
    Value::Text(encode_enum(draft.category()).to_owned()),
    Value::Integer(i64::from(draft.reminder())),
  ]
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  async fn create(&self, draft: EntryDraft) -> Result<ScheduleEntry> {
    let draft = draft.validate()?;
    let created_at = Utc::now();
    let params = draft_params(&draft);
    let at_str = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        let [title, date, time, description, priority, category, reminder] =
          params;
        conn.execute(
          "INSERT INTO schedules (
             title, date, time, description, priority, category, reminder,
             status, create_time
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            title,
            date,
            time,
            description,
            priority,
            category,
            reminder,
            encode_enum(Status::Incomplete),
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(id, title = draft.title(), "created entry");

    Ok(ScheduleEntry {
      id,
      title: draft.title().to_owned(),
      date: draft.date(),
      time: draft.time(),
      description: draft.description().to_owned(),
      priority: draft.priority(),
      status: Status::Incomplete,
      category: draft.category(),
      reminder: draft.reminder(),
      created_at,
    })
  }

  async fn get(&self, id: i64) -> Result<Option<ScheduleEntry>> {
    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM schedules WHERE id = ?1"),
              rusqlite::params![id],
              RawEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn update(
    &self,
    id: i64,
    draft: EntryDraft,
  ) -> Result<Option<ScheduleEntry>> {
    let draft = draft.validate()?;
    let params = draft_params(&draft);

    let affected = self
      .conn
      .call(move |conn| {
        let [title, date, time, description, priority, category, reminder] =
          params;
        Ok(conn.execute(
          "UPDATE schedules
           SET title = ?1, date = ?2, time = ?3, description = ?4,
               priority = ?5, category = ?6, reminder = ?7
           WHERE id = ?8",
          rusqlite::params![
            title,
            date,
            time,
            description,
            priority,
            category,
            reminder,
            id,
          ],
        )?)
      })
      .await?;

    if affected == 0 {
      return Ok(None);
    }
    debug!(id, "updated entry");
    self.get(id).await
  }

  async fn list(&self, filter: &EntryFilter) -> Result<Vec<ScheduleEntry>> {
    let mut conds: Vec<&'static str> = vec![];
    let mut params: Vec<Value> = vec![];

    // `instr` is a case-sensitive substring test with no wildcard characters.
    if let Some(term) = filter.search_term() {
      conds.push("(instr(title, ?) > 0 OR instr(coalesce(description, ''), ?) > 0)");
      params.push(Value::Text(term.to_owned()));
      params.push(Value::Text(term.to_owned()));
    }
    if let CategoryFilter::Only(category) = filter.category {
      conds.push("category = ?");
      params.push(Value::Text(encode_enum(category).to_owned()));
    }
    if let Some(status) = filter.status {
      conds.push("status = ?");
      params.push(Value::Text(encode_enum(status).to_owned()));
    }
    if let Some(reminder) = filter.reminder {
      conds.push("coalesce(reminder, 0) = ?");
      params.push(Value::Integer(i64::from(reminder)));
    }
    if let Some(due_by) = filter.due_by {
      conds.push("(date || ' ' || time) <= ?");
      params.push(Value::Text(encode_moment(due_by)));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    let sql = format!(
      "SELECT {ENTRY_COLUMNS} FROM schedules {where_clause}
       ORDER BY date, time, id"
    );

    self.query_entries(sql, params).await
  }

  async fn all(&self) -> Result<Vec<ScheduleEntry>> {
    self
      .query_entries(
        format!("SELECT {ENTRY_COLUMNS} FROM schedules ORDER BY date, time, id"),
        vec![],
      )
      .await
  }

  async fn mark_complete(&self, key: &EntryKey) -> Result<usize> {
    let affected = self
      .execute_keyed(
        "UPDATE schedules SET status = ?",
        key,
        Some(Value::Text(encode_enum(Status::Done).to_owned())),
      )
      .await?;
    debug!(%key, affected, "marked complete");
    Ok(affected)
  }

  async fn delete(&self, key: &EntryKey) -> Result<usize> {
    let affected = self
      .execute_keyed("DELETE FROM schedules", key, None)
      .await?;
    debug!(%key, affected, "deleted entries");
    Ok(affected)
  }
}
