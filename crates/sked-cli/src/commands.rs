//! Subcommand handlers. Each maps one user action onto a store, reminder or
//! export operation.

use std::{
  io::{self, BufRead, Write},
  path::Path,
  sync::Arc,
};

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDateTime};
use sked_core::{
  Error as CoreError,
  draft::{EntryDraft, parse_date},
  entry::ScheduleEntry,
  error::{Field, Invalid},
  reminder,
  store::{EntryFilter, EntryKey, ScheduleStore},
};
use sked_export::ExportOptions;
use sked_store_sqlite::SqliteStore;
use tracing::info;

use crate::{AddArgs, Command, EditArgs, KeyArgs, render, settings::Settings};

pub async fn run(
  command: Command,
  store: &SqliteStore,
  settings: &Settings,
  data_dir: &Path,
) -> Result<()> {
  match command {
    Command::Add(args) => add(store, args).await,
    Command::Edit { id, fields } => edit(store, id, fields).await,
    Command::List { search, category, json } => {
      let filter = EntryFilter { search, category, ..EntryFilter::default() };
      let entries = store.list(&filter).await?;
      if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
      } else {
        println!("{}", render::table(&entries));
      }
      Ok(())
    }
    Command::Done(key) => {
      let key = key.into_key()?;
      let n = store.mark_complete(&key).await?;
      report(n, "marked complete", &key);
      Ok(())
    }
    Command::Delete { key, yes } => delete(store, key.into_key()?, yes).await,
    Command::Export { out } => {
      let dir = match out {
        Some(dir) => {
          std::fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create {}", dir.display()))?;
          dir
        }
        None => data_dir.to_path_buf(),
      };
      let options = ExportOptions {
        label:            settings.export_label.clone(),
        include_category: settings.categories,
      };
      let path = sked_export::export(store, &dir, now(), &options)
        .await
        .context("export failed")?;
      println!("exported to {}", path.display());
      Ok(())
    }
    Command::Remind { at } => {
      let at = match at {
        Some(s) => parse_moment(&s)?,
        None => now(),
      };
      let due = reminder::due_reminders(store, at).await?;
      if due.is_empty() {
        println!("nothing due");
      }
      for entry in &due {
        println!("{}", render::reminder(entry));
      }
      Ok(())
    }
    Command::Watch => watch(store.clone(), settings).await,
  }
}

fn now() -> NaiveDateTime { Local::now().naive_local() }

fn parse_moment(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
    .with_context(|| format!("expected YYYY-MM-DD HH:MM, got {s:?}"))
}

fn report(n: usize, action: &str, key: &EntryKey) {
  match n {
    0 => println!("no entry matches {key}; nothing {action}"),
    1 => println!("1 entry {action}"),
    n => println!("{n} entries {action}"),
  }
}

// ─── Add / edit ───────────────────────────────────────────────────────────────

async fn add(store: &SqliteStore, args: AddArgs) -> Result<()> {
  let now = Local::now();
  let draft = EntryDraft {
    title:       args.title,
    date:        args.date.unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
    time:        args.time.unwrap_or_else(|| now.format("%H:%M").to_string()),
    description: args.description,
    priority:    args.priority,
    category:    args.category,
    reminder:    args.remind,
  };

  let entry = store.create(draft).await?;
  info!(id = entry.id, "entry added");
  println!("{}", render::detail(&entry));
  Ok(())
}

async fn edit(store: &SqliteStore, id: i64, fields: EditArgs) -> Result<()> {
  let current = store
    .get(id)
    .await?
    .ok_or_else(|| anyhow!("no entry with id {id}"))?;

  let draft = merge(&current, fields);
  let entry = store
    .update(id, draft)
    .await?
    .ok_or_else(|| anyhow!("entry {id} was removed while editing"))?;
  println!("{}", render::detail(&entry));
  Ok(())
}

/// Start from the entry's current values and overlay the given fields.
fn merge(current: &ScheduleEntry, fields: EditArgs) -> EntryDraft {
  EntryDraft {
    title:       fields.title.unwrap_or_else(|| current.title.clone()),
    date:        fields.date.unwrap_or_else(|| current.date_text()),
    time:        fields.time.unwrap_or_else(|| current.time_text()),
    description: fields
      .description
      .unwrap_or_else(|| current.description.clone()),
    priority:    fields.priority.unwrap_or(current.priority),
    category:    fields.category.unwrap_or(current.category),
    reminder:    fields.remind.unwrap_or(current.reminder),
  }
}

// ─── Delete ───────────────────────────────────────────────────────────────────

async fn delete(store: &SqliteStore, key: EntryKey, yes: bool) -> Result<()> {
  let matches = matching(store, &key).await?;
  if matches.is_empty() {
    report(0, "deleted", &key);
    return Ok(());
  }

  if !yes {
    println!("{}", render::table(&matches));
    if !confirm(&format!("Delete {} entr{}?", matches.len(), plural_y(matches.len())))? {
      println!("cancelled");
      return Ok(());
    }
  }

  let n = store.delete(&key).await?;
  report(n, "deleted", &key);
  Ok(())
}

/// The entries `key` currently selects, for previewing a deletion.
async fn matching(store: &SqliteStore, key: &EntryKey) -> Result<Vec<ScheduleEntry>> {
  Ok(match key {
    EntryKey::Id(id) => store.get(*id).await?.into_iter().collect(),
    EntryKey::TitleDate { title, date } => store
      .list(&EntryFilter::default().search(title.clone()))
      .await?
      .into_iter()
      .filter(|e| &e.title == title && &e.date == date)
      .collect(),
  })
}

fn plural_y(n: usize) -> &'static str { if n == 1 { "y" } else { "ies" } }

/// Ask a yes/no question on stdin; anything but `y`/`yes` is no.
fn confirm(prompt: &str) -> Result<bool> {
  print!("{prompt} [y/N] ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// ─── Watch ────────────────────────────────────────────────────────────────────

async fn watch(store: SqliteStore, settings: &Settings) -> Result<()> {
  let interval = settings.reminder_interval();
  let (task, mut due) = reminder::spawn(Arc::new(store), interval, now);
  info!(every = ?interval, "watching for reminders; press Ctrl-C to stop");

  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);

  loop {
    tokio::select! {
      batch = due.recv() => match batch {
        Some(batch) => {
          for entry in &batch.entries {
            println!("{}\n", render::reminder(entry));
          }
        }
        None => break,
      },
      result = &mut ctrl_c => {
        result.context("failed to listen for Ctrl-C")?;
        break;
      }
    }
  }

  task.stop();
  Ok(())
}

// ─── Key args ─────────────────────────────────────────────────────────────────

impl KeyArgs {
  fn into_key(self) -> Result<EntryKey> {
    match (self.id, self.title, self.date) {
      (Some(id), _, _) => Ok(EntryKey::Id(id)),
      (None, Some(title), Some(date)) => {
        let date = parse_date(date.trim()).ok_or_else(|| {
          CoreError::Validation(vec![Invalid::Malformed {
            field:    Field::Date,
            expected: "a calendar date in YYYY-MM-DD form",
          }])
        })?;
        Ok(EntryKey::TitleDate { title: title.trim().to_owned(), date })
      }
      _ => Err(anyhow!("give an entry id, or both --title and --date")),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, NaiveTime, Utc};
  use sked_core::entry::{Category, Priority, Status};

  use super::*;

  fn entry() -> ScheduleEntry {
    ScheduleEntry {
      id:          7,
      title:       "Review".into(),
      date:        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      time:        NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
      description: "quarterly".into(),
      priority:    Priority::Low,
      status:      Status::Incomplete,
      category:    Category::Work,
      reminder:    false,
      created_at:  Utc::now(),
    }
  }

  fn no_edits() -> EditArgs {
    EditArgs {
      title:       None,
      date:        None,
      time:        None,
      description: None,
      priority:    None,
      category:    None,
      remind:      None,
    }
  }

  #[test]
  fn merge_keeps_unspecified_fields() {
    let draft = merge(&entry(), EditArgs {
      time: Some("15:30".into()),
      remind: Some(true),
      ..no_edits()
    });
    assert_eq!(draft.title, "Review");
    assert_eq!(draft.date, "2024-03-01");
    assert_eq!(draft.time, "15:30");
    assert_eq!(draft.description, "quarterly");
    assert_eq!(draft.priority, Priority::Low);
    assert_eq!(draft.category, Category::Work);
    assert!(draft.reminder);
    assert!(draft.validate().is_ok());
  }

  #[test]
  fn key_args_prefer_id_and_validate_dates() {
    let by_id = KeyArgs { id: Some(3), title: None, date: None };
    assert_eq!(by_id.into_key().unwrap(), EntryKey::Id(3));

    let by_pair = KeyArgs {
      id:    None,
      title: Some("Gym".into()),
      date:  Some("2024-03-01".into()),
    };
    assert_eq!(by_pair.into_key().unwrap(), EntryKey::TitleDate {
      title: "Gym".into(),
      date:  NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    });

    let bad = KeyArgs {
      id:    None,
      title: Some("Gym".into()),
      date:  Some("March 1".into()),
    };
    assert!(bad.into_key().is_err());
  }

  #[test]
  fn key_title_is_trimmed_like_stored_titles() {
    let padded = KeyArgs {
      id:    None,
      title: Some("  Gym ".into()),
      date:  Some(" 2024-03-01".into()),
    };
    assert_eq!(padded.into_key().unwrap(), EntryKey::TitleDate {
      title: "Gym".into(),
      date:  NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    });
  }

  #[test]
  fn moments_parse_in_minute_form() {
    assert_eq!(
      parse_moment("2024-03-01 09:00").unwrap(),
      NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
    );
    assert!(parse_moment("tomorrow").is_err());
  }
}
