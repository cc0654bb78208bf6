//! Tests for rendering, file placement and store-backed export.

use chrono::{NaiveDate, NaiveTime, Utc};
use sked_core::entry::{Category, Priority, Status};

use super::*;

fn entry(title: &str, description: &str) -> ScheduleEntry {
  ScheduleEntry {
    id:          1,
    title:       title.into(),
    date:        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    time:        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    description: description.into(),
    priority:    Priority::High,
    status:      Status::Incomplete,
    category:    Category::Work,
    reminder:    true,
    created_at:  Utc::now(),
  }
}

fn stamp() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2024, 3, 1)
    .unwrap()
    .and_hms_opt(9, 5, 7)
    .unwrap()
}

#[test]
fn file_name_embeds_the_instant() {
  assert_eq!(
    file_name(DEFAULT_LABEL, stamp()),
    "schedule_export_20240301_090507.csv"
  );
}

#[test]
fn render_starts_with_bom_and_header() {
  let bytes = render(&[entry("Team sync", "")], true).unwrap();
  assert!(bytes.starts_with(serialize::BOM));

  let text = std::str::from_utf8(&bytes[serialize::BOM.len()..]).unwrap();
  let mut lines = text.lines();
  assert_eq!(
    lines.next(),
    Some("Title,Date,Time,Description,Category,Priority,Status")
  );
  assert_eq!(
    lines.next(),
    Some("Team sync,2024-03-01,09:00,,Work,High,Incomplete")
  );
  assert_eq!(lines.next(), None);
}

#[test]
fn layout_without_category_drops_the_column() {
  let bytes = render(&[entry("Gym", "legs")], false).unwrap();
  let text = String::from_utf8(bytes[serialize::BOM.len()..].to_vec()).unwrap();
  let mut lines = text.lines();
  assert_eq!(
    lines.next(),
    Some("Title,Date,Time,Description,Priority,Status")
  );
  assert_eq!(
    lines.next(),
    Some("Gym,2024-03-01,09:00,legs,High,Incomplete")
  );
}

#[test]
fn fields_are_quoted_and_non_ascii_kept() {
  let bytes = render(&[entry("会议, 第一次", "line one\nline \"two\"")], true)
    .unwrap();

  let mut reader = csv::ReaderBuilder::new()
    .from_reader(&bytes[serialize::BOM.len()..]);
  let records: Vec<csv::StringRecord> =
    reader.records().collect::<std::result::Result<_, _>>().unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(&records[0][0], "会议, 第一次");
  assert_eq!(&records[0][3], "line one\nline \"two\"");
}

#[test]
fn write_new_never_overwrites() {
  let dir = tempfile::tempdir().unwrap();
  let name = file_name("x", stamp());

  let first = write_new(dir.path(), &name, b"one").unwrap();
  let second = write_new(dir.path(), &name, b"two").unwrap();
  let third = write_new(dir.path(), &name, b"three").unwrap();

  assert_eq!(first.file_name().unwrap(), "x_20240301_090507.csv");
  assert_eq!(second.file_name().unwrap(), "x_20240301_090507_1.csv");
  assert_eq!(third.file_name().unwrap(), "x_20240301_090507_2.csv");
  assert_eq!(std::fs::read(&first).unwrap(), b"one");
  assert_eq!(std::fs::read(&second).unwrap(), b"two");
  assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn missing_directory_is_an_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let gone = dir.path().join("missing");
  let err = write_new(&gone, "x.csv", b"data").unwrap_err();
  assert!(matches!(err, Error::Io { .. }), "{err}");
}

// ─── Store-backed export ─────────────────────────────────────────────────────

mod with_store {
  use sked_core::{
    draft::EntryDraft,
    store::{EntryKey, ScheduleStore},
  };
  use sked_store_sqlite::SqliteStore;

  use super::*;

  fn read_records(path: &Path) -> (Vec<u8>, Vec<csv::StringRecord>) {
    let bytes = std::fs::read(path).unwrap();
    let records = csv::ReaderBuilder::new()
      .has_headers(false)
      .from_reader(&bytes[serialize::BOM.len()..])
      .records()
      .collect::<std::result::Result<Vec<_>, _>>()
      .unwrap();
    (bytes, records)
  }

  #[tokio::test]
  async fn export_writes_header_plus_one_row_per_entry_in_order() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    for (title, date, time) in [
      ("Later", "2024-03-02", "08:00"),
      ("Sooner", "2024-03-01", "08:00"),
      ("Soonest", "2024-02-28", "23:00"),
    ] {
      store
        .create(EntryDraft::new(title, date, time))
        .await
        .unwrap();
    }
    store
      .mark_complete(&EntryKey::Id(1))
      .await
      .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = export(&store, dir.path(), stamp(), &ExportOptions::default())
      .await
      .unwrap();
    assert_eq!(path, dir.path().join("schedule_export_20240301_090507.csv"));

    let (bytes, records) = read_records(&path);
    assert!(bytes.starts_with(serialize::BOM));
    assert_eq!(records.len(), 3 + 1);
    assert_eq!(records[0].iter().collect::<Vec<_>>(), serialize::header(true));

    let titles: Vec<&str> = records[1..].iter().map(|r| &r[0]).collect();
    assert_eq!(titles, ["Soonest", "Sooner", "Later"]);
    assert_eq!(&records[3][6], "Done");
    assert_eq!(&records[1][4], "Default");

    // Export is read-only.
    assert_eq!(store.all().await.unwrap().len(), 3);
  }

  #[tokio::test]
  async fn empty_store_exports_only_the_header() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions { label: "日程导出".into(), include_category: false };

    let path = export(&store, dir.path(), stamp(), &options).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "日程导出_20240301_090507.csv");

    let (_, records) = read_records(&path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].len(), 6);
  }

  #[tokio::test]
  async fn successive_exports_get_distinct_files() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .create(EntryDraft::new("One", "2024-03-01", "09:00"))
      .await
      .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::default();

    let first = export(&store, dir.path(), stamp(), &options).await.unwrap();
    store
      .create(EntryDraft::new("Two", "2024-03-01", "10:00"))
      .await
      .unwrap();
    let second = export(&store, dir.path(), stamp(), &options).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(read_records(&first).1.len(), 2);
    assert_eq!(read_records(&second).1.len(), 3);
  }
}
