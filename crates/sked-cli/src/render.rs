//! Plain-text rendering of entries for the terminal.

use sked_core::entry::{ScheduleEntry, Status};

const TITLE_WIDTH: usize = 40;

/// One line per entry, columns aligned, no trailing newline.
pub fn table(entries: &[ScheduleEntry]) -> String {
  let id_width = entries
    .iter()
    .map(|e| e.id.to_string().len())
    .max()
    .unwrap_or(1)
    .max(2);

  let mut lines = vec![format!(
    "{:>id_width$}  {:<16}  {:<10}  {:<8}  {:<8}  {:<1}  {}",
    "ID", "WHEN", "STATUS", "PRIORITY", "CATEGORY", "R", "TITLE"
  )];

  lines.extend(entries.iter().map(|e| {
    format!(
      "{:>id_width$}  {:<16}  {:<10}  {:<8}  {:<8}  {:<1}  {}",
      e.id,
      format!("{} {}", e.date_text(), e.time_text()),
      e.status.to_string(),
      e.priority.to_string(),
      e.category.to_string(),
      if e.reminder { "*" } else { "" },
      truncate(&e.title, TITLE_WIDTH),
    )
  }));

  lines.join("\n")
}

/// The notification text for one due entry.
pub fn reminder(entry: &ScheduleEntry) -> String {
  let mut text = format!(
    "Reminder: {}\n  at {} {}",
    entry.title,
    entry.date_text(),
    entry.time_text()
  );
  if !entry.description.is_empty() {
    text.push_str("\n  ");
    text.push_str(&entry.description);
  }
  text
}

/// Multi-line view of a single entry.
pub fn detail(entry: &ScheduleEntry) -> String {
  let status = match entry.status {
    Status::Done => "done",
    Status::Incomplete => "incomplete",
  };
  format!(
    "#{} {}\n  when:     {} {}\n  status:   {status}\n  priority: {}\n  category: {}\n  reminder: {}\n  created:  {}{}",
    entry.id,
    entry.title,
    entry.date_text(),
    entry.time_text(),
    entry.priority,
    entry.category,
    if entry.reminder { "on" } else { "off" },
    entry.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    if entry.description.is_empty() {
      String::new()
    } else {
      format!("\n  {}", entry.description)
    },
  )
}

fn truncate(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    return s.to_owned();
  }
  let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
  out.push('…');
  out
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, NaiveTime, Utc};
  use sked_core::entry::{Category, Priority};

  use super::*;

  fn entry(id: i64, title: &str) -> ScheduleEntry {
    ScheduleEntry {
      id,
      title: title.into(),
      date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
      description: String::new(),
      priority: Priority::Normal,
      status: Status::Incomplete,
      category: Category::Work,
      reminder: true,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn table_has_header_and_one_line_per_entry() {
    let out = table(&[entry(1, "Team sync"), entry(12, "Review")]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ID"));
    assert!(lines[1].contains("2024-03-01 09:00"));
    assert!(lines[1].ends_with("Team sync"));
    assert!(lines[2].starts_with("12"));
  }

  #[test]
  fn long_titles_are_truncated() {
    assert_eq!(truncate("abcdef", 4), "abc…");
    assert_eq!(truncate("日程管理", 4), "日程管理");
  }

  #[test]
  fn reminder_names_title_and_moment() {
    let text = reminder(&entry(1, "Team sync"));
    assert_eq!(text, "Reminder: Team sync\n  at 2024-03-01 09:00");
  }
}
