//! The immutable input to entry creation and editing.
//!
//! A draft holds raw form values. [`EntryDraft::validate`] checks every field
//! before anything is persisted and reports all problems at once.

use chrono::{NaiveDate, NaiveTime};

use crate::{
  entry::{Category, DATE_FORMAT, Priority, TIME_FORMAT},
  error::{Error, Field, Invalid},
  Result,
};

/// Raw, unvalidated values for a new or edited entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
  pub title:       String,
  /// Expected as `YYYY-MM-DD`.
  pub date:        String,
  /// Expected as 24-hour `HH:MM`.
  pub time:        String,
  pub description: String,
  pub priority:    Priority,
  pub category:    Category,
  pub reminder:    bool,
}

impl EntryDraft {
  /// Convenience constructor with all optional fields set to their defaults.
  pub fn new(
    title: impl Into<String>,
    date: impl Into<String>,
    time: impl Into<String>,
  ) -> Self {
    Self {
      title: title.into(),
      date: date.into(),
      time: time.into(),
      ..Self::default()
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn with_priority(mut self, priority: Priority) -> Self {
    self.priority = priority;
    self
  }

  pub fn with_category(mut self, category: Category) -> Self {
    self.category = category;
    self
  }

  pub fn with_reminder(mut self, reminder: bool) -> Self {
    self.reminder = reminder;
    self
  }

  /// Trim and check every field, returning all problems found.
  pub fn validate(&self) -> Result<ValidDraft> {
    let mut issues = Vec::new();

    let title = self.title.trim();
    if title.is_empty() {
      issues.push(Invalid::Missing(Field::Title));
    }

    let date = check(self.date.trim(), Field::Date, parse_date, &mut issues);
    let time = check(self.time.trim(), Field::Time, parse_time, &mut issues);

    match (date, time) {
      (Some(date), Some(time)) if issues.is_empty() => Ok(ValidDraft {
        title: title.to_owned(),
        date,
        time,
        description: self.description.trim().to_owned(),
        priority: self.priority,
        category: self.category,
        reminder: self.reminder,
      }),
      _ => Err(Error::Validation(issues)),
    }
  }
}

fn check<T>(
  raw: &str,
  field: Field,
  parse: fn(&str) -> Option<T>,
  issues: &mut Vec<Invalid>,
) -> Option<T> {
  if raw.is_empty() {
    issues.push(Invalid::Missing(field));
    return None;
  }
  let parsed = parse(raw);
  if parsed.is_none() {
    let expected = match field {
      Field::Date => "a calendar date in YYYY-MM-DD form",
      _ => "a 24-hour clock time in HH:MM form",
    };
    issues.push(Invalid::Malformed { field, expected });
  }
  parsed
}

/// Parse a strictly zero-padded `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
  if !has_shape(s, "dddd-dd-dd") {
    return None;
  }
  NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Parse a strictly zero-padded 24-hour `HH:MM` time.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
  if !has_shape(s, "dd:dd") {
    return None;
  }
  NaiveTime::parse_from_str(s, TIME_FORMAT).ok()
}

/// `d` in `shape` matches an ASCII digit; any other byte matches itself.
fn has_shape(s: &str, shape: &str) -> bool {
  s.len() == shape.len()
    && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
      b'd' => c.is_ascii_digit(),
      _ => c == p,
    })
}

// ─── ValidDraft ──────────────────────────────────────────────────────────────

/// A draft that passed validation. Only obtainable through
/// [`EntryDraft::validate`], so stores can persist it without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
  title:       String,
  date:        NaiveDate,
  time:        NaiveTime,
  description: String,
  priority:    Priority,
  category:    Category,
  reminder:    bool,
}

impl ValidDraft {
  pub fn title(&self) -> &str { &self.title }

  pub fn date(&self) -> NaiveDate { self.date }

  pub fn time(&self) -> NaiveTime { self.time }

  pub fn description(&self) -> &str { &self.description }

  pub fn priority(&self) -> Priority { self.priority }

  pub fn category(&self) -> Category { self.category }

  pub fn reminder(&self) -> bool { self.reminder }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn valid_draft_is_trimmed_and_keeps_defaults() {
    let valid = EntryDraft::new("  Team sync ", "2024-03-01", " 09:00")
      .with_description(" weekly ")
      .validate()
      .unwrap();

    assert_eq!(valid.title(), "Team sync");
    assert_eq!(valid.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(valid.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(valid.description(), "weekly");
    assert_eq!(valid.priority(), Priority::Normal);
    assert_eq!(valid.category(), Category::Default);
    assert!(!valid.reminder());
  }

  #[test]
  fn empty_fields_are_all_reported() {
    let err = EntryDraft::new(" ", "", "").validate().unwrap_err();
    assert_eq!(err.fields(), vec![Field::Title, Field::Date, Field::Time]);
    let Error::Validation(issues) = err;
    assert!(issues.iter().all(|i| matches!(i, Invalid::Missing(_))));
  }

  #[test]
  fn out_of_range_date_and_time_are_malformed() {
    let err = EntryDraft::new("Standup", "2024-13-01", "25:61")
      .validate()
      .unwrap_err();
    assert_eq!(err.fields(), vec![Field::Date, Field::Time]);
    let msg = err.to_string();
    assert!(msg.contains("date must be"), "{msg}");
    assert!(msg.contains("time must be"), "{msg}");
  }

  #[test]
  fn unpadded_forms_are_rejected() {
    assert!(parse_date("2024-3-1").is_none());
    assert!(parse_date("2024/03/01").is_none());
    assert!(parse_time("9:00").is_none());
    assert!(parse_time("09:00:00").is_none());
    assert!(parse_date("2024-02-29").is_some());
    assert!(parse_date("2023-02-29").is_none());
    assert!(parse_time("23:59").is_some());
  }

  #[test]
  fn only_the_bad_field_is_named() {
    let err = EntryDraft::new("Standup", "2024-03-01", "noon")
      .validate()
      .unwrap_err();
    assert_eq!(err.fields(), vec![Field::Time]);
  }
}
