//! The `ScheduleStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `sked-store-sqlite`).
//! The reminder evaluator, the exporter and the binary depend on this
//! abstraction, not on any concrete backend.

use std::{fmt, future::Future, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
  draft::EntryDraft,
  entry::{Category, ScheduleEntry, Status},
  error::{Error, Field, Invalid},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Category criterion for [`EntryFilter`]; `All` disables the criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(Category),
}

impl FromStr for CategoryFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("all") {
      return Ok(Self::All);
    }
    s.parse::<Category>().map(Self::Only).map_err(|_| {
      Error::Validation(vec![Invalid::Malformed {
        field:    Field::Category,
        expected: "one of All, Default, Work, Study, Life, Other",
      }])
    })
  }
}

impl fmt::Display for CategoryFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("All"),
      Self::Only(category) => write!(f, "{category}"),
    }
  }
}

impl From<Category> for CategoryFilter {
  fn from(category: Category) -> Self { Self::Only(category) }
}

/// Parameters for [`ScheduleStore::list`]. The default matches every entry.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
  /// Case-sensitive substring of `title` or `description`. An empty string
  /// matches everything.
  pub search:   Option<String>,
  pub category: CategoryFilter,
  pub status:   Option<Status>,
  pub reminder: Option<bool>,
  /// Only entries scheduled at or before this local wall-clock moment.
  pub due_by:   Option<NaiveDateTime>,
}

impl EntryFilter {
  pub fn search(mut self, term: impl Into<String>) -> Self {
    self.search = Some(term.into());
    self
  }

  pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
    self.category = category.into();
    self
  }

  /// The search term, or `None` when it is absent or empty.
  pub fn search_term(&self) -> Option<&str> {
    self.search.as_deref().filter(|s| !s.is_empty())
  }
}

/// Selects the rows affected by [`ScheduleStore::mark_complete`] and
/// [`ScheduleStore::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKey {
  /// A single entry by its stable id.
  Id(i64),
  /// Every entry with this exact title and date. Titles are not unique, so
  /// this may match several unrelated entries.
  TitleDate { title: String, date: NaiveDate },
}

impl fmt::Display for EntryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Id(id) => write!(f, "#{id}"),
      Self::TitleDate { title, date } => write!(f, "{title:?} on {date}"),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a schedule store backend.
///
/// Every write validates its input before touching storage. All methods
/// return `Send` futures so the trait can be driven from a spawned tokio
/// task (see [`crate::reminder::spawn`]).
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Validate and persist a new entry. The store assigns `id` and
  /// `created_at`; status starts as `Incomplete`.
  fn create(
    &self,
    draft: EntryDraft,
  ) -> impl Future<Output = Result<ScheduleEntry, Self::Error>> + Send + '_;

  /// Retrieve an entry by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ScheduleEntry>, Self::Error>> + Send + '_;

  /// Replace the editable fields of an entry. `id`, `status` and
  /// `created_at` are preserved. Returns `None` if no entry has `id`.
  fn update(
    &self,
    id: i64,
    draft: EntryDraft,
  ) -> impl Future<Output = Result<Option<ScheduleEntry>, Self::Error>> + Send + '_;

  /// Entries matching `filter`, ascending by `(date, time)`.
  fn list<'a>(
    &'a self,
    filter: &'a EntryFilter,
  ) -> impl Future<Output = Result<Vec<ScheduleEntry>, Self::Error>> + Send + 'a;

  /// Every entry, ascending by `(date, time)`.
  fn all(
    &self,
  ) -> impl Future<Output = Result<Vec<ScheduleEntry>, Self::Error>> + Send + '_;

  /// Set `status = Done` on every entry matching `key`. Returns the number
  /// of entries matched; zero is not an error.
  fn mark_complete<'a>(
    &'a self,
    key: &'a EntryKey,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Remove every entry matching `key`. Returns the number removed; zero is
  /// not an error.
  fn delete<'a>(
    &'a self,
    key: &'a EntryKey,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_filter_parses_all_and_variants() {
    assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
    assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
    assert_eq!(
      "Work".parse::<CategoryFilter>().unwrap(),
      CategoryFilter::Only(Category::Work)
    );
  }

  #[test]
  fn unknown_category_is_a_validation_error() {
    let err = "Hobbies".parse::<CategoryFilter>().unwrap_err();
    assert_eq!(err.fields(), vec![Field::Category]);
  }

  #[test]
  fn empty_search_term_is_ignored() {
    assert_eq!(EntryFilter::default().search("").search_term(), None);
    assert_eq!(
      EntryFilter::default().search("sync").search_term(),
      Some("sync")
    );
  }
}
