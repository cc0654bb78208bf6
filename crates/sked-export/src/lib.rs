//! CSV export for sked.
//!
//! Takes a snapshot of every entry in a [`ScheduleStore`] and writes it to a
//! new, timestamped file. Export never modifies the store and never replaces
//! an existing file.
//!
//! # Quick start
//!
//! ```no_run
//! # async fn run(store: impl sked_core::store::ScheduleStore) -> sked_export::Result<()> {
//! use sked_export::{ExportOptions, export};
//!
//! let now = chrono::Local::now().naive_local();
//! let path = export(&store, "/tmp".as_ref(), now, &ExportOptions::default()).await?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
mod serialize;

use std::{
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
pub use error::{Error, Result};
use sked_core::{entry::ScheduleEntry, store::ScheduleStore};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// File name prefix used when none is configured.
pub const DEFAULT_LABEL: &str = "schedule_export";

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExportOptions {
  /// Prefix of the exported file name.
  pub label:            String,
  /// `false` selects the layout without a Category column.
  pub include_category: bool,
}

impl Default for ExportOptions {
  fn default() -> Self {
    Self { label: DEFAULT_LABEL.to_owned(), include_category: true }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// `<label>_<YYYYMMDD_HHMMSS>.csv`
pub fn file_name(label: &str, at: NaiveDateTime) -> String {
  format!("{label}_{}.csv", at.format(STAMP_FORMAT))
}

/// Serialise `entries` to BOM-prefixed CSV bytes, header row first.
pub fn render(entries: &[ScheduleEntry], include_category: bool) -> Result<Vec<u8>> {
  serialize::to_csv(entries, include_category)
}

/// Export every entry in `store` to a new file in `dir`, named for `at`.
///
/// Returns the path written. If the name is already taken a numeric suffix
/// is added. On failure no file is left behind.
pub async fn export<S>(
  store: &S,
  dir: &Path,
  at: NaiveDateTime,
  options: &ExportOptions,
) -> Result<PathBuf>
where
  S: ScheduleStore,
{
  let entries = store
    .all()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let bytes = render(&entries, options.include_category)?;
  let path = write_new(dir, &file_name(&options.label, at), &bytes)?;

  info!(path = %path.display(), rows = entries.len(), "exported schedule");
  Ok(path)
}

// ─── File placement ──────────────────────────────────────────────────────────

/// Write `bytes` to a temporary file in `dir`, then move it to `name` (or a
/// suffixed variant) without overwriting anything.
fn write_new(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
  let mut tmp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
    path: dir.to_path_buf(),
    source,
  })?;

  if let Err(source) = tmp.write_all(bytes).and_then(|()| tmp.as_file().sync_all()) {
    return Err(Error::Io { path: tmp.path().to_path_buf(), source });
  }

  let stem = name.strip_suffix(".csv").unwrap_or(name);
  let mut target = dir.join(name);
  let mut suffix = 0u32;

  loop {
    match tmp.persist_noclobber(&target) {
      Ok(_) => return Ok(target),
      Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
        debug!(taken = %target.display(), "export name in use");
        tmp = e.file;
        suffix += 1;
        target = dir.join(format!("{stem}_{suffix}.csv"));
      }
      Err(e) => return Err(Error::Io { path: target, source: e.error }),
    }
  }
}

#[cfg(test)]
mod tests;
