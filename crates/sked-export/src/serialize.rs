//! CSV serializer for schedule entries.
//!
//! Produces UTF-8 with a leading byte-order mark so spreadsheet tools detect
//! the encoding, and RFC 4180 quoting via the `csv` crate.

use sked_core::entry::ScheduleEntry;

use crate::error::Result;

/// UTF-8 byte-order mark.
pub(crate) const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header labels, in column order. Category is the fifth column.
const HEADER: [&str; 7] =
  ["Title", "Date", "Time", "Description", "Category", "Priority", "Status"];
const CATEGORY_COLUMN: usize = 4;

/// The header row for the chosen layout.
pub(crate) fn header(include_category: bool) -> Vec<&'static str> {
  HEADER
    .iter()
    .enumerate()
    .filter(|(i, _)| include_category || *i != CATEGORY_COLUMN)
    .map(|(_, label)| *label)
    .collect()
}

fn row(entry: &ScheduleEntry, include_category: bool) -> Vec<String> {
  let mut fields = vec![
    entry.title.clone(),
    entry.date_text(),
    entry.time_text(),
    entry.description.clone(),
  ];
  if include_category {
    fields.push(entry.category.to_string());
  }
  fields.push(entry.priority.to_string());
  fields.push(entry.status.to_string());
  fields
}

/// Serialise `entries`, in the given order, under a header row.
pub(crate) fn to_csv(
  entries: &[ScheduleEntry],
  include_category: bool,
) -> Result<Vec<u8>> {
  let mut writer = csv::Writer::from_writer(BOM.to_vec());

  writer.write_record(header(include_category))?;
  for entry in entries {
    writer.write_record(row(entry, include_category))?;
  }

  writer.flush().map_err(csv::Error::from)?;
  writer
    .into_inner()
    .map_err(|e| csv::Error::from(e.into_error()).into())
}
