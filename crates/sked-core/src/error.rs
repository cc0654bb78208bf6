//! Error types for `sked-core`.

use std::fmt;

use strum::Display;
use thiserror::Error;

/// An entry field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
  Title,
  Date,
  Time,
  Category,
}

/// One problem found while validating user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
  /// A required field was empty (after trimming).
  Missing(Field),
  /// A field was present but not in its fixed format.
  Malformed {
    field:    Field,
    expected: &'static str,
  },
}

impl Invalid {
  pub fn field(&self) -> Field {
    match self {
      Self::Missing(field) | Self::Malformed { field, .. } => *field,
    }
  }
}

impl fmt::Display for Invalid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Missing(field) => write!(f, "{field} is required"),
      Self::Malformed { field, expected } => {
        write!(f, "{field} must be {expected}")
      }
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {}", join_issues(.0))]
  Validation(Vec<Invalid>),
}

impl Error {
  /// The offending fields, in the order they were checked.
  pub fn fields(&self) -> Vec<Field> {
    match self {
      Self::Validation(issues) => issues.iter().map(Invalid::field).collect(),
    }
  }
}

fn join_issues(issues: &[Invalid]) -> String {
  issues
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
