//! Error type for `sked-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Input was rejected before anything was written.
  #[error(transparent)]
  Core(#[from] sked_core::Error),

  /// The store file could not be opened or initialised.
  #[error("store unavailable at {}: {source}", path.display())]
  Unavailable {
    path:   PathBuf,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored value could not be read back into its domain type.
  #[error("cannot decode stored {column}: {value:?}")]
  Decode { column: &'static str, value: String },
}

impl Error {
  pub fn is_validation(&self) -> bool { matches!(self, Self::Core(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
