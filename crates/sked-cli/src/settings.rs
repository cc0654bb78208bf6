//! Runtime settings: an optional TOML file layered under `SKED_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Shape of the settings file and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Directory holding `schedule.db` and exports.
  #[serde(default)]
  pub data_dir:               Option<PathBuf>,
  #[serde(default = "default_interval_secs")]
  pub reminder_interval_secs: u64,
  #[serde(default = "default_export_label")]
  pub export_label:           String,
  /// `false` exports without the Category column.
  #[serde(default = "default_categories")]
  pub categories:             bool,
}

fn default_interval_secs() -> u64 {
  sked_core::reminder::DEFAULT_INTERVAL.as_secs()
}

fn default_export_label() -> String { sked_export::DEFAULT_LABEL.to_owned() }

fn default_categories() -> bool { true }

impl Settings {
  /// Load from `file` (or the default settings file, if present) and the
  /// environment. A missing file is not an error.
  pub fn load(file: Option<&Path>) -> Result<Self> {
    let file = file.map(Path::to_path_buf).or_else(default_settings_file);

    let mut builder = config::Config::builder();
    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    let settings: Settings = builder
      .add_source(config::Environment::with_prefix("SKED"))
      .build()
      .context("failed to read settings")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    if settings.reminder_interval_secs == 0 {
      bail!("reminder_interval_secs must be at least 1");
    }
    Ok(settings)
  }

  /// The configured data directory, or the per-user default.
  pub fn data_dir(&self) -> Result<PathBuf> {
    match &self.data_dir {
      Some(dir) => Ok(expand_tilde(dir)),
      None => default_data_dir()
        .context("cannot determine a home directory for the schedule store"),
    }
  }

  pub fn reminder_interval(&self) -> Duration {
    Duration::from_secs(self.reminder_interval_secs)
  }
}

fn default_settings_file() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("sked").join("config.toml"))
}

/// `<Documents>/ScheduleManager`, falling back to `~/Documents` when the
/// platform has no documents directory configured.
fn default_data_dir() -> Option<PathBuf> {
  dirs::document_dir()
    .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
    .map(|docs| docs.join("ScheduleManager"))
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  if let Ok(rest) = path.strip_prefix("~")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      "data_dir = \"/srv/sked\"\nreminder_interval_secs = 5\ncategories = false\n",
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.data_dir().unwrap(), PathBuf::from("/srv/sked"));
    assert_eq!(settings.reminder_interval(), Duration::from_secs(5));
    assert_eq!(settings.export_label, "schedule_export");
    assert!(!settings.categories);
  }

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(settings.reminder_interval_secs, 60);
    assert!(settings.categories);
  }

  #[test]
  fn zero_interval_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "reminder_interval_secs = 0\n").unwrap();
    assert!(Settings::load(Some(&path)).is_err());
  }

  #[test]
  fn tilde_is_expanded() {
    let Some(home) = dirs::home_dir() else { return };
    assert_eq!(expand_tilde(Path::new("~/sked")), home.join("sked"));
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}
