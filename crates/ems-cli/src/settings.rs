//! Application settings: `config.toml` merged with the `EMS_` environment
//! prefix, every field defaulted.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ems_core::insight::InsightConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
  pub db_path:             PathBuf,
  pub theme:               String,
  pub auto_backup:         bool,
  pub notification_sound:  bool,
  pub show_tooltips:       bool,
  /// Advisory retention horizon in days. Nothing is deleted automatically;
  /// the value is surfaced so an operator can act on it.
  pub data_retention_days: u32,
  pub insights:            InsightConfig,
}

impl Default for AppSettings {
  fn default() -> Self {
    Self {
      db_path:             PathBuf::from("ems.db"),
      theme:               "light".to_owned(),
      auto_backup:         true,
      notification_sound:  true,
      show_tooltips:       true,
      data_retention_days: 365,
      insights:            InsightConfig::default(),
    }
  }
}

pub fn load(path: &Path) -> anyhow::Result<AppSettings> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("EMS"))
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise settings")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let settings = load(Path::new("/nonexistent/config.toml")).unwrap();
    assert_eq!(settings.db_path, PathBuf::from("ems.db"));
    assert_eq!(settings.data_retention_days, 365);
    assert_eq!(settings.insights.turnover_alert_pct, 10.0);
  }
}
