use musichub_config::{ConfigBackend, ConfigError, config_backend, paths};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SECTION: &str = "storage";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,
  pub pool_size: u32,
}

impl Default for StorageConfig {
  fn default() -> Self {
    let db_path = paths().map(|p| p.data_file("musichub.db")).unwrap_or_else(|_| PathBuf::from("musichub.db"));
    StorageConfig { db_path, journal_mode: Some("WAL".to_string()), pool_size: 4 }
  }
}

impl StorageConfig {
  /// Carga `[storage]` y escribe de vuelta los valores por defecto que falten.
  pub fn load() -> Result<Self, ConfigError> {
    let backend = config_backend()?;
    let cfg = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    config_backend()?.save_section(SECTION, self)
  }
}
