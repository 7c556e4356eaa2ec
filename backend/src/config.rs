use musichub_config::{ConfigBackend, ConfigError, config_backend};
use musichub_core::services::ReconciliationConfig;
use serde::{Deserialize, Serialize};

/// `[logging]`: directiva por defecto del `EnvFilter`. `RUST_LOG` tiene prioridad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  pub filter: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self { filter: "info".to_string() }
  }
}

impl LoggingConfig {
  const SECTION: &'static str = "logging";

  pub fn load() -> Result<Self, ConfigError> {
    config_backend()?.load_section_with_default(Self::SECTION)
  }
}

/// Lee `[reconciliation]` y deja escritos los valores por defecto.
pub fn load_reconciliation() -> Result<ReconciliationConfig, ConfigError> {
  let backend = config_backend()?;
  let cfg: ReconciliationConfig = backend.load_section_with_default("reconciliation")?;
  backend.save_section("reconciliation", &cfg)?;
  Ok(cfg)
}

/// Artista curado a mano en `[[catalog.artists]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogArtist {
  pub id: String,
  pub name: String,
}

/// Pista curada a mano en `[[catalog.tracks]]`. Sin `id`, el id externo es el ISRC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
  pub isrc: String,
  pub title: String,
  pub artists: Vec<String>,
  #[serde(default)]
  pub id: Option<String>,
}

/// `[catalog]`: respaldo de la fuente `MANUAL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
  pub artists: Vec<CatalogArtist>,
  pub tracks: Vec<CatalogTrack>,
}

impl CatalogConfig {
  const SECTION: &'static str = "catalog";

  pub fn load() -> Result<Self, ConfigError> {
    config_backend()?.load_section_with_default(Self::SECTION)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use musichub_config::TomlConfigBackend;

  #[test]
  fn catalog_section_parses_arrays_of_tables() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("musichub.toml");
    std::fs::write(
      &file,
      r#"
[logging]
filter = "musichub=debug"

[[catalog.artists]]
id = "m-1"
name = "Daft Punk"

[[catalog.tracks]]
isrc = "FR-LA1-24-00001"
title = "One More Time"
artists = ["Daft Punk"]
"#,
    )
    .unwrap();
    let backend = TomlConfigBackend::with_file(&file);

    let catalog: CatalogConfig = backend.load_section_with_default("catalog").unwrap();
    let logging: LoggingConfig = backend.load_section_with_default("logging").unwrap();

    assert_eq!(catalog.artists, [CatalogArtist { id: "m-1".into(), name: "Daft Punk".into() }]);
    assert_eq!(catalog.tracks[0].id, None);
    assert_eq!(logging.filter, "musichub=debug");
  }

  #[test]
  fn missing_sections_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let backend = TomlConfigBackend::with_file(dir.path().join("absent.toml"));

    let catalog: CatalogConfig = backend.load_section_with_default("catalog").unwrap();
    let logging: LoggingConfig = backend.load_section_with_default("logging").unwrap();

    assert_eq!(catalog, CatalogConfig::default());
    assert_eq!(logging.filter, "info");
  }
}
