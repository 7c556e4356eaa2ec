use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item};
use tracing::debug;

use crate::paths::{ConfigError, MusichubPaths};

/// Acceso por secciones a un fichero de configuración. Cada crate es dueño
/// de su sección (`[storage]`, `[reconciliation]`...).
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  path: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(paths: &MusichubPaths) -> Self {
    Self { path: paths.config_file() }
  }

  pub fn with_file(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Como `load_section`, pero un fichero o una sección ausentes dan
  /// `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let Some(root) = self.read_root()? else {
      return Ok(T::default());
    };
    match root.get(section) {
      Some(table) => decode(section, table),
      None => Ok(T::default()),
    }
  }

  fn read_root(&self) -> Result<Option<toml::Value>, ConfigError> {
    match fs::read_to_string(&self.path) {
      Ok(content) => Ok(Some(toml::from_str(&content)?)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}

fn decode<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table
    .clone()
    .try_into()
    .map_err(|e| ConfigError::InvalidSection { section: section.to_string(), reason: e.to_string() })
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let root = self.read_root()?.ok_or_else(|| ConfigError::MissingSection {
      section: section.to_string(),
      path: self.path.clone(),
    })?;
    let table = root
      .get(section)
      .ok_or_else(|| ConfigError::MissingSection { section: section.to_string(), path: self.path.clone() })?;
    decode(section, table)
  }

  /// Reemplaza sólo `[section]`; el resto del documento (comentarios
  /// incluidos) se conserva.
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut doc: DocumentMut = match fs::read_to_string(&self.path) {
      Ok(content) => content.parse()?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // "clave = valor\n..." sin cabecera: se parsea como documento y se
    // inserta como tabla.
    let section_item: Item = toml::to_string(value)?.parse::<DocumentMut>()?.into_item();
    doc[section] = section_item;

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    atomic_write_str(&self.path, &doc.to_string())?;
    debug!(section, path = %self.path.display(), "config section saved");
    Ok(())
  }
}

/// Escribe en `<path>.tmp`, sincroniza y renombra sobre `path`.
fn atomic_write_str(path: &Path, contents: &str) -> std::io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use tempfile::tempdir;

  #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
  struct Section {
    timeout_ms: u64,
    name: String,
  }

  #[test]
  fn missing_file_yields_default() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::with_file(tmp.path().join("musichub.toml"));

    let section: Section = backend.load_section_with_default("demo").unwrap();
    assert_eq!(section, Section::default());
    assert!(matches!(backend.load_section::<Section>("demo"), Err(ConfigError::MissingSection { .. })));
  }

  #[test]
  fn save_then_load_round_trips_and_keeps_comments() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("musichub.toml");
    fs::write(&path, "# cabecera\n[other]\n# nota\nkeep = true\n").unwrap();
    let backend = TomlConfigBackend::with_file(&path);

    let value = Section { timeout_ms: 250, name: "tidal".into() };
    backend.save_section("demo", &value).unwrap();

    assert_eq!(backend.load_section::<Section>("demo").unwrap(), value);
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("# cabecera"));
    assert!(raw.contains("# nota"));
    assert!(raw.contains("keep = true"));
    assert!(!path.with_extension("tmp").exists());
  }

  #[test]
  fn malformed_section_is_reported() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("musichub.toml");
    fs::write(&path, "[demo]\ntimeout_ms = \"soon\"\nname = \"x\"\n").unwrap();
    let backend = TomlConfigBackend::with_file(&path);

    let err = backend.load_section_with_default::<Section>("demo").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSection { ref section, .. } if section == "demo"));
  }
}
