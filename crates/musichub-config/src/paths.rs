use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que fuerza un directorio base (modo portable, tests).
pub const BASE_DIR_ENV: &str = "MUSICHUB_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("toml encode error: {0}")]
  TomlEncode(#[from] toml::ser::Error),
  #[error("toml document error: {0}")]
  TomlDocument(#[from] toml_edit::TomlError),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("missing section [{section}] in {path}")]
  MissingSection { section: String, path: PathBuf },
  #[error("invalid section [{section}]: {reason}")]
  InvalidSection { section: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct MusichubPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl MusichubPaths {
  /// `MUSICHUB_BASE_DIR` si está definida; si no, los directorios del sistema.
  pub fn detect() -> Result<Self, ConfigError> {
    match std::env::var_os(BASE_DIR_ENV) {
      Some(base) => Self::at(base),
      None => {
        let proj_dirs = ProjectDirs::from("com", "musichub", "musichub").ok_or(ConfigError::Directories)?;
        Self::create(Self {
          base_dir: proj_dirs.config_dir().to_path_buf(),
          config_dir: proj_dirs.config_dir().to_path_buf(),
          data_dir: proj_dirs.data_dir().to_path_buf(),
          cache_dir: proj_dirs.cache_dir().to_path_buf(),
        })
      }
    }
  }

  /// Estructura portable bajo `base`: `config/`, `data/` y `cache/`.
  pub fn at(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let base: PathBuf = base.into();
    Self::create(Self {
      config_dir: base.join("config"),
      data_dir: base.join("data"),
      cache_dir: base.join("cache"),
      base_dir: base,
    })
  }

  fn create(paths: Self) -> Result<Self, ConfigError> {
    for dir in [&paths.config_dir, &paths.data_dir, &paths.cache_dir] {
      std::fs::create_dir_all(dir)?;
    }
    Ok(paths)
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("musichub.toml")
  }

  pub fn data_file(&self, name: impl AsRef<Path>) -> PathBuf {
    self.data_dir.join(name)
  }
}
