mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{BASE_DIR_ENV, ConfigError, MusichubPaths};

use once_cell::sync::OnceCell;

static PATHS: OnceCell<MusichubPaths> = OnceCell::new();
static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Rutas del proceso (portable o de sistema), detectadas una sola vez.
pub fn paths() -> Result<&'static MusichubPaths, ConfigError> {
  PATHS.get_or_try_init(MusichubPaths::detect)
}

/// Backend de configuración compartido sobre `musichub.toml`.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| Ok(TomlConfigBackend::new(paths()?)))
}
