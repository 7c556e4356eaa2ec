use chrono::{SecondsFormat, Utc};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::StorageError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub(crate) type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub(crate) type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// PRAGMAs aplicados a cada conexión nueva del pool.
#[derive(Debug, Clone)]
struct SqlitePragmas {
  journal_mode: Option<String>,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = String::from("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;");
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// Catálogo SQLite: implementa los repositorios de artistas, productores y
/// pistas sobre un pool r2d2.
#[derive(Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  /// Abre (o crea) la base de datos y aplica las migraciones pendientes.
  pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }

    let manager = ConnectionManager::<SqliteConnection>::new(config.db_path.to_string_lossy());
    let pool = Pool::builder()
      .max_size(config.pool_size.max(1))
      .connection_customizer(Box::new(SqlitePragmas { journal_mode: config.journal_mode.clone() }))
      .build(manager)?;

    let store = Self { pool };
    store.migrate()?;
    info!(db = %config.db_path.display(), "storage ready");
    Ok(store)
  }

  fn migrate(&self) -> Result<(), StorageError> {
    let mut conn = self.conn()?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
    for version in applied {
      debug!(%version, "applied migration");
    }
    Ok(())
  }

  pub(crate) fn conn(&self) -> Result<Conn, StorageError> {
    Ok(self.pool.get()?)
  }
}

/// Marca de tiempo RFC 3339 en UTC, de ancho fijo.
pub(crate) fn now() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
