use musichub_core::ports::RepoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("connection pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),
  #[error("query error: {0}")]
  Query(#[from] diesel::result::Error),
  #[error("migration error: {0}")]
  Migration(String),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  /// Una fila no se puede convertir en un valor de dominio válido.
  #[error("corrupt row in {table}: {reason}")]
  Corrupt { table: &'static str, reason: String },
}

impl StorageError {
  pub(crate) fn corrupt(table: &'static str, reason: impl ToString) -> Self {
    StorageError::Corrupt { table, reason: reason.to_string() }
  }
}

impl From<StorageError> for RepoError {
  fn from(e: StorageError) -> Self {
    match e {
      StorageError::Query(diesel::result::Error::NotFound) => RepoError::NotFound,
      other => RepoError::Storage(other.to_string()),
    }
  }
}
