// crates/musichub-core/src/errors.rs
use thiserror::Error;

use crate::domain::ids::ArtistId;
use crate::ports::events::EventError;
use crate::ports::repository::RepoError;

/// Errores del propio dominio: validación de entradas e invariantes rotas.
///
/// Las variantes `Invalid*` se rechazan antes de derivar cualquier
/// identificador y no tiene sentido reintentarlas. `AlreadyVerified` y
/// `ProducerCodeMismatch` indican un error de programación o de datos.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
  #[error("invalid ISRC '{0}': expected 2 letters, 3 alphanumerics and 7 digits")]
  InvalidIsrc(String),

  #[error("invalid producer code '{0}'")]
  InvalidProducerCode(String),

  #[error("invalid {field}: {reason}")]
  Invalid { field: &'static str, reason: String },

  #[error("artist {0} is already verified")]
  AlreadyVerified(ArtistId),

  #[error("track {isrc} belongs to producer {track_code}, not to {producer_code}")]
  ProducerCodeMismatch { isrc: String, track_code: String, producer_code: String },
}

impl DomainError {
  pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    DomainError::Invalid { field, reason: reason.into() }
  }

  /// `true` para entradas mal formadas (ISRC, códigos, nombres en blanco...).
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      DomainError::InvalidIsrc(_) | DomainError::InvalidProducerCode(_) | DomainError::Invalid { .. }
    )
  }
}

/// Error genérico del núcleo de musichub.
///
/// Las capas superiores (CLI, adaptadores...) deberían mapear este error
/// a mensajes de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error(transparent)]
  Domain(#[from] DomainError),

  #[error("repository error: {0}")]
  Repository(#[from] RepoError),

  #[error("event sink error: {0}")]
  Events(#[from] EventError),

  #[error("no external source returned metadata for ISRC {isrc}")]
  ExternalService { isrc: String },
}
