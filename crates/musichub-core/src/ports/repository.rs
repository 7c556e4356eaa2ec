use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::artist::Artist;
use crate::domain::producer::Producer;
use crate::domain::track::Track;
use crate::domain::{ArtistId, Isrc, ProducerCode, ProducerId};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
  #[error("entity not found")]
  NotFound,
  #[error("storage error: {0}")]
  Storage(String),
}

/// Persistencia de artistas.
///
/// `save` es idempotente: guardar dos veces el mismo contenido deja el mismo
/// estado. Entre escrituras concurrentes gana la última.
pub trait ArtistRepository: Send + Sync {
  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError>;
  /// Búsqueda exacta por nombre (ya recortado).
  fn find_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError>;
  fn save(&self, artist: &Artist) -> Result<(), RepoError>;
}

pub trait ProducerRepository: Send + Sync {
  fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepoError>;
  fn find_by_producer_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError>;
  fn save(&self, producer: &Producer) -> Result<(), RepoError>;
}

/// Pista junto con su productor y el momento en que se registró.
#[derive(Debug, Clone)]
pub struct TrackInfo {
  pub track: Track,
  pub producer_id: ProducerId,
  pub submitted_at: DateTime<Utc>,
}

pub trait TrackRepository: Send + Sync {
  fn find_by_isrc(&self, isrc: &Isrc) -> Result<Option<Track>, RepoError>;
  /// Inserta o actualiza. La fecha de alta se conserva en las actualizaciones.
  fn save(&self, track: &Track) -> Result<(), RepoError>;
  /// Pistas más recientes primero.
  fn find_recent(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError>;
}

impl<T: ArtistRepository + ?Sized> ArtistRepository for Arc<T> {
  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    (**self).find_by_id(id)
  }

  fn find_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError> {
    (**self).find_by_name(name)
  }

  fn save(&self, artist: &Artist) -> Result<(), RepoError> {
    (**self).save(artist)
  }
}

impl<T: ProducerRepository + ?Sized> ProducerRepository for Arc<T> {
  fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepoError> {
    (**self).find_by_id(id)
  }

  fn find_by_producer_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError> {
    (**self).find_by_producer_code(code)
  }

  fn save(&self, producer: &Producer) -> Result<(), RepoError> {
    (**self).save(producer)
  }
}

impl<T: TrackRepository + ?Sized> TrackRepository for Arc<T> {
  fn find_by_isrc(&self, isrc: &Isrc) -> Result<Option<Track>, RepoError> {
    (**self).find_by_isrc(isrc)
  }

  fn save(&self, track: &Track) -> Result<(), RepoError> {
    (**self).save(track)
  }

  fn find_recent(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError> {
    (**self).find_recent(limit)
  }
}
