use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{Uuid, uuid};

use crate::domain::codes::{Isrc, ProducerCode};
use crate::errors::DomainError;

/// Namespace de los identificadores de productor.
///
/// Las constantes de namespace son locales a musichub y no deben regenerarse:
/// cualquier identificador ya persistido depende de estos bytes exactos.
pub const PRODUCER_NAMESPACE: Uuid = uuid!("550e8400-e29b-41d4-a716-446655440001");
/// Namespace de los identificadores de artista.
pub const ARTIST_NAMESPACE: Uuid = uuid!("550e8400-e29b-41d4-a716-446655440002");
/// Namespace de los identificadores de pista.
pub const TRACK_NAMESPACE: Uuid = uuid!("550e8400-e29b-41d4-a716-446655440003");

/// Deriva un identificador estable a partir de una clave canónica.
///
/// UUID versión 5 (RFC 4122): SHA-1 sobre los 16 bytes del namespace seguidos
/// de los bytes UTF-8 de la clave, con los bits de versión y variante
/// ajustados. Misma clave ⇒ mismo identificador, sin coordinación ni E/S.
pub fn derive_id(namespace: &Uuid, canonical_key: &str) -> Uuid {
  Uuid::new_v5(namespace, canonical_key.as_bytes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistId(Uuid);

impl ArtistId {
  /// Identificador determinista a partir del nombre del artista (recortado).
  pub fn from_name(name: &str) -> Result<Self, DomainError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(DomainError::invalid("artist name", "must not be blank"));
    }
    Ok(ArtistId(derive_id(&ARTIST_NAMESPACE, name)))
  }

  pub fn from_uuid(u: Uuid) -> Self {
    ArtistId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl From<Uuid> for ArtistId {
  fn from(u: Uuid) -> Self {
    ArtistId(u)
  }
}

impl From<ArtistId> for Uuid {
  fn from(id: ArtistId) -> Self {
    id.0
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador de un productor.
///
/// Está *totalmente* determinado por su [`ProducerCode`]: dos procesos que
/// derivan el productor del mismo código convergen en el mismo id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProducerId(Uuid);

impl ProducerId {
  pub fn from_producer_code(code: &ProducerCode) -> Self {
    ProducerId(derive_id(&PRODUCER_NAMESPACE, code.as_str()))
  }

  pub fn from_uuid(u: Uuid) -> Self {
    ProducerId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl From<ProducerId> for Uuid {
  fn from(id: ProducerId) -> Self {
    id.0
  }
}

impl fmt::Display for ProducerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador de una grabación, derivado de su ISRC canónico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
  pub fn from_isrc(isrc: &Isrc) -> Self {
    TrackId(derive_id(&TRACK_NAMESPACE, isrc.as_str()))
  }

  pub fn from_uuid(u: Uuid) -> Self {
    TrackId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl From<TrackId> for Uuid {
  fn from(id: TrackId) -> Self {
    id.0
  }
}

impl fmt::Display for TrackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
