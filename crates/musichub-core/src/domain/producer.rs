use serde::Serialize;

use crate::domain::codes::{Isrc, ProducerCode};
use crate::domain::ids::ProducerId;
use crate::domain::track::Track;
use crate::errors::DomainError;

/// Agregado productor (registrante ISRC).
///
/// El `id` depende sólo del código, así que dos registros concurrentes del
/// mismo código producen el mismo productor. `tracks` conserva el orden de
/// alta y no admite duplicados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Producer {
  id: ProducerId,
  code: ProducerCode,
  name: Option<String>,
  tracks: Vec<Isrc>,
}

impl Producer {
  pub fn create_new(code: ProducerCode, name: Option<&str>) -> Self {
    Self { id: ProducerId::from_producer_code(&code), code, name: clean_name(name), tracks: Vec::new() }
  }

  /// Reconstruye un productor persistido. El id se vuelve a derivar del código.
  pub fn restore(code: ProducerCode, name: Option<String>, tracks: Vec<Isrc>) -> Self {
    let producer = Self::create_new(code, name.as_deref());
    tracks.iter().fold(producer, |p, isrc| p.add_track(isrc).0)
  }

  pub fn id(&self) -> ProducerId {
    self.id
  }

  pub fn code(&self) -> &ProducerCode {
    &self.code
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn tracks(&self) -> &[Isrc] {
    &self.tracks
  }

  pub fn has_track(&self, isrc: &Isrc) -> bool {
    self.tracks.contains(isrc)
  }

  /// Añade un ISRC al catálogo. El booleano indica si era nuevo.
  pub fn add_track(mut self, isrc: &Isrc) -> (Self, bool) {
    if self.has_track(isrc) {
      return (self, false);
    }
    self.tracks.push(isrc.clone());
    (self, true)
  }

  /// Como [`Producer::add_track`], pero comprueba que la pista pertenezca a
  /// este productor.
  pub fn add_track_entity(self, track: &Track) -> Result<(Self, bool), DomainError> {
    let track_code = track.producer_code();
    if track_code != self.code {
      return Err(DomainError::ProducerCodeMismatch {
        isrc: track.isrc().to_string(),
        track_code: track_code.to_string(),
        producer_code: self.code.to_string(),
      });
    }
    Ok(self.add_track(track.isrc()))
  }

  pub fn rename(self, name: Option<&str>) -> Self {
    Self { name: clean_name(name), ..self }
  }
}

fn clean_name(name: Option<&str>) -> Option<String> {
  name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}
