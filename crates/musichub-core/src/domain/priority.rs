use std::cmp::Ordering;

use crate::domain::source::SourceType;

/// Tabla de prioridad de fuentes para un contexto concreto.
///
/// El orden es de mayor a menor prioridad. Un tipo que no aparece en la tabla
/// (p. ej. [`SourceType::Other`]) queda detrás de todos los conocidos.
pub trait SourcePriority: Send + Sync {
  fn priority_order(&self) -> &'static [SourceType];

  /// Posición en la tabla; `usize::MAX` si el tipo no está.
  fn rank(&self, source_type: &SourceType) -> usize {
    self.priority_order().iter().position(|t| t == source_type).unwrap_or(usize::MAX)
  }

  fn has_higher_priority(&self, a: &SourceType, b: &SourceType) -> bool {
    self.rank(a) < self.rank(b)
  }

  /// `Ordering::Less` significa "más prioritario".
  fn compare(&self, a: &SourceType, b: &SourceType) -> Ordering {
    self.rank(a).cmp(&self.rank(b))
  }
}

static ARTIST_ORDER: [SourceType; 5] =
  [SourceType::Manual, SourceType::Tidal, SourceType::Spotify, SourceType::Deezer, SourceType::AppleMusic];

static PRODUCER_ORDER: [SourceType; 5] =
  [SourceType::Manual, SourceType::Spotify, SourceType::Tidal, SourceType::Deezer, SourceType::AppleMusic];

/// Contexto artista: MANUAL > TIDAL > SPOTIFY > DEEZER > APPLE_MUSIC.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtistSourcePriority;

impl SourcePriority for ArtistSourcePriority {
  fn priority_order(&self) -> &'static [SourceType] {
    &ARTIST_ORDER
  }
}

/// Contexto productor/pista: MANUAL > SPOTIFY > TIDAL > DEEZER > APPLE_MUSIC.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProducerSourcePriority;

impl SourcePriority for ProducerSourcePriority {
  fn priority_order(&self) -> &'static [SourceType] {
    &PRODUCER_ORDER
  }
}
