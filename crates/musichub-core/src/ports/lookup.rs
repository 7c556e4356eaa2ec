use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::artist::Artist;
use crate::domain::priority::SourcePriority;
use crate::domain::track::{ArtistCredit, Track, TrackStatus};
use crate::domain::{Isrc, Source, SourceType};
use crate::errors::DomainError;

/// Fallo real de un colaborador externo. "No encontrado" no es un error:
/// se representa con `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
  #[error("source {0} is unavailable: {1}")]
  Unavailable(SourceType, String),
  #[error("source {0} does not support this lookup")]
  Unsupported(SourceType),
  #[error("invalid response from {0}: {1}")]
  InvalidResponse(SourceType, String),
}

/// Parte común de todos los colaboradores: qué tipos de fuente atienden.
pub trait SourceLookup: Send + Sync {
  fn supports(&self, source_type: &SourceType) -> bool;
}

/// Búsqueda de artistas en una plataforma externa.
#[async_trait]
pub trait ArtistLookup: SourceLookup {
  async fn find_by_name(&self, name: &str, source_type: &SourceType) -> Result<Option<Artist>, LookupError>;

  async fn find_by_external_id(
    &self,
    external_id: &str,
    source_type: &SourceType,
  ) -> Result<Option<Artist>, LookupError>;
}

/// Metadatos de una grabación tal como los devuelve una plataforma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTrackMetadata {
  pub isrc: Isrc,
  pub title: String,
  pub credits: Vec<ArtistCredit>,
  pub source: Source,
}

impl ExternalTrackMetadata {
  pub fn into_track(self, status: TrackStatus) -> Result<Track, DomainError> {
    Track::new(self.isrc, &self.title, self.credits, vec![self.source], status)
  }
}

#[async_trait]
pub trait TrackMetadataLookup: SourceLookup {
  async fn find_by_isrc(
    &self,
    isrc: &Isrc,
    source_type: &SourceType,
  ) -> Result<Option<ExternalTrackMetadata>, LookupError>;
}

/// Colaboradores registrados para un contexto, consultables por tipo.
pub struct LookupRegistry<L: ?Sized> {
  lookups: Vec<Arc<L>>,
}

impl<L: SourceLookup + ?Sized> LookupRegistry<L> {
  pub fn new() -> Self {
    Self { lookups: Vec::new() }
  }

  pub fn register(&mut self, lookup: Arc<L>) {
    self.lookups.push(lookup);
  }

  pub fn with(mut self, lookup: Arc<L>) -> Self {
    self.register(lookup);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.lookups.is_empty()
  }

  /// Primer colaborador registrado que atiende `source_type`.
  pub fn for_type(&self, source_type: &SourceType) -> Option<Arc<L>> {
    self.lookups.iter().find(|l| l.supports(source_type)).cloned()
  }

  /// Plan de consulta: cada tipo de la tabla, en orden, con su colaborador.
  /// Los tipos sin colaborador se omiten.
  pub fn plan(&self, priority: &dyn SourcePriority) -> Vec<(SourceType, Arc<L>)> {
    priority
      .priority_order()
      .iter()
      .filter_map(|ty| self.for_type(ty).map(|lookup| (ty.clone(), lookup)))
      .collect()
  }
}

impl<L: SourceLookup + ?Sized> Default for LookupRegistry<L> {
  fn default() -> Self {
    Self::new()
  }
}
