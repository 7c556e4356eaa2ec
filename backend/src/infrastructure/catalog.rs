use async_trait::async_trait;
use musichub_core::DomainError;
use musichub_core::domain::artist::Artist;
use musichub_core::domain::track::{ArtistCredit, TrackStatus};
use musichub_core::domain::{Isrc, Source, SourceType};
use musichub_core::ports::{ArtistLookup, ExternalTrackMetadata, LookupError, SourceLookup, TrackMetadataLookup};

use crate::config::CatalogConfig;

/// Catálogo curado a mano: respalda la fuente `MANUAL` para artistas y pistas.
#[derive(Debug, Clone, Default)]
pub struct ManualCatalog {
  artists: Vec<Artist>,
  tracks: Vec<ExternalTrackMetadata>,
}

impl ManualCatalog {
  /// Valida todas las entradas; una sola entrada mala invalida el catálogo.
  pub fn from_config(config: &CatalogConfig) -> Result<Self, DomainError> {
    let artists = config
      .artists
      .iter()
      .map(|a| Ok(Artist::create_provisional(&a.name)?.add_source(Source::new(SourceType::Manual, &a.id)?)))
      .collect::<Result<Vec<_>, DomainError>>()?;

    let tracks = config
      .tracks
      .iter()
      .map(|t| {
        let isrc = Isrc::parse(&t.isrc)?;
        let credits = t.artists.iter().map(|name| ArtistCredit::with_name(name)).collect::<Result<Vec<_>, _>>()?;
        let external_id = t.id.clone().unwrap_or_else(|| isrc.to_string());
        let source = Source::new(SourceType::Manual, &external_id)?;
        let metadata = ExternalTrackMetadata { isrc, title: t.title.clone(), credits, source };
        // Misma validación que tendrá la pista al registrarse.
        metadata.clone().into_track(TrackStatus::Provisional)?;
        Ok(metadata)
      })
      .collect::<Result<Vec<_>, DomainError>>()?;

    Ok(Self { artists, tracks })
  }

  pub fn artist_count(&self) -> usize {
    self.artists.len()
  }

  pub fn track_count(&self) -> usize {
    self.tracks.len()
  }

  fn check(&self, source_type: &SourceType) -> Result<(), LookupError> {
    if self.supports(source_type) { Ok(()) } else { Err(LookupError::Unsupported(source_type.clone())) }
  }
}

impl SourceLookup for ManualCatalog {
  fn supports(&self, source_type: &SourceType) -> bool {
    *source_type == SourceType::Manual
  }
}

#[async_trait]
impl ArtistLookup for ManualCatalog {
  async fn find_by_name(&self, name: &str, source_type: &SourceType) -> Result<Option<Artist>, LookupError> {
    self.check(source_type)?;
    let name = name.trim();
    Ok(self.artists.iter().find(|a| a.name().as_str().eq_ignore_ascii_case(name)).cloned())
  }

  async fn find_by_external_id(
    &self,
    external_id: &str,
    source_type: &SourceType,
  ) -> Result<Option<Artist>, LookupError> {
    self.check(source_type)?;
    let external_id = external_id.trim();
    Ok(
      self
        .artists
        .iter()
        .find(|a| a.source(&SourceType::Manual).is_some_and(|s| s.external_id() == external_id))
        .cloned(),
    )
  }
}

#[async_trait]
impl TrackMetadataLookup for ManualCatalog {
  async fn find_by_isrc(
    &self,
    isrc: &Isrc,
    source_type: &SourceType,
  ) -> Result<Option<ExternalTrackMetadata>, LookupError> {
    self.check(source_type)?;
    Ok(self.tracks.iter().find(|t| &t.isrc == isrc).cloned())
  }
}
