use tracing::{debug, info, warn};

use crate::domain::artist::{Artist, Contribution};
use crate::domain::events::{ArtistCreditInfo, TrackWasRegistered};
use crate::domain::{ArtistId, Isrc};
use crate::errors::CoreError;
use crate::ports::{ArtistRepository, EventSink};
use crate::services::artist_enrichment::ArtistEnrichmentService;

/// Reacciona a `TrackWasRegistered` desde el contexto artista: cada crédito
/// acaba siendo un artista (provisional si no existía) con la contribución
/// anotada.
pub struct ArtistTrackRegistrationService<R, E>
where
  R: ArtistRepository,
  E: EventSink,
{
  enrichment: ArtistEnrichmentService<R, E>,
}

impl<R, E> ArtistTrackRegistrationService<R, E>
where
  R: ArtistRepository,
  E: EventSink,
{
  pub fn new(enrichment: ArtistEnrichmentService<R, E>) -> Self {
    Self { enrichment }
  }

  pub fn enrichment(&self) -> &ArtistEnrichmentService<R, E> {
    &self.enrichment
  }

  /// Devuelve los artistas acreditados, en el orden de los créditos.
  ///
  /// Un fallo al enriquecer se registra y no interrumpe el resto.
  pub async fn handle_track_registration(&self, event: &TrackWasRegistered) -> Result<Vec<Artist>, CoreError> {
    let isrc = Isrc::parse(&event.isrc)?;
    let contribution = Contribution::for_track(isrc, &event.title)?;
    let repo = self.enrichment.repository();

    let mut artists = Vec::with_capacity(event.artist_credits.len());
    for credit in &event.artist_credits {
      let artist = self.find_or_create(credit)?.add_contribution(contribution.clone());
      repo.save(&artist)?;
      debug!(artist_id = %artist.id(), isrc = %event.isrc, "contribution recorded");

      let artist = if artist.is_verified() {
        artist
      } else {
        match self.enrichment.enrich(artist.clone()).await {
          Ok(enriched) => enriched,
          Err(e) => {
            warn!(artist_id = %artist.id(), error = %e, "artist enrichment failed, keeping provisional artist");
            artist
          }
        }
      };
      artists.push(artist);
    }

    info!(isrc = %event.isrc, artists = artists.len(), "track registration handled for credited artists");
    Ok(artists)
  }

  fn find_or_create(&self, credit: &ArtistCreditInfo) -> Result<Artist, CoreError> {
    let repo = self.enrichment.repository();

    let id = match credit.artist_id {
      Some(id) => id,
      None => ArtistId::from_name(&credit.artist_name)?,
    };
    if let Some(artist) = repo.find_by_id(id)? {
      return Ok(artist);
    }
    if credit.artist_id.is_some() {
      warn!(artist_id = %id, name = %credit.artist_name, "credited artist id not found, matching by name");
    }
    if let Some(artist) = repo.find_by_name(credit.artist_name.trim())? {
      return Ok(artist);
    }

    let artist = Artist::create_provisional(&credit.artist_name)?;
    info!(artist_id = %artist.id(), name = %artist.name(), "created provisional artist");
    Ok(artist)
  }
}
