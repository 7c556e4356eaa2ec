use tracing::{debug, info, warn};

use crate::domain::SourceType;
use crate::domain::artist::Artist;
use crate::domain::events::ArtistWasVerified;
use crate::domain::priority::ArtistSourcePriority;
use crate::errors::CoreError;
use crate::ports::{ArtistLookup, ArtistRepository, EventSink, LookupRegistry};
use crate::services::reconciliation::{ReconciliationConfig, ReconciliationState, probe};

/// Verifica artistas provisionales contra las fuentes externas, en el orden
/// de prioridad de artistas.
pub struct ArtistEnrichmentService<R, E>
where
  R: ArtistRepository,
  E: EventSink,
{
  repo: R,
  lookups: LookupRegistry<dyn ArtistLookup>,
  events: E,
  config: ReconciliationConfig,
}

impl<R, E> ArtistEnrichmentService<R, E>
where
  R: ArtistRepository,
  E: EventSink,
{
  pub fn new(repo: R, lookups: LookupRegistry<dyn ArtistLookup>, events: E, config: ReconciliationConfig) -> Self {
    Self { repo, lookups, events, config }
  }

  pub fn repository(&self) -> &R {
    &self.repo
  }

  /// Devuelve el artista verificado o, si ninguna fuente lo conoce, el
  /// mismo artista provisional sin persistir nada.
  pub async fn enrich(&self, artist: Artist) -> Result<Artist, CoreError> {
    Ok(self.reconcile(artist).await?.0)
  }

  /// Como [`enrich`](Self::enrich), devolviendo además el estado final.
  pub async fn reconcile(&self, artist: Artist) -> Result<(Artist, ReconciliationState), CoreError> {
    if artist.is_verified() {
      debug!(artist_id = %artist.id(), "artist already verified, skipping lookups");
      return Ok((artist, ReconciliationState::NotStarted));
    }

    let name = artist.name().to_string();
    let plan = self.lookups.plan(&ArtistSourcePriority);
    let outcome = probe(plan, self.config.lookup_timeout(), |lookup, source_type| {
      let name = name.clone();
      async move { lookup.find_by_name(&name, &source_type).await }
    })
    .await;

    match outcome.hit {
      Some((source_type, found)) => {
        let verified = self.apply_hit(artist, &source_type, &found).await?;
        Ok((verified, outcome.state))
      }
      None => {
        info!(artist_id = %artist.id(), state = ?outcome.state, "no source knows the artist, left provisional");
        Ok((artist, outcome.state))
      }
    }
  }

  /// Consulta sólo el colaborador de `source_type` por id externo.
  pub async fn enrich_by_external_id(
    &self,
    artist: Artist,
    source_type: SourceType,
    external_id: &str,
  ) -> Result<Artist, CoreError> {
    let Some(lookup) = self.lookups.for_type(&source_type) else {
      warn!(artist_id = %artist.id(), source = %source_type, "no lookup registered for source");
      return Ok(artist);
    };

    let external_id = external_id.trim().to_string();
    let outcome = probe(vec![(source_type, lookup)], self.config.lookup_timeout(), |lookup, source_type| {
      let external_id = external_id.clone();
      async move { lookup.find_by_external_id(&external_id, &source_type).await }
    })
    .await;

    match outcome.hit {
      Some((source_type, found)) => self.apply_hit(artist, &source_type, &found).await,
      None => Ok(artist),
    }
  }

  async fn apply_hit(&self, artist: Artist, source_type: &SourceType, found: &Artist) -> Result<Artist, CoreError> {
    let was_provisional = !artist.is_verified();
    let mut merged = artist.merge_sources_from(found).update_name_from_source(found.name().clone(), source_type);
    if was_provisional {
      merged = merged.mark_as_verified()?;
    }

    // Si la publicación falla no se persiste nada y el artista sigue provisional.
    if was_provisional {
      info!(artist_id = %merged.id(), source = %source_type, "artist verified");
      self.events.publish(ArtistWasVerified::from(&merged).into()).await?;
    } else {
      debug!(artist_id = %merged.id(), source = %source_type, "merged sources into verified artist");
    }

    self.repo.save(&merged)?;
    Ok(merged)
  }
}
