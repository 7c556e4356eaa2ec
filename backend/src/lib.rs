mod config;
mod dto;
mod infrastructure;

use std::sync::Arc;

use musichub_core::CoreError;
use musichub_core::domain::ProducerCode;
use musichub_core::domain::artist::Artist;
use musichub_core::domain::events::DomainEvent;
use musichub_core::domain::producer::Producer;
use musichub_core::ports::{ArtistLookup, ArtistRepository, LookupRegistry, TrackInfo, TrackMetadataLookup};
use musichub_core::services::{
  ArtistEnrichmentService, ArtistTrackRegistrationService, RecentTracksService, ReconciliationConfig,
  ReconciliationState, RegisterTrack, Registration, TrackRegistrationService,
};
use musichub_storage::{SqliteStore, StorageConfig};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

pub use config::{CatalogConfig, LoggingConfig};
pub use dto::{EnrichmentDto, RegistrationDto, TrackInfoDto};
pub use infrastructure::catalog::ManualCatalog;
pub use infrastructure::events::ChannelEventSink;

type TrackService = TrackRegistrationService<SqliteStore, SqliteStore, ChannelEventSink>;
type ArtistService = ArtistTrackRegistrationService<SqliteStore, ChannelEventSink>;

/// Servicios del núcleo cableados sobre SQLite, el catálogo manual y el
/// canal de eventos en proceso.
pub struct App {
  tracks: TrackService,
  artists: ArtistService,
  recent: RecentTracksService<SqliteStore>,
  events: UnboundedReceiver<DomainEvent>,
}

impl App {
  pub fn new(store: SqliteStore, catalog: ManualCatalog, config: ReconciliationConfig) -> Self {
    let (sink, events) = ChannelEventSink::new();
    let catalog = Arc::new(catalog);

    let track_lookups = LookupRegistry::<dyn TrackMetadataLookup>::new().with(catalog.clone());
    let artist_lookups = LookupRegistry::<dyn ArtistLookup>::new().with(catalog);

    let tracks = TrackRegistrationService::new(store.clone(), store.clone(), track_lookups, sink.clone(), config);
    let enrichment = ArtistEnrichmentService::new(store.clone(), artist_lookups, sink, config);
    let artists = ArtistTrackRegistrationService::new(enrichment);
    let recent = RecentTracksService::new(store);

    Self { tracks, artists, recent, events }
  }

  /// Carga `[storage]`, `[reconciliation]` y `[catalog]` y abre la base de datos.
  pub fn from_config() -> anyhow::Result<Self> {
    let storage = StorageConfig::load()?;
    let reconciliation = config::load_reconciliation()?;
    let catalog = ManualCatalog::from_config(&CatalogConfig::load()?)?;
    info!(
      artists = catalog.artist_count(),
      tracks = catalog.track_count(),
      timeout_ms = reconciliation.lookup_timeout_ms,
      "manual catalog loaded"
    );

    let store = SqliteStore::open(&storage)?;
    Ok(Self::new(store, catalog, reconciliation))
  }

  pub async fn register_track(&mut self, command: RegisterTrack) -> Result<Registration, CoreError> {
    let registration = self.tracks.register(command).await?;
    self.drain_events().await;
    Ok(registration)
  }

  /// Enriquece el artista guardado con ese nombre; si no existe se parte de
  /// uno provisional, que sólo se persiste si alguna fuente lo conoce.
  pub async fn enrich_artist(&mut self, name: &str) -> Result<(Artist, ReconciliationState), CoreError> {
    let artist = match self.find_artist(name)? {
      Some(artist) => artist,
      None => Artist::create_provisional(name)?,
    };
    let result = self.artists.enrichment().reconcile(artist).await?;
    self.drain_events().await;
    Ok(result)
  }

  pub fn recent_tracks(&self, limit: Option<usize>) -> Result<Vec<TrackInfo>, CoreError> {
    self.recent.recent_tracks(limit)
  }

  pub fn find_artist(&self, name: &str) -> Result<Option<Artist>, CoreError> {
    Ok(self.artists.enrichment().repository().find_by_name(name.trim())?)
  }

  pub fn find_producer(&self, code: &str) -> Result<Option<Producer>, CoreError> {
    let code = ProducerCode::parse(code)?;
    self.tracks.producer(&code)
  }

  /// Entrega los eventos pendientes, incluidos los que se publiquen mientras
  /// tanto. Devuelve cuántos se procesaron.
  pub async fn drain_events(&mut self) -> usize {
    let mut handled = 0;
    while let Ok(event) = self.events.try_recv() {
      handled += 1;
      match event {
        DomainEvent::TrackWasRegistered(event) => match self.artists.handle_track_registration(&event).await {
          Ok(artists) => info!(isrc = %event.isrc, artists = artists.len(), "track credits linked to artists"),
          Err(e) => warn!(isrc = %event.isrc, error = %e, "failed to link track credits"),
        },
        DomainEvent::ArtistWasVerified(event) => {
          info!(artist_id = %event.artist_id, name = %event.name, sources = event.sources.len(), "artist verified");
        }
      }
    }
    handled
  }
}
