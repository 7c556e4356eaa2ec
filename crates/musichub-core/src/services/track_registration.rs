use chrono::Utc;
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::domain::events::TrackWasRegistered;
use crate::domain::priority::ProducerSourcePriority;
use crate::domain::producer::Producer;
use crate::domain::track::{ArtistCredit, Track, TrackStatus};
use crate::domain::{Isrc, ProducerCode, Source};
use crate::errors::CoreError;
use crate::ports::{
  EventSink, ExternalTrackMetadata, LookupRegistry, ProducerRepository, TrackMetadataLookup, TrackRepository,
};
use crate::services::reconciliation::{ReconciliationConfig, probe};

const SERVICE_NAME: &str = "producer";

/// Metadatos aportados directamente por quien registra la pista.
#[derive(Debug, Clone)]
pub struct SubmittedMetadata {
  pub title: String,
  pub artist_names: Vec<String>,
  pub source: Source,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterTrack {
  pub isrc: String,
  pub metadata: Option<SubmittedMetadata>,
  pub correlation_id: Option<String>,
}

impl RegisterTrack {
  pub fn new(isrc: impl Into<String>) -> Self {
    Self { isrc: isrc.into(), ..Self::default() }
  }

  pub fn with_metadata(mut self, metadata: SubmittedMetadata) -> Self {
    self.metadata = Some(metadata);
    self
  }

  pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
    self.correlation_id = Some(correlation_id.into());
    self
  }
}

#[derive(Debug, Clone)]
pub struct Registration {
  pub producer: Producer,
  pub track: Track,
  /// `true` si la pista no estaba en el catálogo del productor.
  pub changed: bool,
  pub correlation_id: String,
}

/// `<entrante>-producer-service`, o uno nuevo si no llega ninguno.
pub fn service_correlation_id(incoming: Option<&str>) -> String {
  match incoming.map(str::trim).filter(|c| !c.is_empty()) {
    Some(c) => format!("{c}-{SERVICE_NAME}-service"),
    None => format!("{SERVICE_NAME}-{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple()),
  }
}

/// Alta de pistas en el contexto productor.
pub struct TrackRegistrationService<P, T, E>
where
  P: ProducerRepository,
  T: TrackRepository,
  E: EventSink,
{
  producers: P,
  tracks: T,
  lookups: LookupRegistry<dyn TrackMetadataLookup>,
  events: E,
  config: ReconciliationConfig,
}

impl<P, T, E> TrackRegistrationService<P, T, E>
where
  P: ProducerRepository,
  T: TrackRepository,
  E: EventSink,
{
  pub fn new(
    producers: P,
    tracks: T,
    lookups: LookupRegistry<dyn TrackMetadataLookup>,
    events: E,
    config: ReconciliationConfig,
  ) -> Self {
    Self { producers, tracks, lookups, events, config }
  }

  /// Registra una pista por ISRC.
  ///
  /// 1. Valida y normaliza el ISRC.
  /// 2. Obtiene metadatos (del comando o de las fuentes, por prioridad de productor).
  /// 3. Carga o crea el productor y añade la pista.
  /// 4. Persiste la pista.
  /// 5. Publica `TrackWasRegistered` sólo si la pista era nueva.
  /// 6. Persiste el productor.
  ///
  /// El productor se guarda el último: mientras no liste la pista, un
  /// reintento tras cualquier fallo la vuelve a ver como nueva y publica el
  /// evento. La entrega es al menos una vez.
  pub async fn register(&self, command: RegisterTrack) -> Result<Registration, CoreError> {
    let correlation_id = service_correlation_id(command.correlation_id.as_deref());
    let span = info_span!("register_track", correlation_id = %correlation_id, isrc = %command.isrc);
    self.register_inner(command, correlation_id).instrument(span).await
  }

  async fn register_inner(&self, command: RegisterTrack, correlation_id: String) -> Result<Registration, CoreError> {
    let started = Instant::now();
    let isrc = Isrc::parse(&command.isrc)?;

    let metadata = match command.metadata {
      Some(submitted) => submitted_metadata(&isrc, submitted)?,
      None => self.fetch_metadata(&isrc).await?,
    };

    let code = ProducerCode::from_isrc(&isrc);
    let producer = match self.producers.find_by_producer_code(&code)? {
      Some(producer) => producer,
      None => {
        debug!(producer_code = %code, "creating producer");
        Producer::create_new(code, None)
      }
    };

    let track = match self.tracks.find_by_isrc(&isrc)? {
      Some(existing) => existing.update_with_source_priority(
        Some(&metadata.title),
        Some(metadata.credits),
        metadata.source,
        None,
      )?,
      None => Track::new(isrc, &metadata.title, metadata.credits, vec![metadata.source], TrackStatus::Provisional)?,
    };

    let (producer, changed) = producer.add_track_entity(&track)?;

    self.tracks.save(&track)?;

    if changed {
      info!(
        isrc = %track.isrc(),
        producer_code = %producer.code(),
        title = %track.title(),
        "track registered, publishing TrackWasRegistered"
      );
      self.events.publish(TrackWasRegistered::new(&track, &producer).into()).await?;
    } else {
      debug!(isrc = %track.isrc(), "track already registered, no event published");
    }

    self.producers.save(&producer)?;

    info!(elapsed_ms = started.elapsed().as_millis() as u64, changed, "track registration completed");
    Ok(Registration { producer, track, changed, correlation_id })
  }

  async fn fetch_metadata(&self, isrc: &Isrc) -> Result<ExternalTrackMetadata, CoreError> {
    let plan = self.lookups.plan(&ProducerSourcePriority);
    let outcome = probe(plan, self.config.lookup_timeout(), |lookup, source_type| {
      let isrc = isrc.clone();
      async move { lookup.find_by_isrc(&isrc, &source_type).await }
    })
    .await;

    match outcome.hit {
      Some((source_type, metadata)) => {
        debug!(source = %source_type, title = %metadata.title, "fetched track metadata");
        Ok(metadata)
      }
      None => Err(CoreError::ExternalService { isrc: isrc.to_string() }),
    }
  }

  /// Productor registrado con `code`, si existe.
  pub fn producer(&self, code: &ProducerCode) -> Result<Option<Producer>, CoreError> {
    Ok(self.producers.find_by_producer_code(code)?)
  }
}

fn submitted_metadata(isrc: &Isrc, submitted: SubmittedMetadata) -> Result<ExternalTrackMetadata, CoreError> {
  let credits = submitted.artist_names.iter().map(|n| ArtistCredit::with_name(n)).collect::<Result<Vec<_>, _>>()?;
  Ok(ExternalTrackMetadata { isrc: isrc.clone(), title: submitted.title, credits, source: submitted.source })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::events::DomainEvent;
  use crate::domain::{ProducerId, SourceType};
  use crate::ports::mocks::{
    InMemoryProducerRepository, InMemoryTrackRepository, MockTrackLookup, RecordingEventSink, Reply,
  };
  use std::sync::Arc;

  type Service =
    TrackRegistrationService<Arc<InMemoryProducerRepository>, Arc<InMemoryTrackRepository>, Arc<RecordingEventSink>>;

  struct Fixture {
    svc: Service,
    producers: Arc<InMemoryProducerRepository>,
    tracks: Arc<InMemoryTrackRepository>,
    events: Arc<RecordingEventSink>,
  }

  fn fixture(lookups: LookupRegistry<dyn TrackMetadataLookup>) -> Fixture {
    fixture_with(
      lookups,
      InMemoryProducerRepository::default(),
      InMemoryTrackRepository::default(),
      RecordingEventSink::default(),
    )
  }

  fn fixture_with(
    lookups: LookupRegistry<dyn TrackMetadataLookup>,
    producers: InMemoryProducerRepository,
    tracks: InMemoryTrackRepository,
    events: RecordingEventSink,
  ) -> Fixture {
    let producers = Arc::new(producers);
    let tracks = Arc::new(tracks);
    let events = Arc::new(events);
    let svc = TrackRegistrationService::new(
      producers.clone(),
      tracks.clone(),
      lookups,
      events.clone(),
      ReconciliationConfig::default(),
    );
    Fixture { svc, producers, tracks, events }
  }

  fn spotify_only() -> LookupRegistry<dyn TrackMetadataLookup> {
    LookupRegistry::<dyn TrackMetadataLookup>::new().with(MockTrackLookup::finding(
      SourceType::Spotify,
      "One More Time",
      &["Daft Punk"],
    ))
  }

  #[tokio::test]
  async fn hyphenated_and_plain_isrc_register_one_track() {
    let f = fixture(spotify_only());

    let first = f.svc.register(RegisterTrack::new("FR-LA1-24-00001")).await.unwrap();
    let second = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap();

    assert!(first.changed);
    assert!(!second.changed);
    assert_eq!(second.producer.code().as_str(), "FRLA1");
    assert_eq!(second.producer.tracks().len(), 1);
    assert_eq!(f.producers.len(), 1);
    assert_eq!(f.events.events().len(), 1);
  }

  #[tokio::test]
  async fn event_carries_owner_and_metadata() {
    let f = fixture(spotify_only());

    f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap();

    let events = f.events.events();
    let [DomainEvent::TrackWasRegistered(event)] = events.as_slice() else {
      panic!("expected one TrackWasRegistered, got {events:?}");
    };
    assert_eq!(event.isrc, "FRLA12400001");
    assert_eq!(event.title, "One More Time");
    assert_eq!(event.producer_id, ProducerId::from_producer_code(&ProducerCode::parse("FRLA1").unwrap()));
    assert_eq!(event.artist_credits[0].artist_name, "Daft Punk");
    assert_eq!(event.sources[0].source_type, "SPOTIFY");
  }

  #[tokio::test]
  async fn metadata_follows_producer_priority() {
    let tidal = MockTrackLookup::finding(SourceType::Tidal, "From Tidal", &["A"]);
    let spotify = MockTrackLookup::finding(SourceType::Spotify, "From Spotify", &["A"]);
    let f = fixture(LookupRegistry::<dyn TrackMetadataLookup>::new().with(tidal.clone()).with(spotify.clone()));

    let reg = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap();

    assert_eq!(reg.track.title(), "From Spotify");
    assert_eq!(spotify.calls(), 1);
    assert_eq!(tidal.calls(), 0);
  }

  #[tokio::test]
  async fn missing_metadata_is_an_external_service_error() {
    let f = fixture(
      LookupRegistry::<dyn TrackMetadataLookup>::new()
        .with(MockTrackLookup::new(SourceType::Spotify, Reply::Fail))
        .with(MockTrackLookup::new(SourceType::Deezer, Reply::NotFound)),
    );

    let err = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap_err();

    assert!(matches!(err, CoreError::ExternalService { ref isrc } if isrc == "FRLA12400001"));
    assert_eq!(f.producers.len(), 0);
    assert!(f.events.events().is_empty());
  }

  #[tokio::test]
  async fn invalid_isrc_is_rejected_before_any_lookup() {
    let spotify = MockTrackLookup::finding(SourceType::Spotify, "T", &["A"]);
    let f = fixture(LookupRegistry::<dyn TrackMetadataLookup>::new().with(spotify.clone()));

    let err = f.svc.register(RegisterTrack::new("not-an-isrc")).await.unwrap_err();

    assert!(matches!(err, CoreError::Domain(ref e) if e.is_validation()));
    assert_eq!(spotify.calls(), 0);
  }

  #[tokio::test]
  async fn re_registration_merges_metadata_under_priority() {
    let f = fixture(LookupRegistry::<dyn TrackMetadataLookup>::new());
    let submitted = |title: &str, source: Source| SubmittedMetadata {
      title: title.into(),
      artist_names: vec!["Daft Punk".into()],
      source,
    };

    f.svc
      .register(
        RegisterTrack::new("FRLA12400001")
          .with_metadata(submitted("Deezer title", Source::new(SourceType::Deezer, "d").unwrap())),
      )
      .await
      .unwrap();
    let reg = f
      .svc
      .register(
        RegisterTrack::new("FRLA12400001")
          .with_metadata(submitted("Manual title", Source::new(SourceType::Manual, "m").unwrap())),
      )
      .await
      .unwrap();

    assert!(!reg.changed);
    assert_eq!(reg.track.title(), "Manual title");
    assert_eq!(reg.track.sources().len(), 2);
    let stored = f.tracks.find_by_isrc(&Isrc::parse("FRLA12400001").unwrap()).unwrap().unwrap();
    assert_eq!(stored.title(), "Manual title");
    assert_eq!(f.events.events().len(), 1);
  }

  #[tokio::test]
  async fn failed_publish_is_retried_with_the_event() {
    let f = fixture_with(
      spotify_only(),
      InMemoryProducerRepository::default(),
      InMemoryTrackRepository::default(),
      RecordingEventSink::failing(1),
    );

    let err = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap_err();
    assert!(matches!(err, CoreError::Events(_)));
    assert_eq!(f.producers.len(), 0);
    assert!(f.events.events().is_empty());

    let retry = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap();

    assert!(retry.changed);
    assert_eq!(retry.producer.tracks().len(), 1);
    assert_eq!(f.producers.len(), 1);
    assert_eq!(f.tracks.len(), 1);
    assert!(matches!(f.events.events().as_slice(), [DomainEvent::TrackWasRegistered(e)] if e.isrc == "FRLA12400001"));
  }

  #[tokio::test]
  async fn failed_track_save_leaves_the_producer_untouched() {
    let f = fixture_with(
      spotify_only(),
      InMemoryProducerRepository::default(),
      InMemoryTrackRepository::default().failing_saves(1),
      RecordingEventSink::default(),
    );

    let err = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap_err();
    assert!(matches!(err, CoreError::Repository(_)));
    assert_eq!(f.producers.len(), 0);
    assert_eq!(f.tracks.len(), 0);
    assert!(f.events.events().is_empty());

    let retry = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap();

    assert!(retry.changed);
    assert_eq!(f.producers.len(), 1);
    assert_eq!(f.tracks.len(), 1);
    assert_eq!(f.events.events().len(), 1);
  }

  #[tokio::test]
  async fn failed_producer_save_redelivers_the_event_on_retry() {
    let f = fixture_with(
      spotify_only(),
      InMemoryProducerRepository::default().failing_saves(1),
      InMemoryTrackRepository::default(),
      RecordingEventSink::default(),
    );

    let err = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap_err();
    assert!(matches!(err, CoreError::Repository(_)));
    assert_eq!(f.producers.len(), 0);
    assert_eq!(f.events.events().len(), 1);

    let retry = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap();

    assert!(retry.changed);
    assert_eq!(f.tracks.len(), 1);
    assert_eq!(f.events.events().len(), 2);

    let settled = f.svc.register(RegisterTrack::new("FRLA12400001")).await.unwrap();
    assert!(!settled.changed);
    assert_eq!(f.events.events().len(), 2);
  }

  #[test]
  fn correlation_ids() {
    assert_eq!(service_correlation_id(Some("req-42")), "req-42-producer-service");

    let generated = service_correlation_id(None);
    assert!(generated.starts_with("producer-"));
    assert_eq!(generated.split('-').count(), 3);
    assert!(service_correlation_id(Some("  ")).starts_with("producer-"));
  }
}
