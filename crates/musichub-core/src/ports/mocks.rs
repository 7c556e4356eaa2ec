//! Colaboradores en memoria para los tests de servicios.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::events::{EventError, EventSink};
use super::lookup::{ArtistLookup, ExternalTrackMetadata, LookupError, SourceLookup, TrackMetadataLookup};
use super::repository::{ArtistRepository, ProducerRepository, RepoError, TrackInfo, TrackRepository};
use crate::domain::artist::Artist;
use crate::domain::events::DomainEvent;
use crate::domain::producer::Producer;
use crate::domain::track::{ArtistCredit, Track};
use crate::domain::{ArtistId, Isrc, ProducerCode, ProducerId, Source, SourceType};

/// Fallos pendientes de inyectar; cada llamada consume uno.
#[derive(Default)]
struct Failures(AtomicUsize);

impl Failures {
  fn arm(&self, count: usize) {
    self.0.store(count, Ordering::SeqCst);
  }

  fn take(&self) -> bool {
    self.0.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok()
  }
}

fn storage_failure() -> RepoError {
  RepoError::Storage("disk full".into())
}

#[derive(Default)]
pub struct InMemoryArtistRepository {
  artists: Mutex<HashMap<ArtistId, Artist>>,
  saves: AtomicUsize,
  failures: Failures,
}

impl InMemoryArtistRepository {
  pub fn with(artists: impl IntoIterator<Item = Artist>) -> Self {
    let repo = Self::default();
    repo.artists.lock().unwrap().extend(artists.into_iter().map(|a| (a.id(), a)));
    repo
  }

  /// Los próximos `count` guardados fallan sin tocar el estado.
  pub fn failing_saves(self, count: usize) -> Self {
    self.failures.arm(count);
    self
  }

  pub fn saves(&self) -> usize {
    self.saves.load(Ordering::SeqCst)
  }

  pub fn get(&self, id: ArtistId) -> Option<Artist> {
    self.artists.lock().unwrap().get(&id).cloned()
  }

  pub fn len(&self) -> usize {
    self.artists.lock().unwrap().len()
  }
}

impl ArtistRepository for InMemoryArtistRepository {
  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    Ok(self.get(id))
  }

  fn find_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError> {
    Ok(self.artists.lock().unwrap().values().find(|a| a.name().as_str() == name).cloned())
  }

  fn save(&self, artist: &Artist) -> Result<(), RepoError> {
    if self.failures.take() {
      return Err(storage_failure());
    }
    self.saves.fetch_add(1, Ordering::SeqCst);
    self.artists.lock().unwrap().insert(artist.id(), artist.clone());
    Ok(())
  }
}

#[derive(Default)]
pub struct InMemoryProducerRepository {
  producers: Mutex<HashMap<ProducerId, Producer>>,
  failures: Failures,
}

impl InMemoryProducerRepository {
  pub fn failing_saves(self, count: usize) -> Self {
    self.failures.arm(count);
    self
  }

  pub fn len(&self) -> usize {
    self.producers.lock().unwrap().len()
  }
}

impl ProducerRepository for InMemoryProducerRepository {
  fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepoError> {
    Ok(self.producers.lock().unwrap().get(&id).cloned())
  }

  fn find_by_producer_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError> {
    Ok(self.producers.lock().unwrap().values().find(|p| p.code() == code).cloned())
  }

  fn save(&self, producer: &Producer) -> Result<(), RepoError> {
    if self.failures.take() {
      return Err(storage_failure());
    }
    self.producers.lock().unwrap().insert(producer.id(), producer.clone());
    Ok(())
  }
}

#[derive(Default)]
pub struct InMemoryTrackRepository {
  // orden de alta
  tracks: Mutex<Vec<TrackInfo>>,
  failures: Failures,
}

impl InMemoryTrackRepository {
  pub fn failing_saves(self, count: usize) -> Self {
    self.failures.arm(count);
    self
  }

  pub fn len(&self) -> usize {
    self.tracks.lock().unwrap().len()
  }
}

impl TrackRepository for InMemoryTrackRepository {
  fn find_by_isrc(&self, isrc: &Isrc) -> Result<Option<Track>, RepoError> {
    Ok(self.tracks.lock().unwrap().iter().find(|t| t.track.isrc() == isrc).map(|t| t.track.clone()))
  }

  fn save(&self, track: &Track) -> Result<(), RepoError> {
    if self.failures.take() {
      return Err(storage_failure());
    }
    let mut tracks = self.tracks.lock().unwrap();
    match tracks.iter_mut().find(|t| t.track == *track) {
      Some(existing) => existing.track = track.clone(),
      None => tracks.push(TrackInfo {
        track: track.clone(),
        producer_id: ProducerId::from_producer_code(&track.producer_code()),
        submitted_at: Utc::now(),
      }),
    }
    Ok(())
  }

  fn find_recent(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError> {
    Ok(self.tracks.lock().unwrap().iter().rev().take(limit).cloned().collect())
  }
}

/// Qué devuelve un mock de colaborador.
#[derive(Clone)]
pub enum Reply<T> {
  Found(T),
  NotFound,
  Fail,
  /// Tarda `Duration` en responder con el valor.
  Slow(Duration, Option<T>),
}

impl<T: Clone> Reply<T> {
  async fn resolve(&self, source_type: &SourceType) -> Result<Option<T>, LookupError> {
    match self {
      Reply::Found(value) => Ok(Some(value.clone())),
      Reply::NotFound => Ok(None),
      Reply::Fail => Err(LookupError::Unavailable(source_type.clone(), "mock failure".into())),
      Reply::Slow(delay, value) => {
        tokio::time::sleep(*delay).await;
        Ok(value.clone())
      }
    }
  }
}

pub struct MockArtistLookup {
  source_type: SourceType,
  reply: Reply<Artist>,
  calls: AtomicUsize,
}

impl MockArtistLookup {
  pub fn new(source_type: SourceType, reply: Reply<Artist>) -> Arc<Self> {
    Arc::new(Self { source_type, reply, calls: AtomicUsize::new(0) })
  }

  pub fn not_found(source_type: SourceType) -> Arc<Self> {
    Self::new(source_type, Reply::NotFound)
  }

  pub fn failing(source_type: SourceType) -> Arc<Self> {
    Self::new(source_type, Reply::Fail)
  }

  /// Devuelve un artista con nombre `name` y una única fuente `(source_type, external_id)`.
  pub fn finding(source_type: SourceType, name: &str, external_id: &str) -> Arc<Self> {
    Self::new(source_type.clone(), Reply::Found(external_artist(name, source_type, external_id)))
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

pub fn external_artist(name: &str, source_type: SourceType, external_id: &str) -> Artist {
  Artist::create_provisional(name).unwrap().add_source(Source::new(source_type, external_id).unwrap())
}

impl SourceLookup for MockArtistLookup {
  fn supports(&self, source_type: &SourceType) -> bool {
    *source_type == self.source_type
  }
}

#[async_trait]
impl ArtistLookup for MockArtistLookup {
  async fn find_by_name(&self, _name: &str, source_type: &SourceType) -> Result<Option<Artist>, LookupError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.reply.resolve(source_type).await
  }

  async fn find_by_external_id(
    &self,
    external_id: &str,
    source_type: &SourceType,
  ) -> Result<Option<Artist>, LookupError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let found = self.reply.resolve(source_type).await?;
    Ok(found.filter(|a| a.source(source_type).is_some_and(|s| s.external_id() == external_id)))
  }
}

pub struct MockTrackLookup {
  source_type: SourceType,
  reply: Reply<(String, Vec<String>)>,
  calls: AtomicUsize,
}

impl MockTrackLookup {
  pub fn new(source_type: SourceType, reply: Reply<(String, Vec<String>)>) -> Arc<Self> {
    Arc::new(Self { source_type, reply, calls: AtomicUsize::new(0) })
  }

  pub fn finding(source_type: SourceType, title: &str, artists: &[&str]) -> Arc<Self> {
    Self::new(source_type, Reply::Found((title.to_string(), artists.iter().map(|a| a.to_string()).collect())))
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

impl SourceLookup for MockTrackLookup {
  fn supports(&self, source_type: &SourceType) -> bool {
    *source_type == self.source_type
  }
}

#[async_trait]
impl TrackMetadataLookup for MockTrackLookup {
  async fn find_by_isrc(
    &self,
    isrc: &Isrc,
    source_type: &SourceType,
  ) -> Result<Option<ExternalTrackMetadata>, LookupError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let Some((title, artists)) = self.reply.resolve(source_type).await? else {
      return Ok(None);
    };
    Ok(Some(ExternalTrackMetadata {
      isrc: isrc.clone(),
      title,
      credits: artists.iter().map(|a| ArtistCredit::with_name(a).unwrap()).collect(),
      source: Source::new(source_type.clone(), isrc.as_str()).unwrap(),
    }))
  }
}

/// Guarda los eventos publicados con éxito.
#[derive(Default)]
pub struct RecordingEventSink {
  events: Mutex<Vec<DomainEvent>>,
  failures: Failures,
}

impl RecordingEventSink {
  /// Las próximas `count` publicaciones fallan y no se registran.
  pub fn failing(count: usize) -> Self {
    let sink = Self::default();
    sink.failures.arm(count);
    sink
  }

  pub fn events(&self) -> Vec<DomainEvent> {
    self.events.lock().unwrap().clone()
  }
}

#[async_trait]
impl EventSink for RecordingEventSink {
  async fn publish(&self, event: DomainEvent) -> Result<(), EventError> {
    if self.failures.take() {
      return Err(EventError::Publish("broker unavailable".into()));
    }
    self.events.lock().unwrap().push(event);
    Ok(())
  }
}
