use serde::{Deserialize, Serialize};

use crate::domain::artist::Artist;
use crate::domain::ids::{ArtistId, ProducerId};
use crate::domain::producer::Producer;
use crate::domain::source::Source;
use crate::domain::track::Track;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCreditInfo {
  pub artist_name: String,
  pub artist_id: Option<ArtistId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
  pub source_type: String,
  pub source_id: String,
}

impl From<&Source> for SourceInfo {
  fn from(source: &Source) -> Self {
    Self { source_type: source.source_type().to_string(), source_id: source.external_id().to_string() }
  }
}

/// Una pista se ha añadido por primera vez al catálogo de un productor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackWasRegistered {
  pub isrc: String,
  pub title: String,
  pub producer_id: ProducerId,
  pub artist_credits: Vec<ArtistCreditInfo>,
  pub sources: Vec<SourceInfo>,
}

impl TrackWasRegistered {
  pub fn new(track: &Track, producer: &Producer) -> Self {
    Self {
      isrc: track.isrc().to_string(),
      title: track.title().to_string(),
      producer_id: producer.id(),
      artist_credits: track
        .credits()
        .iter()
        .map(|c| ArtistCreditInfo { artist_name: c.artist_name().to_string(), artist_id: c.artist_id() })
        .collect(),
      sources: track.sources().iter().map(SourceInfo::from).collect(),
    }
  }
}

/// Un artista ha pasado de `PROVISIONAL` a `VERIFIED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistWasVerified {
  pub artist_id: ArtistId,
  pub name: String,
  pub sources: Vec<SourceInfo>,
}

impl From<&Artist> for ArtistWasVerified {
  fn from(artist: &Artist) -> Self {
    Self {
      artist_id: artist.id(),
      name: artist.name().to_string(),
      sources: artist.sources().iter().map(SourceInfo::from).collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
  TrackWasRegistered(TrackWasRegistered),
  ArtistWasVerified(ArtistWasVerified),
}

impl DomainEvent {
  pub fn name(&self) -> &'static str {
    match self {
      DomainEvent::TrackWasRegistered(_) => "TrackWasRegistered",
      DomainEvent::ArtistWasVerified(_) => "ArtistWasVerified",
    }
  }
}

impl From<TrackWasRegistered> for DomainEvent {
  fn from(e: TrackWasRegistered) -> Self {
    DomainEvent::TrackWasRegistered(e)
  }
}

impl From<ArtistWasVerified> for DomainEvent {
  fn from(e: ArtistWasVerified) -> Self {
    DomainEvent::ArtistWasVerified(e)
  }
}
