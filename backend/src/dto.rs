use musichub_core::domain::artist::Artist;
use musichub_core::domain::producer::Producer;
use musichub_core::domain::track::Track;
use musichub_core::domain::ProducerId;
use musichub_core::ports::TrackInfo;
use musichub_core::services::{ReconciliationState, Registration};
use serde::Serialize;

/// Salida de `register-track`.
#[derive(Debug, Serialize)]
pub struct RegistrationDto<'a> {
  pub correlation_id: &'a str,
  pub changed: bool,
  pub producer: &'a Producer,
  pub track: &'a Track,
}

impl<'a> From<&'a Registration> for RegistrationDto<'a> {
  fn from(r: &'a Registration) -> Self {
    Self { correlation_id: &r.correlation_id, changed: r.changed, producer: &r.producer, track: &r.track }
  }
}

#[derive(Debug, Serialize)]
pub struct TrackInfoDto<'a> {
  pub track: &'a Track,
  pub producer_id: ProducerId,
  pub submitted_at: String,
}

impl<'a> From<&'a TrackInfo> for TrackInfoDto<'a> {
  fn from(info: &'a TrackInfo) -> Self {
    Self { track: &info.track, producer_id: info.producer_id, submitted_at: info.submitted_at.to_rfc3339() }
  }
}

/// Salida de `enrich-artist`: el artista y cómo terminó la reconciliación.
#[derive(Debug, Serialize)]
pub struct EnrichmentDto<'a> {
  pub artist: &'a Artist,
  pub state: String,
}

impl<'a> EnrichmentDto<'a> {
  pub fn new(artist: &'a Artist, state: &ReconciliationState) -> Self {
    let state = match state {
      ReconciliationState::NotStarted => "NOT_STARTED".to_string(),
      ReconciliationState::Querying(ty) => format!("QUERYING:{ty}"),
      ReconciliationState::Found(ty) => format!("FOUND:{ty}"),
      ReconciliationState::Exhausted => "EXHAUSTED".to_string(),
      ReconciliationState::Failed => "FAILED".to_string(),
    };
    Self { artist, state }
  }
}
