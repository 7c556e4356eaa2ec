use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::domain::codes::{Isrc, ProducerCode};
use crate::domain::ids::{ArtistId, TrackId};
use crate::domain::priority::{ProducerSourcePriority, SourcePriority};
use crate::domain::source::Source;
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackStatus {
  Provisional,
  Verified,
}

impl TrackStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      TrackStatus::Provisional => "PROVISIONAL",
      TrackStatus::Verified => "VERIFIED",
    }
  }
}

impl FromStr for TrackStatus {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "PROVISIONAL" => Ok(TrackStatus::Provisional),
      "VERIFIED" => Ok(TrackStatus::Verified),
      other => Err(DomainError::invalid("track status", format!("unknown status '{other}'"))),
    }
  }
}

/// Crédito de artista tal como lo conoce el contexto productor: un nombre y,
/// cuando ya se ha resuelto, el id del artista.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistCredit {
  artist_name: String,
  artist_id: Option<ArtistId>,
}

impl ArtistCredit {
  pub fn with_name(name: &str) -> Result<Self, DomainError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(DomainError::invalid("artist credit", "artist name must not be blank"));
    }
    Ok(Self { artist_name: name.to_string(), artist_id: None })
  }

  pub fn resolved(name: &str, artist_id: ArtistId) -> Result<Self, DomainError> {
    Ok(Self::with_name(name)?.with_artist_id(artist_id))
  }

  /// Devuelve un crédito nuevo, resuelto contra `artist_id`.
  pub fn with_artist_id(self, artist_id: ArtistId) -> Self {
    Self { artist_id: Some(artist_id), ..self }
  }

  pub fn artist_name(&self) -> &str {
    &self.artist_name
  }

  pub fn artist_id(&self) -> Option<ArtistId> {
    self.artist_id
  }

  pub fn is_resolved(&self) -> bool {
    self.artist_id.is_some()
  }
}

/// Grabación dentro del contexto productor.
///
/// Igualdad y hash por ISRC canónico; el resto de campos es metadato que
/// puede cambiar según la prioridad de la fuente que lo aporta.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
  isrc: Isrc,
  title: String,
  credits: Vec<ArtistCredit>,
  sources: Vec<Source>,
  status: TrackStatus,
}

impl Track {
  pub fn new(
    isrc: Isrc,
    title: &str,
    credits: Vec<ArtistCredit>,
    sources: Vec<Source>,
    status: TrackStatus,
  ) -> Result<Self, DomainError> {
    let title = validate_title(title)?;
    if credits.is_empty() {
      return Err(DomainError::invalid("track credits", "at least one artist credit is required"));
    }
    if sources.is_empty() {
      return Err(DomainError::invalid("track sources", "at least one source is required"));
    }
    let mut unique = Vec::with_capacity(sources.len());
    for source in sources {
      if !unique.contains(&source) {
        unique.push(source);
      }
    }
    Ok(Self { isrc, title, credits, sources: unique, status })
  }

  pub fn id(&self) -> TrackId {
    TrackId::from_isrc(&self.isrc)
  }

  pub fn isrc(&self) -> &Isrc {
    &self.isrc
  }

  pub fn producer_code(&self) -> ProducerCode {
    ProducerCode::from_isrc(&self.isrc)
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn credits(&self) -> &[ArtistCredit] {
    &self.credits
  }

  pub fn artist_names(&self) -> impl Iterator<Item = &str> {
    self.credits.iter().map(ArtistCredit::artist_name)
  }

  pub fn sources(&self) -> &[Source] {
    &self.sources
  }

  pub fn status(&self) -> TrackStatus {
    self.status
  }

  /// Fuente más prioritaria según la tabla de productor.
  pub fn highest_priority_source(&self) -> Option<&Source> {
    let priority = ProducerSourcePriority;
    self.sources.iter().min_by(|a, b| priority.compare(a.source_type(), b.source_type()))
  }

  /// Aplica metadatos de `source`.
  ///
  /// La fuente se registra siempre. Título, créditos y estado sólo se
  /// sustituyen si `source` tiene prioridad mayor o igual que la mejor fuente
  /// actual; los `None` conservan el valor existente.
  pub fn update_with_source_priority(
    mut self,
    title: Option<&str>,
    credits: Option<Vec<ArtistCredit>>,
    source: Source,
    status: Option<TrackStatus>,
  ) -> Result<Self, DomainError> {
    let priority = ProducerSourcePriority;
    let wins = match self.highest_priority_source() {
      None => true,
      Some(best) => priority.rank(source.source_type()) <= priority.rank(best.source_type()),
    };

    if wins {
      if let Some(title) = title {
        self.title = validate_title(title)?;
      }
      if let Some(credits) = credits {
        if credits.is_empty() {
          return Err(DomainError::invalid("track credits", "at least one artist credit is required"));
        }
        self.credits = credits;
      }
      if let Some(status) = status {
        self.status = status;
      }
    }

    if !self.sources.contains(&source) {
      self.sources.push(source);
    }
    Ok(self)
  }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
  let title = title.trim();
  if title.is_empty() {
    return Err(DomainError::invalid("track title", "must not be blank"));
  }
  Ok(title.to_string())
}

impl PartialEq for Track {
  fn eq(&self, other: &Self) -> bool {
    self.isrc == other.isrc
  }
}

impl Eq for Track {}

impl Hash for Track {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.isrc.hash(state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::source::SourceType;
  use std::collections::HashSet;

  fn isrc(raw: &str) -> Isrc {
    Isrc::parse(raw).unwrap()
  }

  fn source(ty: SourceType, id: &str) -> Source {
    Source::new(ty, id).unwrap()
  }

  fn credits(names: &[&str]) -> Vec<ArtistCredit> {
    names.iter().map(|n| ArtistCredit::with_name(n).unwrap()).collect()
  }

  fn track_from(ty: SourceType) -> Track {
    Track::new(
      isrc("FRLA12400001"),
      "One More Time",
      credits(&["Daft Punk"]),
      vec![source(ty, "t1")],
      TrackStatus::Provisional,
    )
    .unwrap()
  }

  #[test]
  fn equality_and_hash_use_normalized_isrc() {
    let a = track_from(SourceType::Spotify);
    let b = Track::new(
      isrc("FR-LA1-24-00001"),
      "Another title",
      credits(&["Someone"]),
      vec![source(SourceType::Deezer, "d")],
      TrackStatus::Verified,
    )
    .unwrap();

    assert_eq!(a, b);
    let set: HashSet<Track> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
  }

  #[test]
  fn new_validates_title_credits_and_sources() {
    let i = isrc("FRLA12400001");
    let s = vec![source(SourceType::Spotify, "x")];
    assert!(Track::new(i.clone(), "  ", credits(&["A"]), s.clone(), TrackStatus::Provisional).is_err());
    assert!(Track::new(i.clone(), "T", Vec::new(), s, TrackStatus::Provisional).is_err());
    assert!(Track::new(i, "T", credits(&["A"]), Vec::new(), TrackStatus::Provisional).is_err());
  }

  #[test]
  fn highest_priority_source_uses_producer_table() {
    let track = track_from(SourceType::Tidal)
      .update_with_source_priority(None, None, source(SourceType::Spotify, "s"), None)
      .unwrap();
    assert_eq!(track.highest_priority_source().map(Source::source_type), Some(&SourceType::Spotify));
  }

  #[test]
  fn lower_priority_source_only_adds_itself() {
    let track = track_from(SourceType::Spotify)
      .update_with_source_priority(
        Some("Lower"),
        Some(credits(&["Other"])),
        source(SourceType::Deezer, "d"),
        Some(TrackStatus::Verified),
      )
      .unwrap();

    assert_eq!(track.title(), "One More Time");
    assert_eq!(track.artist_names().collect::<Vec<_>>(), ["Daft Punk"]);
    assert_eq!(track.status(), TrackStatus::Provisional);
    assert_eq!(track.sources().len(), 2);
  }

  #[test]
  fn higher_or_equal_priority_source_replaces_metadata() {
    let track = track_from(SourceType::Spotify)
      .update_with_source_priority(Some("Manual"), None, source(SourceType::Manual, "m"), Some(TrackStatus::Verified))
      .unwrap();
    assert_eq!(track.title(), "Manual");
    assert_eq!(track.status(), TrackStatus::Verified);
    assert_eq!(track.credits().len(), 1);

    let same_tier = track_from(SourceType::Spotify)
      .update_with_source_priority(Some("Same tier"), None, source(SourceType::Spotify, "t1"), None)
      .unwrap();
    assert_eq!(same_tier.title(), "Same tier");
    assert_eq!(same_tier.sources().len(), 1);
  }

  #[test]
  fn credit_resolution_returns_new_value() {
    let credit = ArtistCredit::with_name(" Daft Punk ").unwrap();
    assert!(!credit.is_resolved());

    let id = ArtistId::from_name("Daft Punk").unwrap();
    let resolved = credit.clone().with_artist_id(id);
    assert!(resolved.is_resolved());
    assert_eq!(resolved.artist_id(), Some(id));
    assert_eq!(resolved.artist_name(), credit.artist_name());
  }
}
