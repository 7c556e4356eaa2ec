use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::domain::codes::Isrc;
use crate::domain::ids::{ArtistId, TrackId};
use crate::domain::priority::{ArtistSourcePriority, SourcePriority};
use crate::domain::source::{Source, SourceType};
use crate::errors::DomainError;

/// Nombre público de un artista: recortado, no vacío, máximo 255 caracteres.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtistName(String);

impl ArtistName {
  pub const MAX_LEN: usize = 255;

  pub fn parse(raw: &str) -> Result<Self, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
      return Err(DomainError::invalid("artist name", "must not be blank"));
    }
    if name.chars().count() > Self::MAX_LEN {
      return Err(DomainError::invalid("artist name", format!("longer than {} characters", Self::MAX_LEN)));
    }
    Ok(ArtistName(name.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for ArtistName {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    ArtistName::parse(&value)
  }
}

impl From<ArtistName> for String {
  fn from(name: ArtistName) -> Self {
    name.0
  }
}

impl fmt::Display for ArtistName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtistStatus {
  /// Creado a partir de un crédito, todavía sin confirmar en ninguna fuente.
  Provisional,
  /// Confirmado por al menos una fuente externa o manual.
  Verified,
}

impl ArtistStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      ArtistStatus::Provisional => "PROVISIONAL",
      ArtistStatus::Verified => "VERIFIED",
    }
  }
}

impl FromStr for ArtistStatus {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "PROVISIONAL" => Ok(ArtistStatus::Provisional),
      "VERIFIED" => Ok(ArtistStatus::Verified),
      other => Err(DomainError::invalid("artist status", format!("unknown status '{other}'"))),
    }
  }
}

/// Participación de un artista en una grabación.
///
/// Se deduplica por valor completo: la misma pista con otro título es otra
/// contribución.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contribution {
  pub track_id: TrackId,
  pub title: String,
  pub isrc: Isrc,
}

impl Contribution {
  pub fn new(track_id: TrackId, title: &str, isrc: Isrc) -> Result<Self, DomainError> {
    let title = title.trim();
    if title.is_empty() {
      return Err(DomainError::invalid("contribution title", "must not be blank"));
    }
    Ok(Self { track_id, title: title.to_string(), isrc })
  }

  /// Contribución a la pista identificada por `isrc`.
  pub fn for_track(isrc: Isrc, title: &str) -> Result<Self, DomainError> {
    Contribution::new(TrackId::from_isrc(&isrc), title, isrc)
  }
}

/// Agregado artista.
///
/// Es un valor inmutable: cada mutación consume el artista y devuelve uno
/// nuevo. Igualdad y hash sólo por `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
  id: ArtistId,
  name: ArtistName,
  status: ArtistStatus,
  contributions: Vec<Contribution>,
  sources: Vec<Source>,
}

impl Artist {
  /// Artista `PROVISIONAL` sin fuentes ni contribuciones, con id derivado
  /// del nombre.
  pub fn create_provisional(name: &str) -> Result<Self, DomainError> {
    let name = ArtistName::parse(name)?;
    let id = ArtistId::from_name(name.as_str())?;
    Ok(Self { id, name, status: ArtistStatus::Provisional, contributions: Vec::new(), sources: Vec::new() })
  }

  /// Reconstruye un artista ya persistido (o devuelto por un colaborador).
  ///
  /// Si `sources` trae varias del mismo tipo se queda la última.
  pub fn restore(
    id: ArtistId,
    name: ArtistName,
    status: ArtistStatus,
    contributions: Vec<Contribution>,
    sources: Vec<Source>,
  ) -> Self {
    let artist = Self { id, name, status, contributions: Vec::new(), sources: Vec::new() };
    let artist = contributions.into_iter().fold(artist, Artist::add_contribution);
    sources.into_iter().fold(artist, Artist::add_source)
  }

  pub fn id(&self) -> ArtistId {
    self.id
  }

  pub fn name(&self) -> &ArtistName {
    &self.name
  }

  pub fn status(&self) -> ArtistStatus {
    self.status
  }

  pub fn is_verified(&self) -> bool {
    self.status == ArtistStatus::Verified
  }

  pub fn contributions(&self) -> &[Contribution] {
    &self.contributions
  }

  pub fn sources(&self) -> &[Source] {
    &self.sources
  }

  pub fn source(&self, source_type: &SourceType) -> Option<&Source> {
    self.sources.iter().find(|s| s.source_type() == source_type)
  }

  pub fn has_source(&self, source_type: &SourceType) -> bool {
    self.source(source_type).is_some()
  }

  /// Fuente de mayor prioridad según la tabla de artistas.
  pub fn highest_priority_source(&self) -> Option<&Source> {
    let priority = ArtistSourcePriority;
    self.sources.iter().min_by(|a, b| priority.compare(a.source_type(), b.source_type()))
  }

  /// Añade una fuente; si ya hay una del mismo tipo, la sustituye.
  pub fn add_source(mut self, source: Source) -> Self {
    match self.sources.iter_mut().find(|s| s.source_type() == source.source_type()) {
      Some(existing) if *existing == source => {}
      Some(existing) => *existing = source,
      None => self.sources.push(source),
    }
    self
  }

  pub fn add_contribution(mut self, contribution: Contribution) -> Self {
    if !self.contributions.contains(&contribution) {
      self.contributions.push(contribution);
    }
    self
  }

  /// `PROVISIONAL` → `VERIFIED`. Sólo una vez.
  pub fn mark_as_verified(mut self) -> Result<Self, DomainError> {
    if self.status != ArtistStatus::Provisional {
      return Err(DomainError::AlreadyVerified(self.id));
    }
    self.status = ArtistStatus::Verified;
    Ok(self)
  }

  /// Cambia el nombre si `source_type` tiene prioridad mayor o igual que la
  /// mejor fuente actual. Sin fuentes, siempre se acepta.
  ///
  /// Dos tipos fuera de la tabla sólo empatan si son el mismo tipo: un
  /// `Other` distinto nunca renombra a un artista cuya mejor fuente es otro
  /// `Other`.
  ///
  /// El `id` no cambia: sigue siendo el derivado del nombre original.
  pub fn update_name_from_source(mut self, name: ArtistName, source_type: &SourceType) -> Self {
    let priority = ArtistSourcePriority;
    let accepted = match self.highest_priority_source() {
      None => true,
      Some(best) => match (priority.rank(source_type), priority.rank(best.source_type())) {
        (usize::MAX, usize::MAX) => source_type == best.source_type(),
        (incoming, current) => incoming <= current,
      },
    };
    if accepted {
      self.name = name;
    }
    self
  }

  /// Incorpora todas las fuentes de `other`.
  pub fn merge_sources_from(self, other: &Artist) -> Self {
    other.sources.iter().cloned().fold(self, Artist::add_source)
  }
}

impl PartialEq for Artist {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Artist {}

impl Hash for Artist {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}
