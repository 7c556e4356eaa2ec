use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Plataforma (o curación manual) de la que procede un dato.
///
/// Los nombres desconocidos no son un error: acaban en [`SourceType::Other`]
/// y quedan por detrás de cualquier tipo conocido en todas las tablas de
/// prioridad.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceType {
  Manual,
  Tidal,
  Spotify,
  Deezer,
  AppleMusic,
  Other(String),
}

impl SourceType {
  pub fn as_str(&self) -> &str {
    match self {
      SourceType::Manual => "MANUAL",
      SourceType::Tidal => "TIDAL",
      SourceType::Spotify => "SPOTIFY",
      SourceType::Deezer => "DEEZER",
      SourceType::AppleMusic => "APPLE_MUSIC",
      SourceType::Other(name) => name,
    }
  }
}

impl FromStr for SourceType {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let name = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
    let ty = match name.as_str() {
      "" => return Err(DomainError::invalid("source type", "must not be blank")),
      "MANUAL" => SourceType::Manual,
      "TIDAL" => SourceType::Tidal,
      "SPOTIFY" => SourceType::Spotify,
      "DEEZER" => SourceType::Deezer,
      "APPLE_MUSIC" | "APPLEMUSIC" => SourceType::AppleMusic,
      _ => SourceType::Other(name),
    };
    Ok(ty)
  }
}

impl TryFrom<String> for SourceType {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<SourceType> for String {
  fn from(ty: SourceType) -> Self {
    ty.as_str().to_string()
  }
}

impl fmt::Display for SourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Referencia a una entidad en una plataforma externa: `(tipo, id externo)`.
///
/// Igualdad estructural sobre ambos campos.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
  source_type: SourceType,
  external_id: String,
}

impl Source {
  pub fn new(source_type: SourceType, external_id: &str) -> Result<Self, DomainError> {
    let external_id = external_id.trim();
    if external_id.is_empty() {
      return Err(DomainError::invalid("source id", "must not be blank"));
    }
    Ok(Self { source_type, external_id: external_id.to_string() })
  }

  pub fn source_type(&self) -> &SourceType {
    &self.source_type
  }

  pub fn external_id(&self) -> &str {
    &self.external_id
  }
}

impl fmt::Display for Source {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.source_type, self.external_id)
  }
}

/// `TIPO:ID`, p. ej. `spotify:4tZwfgrHOc3mvqYlEYSvVi`.
impl FromStr for Source {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let Some((ty, id)) = s.split_once(':') else {
      return Err(DomainError::invalid("source", format!("expected TYPE:ID, got '{s}'")));
    };
    Source::new(ty.parse()?, id)
  }
}
