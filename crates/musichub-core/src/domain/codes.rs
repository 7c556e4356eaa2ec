use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Canonicaliza un código libre (ISRC, código de productor): elimina guiones
/// y espacios y pasa a mayúsculas.
///
/// Es una función total: nunca falla. La validación del formato se hace
/// aparte, en [`Isrc::parse`] y [`ProducerCode::parse`].
pub fn normalize_code(raw: &str) -> String {
  raw.chars().filter(|c| *c != '-' && !c.is_whitespace()).flat_map(char::to_uppercase).collect()
}

/// International Standard Recording Code, ya normalizado.
///
/// Formato: `CC XXX YY NNNNN` → dos letras de país, tres alfanuméricos del
/// registrante, dos dígitos de año y cinco de designación. Dos escrituras del
/// mismo código (`"FR-LA1-24-00001"` y `"frla12400001"`) producen el mismo
/// valor, así que igualdad y hash son siempre sobre la forma canónica.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isrc(String);

impl Isrc {
  pub const LEN: usize = 12;

  pub fn parse(raw: &str) -> Result<Self, DomainError> {
    let code = normalize_code(raw);
    let bytes = code.as_bytes();

    let valid = bytes.len() == Self::LEN
      && bytes[..2].iter().all(u8::is_ascii_uppercase)
      && bytes[2..5].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
      && bytes[5..].iter().all(u8::is_ascii_digit);

    if !valid {
      return Err(DomainError::InvalidIsrc(raw.to_string()));
    }

    Ok(Isrc(code))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Código del registrante (los cinco primeros caracteres).
  pub fn registrant(&self) -> &str {
    &self.0[..ProducerCode::LEN]
  }
}

impl FromStr for Isrc {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Isrc::parse(s)
  }
}

impl TryFrom<String> for Isrc {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Isrc::parse(&value)
  }
}

impl From<Isrc> for String {
  fn from(isrc: Isrc) -> Self {
    isrc.0
  }
}

impl fmt::Display for Isrc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Código de productor (registrante ISRC): `[A-Z]{2}[A-Z0-9]{3}`.
///
/// Acepta tanto el código de cinco caracteres como un ISRC completo, del que
/// extrae el prefijo.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProducerCode(String);

impl ProducerCode {
  pub const LEN: usize = 5;

  pub fn parse(raw: &str) -> Result<Self, DomainError> {
    let code = normalize_code(raw);

    if code.len() != Self::LEN && code.len() != Isrc::LEN {
      return Err(DomainError::InvalidProducerCode(raw.to_string()));
    }

    let Some(prefix) = code.get(..Self::LEN) else {
      return Err(DomainError::InvalidProducerCode(raw.to_string()));
    };

    let bytes = prefix.as_bytes();
    let valid = bytes[..2].iter().all(u8::is_ascii_uppercase)
      && bytes[2..].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

    if !valid {
      return Err(DomainError::InvalidProducerCode(raw.to_string()));
    }

    Ok(ProducerCode(prefix.to_string()))
  }

  /// Código del productor al que pertenece una grabación.
  pub fn from_isrc(isrc: &Isrc) -> Self {
    ProducerCode(isrc.registrant().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for ProducerCode {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ProducerCode::parse(s)
  }
}

impl TryFrom<String> for ProducerCode {
  type Error = DomainError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    ProducerCode::parse(&value)
  }
}

impl From<ProducerCode> for String {
  fn from(code: ProducerCode) -> Self {
    code.0
  }
}

impl fmt::Display for ProducerCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
