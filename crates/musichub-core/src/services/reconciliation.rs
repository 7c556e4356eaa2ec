use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::SourceType;
use crate::ports::LookupError;

/// Ajustes de la reconciliación con fuentes externas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
  /// Tiempo máximo por consulta a un colaborador, en milisegundos.
  pub lookup_timeout_ms: u64,
}

impl Default for ReconciliationConfig {
  fn default() -> Self {
    Self { lookup_timeout_ms: 5_000 }
  }
}

impl ReconciliationConfig {
  pub fn lookup_timeout(&self) -> Duration {
    Duration::from_millis(self.lookup_timeout_ms)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationState {
  NotStarted,
  Querying(SourceType),
  Found(SourceType),
  /// Todas las fuentes respondieron y ninguna conocía la entidad.
  Exhausted,
  /// Sin resultado y al menos una fuente falló o agotó el tiempo.
  Failed,
}

/// Resultado de recorrer un plan de consulta.
#[derive(Debug)]
pub struct ProbeOutcome<T> {
  pub state: ReconciliationState,
  pub hit: Option<(SourceType, T)>,
  /// Tipos consultados, en orden.
  pub queried: Vec<SourceType>,
  pub failures: usize,
}

/// Consulta el plan en orden, una fuente cada vez, y se detiene en el primer
/// resultado.
///
/// Un error o un timeout de una fuente se registra y se pasa a la siguiente.
/// Las fuentes nunca se consultan en paralelo.
pub async fn probe<L, T, F, Fut>(plan: Vec<(SourceType, Arc<L>)>, timeout: Duration, mut query: F) -> ProbeOutcome<T>
where
  L: ?Sized,
  F: FnMut(Arc<L>, SourceType) -> Fut,
  Fut: Future<Output = Result<Option<T>, LookupError>>,
{
  let mut outcome =
    ProbeOutcome { state: ReconciliationState::NotStarted, hit: None, queried: Vec::new(), failures: 0 };

  for (source_type, lookup) in plan {
    outcome.state = ReconciliationState::Querying(source_type.clone());
    outcome.queried.push(source_type.clone());
    debug!(source = %source_type, "querying source");

    match tokio::time::timeout(timeout, query(lookup, source_type.clone())).await {
      Ok(Ok(Some(value))) => {
        debug!(source = %source_type, "source returned a match");
        outcome.state = ReconciliationState::Found(source_type.clone());
        outcome.hit = Some((source_type, value));
        return outcome;
      }
      Ok(Ok(None)) => debug!(source = %source_type, "no match"),
      Ok(Err(e)) => {
        outcome.failures += 1;
        warn!(source = %source_type, error = %e, "source lookup failed, trying next");
      }
      Err(_) => {
        outcome.failures += 1;
        warn!(source = %source_type, timeout_ms = timeout.as_millis() as u64, "source lookup timed out, trying next");
      }
    }
  }

  outcome.state =
    if outcome.failures > 0 { ReconciliationState::Failed } else { ReconciliationState::Exhausted };
  outcome
}
