use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::events::DomainEvent;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
  #[error("event channel closed")]
  Closed,
  #[error("failed to publish event: {0}")]
  Publish(String),
}

/// Destino de los eventos de dominio. El transporte queda fuera del núcleo.
#[async_trait]
pub trait EventSink: Send + Sync {
  async fn publish(&self, event: DomainEvent) -> Result<(), EventError>;
}

#[async_trait]
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
  async fn publish(&self, event: DomainEvent) -> Result<(), EventError> {
    (**self).publish(event).await
  }
}
