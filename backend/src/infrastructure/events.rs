use async_trait::async_trait;
use musichub_core::domain::events::DomainEvent;
use musichub_core::ports::{EventError, EventSink};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// `EventSink` sobre un canal en proceso. Quien tenga el receptor decide
/// cuándo se entregan los eventos.
#[derive(Clone)]
pub struct ChannelEventSink {
  tx: UnboundedSender<DomainEvent>,
}

impl ChannelEventSink {
  pub fn new() -> (Self, UnboundedReceiver<DomainEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }
}

#[async_trait]
impl EventSink for ChannelEventSink {
  async fn publish(&self, event: DomainEvent) -> Result<(), EventError> {
    debug!(event = event.name(), "event queued");
    self.tx.send(event).map_err(|_| EventError::Closed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use musichub_core::domain::artist::Artist;
  use musichub_core::domain::events::ArtistWasVerified;

  #[tokio::test]
  async fn publish_after_receiver_dropped_is_closed() {
    let (sink, rx) = ChannelEventSink::new();
    drop(rx);
    let artist = Artist::create_provisional("Air").unwrap();

    let err = sink.publish(ArtistWasVerified::from(&artist).into()).await.unwrap_err();
    assert!(matches!(err, EventError::Closed));
  }

  #[tokio::test]
  async fn events_arrive_in_order() {
    let (sink, mut rx) = ChannelEventSink::new();
    for name in ["Air", "Justice"] {
      let artist = Artist::create_provisional(name).unwrap();
      sink.publish(ArtistWasVerified::from(&artist).into()).await.unwrap();
    }

    let names: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
      .map(|e| match e {
        DomainEvent::ArtistWasVerified(v) => v.name,
        other => panic!("unexpected event {other:?}"),
      })
      .collect();
    assert_eq!(names, ["Air", "Justice"]);
  }
}
