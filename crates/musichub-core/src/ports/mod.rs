pub mod events;
pub mod lookup;
pub mod repository;

#[cfg(test)]
pub mod mocks;

pub use events::{EventError, EventSink};
pub use lookup::{ArtistLookup, ExternalTrackMetadata, LookupError, LookupRegistry, SourceLookup, TrackMetadataLookup};
pub use repository::{ArtistRepository, ProducerRepository, RepoError, TrackInfo, TrackRepository};
