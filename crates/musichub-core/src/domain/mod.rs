pub mod artist;
pub mod codes;
pub mod events;
pub mod ids;
pub mod priority;
pub mod producer;
pub mod source;
pub mod track;

pub use codes::{Isrc, ProducerCode, normalize_code};
pub use ids::{ArtistId, ProducerId, TrackId, derive_id};
pub use source::{Source, SourceType};
