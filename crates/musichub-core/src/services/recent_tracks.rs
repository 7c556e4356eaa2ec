use crate::errors::{CoreError, DomainError};
use crate::ports::{TrackInfo, TrackRepository};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

pub struct RecentTracksService<T: TrackRepository> {
  tracks: T,
}

impl<T: TrackRepository> RecentTracksService<T> {
  pub fn new(tracks: T) -> Self {
    Self { tracks }
  }

  /// Últimas pistas registradas, la más reciente primero.
  /// `limit` debe estar entre 1 y 100; `None` equivale a 10.
  pub fn recent_tracks(&self, limit: Option<usize>) -> Result<Vec<TrackInfo>, CoreError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
      return Err(DomainError::invalid("limit", format!("must be between 1 and {MAX_LIMIT}, got {limit}")).into());
    }
    Ok(self.tracks.find_recent(limit)?)
  }
}
