use chrono::{DateTime, Utc};
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use musichub_core::domain::track::{ArtistCredit, Track, TrackStatus};
use musichub_core::domain::{ArtistId, Isrc, ProducerId, Source};
use musichub_core::ports::{RepoError, TrackInfo, TrackRepository};

use crate::error::StorageError;
use crate::models::{NewTrackRow, TrackCreditRow, TrackRow, TrackSourceRow};
use crate::schema::{track_credits, track_sources, tracks};
use crate::store::{SqliteStore, now};

const TABLE: &str = "tracks";

impl SqliteStore {
  fn load_track(conn: &mut SqliteConnection, row: &TrackRow) -> Result<Track, StorageError> {
    let credits = track_credits::table
      .filter(track_credits::isrc.eq(&row.isrc))
      .order(track_credits::position.asc())
      .select(TrackCreditRow::as_select())
      .load(conn)?
      .into_iter()
      .map(|c| {
        let credit = ArtistCredit::with_name(&c.artist_name).map_err(|e| StorageError::corrupt("track_credits", e))?;
        match c.artist_id {
          Some(id) => {
            let id = Uuid::parse_str(&id).map_err(|e| StorageError::corrupt("track_credits", e))?;
            Ok(credit.with_artist_id(ArtistId::from_uuid(id)))
          }
          None => Ok(credit),
        }
      })
      .collect::<Result<Vec<_>, StorageError>>()?;

    let sources = track_sources::table
      .filter(track_sources::isrc.eq(&row.isrc))
      .order(track_sources::position.asc())
      .select(TrackSourceRow::as_select())
      .load(conn)?
      .into_iter()
      .map(|s| {
        let source_type = s.source_type.parse().map_err(|e| StorageError::corrupt("track_sources", e))?;
        Source::new(source_type, &s.external_id).map_err(|e| StorageError::corrupt("track_sources", e))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let isrc = Isrc::parse(&row.isrc).map_err(|e| StorageError::corrupt(TABLE, e))?;
    let status: TrackStatus = row.status.parse().map_err(|e| StorageError::corrupt(TABLE, e))?;
    Track::new(isrc, &row.title, credits, sources, status).map_err(|e| StorageError::corrupt(TABLE, e))
  }

  fn load_track_info(conn: &mut SqliteConnection, row: TrackRow) -> Result<TrackInfo, StorageError> {
    let track = Self::load_track(conn, &row)?;
    let producer_id = Uuid::parse_str(&row.producer_id).map_err(|e| StorageError::corrupt(TABLE, e))?;
    let submitted_at = DateTime::parse_from_rfc3339(&row.submitted_at)
      .map_err(|e| StorageError::corrupt(TABLE, e))?
      .with_timezone(&Utc);
    Ok(TrackInfo { track, producer_id: ProducerId::from_uuid(producer_id), submitted_at })
  }

  fn find_track(&self, isrc: &Isrc) -> Result<Option<Track>, StorageError> {
    let mut conn = self.conn()?;
    let row = tracks::table.find(isrc.as_str()).select(TrackRow::as_select()).first(&mut conn).optional()?;
    row.map(|row| Self::load_track(&mut conn, &row)).transpose()
  }

  fn save_track(&self, track: &Track) -> Result<(), StorageError> {
    let mut conn = self.conn()?;
    let isrc = track.isrc().as_str();

    // IMMEDIATE: el cálculo de `seq` necesita el bloqueo de escritura desde el principio.
    conn.immediate_transaction::<_, StorageError, _>(|conn| {
      let last_seq: Option<i64> = tracks::table.select(max(tracks::seq)).first(conn)?;
      let stamp = now();
      let row = NewTrackRow {
        isrc,
        track_id: track.id().to_string(),
        producer_id: ProducerId::from_producer_code(&track.producer_code()).to_string(),
        title: track.title(),
        status: track.status().as_str(),
        seq: last_seq.unwrap_or(0) + 1,
        submitted_at: stamp.clone(),
        updated_at: stamp,
      };
      diesel::insert_into(tracks::table)
        .values(&row)
        .on_conflict(tracks::isrc)
        .do_update()
        .set((tracks::title.eq(row.title), tracks::status.eq(row.status), tracks::updated_at.eq(&row.updated_at)))
        .execute(conn)?;

      diesel::delete(track_credits::table.filter(track_credits::isrc.eq(isrc))).execute(conn)?;
      let credits: Vec<TrackCreditRow> = track
        .credits()
        .iter()
        .enumerate()
        .map(|(i, c)| TrackCreditRow {
          isrc: isrc.to_string(),
          position: i as i32,
          artist_name: c.artist_name().to_string(),
          artist_id: c.artist_id().map(|id| id.to_string()),
        })
        .collect();
      diesel::insert_into(track_credits::table).values(&credits).execute(conn)?;

      diesel::delete(track_sources::table.filter(track_sources::isrc.eq(isrc))).execute(conn)?;
      let sources: Vec<TrackSourceRow> = track
        .sources()
        .iter()
        .enumerate()
        .map(|(i, s)| TrackSourceRow {
          isrc: isrc.to_string(),
          position: i as i32,
          source_type: s.source_type().to_string(),
          external_id: s.external_id().to_string(),
        })
        .collect();
      diesel::insert_into(track_sources::table).values(&sources).execute(conn)?;

      Ok(())
    })
  }

  fn recent_tracks(&self, limit: usize) -> Result<Vec<TrackInfo>, StorageError> {
    let mut conn = self.conn()?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = tracks::table.order(tracks::seq.desc()).limit(limit).select(TrackRow::as_select()).load(&mut conn)?;
    rows.into_iter().map(|row| Self::load_track_info(&mut conn, row)).collect()
  }
}

impl TrackRepository for SqliteStore {
  fn find_by_isrc(&self, isrc: &Isrc) -> Result<Option<Track>, RepoError> {
    Ok(self.find_track(isrc)?)
  }

  fn save(&self, track: &Track) -> Result<(), RepoError> {
    Ok(self.save_track(track)?)
  }

  fn find_recent(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError> {
    Ok(self.recent_tracks(limit)?)
  }
}
