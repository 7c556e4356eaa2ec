use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use musichub_core::domain::artist::{Artist, ArtistName, ArtistStatus, Contribution};
use musichub_core::domain::{ArtistId, Isrc, Source, TrackId};
use musichub_core::ports::{ArtistRepository, RepoError};

use crate::error::StorageError;
use crate::models::{ArtistRow, ArtistSourceRow, ContributionRow, NewArtistRow};
use crate::schema::{artist_contributions, artist_sources, artists};
use crate::store::{SqliteStore, now};

const TABLE: &str = "artists";

impl SqliteStore {
  fn load_artist(conn: &mut SqliteConnection, row: ArtistRow) -> Result<Artist, StorageError> {
    let sources = artist_sources::table
      .filter(artist_sources::artist_id.eq(&row.id))
      .order(artist_sources::position.asc())
      .select(ArtistSourceRow::as_select())
      .load(conn)?
      .into_iter()
      .map(|s| {
        let source_type = s.source_type.parse().map_err(|e| StorageError::corrupt("artist_sources", e))?;
        Source::new(source_type, &s.external_id).map_err(|e| StorageError::corrupt("artist_sources", e))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let contributions = artist_contributions::table
      .filter(artist_contributions::artist_id.eq(&row.id))
      .order(artist_contributions::position.asc())
      .select(ContributionRow::as_select())
      .load(conn)?
      .into_iter()
      .map(|c| {
        let isrc = Isrc::parse(&c.isrc).map_err(|e| StorageError::corrupt("artist_contributions", e))?;
        let track_id = Uuid::parse_str(&c.track_id).map_err(|e| StorageError::corrupt("artist_contributions", e))?;
        Contribution::new(TrackId::from_uuid(track_id), &c.title, isrc)
          .map_err(|e| StorageError::corrupt("artist_contributions", e))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let id = Uuid::parse_str(&row.id).map_err(|e| StorageError::corrupt(TABLE, e))?;
    let name = ArtistName::parse(&row.name).map_err(|e| StorageError::corrupt(TABLE, e))?;
    let status: ArtistStatus = row.status.parse().map_err(|e| StorageError::corrupt(TABLE, e))?;

    Ok(Artist::restore(ArtistId::from_uuid(id), name, status, contributions, sources))
  }

  fn find_artist_where(
    &self,
    query: impl FnOnce(&mut SqliteConnection) -> QueryResult<Option<ArtistRow>>,
  ) -> Result<Option<Artist>, StorageError> {
    let mut conn = self.conn()?;
    match query(&mut conn)? {
      Some(row) => Ok(Some(Self::load_artist(&mut conn, row)?)),
      None => Ok(None),
    }
  }

  fn save_artist(&self, artist: &Artist) -> Result<(), StorageError> {
    let mut conn = self.conn()?;
    let artist_id = artist.id().to_string();

    conn.transaction::<_, StorageError, _>(|conn| {
      let row = NewArtistRow {
        id: artist_id.clone(),
        name: artist.name().as_str(),
        status: artist.status().as_str(),
        updated_at: now(),
      };
      diesel::insert_into(artists::table)
        .values(&row)
        .on_conflict(artists::id)
        .do_update()
        .set((artists::name.eq(row.name), artists::status.eq(row.status), artists::updated_at.eq(&row.updated_at)))
        .execute(conn)?;

      diesel::delete(artist_sources::table.filter(artist_sources::artist_id.eq(&artist_id))).execute(conn)?;
      let sources: Vec<ArtistSourceRow> = artist
        .sources()
        .iter()
        .enumerate()
        .map(|(i, s)| ArtistSourceRow {
          artist_id: artist_id.clone(),
          source_type: s.source_type().to_string(),
          external_id: s.external_id().to_string(),
          position: i as i32,
        })
        .collect();
      if !sources.is_empty() {
        diesel::insert_into(artist_sources::table).values(&sources).execute(conn)?;
      }

      diesel::delete(artist_contributions::table.filter(artist_contributions::artist_id.eq(&artist_id)))
        .execute(conn)?;
      let contributions: Vec<ContributionRow> = artist
        .contributions()
        .iter()
        .enumerate()
        .map(|(i, c)| ContributionRow {
          artist_id: artist_id.clone(),
          position: i as i32,
          track_id: c.track_id.to_string(),
          isrc: c.isrc.to_string(),
          title: c.title.clone(),
        })
        .collect();
      if !contributions.is_empty() {
        diesel::insert_into(artist_contributions::table).values(&contributions).execute(conn)?;
      }

      Ok(())
    })
  }
}

impl ArtistRepository for SqliteStore {
  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    let id = id.to_string();
    Ok(self.find_artist_where(|conn| {
      artists::table.find(id).select(ArtistRow::as_select()).first(conn).optional()
    })?)
  }

  fn find_by_name(&self, name: &str) -> Result<Option<Artist>, RepoError> {
    Ok(self.find_artist_where(|conn| {
      artists::table
        .filter(artists::name.eq(name))
        .order(artists::created_at.asc())
        .select(ArtistRow::as_select())
        .first(conn)
        .optional()
    })?)
  }

  fn save(&self, artist: &Artist) -> Result<(), RepoError> {
    Ok(self.save_artist(artist)?)
  }
}
