use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use musichub_core::domain::producer::Producer;
use musichub_core::domain::{Isrc, ProducerCode, ProducerId};
use musichub_core::ports::{ProducerRepository, RepoError};

use crate::error::StorageError;
use crate::models::{NewProducerRow, ProducerRow, ProducerTrackRow};
use crate::schema::{producer_tracks, producers};
use crate::store::{SqliteStore, now};

impl SqliteStore {
  fn load_producer(conn: &mut SqliteConnection, row: ProducerRow) -> Result<Producer, StorageError> {
    let code = ProducerCode::parse(&row.producer_code).map_err(|e| StorageError::corrupt("producers", e))?;
    let expected = ProducerId::from_producer_code(&code).to_string();
    if expected != row.id {
      return Err(StorageError::corrupt("producers", format!("id {} does not match code {code}", row.id)));
    }

    let tracks = producer_tracks::table
      .filter(producer_tracks::producer_id.eq(&row.id))
      .order(producer_tracks::position.asc())
      .select(producer_tracks::isrc)
      .load::<String>(conn)?
      .iter()
      .map(|isrc| Isrc::parse(isrc).map_err(|e| StorageError::corrupt("producer_tracks", e)))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Producer::restore(code, row.name, tracks))
  }

  fn find_producer_where(
    &self,
    query: impl FnOnce(&mut SqliteConnection) -> QueryResult<Option<ProducerRow>>,
  ) -> Result<Option<Producer>, StorageError> {
    let mut conn = self.conn()?;
    match query(&mut conn)? {
      Some(row) => Ok(Some(Self::load_producer(&mut conn, row)?)),
      None => Ok(None),
    }
  }

  fn save_producer(&self, producer: &Producer) -> Result<(), StorageError> {
    let mut conn = self.conn()?;
    let producer_id = producer.id().to_string();

    conn.transaction::<_, StorageError, _>(|conn| {
      let row = NewProducerRow {
        id: producer_id.clone(),
        producer_code: producer.code().as_str(),
        name: producer.name(),
        updated_at: now(),
      };
      diesel::insert_into(producers::table)
        .values(&row)
        .on_conflict(producers::id)
        .do_update()
        .set((producers::name.eq(row.name), producers::updated_at.eq(&row.updated_at)))
        .execute(conn)?;

      diesel::delete(producer_tracks::table.filter(producer_tracks::producer_id.eq(&producer_id))).execute(conn)?;
      let tracks: Vec<ProducerTrackRow<'_>> = producer
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, isrc)| ProducerTrackRow { producer_id: producer_id.clone(), isrc: isrc.as_str(), position: i as i32 })
        .collect();
      if !tracks.is_empty() {
        diesel::insert_into(producer_tracks::table).values(&tracks).execute(conn)?;
      }

      Ok(())
    })
  }
}

impl ProducerRepository for SqliteStore {
  fn find_by_id(&self, id: ProducerId) -> Result<Option<Producer>, RepoError> {
    let id = id.to_string();
    Ok(self.find_producer_where(|conn| {
      producers::table.find(id).select(ProducerRow::as_select()).first(conn).optional()
    })?)
  }

  fn find_by_producer_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError> {
    Ok(self.find_producer_where(|conn| {
      producers::table
        .filter(producers::producer_code.eq(code.as_str()))
        .select(ProducerRow::as_select())
        .first(conn)
        .optional()
    })?)
  }

  fn save(&self, producer: &Producer) -> Result<(), RepoError> {
    Ok(self.save_producer(producer)?)
  }
}
