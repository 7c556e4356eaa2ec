use diesel::prelude::*;

use crate::schema::{
  artist_contributions, artist_sources, artists, producer_tracks, producers, track_credits, track_sources, tracks,
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistRow {
  pub id: String,
  pub name: String,
  pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = artists)]
pub struct NewArtistRow<'a> {
  pub id: String,
  pub name: &'a str,
  pub status: &'static str,
  pub updated_at: String,
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = artist_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistSourceRow {
  pub artist_id: String,
  pub source_type: String,
  pub external_id: String,
  pub position: i32,
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = artist_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContributionRow {
  pub artist_id: String,
  pub position: i32,
  pub track_id: String,
  pub isrc: String,
  pub title: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = producers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProducerRow {
  pub id: String,
  pub producer_code: String,
  pub name: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = producers)]
pub struct NewProducerRow<'a> {
  pub id: String,
  pub producer_code: &'a str,
  pub name: Option<&'a str>,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = producer_tracks)]
pub struct ProducerTrackRow<'a> {
  pub producer_id: String,
  pub isrc: &'a str,
  pub position: i32,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tracks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackRow {
  pub isrc: String,
  pub producer_id: String,
  pub title: String,
  pub status: String,
  pub submitted_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tracks)]
pub struct NewTrackRow<'a> {
  pub isrc: &'a str,
  pub track_id: String,
  pub producer_id: String,
  pub title: &'a str,
  pub status: &'static str,
  pub seq: i64,
  pub submitted_at: String,
  pub updated_at: String,
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = track_credits)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackCreditRow {
  pub isrc: String,
  pub position: i32,
  pub artist_name: String,
  pub artist_id: Option<String>,
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = track_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackSourceRow {
  pub isrc: String,
  pub position: i32,
  pub source_type: String,
  pub external_id: String,
}
