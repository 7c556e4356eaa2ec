//! Persistencia SQLite del catálogo (artistas, productores y pistas) sobre
//! Diesel + r2d2. Implementa los puertos de repositorio de `musichub-core`.

mod artists;
mod config;
mod error;
mod models;
mod producers;
mod schema;
mod store;
mod tracks;

pub use config::StorageConfig;
pub use error::StorageError;
pub use store::{MIGRATIONS, SqliteStore};
