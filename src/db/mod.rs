//! Database module: the album record and its storage backends.
//!
//! Layout:
//! - `models.rs`: `Album` row/DTO and the insert payload
//! - `schema.rs`: SQL DDL for the SQLite backend
//! - `mysql.rs`, `sqlite.rs`: pooled statement execution per backend

pub mod models;
pub mod mysql;
pub mod schema;
pub mod sqlite;

pub use models::{Album, NewAlbum};
pub use mysql::MySqlAlbums;
pub use sqlite::SqliteAlbums;

use crate::config::DatabaseConfig;
use crate::error::RecordingsError;

/// Shared handle to the album table. Cloning shares the underlying pool.
#[derive(Clone)]
pub enum AlbumStorage {
    MySql(MySqlAlbums),
    Sqlite(SqliteAlbums),
}

impl AlbumStorage {
    /// Connect, then run the liveness probe. Either failure is returned to the caller.
    pub async fn open(cfg: &DatabaseConfig) -> Result<Self, RecordingsError> {
        let storage = match cfg.url.as_deref() {
            Some(url) if url.starts_with("sqlite:") => {
                Self::Sqlite(SqliteAlbums::connect(url, cfg.acquire_timeout()).await?)
            }
            _ => Self::MySql(MySqlAlbums::connect(cfg).await?),
        };
        storage.ping().await?;
        Ok(storage)
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::MySql(_) => "mysql",
            Self::Sqlite(_) => "sqlite",
        }
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        match self {
            Self::MySql(db) => db.ping().await,
            Self::Sqlite(db) => db.ping().await,
        }
    }

    /// Every row in database order. Any failure discards the partial result.
    pub async fn list(&self) -> Result<Vec<Album>, sqlx::Error> {
        match self {
            Self::MySql(db) => db.list().await,
            Self::Sqlite(db) => db.list().await,
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Album>, sqlx::Error> {
        match self {
            Self::MySql(db) => db.get_by_id(id).await,
            Self::Sqlite(db) => db.get_by_id(id).await,
        }
    }

    /// Insert title/artist/price and return the generated id.
    pub async fn insert(&self, album: &NewAlbum) -> Result<i64, sqlx::Error> {
        match self {
            Self::MySql(db) => db.insert(album).await,
            Self::Sqlite(db) => db.insert(album).await,
        }
    }
}
