use crate::db::models::{Album, NewAlbum};
use crate::db::schema::SQLITE_INIT;
use crate::error::RecordingsError;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection, Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct SqliteAlbums {
    pool: SqlitePool,
}

impl SqliteAlbums {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `url` and apply the bundled schema.
    pub async fn connect(url: &str, acquire_timeout: Duration) -> Result<Self, RecordingsError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;
        let albums = Self::new(pool);
        albums.init_schema().await?;
        Ok(albums)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), RecordingsError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }

    pub async fn list(&self) -> Result<Vec<Album>, sqlx::Error> {
        sqlx::query_as::<_, Album>("SELECT id, title, artist, price FROM album")
            .fetch(&self.pool)
            .try_collect()
            .await
    }

    /// `id` is bound as text; SQLite applies the column's integer affinity.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Album>, sqlx::Error> {
        sqlx::query_as::<_, Album>("SELECT id, title, artist, price FROM album WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn insert(&self, album: &NewAlbum) -> Result<i64, sqlx::Error> {
        let res = sqlx::query("INSERT INTO album (title, artist, price) VALUES (?, ?, ?)")
            .bind(&album.title)
            .bind(&album.artist)
            .bind(album.price)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM album")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}
