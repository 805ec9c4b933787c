use crate::config::DatabaseConfig;
use crate::db::models::{Album, NewAlbum};
use crate::error::RecordingsError;
use futures::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{Connection, MySql, Pool};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub type MySqlPool = Pool<MySql>;

const DEFAULT_PORT: u16 = 3306;

// `price` is DECIMAL in the recordings schema; the cast lets it decode as f64.
const SELECT_ALBUMS: &str = "SELECT id, title, artist, CAST(price AS DOUBLE) AS price FROM album";
const SELECT_ALBUM_BY_ID: &str =
    "SELECT id, title, artist, CAST(price AS DOUBLE) AS price FROM album WHERE id = ?";
const INSERT_ALBUM: &str = "INSERT INTO album (title, artist, price) VALUES (?, ?, ?)";

#[derive(Clone)]
pub struct MySqlAlbums {
    pool: MySqlPool,
}

impl MySqlAlbums {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Build the pool from discrete settings, or from `cfg.url` when set.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, RecordingsError> {
        if !cfg.allow_native_passwords {
            warn!("allow_native_passwords=false is ignored; the driver negotiates the auth plugin");
        }
        let options = match cfg.url.as_deref() {
            Some(url) => MySqlConnectOptions::from_str(url)?,
            None => connect_options(cfg)?,
        };
        Self::connect_with(options, cfg.acquire_timeout()).await
    }

    pub async fn connect_with(
        options: MySqlConnectOptions,
        acquire_timeout: Duration,
    ) -> Result<Self, RecordingsError> {
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }

    pub async fn list(&self) -> Result<Vec<Album>, sqlx::Error> {
        sqlx::query_as::<_, Album>(SELECT_ALBUMS)
            .fetch(&self.pool)
            .try_collect()
            .await
    }

    /// `id` is passed through as a string; MySQL coerces it against the integer column.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Album>, sqlx::Error> {
        sqlx::query_as::<_, Album>(SELECT_ALBUM_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn insert(&self, album: &NewAlbum) -> Result<i64, sqlx::Error> {
        let res = sqlx::query(INSERT_ALBUM)
            .bind(&album.title)
            .bind(&album.artist)
            .bind(album.price)
            .execute(&self.pool)
            .await?;
        signed_insert_id(res.last_insert_id())
    }
}

fn signed_insert_id(id: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(id)
        .map_err(|_| sqlx::Error::Protocol(format!("insert id {id} does not fit in i64")))
}

/// Translate the discrete settings into driver options.
pub fn connect_options(cfg: &DatabaseConfig) -> Result<MySqlConnectOptions, RecordingsError> {
    let options = MySqlConnectOptions::new()
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.db_name);

    match cfg.net.as_str() {
        "tcp" => {
            let (host, port) = split_host_port(&cfg.addr)?;
            Ok(options.host(host).port(port))
        }
        "unix" => Ok(options.socket(&cfg.addr)),
        other => Err(RecordingsError::InvalidDatabaseConfig(format!(
            "unsupported network protocol `{other}`"
        ))),
    }
}

/// Split `host:port`; a missing port means 3306. IPv6 hosts may be bracketed.
fn split_host_port(addr: &str) -> Result<(&str, u16), RecordingsError> {
    if let Some(rest) = addr.strip_prefix('[') {
        let Some((host, tail)) = rest.split_once(']') else {
            return Err(RecordingsError::InvalidDatabaseConfig(format!(
                "unterminated IPv6 address `{addr}`"
            )));
        };
        return match tail.strip_prefix(':') {
            Some(port) => Ok((host, parse_port(addr, port)?)),
            None if tail.is_empty() => Ok((host, DEFAULT_PORT)),
            None => Err(RecordingsError::InvalidDatabaseConfig(format!(
                "invalid address `{addr}`"
            ))),
        };
    }

    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => Ok((host, parse_port(addr, port)?)),
        Some(_) => Err(RecordingsError::InvalidDatabaseConfig(format!(
            "IPv6 address `{addr}` must be bracketed"
        ))),
        None => Ok((addr, DEFAULT_PORT)),
    }
}

fn parse_port(addr: &str, port: &str) -> Result<u16, RecordingsError> {
    port.parse().map_err(|_| {
        RecordingsError::InvalidDatabaseConfig(format!("invalid port in address `{addr}`"))
    })
}
