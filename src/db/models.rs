use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// One row of the `album` table. Field order is the wire order.
///
/// Absent or `null` fields decode to zero values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, FromRow)]
#[serde(default)]
pub struct Album {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Columns written on insert; `id` is always assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl From<Album> for NewAlbum {
    fn from(a: Album) -> Self {
        Self {
            title: a.title,
            artist: a.artist,
            price: a.price,
        }
    }
}
