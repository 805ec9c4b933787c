use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::db::{Album, NewAlbum};
use crate::response::IndentedJson;
use crate::{RecordingsError, router::RecordingsState};

/// GET /albums -> every album as a JSON array.
pub async fn list_albums(
    State(state): State<RecordingsState>,
) -> Result<IndentedJson<Vec<Album>>, RecordingsError> {
    let albums = state
        .storage
        .list()
        .await
        .inspect_err(|e| error!(error = %e, "failed to list albums"))
        .map_err(RecordingsError::ListAlbums)?;
    Ok(IndentedJson(albums))
}

/// GET /albums/{id} -> the album with that id, or 404.
pub async fn get_album_by_id(
    State(state): State<RecordingsState>,
    Path(id): Path<String>,
) -> Result<IndentedJson<Album>, RecordingsError> {
    match state.storage.get_by_id(&id).await {
        Ok(Some(album)) => Ok(IndentedJson(album)),
        Ok(None) => Err(RecordingsError::AlbumNotFound),
        Err(e) => {
            error!(id = %id, error = %e, "failed to get album");
            Err(RecordingsError::GetAlbum(e))
        }
    }
}

/// POST /albums -> inserts title/artist/price; responds 201 with a `Location` header.
///
/// The body is decoded as JSON whatever its `content-type`.
pub async fn post_album(
    State(state): State<RecordingsState>,
    body: Bytes,
) -> Result<Response, RecordingsError> {
    let Json(album) = Json::<Album>::from_bytes(&body)
        .inspect_err(|e| warn!(error = %e, "rejected album body"))?;
    let album = NewAlbum::from(album);

    let id = state
        .storage
        .insert(&album)
        .await
        .inspect_err(|e| error!(error = %e, "failed to add album"))
        .map_err(RecordingsError::AddAlbum)?;

    info!(id, title = %album.title, artist = %album.artist, "album added");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/albums/{id}"))],
        IndentedJson(Value::Null),
    )
        .into_response())
}
