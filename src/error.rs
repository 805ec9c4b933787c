use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::response::IndentedJson;

#[derive(Debug, ThisError)]
pub enum RecordingsError {
    #[error("Invalid database configuration: {0}")]
    InvalidDatabaseConfig(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("error getting albums: {0}")]
    ListAlbums(#[source] SqlxError),

    #[error("error getting album: {0}")]
    GetAlbum(#[source] SqlxError),

    #[error("album not found")]
    AlbumNotFound,

    #[error("error adding album: {0}")]
    AddAlbum(#[source] SqlxError),

    #[error("invalid album body: {0}")]
    InvalidAlbumBody(#[from] JsonRejection),
}

impl RecordingsError {
    /// Status and client-facing message. Driver details stay in the server log.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            RecordingsError::ListAlbums(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "error getting albums")
            }
            RecordingsError::GetAlbum(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error getting album"),
            RecordingsError::AlbumNotFound => (StatusCode::NOT_FOUND, "album not found"),
            // Malformed bodies share the insert failure response.
            RecordingsError::AddAlbum(_) | RecordingsError::InvalidAlbumBody(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "error adding album")
            }
            RecordingsError::InvalidDatabaseConfig(_) | RecordingsError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl IntoResponse for RecordingsError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, IndentedJson(ApiErrorBody { message })).into_response()
    }
}

/// Body of every error response: `{"message": "..."}`.
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub message: &'static str,
}
