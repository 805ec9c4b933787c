use axum::{Router, routing::get};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::db::AlbumStorage;
use crate::handlers::albums::{get_album_by_id, list_albums, post_album};

#[derive(Clone)]
pub struct RecordingsState {
    pub storage: AlbumStorage,
}

impl RecordingsState {
    pub fn new(storage: AlbumStorage) -> Self {
        Self { storage }
    }
}

pub fn recordings_router(state: RecordingsState) -> Router {
    Router::new()
        .route("/albums", get(list_albums).post(post_album))
        .route("/albums/{id}", get(get_album_by_id))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
