use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{
    create_attachment, delete_attachment, download_attachment, list_attachments,
};

/// Nested under `/courses/{course_id}/attachments`.
pub fn init_attachments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attachments).post(create_attachment))
        .route("/{attachment_id}", delete(delete_attachment))
        .route("/{attachment_id}/download", get(download_attachment))
}
