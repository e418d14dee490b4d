use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

use super::controller::{apply, cancel, list_for_course, list_mine, review};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(apply))
        .route("/mine", get(list_mine))
        .route("/{enrollment_id}", delete(cancel))
        .route("/{enrollment_id}/review", patch(review))
}

/// Nested under `/courses/{course_id}/enrollments`.
pub fn init_course_enrollments_router() -> Router<AppState> {
    Router::new().route("/", get(list_for_course))
}
