use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_feedback, create_feedback_item, delete_feedback, delete_feedback_item, list_feedback,
    list_my_feedback, update_feedback, update_feedback_item,
};

/// Nested under `/courses/{course_id}/feedback`, teacher side.
pub fn init_feedback_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feedback).post(create_feedback))
        .route(
            "/{feedback_id}",
            patch(update_feedback).delete(delete_feedback),
        )
        .route("/{feedback_id}/items", post(create_feedback_item))
        .route(
            "/{feedback_id}/items/{item_id}",
            patch(update_feedback_item).delete(delete_feedback_item),
        )
}

/// Mounted at `/feedback`, student side.
pub fn init_my_feedback_router() -> Router<AppState> {
    Router::new().route("/mine", get(list_my_feedback))
}
