use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{create_deadline, delete_deadline, list_deadlines, update_deadline};

/// Nested under `/courses/{course_id}/deadlines`.
pub fn init_deadlines_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_deadlines).post(create_deadline))
        .route(
            "/{deadline_id}",
            patch(update_deadline).delete(delete_deadline),
        )
}
