use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{create_grade, delete_grade, list_grades, list_my_grades, update_grade};

/// Nested under `/courses/{course_id}/grades`, teacher side.
pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades).post(create_grade))
        .route("/{grade_id}", patch(update_grade).delete(delete_grade))
}

/// Mounted at `/grades`, student side.
pub fn init_my_grades_router() -> Router<AppState> {
    Router::new().route("/mine", get(list_my_grades))
}
