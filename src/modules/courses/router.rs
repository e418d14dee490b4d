use axum::{Router, routing::get, routing::post};

use crate::state::AppState;

use super::controller::{create_course, delete_course, get_course, list_courses, update_course};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).get(list_courses))
        .route(
            "/{course_id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
}
