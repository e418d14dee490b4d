use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_resource, delete_resource, list_resources, update_resource};

/// Nested under `/courses/{course_id}/resources`.
pub fn init_resources_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_resources).post(create_resource))
        .route(
            "/{resource_id}",
            axum::routing::patch(update_resource).delete(delete_resource),
        )
}
