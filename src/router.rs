use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

use crate::logging::logging_middleware;
use crate::modules::attachments::router::init_attachments_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::deadlines::router::init_deadlines_router;
use crate::modules::enrollments::router::{
    init_course_enrollments_router, init_enrollments_router,
};
use crate::modules::feedback::router::{init_feedback_router, init_my_feedback_router};
use crate::modules::grades::router::{init_grades_router, init_my_grades_router};
use crate::modules::resources::router::init_resources_router;
use crate::modules::schedules::router::init_schedules_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router())
                .nest(
                    "/courses",
                    init_courses_router()
                        .nest("/{course_id}/schedules", init_schedules_router())
                        .nest("/{course_id}/resources", init_resources_router())
                        .nest("/{course_id}/attachments", init_attachments_router())
                        .nest("/{course_id}/deadlines", init_deadlines_router())
                        .nest("/{course_id}/feedback", init_feedback_router())
                        .nest("/{course_id}/grades", init_grades_router())
                        .nest("/{course_id}/enrollments", init_course_enrollments_router()),
                )
                .nest("/enrollments", init_enrollments_router())
                .nest("/feedback", init_my_feedback_router())
                .nest("/grades", init_my_grades_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
