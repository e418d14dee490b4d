mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_course, create_test_user, setup_test_app};
use coursedesk::modules::users::model::UserRole;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_course_starts_as_draft(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/courses")
        .header("authorization", format!("Bearer {}", teacher.token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "title": "Intro to Databases",
                "description": "Relational fundamentals",
                "price": 49.0,
                "category": "engineering"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "draft");
    assert_eq!(body["teacher_id"], teacher.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_cannot_create_courses(pool: SqlitePool) {
    let student = create_test_user(&pool, UserRole::Student).await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/courses")
        .header("authorization", format!("Bearer {}", student.token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "title": "Not Allowed"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_draft_course_hidden_from_non_owner(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let course_id = create_test_course(&pool, teacher.id, "draft").await;
    let app = setup_test_app(pool.clone()).await;

    // The owner sees their draft.
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/courses/{course_id}"))
        .header("authorization", format!("Bearer {}", teacher.token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another signed-in user gets 403: the course exists but is not public.
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/courses/{course_id}"))
        .header("authorization", format!("Bearer {}", student.token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Anonymous callers get the same answer.
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/courses/{course_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_active_course_visible_to_everyone(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/courses/{course_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_course_is_404_even_for_strangers(pool: SqlitePool) {
    let student = create_test_user(&pool, UserRole::Student).await;
    let app = setup_test_app(pool.clone()).await;

    // Existence is decided before visibility, so an unknown id is a plain 404.
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/courses/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", student.token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_listing_only_shows_active(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    create_test_course(&pool, teacher.id, "draft").await;
    let active_id = create_test_course(&pool, teacher.id, "active").await;
    create_test_course(&pool, teacher.id, "archived").await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/courses")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], active_id.to_string());

    // A status filter cannot widen the public view.
    let request = Request::builder()
        .method("GET")
        .uri("/api/courses?status=draft")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_listing_includes_own_drafts(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let other = create_test_user(&pool, UserRole::Teacher).await;
    create_test_course(&pool, teacher.id, "draft").await;
    create_test_course(&pool, teacher.id, "active").await;
    create_test_course(&pool, other.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/courses")
        .header("authorization", format!("Bearer {}", teacher.token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    for course in listed {
        assert_eq!(course["teacher_id"], teacher.id.to_string());
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_owner_can_update(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let rival = create_test_user(&pool, UserRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher.id, "draft").await;
    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/courses/{course_id}"))
        .header("authorization", format!("Bearer {}", rival.token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "status": "active" })).unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/courses/{course_id}"))
        .header("authorization", format!("Bearer {}", teacher.token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "status": "active" })).unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "active");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_course_removes_children(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;

    sqlx::query(
        "INSERT INTO schedules (id, course_id, lesson_number, title, starts_at, ends_at, created_at, updated_at)
         VALUES (?, ?, 1, 'Lesson', datetime('now'), datetime('now'), datetime('now'), datetime('now'))",
    )
    .bind(Uuid::new_v4())
    .bind(course_id)
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO attachments (id, course_id, file_name, content_type, size_bytes, storage_key, created_at)
         VALUES (?, ?, 'syllabus.pdf', 'application/pdf', 1024, 'syllabus.pdf', datetime('now'))",
    )
    .bind(Uuid::new_v4())
    .bind(course_id)
    .execute(&pool)
    .await
    .unwrap();

    let app = setup_test_app(pool.clone()).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/courses/{course_id}"))
        .header("authorization", format!("Bearer {}", teacher.token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let schedules: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedules WHERE course_id = ?")
        .bind(course_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(schedules, 0);

    let attachments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attachments WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(attachments, 0);
}
