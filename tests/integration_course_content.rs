mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_course, create_test_enrollment, create_test_user, setup_test_app};
use coursedesk::modules::users::model::UserRole;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: String, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_schedule_crud_is_owner_gated(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let rival = create_test_user(&pool, UserRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    let dto = json!({
        "lesson_number": 1,
        "title": "Ownership and Borrowing",
        "starts_at": "2026-09-07T10:00:00Z",
        "ends_at": "2026-09-07T12:00:00Z",
        "room": "B-204"
    });

    // A non-owner teacher cannot add lessons to someone else's course.
    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/schedules"),
            &rival.token,
            dto.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/schedules"),
            &teacher.token,
            dto,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let schedule = body_json(response).await;
    let schedule_id = schedule["id"].as_str().unwrap().to_string();
    assert_eq!(schedule["room"], "B-204");

    // Anonymous callers can read the schedule of an active course.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/courses/{course_id}/schedules"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/courses/{course_id}/schedules/{schedule_id}"))
                .header("authorization", format!("Bearer {}", teacher.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_draft_course_content_is_hidden(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let course_id = create_test_course(&pool, teacher.id, "draft").await;
    let app = setup_test_app(pool.clone()).await;

    for path in ["schedules", "resources", "deadlines", "attachments"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/courses/{course_id}/{path}"))
                    .header("authorization", format!("Bearer {}", student.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "path {path}");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resource_rejects_bad_url(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/resources"),
            &teacher.token,
            json!({ "title": "Broken", "url": "not a url" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(post_json(
            format!("/api/courses/{course_id}/resources"),
            &teacher.token,
            json!({ "title": "The Book", "url": "https://doc.rust-lang.org/book/" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deadline_lifecycle(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/deadlines"),
            &teacher.token,
            json!({
                "title": "Project milestone 1",
                "due_at": "2026-10-01T23:59:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let deadline_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/courses/{course_id}/deadlines/{deadline_id}"))
                .header("authorization", format!("Bearer {}", teacher.token))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({ "due_at": "2026-10-08T23:59:00Z" })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["due_at"], "2026-10-08T23:59:00Z");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attachment_upload_and_download_urls(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/attachments"),
            &teacher.token,
            json!({
                "file_name": "syllabus.pdf",
                "content_type": "application/pdf",
                "size_bytes": 12345
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let upload_url = created["upload_url"].as_str().unwrap();
    assert!(upload_url.starts_with("http://localhost:3000/files/"));
    assert!(upload_url.ends_with("syllabus.pdf"));
    let attachment_id = created["attachment"]["id"].as_str().unwrap().to_string();

    // Anyone who can see the course can fetch a download URL.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/api/courses/{course_id}/attachments/{attachment_id}/download"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["download_url"].as_str().unwrap().contains("syllabus.pdf"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attachment_creation_is_owner_only(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .oneshot(post_json(
            format!("/api/courses/{course_id}/attachments"),
            &student.token,
            json!({
                "file_name": "notes.pdf",
                "content_type": "application/pdf",
                "size_bytes": 100
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_feedback_flow_between_teacher_and_student(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    let app = setup_test_app(pool.clone()).await;

    // An unenrolled student cannot receive feedback.
    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/feedback"),
            &teacher.token,
            json!({
                "student_id": student.id,
                "body": "Strong start, revise error handling"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    create_test_enrollment(&pool, student.id, course_id, "approved").await;

    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/feedback"),
            &teacher.token,
            json!({
                "student_id": student.id,
                "body": "Strong start, revise error handling"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let feedback_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/feedback/{feedback_id}/items"),
            &teacher.token,
            json!({ "text": "Re-read chapter 9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The student sees the feedback and its items under /feedback/mine.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/feedback/mine")
                .header("authorization", format!("Bearer {}", student.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mine = body_json(response).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["body"], "Strong start, revise error handling");
    assert_eq!(mine[0]["items"].as_array().unwrap().len(), 1);

    // Students cannot write feedback.
    let response = app
        .oneshot(post_json(
            format!("/api/courses/{course_id}/feedback"),
            &student.token,
            json!({ "student_id": student.id, "body": "Self-review" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grades_flow_between_teacher_and_student(pool: SqlitePool) {
    let teacher = create_test_user(&pool, UserRole::Teacher).await;
    let student = create_test_user(&pool, UserRole::Student).await;
    let course_id = create_test_course(&pool, teacher.id, "active").await;
    create_test_enrollment(&pool, student.id, course_id, "approved").await;
    let app = setup_test_app(pool.clone()).await;

    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/grades"),
            &teacher.token,
            json!({
                "student_id": student.id,
                "title": "Midterm",
                "score": 87.5,
                "max_score": 100.0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Scores above the maximum are rejected.
    let response = app
        .clone()
        .oneshot(post_json(
            format!("/api/courses/{course_id}/grades"),
            &teacher.token,
            json!({
                "student_id": student.id,
                "title": "Bonus",
                "score": 120.0,
                "max_score": 100.0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/grades/mine")
                .header("authorization", format!("Bearer {}", student.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mine = body_json(response).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "Midterm");
    assert_eq!(mine[0]["course_title"], "Test Course");

    // The course's grade book is not visible to students.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/courses/{course_id}/grades"))
                .header("authorization", format!("Bearer {}", student.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
