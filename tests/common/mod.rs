use std::sync::Arc;

use coursedesk::config::cors::CorsConfig;
use coursedesk::config::jwt::JwtConfig;
use coursedesk::modules::users::model::UserRole;
use coursedesk::router::init_router;
use coursedesk::state::AppState;
use coursedesk::utils::jwt::create_access_token;
use coursedesk::utils::password::hash_password;
use coursedesk::utils::storage::LocalFileStorage;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn setup_test_app(pool: SqlitePool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        storage: Arc::new(LocalFileStorage::new(
            std::env::temp_dir().join("coursedesk-test-uploads"),
            "http://localhost:3000/files".to_string(),
        )),
    };
    init_router(state)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub token: String,
}

/// Inserts a user and mints a valid bearer token for them.
pub async fn create_test_user(pool: &SqlitePool, role: UserRole) -> TestUser {
    let id = Uuid::new_v4();
    let email = generate_unique_email();
    let password = "testpass123".to_string();
    let hashed = hash_password(&password).unwrap();
    let now = chrono::Utc::now();

    sqlx::query(
        "INSERT INTO users (id, email, password, display_name, role, created_at, updated_at)
         VALUES (?, ?, ?, 'Test User', ?, ?, ?)",
    )
    .bind(id)
    .bind(&email)
    .bind(&hashed)
    .bind(role.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();

    let token = create_access_token(id, &email, "Test User", role, &JwtConfig::from_env()).unwrap();

    TestUser {
        id,
        email,
        password,
        role,
        token,
    }
}

/// Inserts a course owned by the given teacher.
#[allow(dead_code)]
pub async fn create_test_course(pool: &SqlitePool, teacher_id: Uuid, status: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();

    sqlx::query(
        "INSERT INTO courses (id, teacher_id, title, description, price, status, created_at, updated_at)
         VALUES (?, ?, 'Test Course', 'A course used by the test suite', 0, ?, ?, ?)",
    )
    .bind(id)
    .bind(teacher_id)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();

    id
}

/// Inserts an enrollment row directly, bypassing the application flow.
#[allow(dead_code)]
pub async fn create_test_enrollment(
    pool: &SqlitePool,
    student_id: Uuid,
    course_id: Uuid,
    status: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();

    sqlx::query(
        "INSERT INTO enrollments (id, student_id, course_id, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(student_id)
    .bind(course_id)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();

    id
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}
