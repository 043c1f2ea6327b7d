#![allow(dead_code)]

use academy::academy_auth::create_access_token;
use academy::academy_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
use academy::academy_core::age::today;
use academy::academy_core::password::hash_password_with_cost;
use academy::academy_models::AdminRole;
use academy::router::init_router;
use academy::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Days, Months, NaiveDate};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn test_state(pool: PgPool, rate_limit_config: RateLimitConfig) -> AppState {
    AppState::new(
        pool,
        test_jwt_config(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit_config,
        ServerConfig::default(),
    )
}

/// Router with rate limiting switched off.
pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool, RateLimitConfig::disabled()))
}

pub struct TestAdmin {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: AdminRole,
}

pub async fn create_test_admin(
    pool: &PgPool,
    username: &str,
    email: &str,
    password: &str,
    role: AdminRole,
) -> TestAdmin {
    let hashed = hash_password_with_cost(password, 4).unwrap();

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO admins (username, email, password, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestAdmin {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
    }
}

pub fn token_for(admin: &TestAdmin) -> String {
    create_access_token(admin.id, &admin.email, admin.role.as_str(), &test_jwt_config()).unwrap()
}

/// Creates an admin and returns a bearer token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    let admin = create_test_admin(
        pool,
        "testadmin",
        "testadmin@example.com",
        "admin123",
        AdminRole::Admin,
    )
    .await;
    token_for(&admin)
}

pub async fn create_test_teacher(pool: &PgPool, name: &str, email: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO teachers (name, email, phone, specialization) VALUES ($1, $2, '+1234567890', 'Recitation') RETURNING id",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_class(
    pool: &PgPool,
    name: &str,
    age_min: i32,
    age_max: i32,
    max_students: i32,
    teacher_id: Option<Uuid>,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO classes (name, start_time, end_time, age_min, age_max, teacher_id, max_students)
         VALUES ($1, '09:00', '11:00', $2, $3, $4, $5) RETURNING id",
    )
    .bind(name)
    .bind(age_min)
    .bind(age_max)
    .bind(teacher_id)
    .bind(max_students)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn current_students(pool: &PgPool, class_id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT current_students FROM classes WHERE id = $1")
        .bind(class_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// A birth date `age` years and a month ago.
pub fn dob_for_age(age: u32) -> NaiveDate {
    today()
        .checked_sub_months(Months::new(age * 12))
        .and_then(|d| d.checked_sub_days(Days::new(30)))
        .unwrap()
}

pub fn registration_body(father_email: &str, class_id: Uuid, age: u32) -> Value {
    json!({
        "parent": {
            "fatherFirstName": "Yusuf",
            "fatherLastName": "Karim",
            "fatherPhone": "+1234567890",
            "fatherEmail": father_email,
        },
        "student": {
            "firstName": "Maryam",
            "lastName": "Karim",
            "dateOfBirth": dob_for_age(age).to_string(),
            "classId": class_id,
        }
    })
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

/// Decodes a JSON response body, `Null` when empty.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Submits a registration and returns the new student id.
pub async fn submit_registration(app: &Router, father_email: &str, class_id: Uuid, age: u32) -> Uuid {
    let (status, body) = send(
        app,
        "POST",
        "/api/registrations",
        None,
        Some(registration_body(father_email, class_id, age)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["studentId"].as_str().unwrap().parse().unwrap()
}
