#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gymlog::db::{create_memory_pool, DbPool};
use gymlog::handlers::{dev, exercises, performance, sessions, sets, stats, workouts};
use gymlog::migrations::run_migrations_for_tests;
use gymlog::repositories::{
    ExerciseRepository, PerformanceRepository, SetRepository, StatsRepository, WorkoutRepository,
};
use gymlog::session::{SessionManager, StartGuard};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    build_app(pool, false)
}

pub fn create_test_app_with_dev_routes(pool: DbPool) -> Router {
    build_app(pool, true)
}

fn build_app(pool: DbPool, enable_dev_routes: bool) -> Router {
    // Create repositories
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let set_repo = SetRepository::new(pool.clone());
    let performance_repo = PerformanceRepository::new(pool.clone());
    let stats_repo = StatsRepository::new(pool.clone());

    // Create handler states
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo,
        set_repo: set_repo.clone(),
    };
    let sets_state = sets::SetsState { set_repo };
    let performance_state = performance::PerformanceState {
        performance_repo: performance_repo.clone(),
    };
    let stats_state = stats::StatsState {
        stats_repo,
        workout_repo: workout_repo.clone(),
    };
    let sessions_state = sessions::SessionsState {
        sessions: SessionManager::new(workout_repo, performance_repo, StartGuard::new()),
    };
    let dev_state = enable_dev_routes.then(|| dev::DevState { pool });

    gymlog::routes::create_router(
        workouts_state,
        exercises_state,
        sets_state,
        performance_state,
        stats_state,
        sessions_state,
        dev_state,
    )
}

/// Sends a request and returns the status with the decoded JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

// Test data creation helpers

/// Creates a workout with one exercise and `sets` completed sets given as
/// `(weight, weight_type, reps)`. Returns the workout id.
pub async fn create_logged_workout(
    app: &Router,
    date: &str,
    exercise: &str,
    sets: &[(f64, &str, i64)],
) -> i64 {
    let (_, batch) = post(
        app,
        "/api/workouts/batch",
        serde_json::json!({
            "date": date,
            "name": "Session",
            "exercises": [{"name": exercise, "set_count": sets.len()}]
        }),
    )
    .await;
    let workout_id = batch["workout_id"].as_i64().unwrap();

    for (index, (weight, weight_type, reps)) in sets.iter().enumerate() {
        let set_id = batch["exercises"][0]["sets"][index]["id"].as_i64().unwrap();
        put(
            app,
            &format!("/api/sets/{}", set_id),
            serde_json::json!({
                "weight": weight,
                "weight_type": weight_type,
                "reps": reps,
                "completed": true
            }),
        )
        .await;
    }

    workout_id
}
