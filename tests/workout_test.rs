mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_and_list_workouts() {
    let app = common::create_test_app(common::setup_test_db());

    let (status, first) = common::post(
        &app,
        "/api/workouts",
        json!({"date": "2025-01-01", "name": "Upper"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = common::post(
        &app,
        "/api/workouts",
        json!({"date": "2025-01-03", "name": "Lower", "notes": "knees ok"}),
    )
    .await;

    let (status, list) = common::get(&app, "/api/workouts").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]);

    let (_, recent) = common::get(&app, "/api/workouts?limit=1").await;
    assert_eq!(recent.as_array().unwrap().len(), 1);
    assert_eq!(recent[0]["name"], "Lower");
}

#[tokio::test]
async fn test_get_missing_workout_returns_404() {
    let app = common::create_test_app(common::setup_test_db());

    let (status, body) = common::get(&app, "/api/workouts/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Workout not found");
}

#[tokio::test]
async fn test_batch_create_round_trip() {
    let app = common::create_test_app(common::setup_test_db());

    let (status, batch) = common::post(
        &app,
        "/api/workouts/batch",
        json!({
            "date": "2025-03-01",
            "name": "Legs",
            "exercises": [
                {"name": "Squat", "set_count": 3, "template_ref": "tpl-1"},
                {"name": "Leg Curl", "set_count": 2}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(batch["exercises"][0]["template_ref"], "tpl-1");
    assert!(batch["exercises"][1]["template_ref"].is_null());

    let workout_id = batch["workout_id"].as_i64().unwrap();
    let (status, full) = common::get(&app, &format!("/api/workouts/{}", workout_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["workout"]["name"], "Legs");
    assert!(full["workout"]["finished_at"].is_null());

    let exercises = full["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["name"], "Squat");

    let squat_sets = exercises[0]["sets"].as_array().unwrap();
    let positions: Vec<i64> = squat_sets
        .iter()
        .map(|s| s["order_index"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);
    for set in squat_sets {
        assert!(set["weight"].is_null());
        assert!(set["reps"].is_null());
        assert_eq!(set["completed"], false);
        assert_eq!(set["kind"], "N");
        assert_eq!(set["weight_type"], "total");
    }
    assert_eq!(exercises[1]["sets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_create_rejects_huge_set_count() {
    let app = common::create_test_app(common::setup_test_db());

    let (status, body) = common::post(
        &app,
        "/api/workouts/batch",
        json!({
            "date": "2025-03-01",
            "name": "Legs",
            "exercises": [{"name": "Squat", "set_count": 4294967295u64}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Squat"));

    let (_, workouts) = common::get(&app, "/api/workouts").await;
    assert!(workouts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_finish_batch_feeds_last_performance() {
    let app = common::create_test_app(common::setup_test_db());

    let (_, batch) = common::post(
        &app,
        "/api/workouts/batch",
        json!({
            "date": "2025-03-01",
            "name": "Legs",
            "exercises": [{"name": "Squat", "set_count": 3}]
        }),
    )
    .await;
    let workout_id = batch["workout_id"].as_i64().unwrap();
    let first_set = batch["exercises"][0]["sets"][0]["id"].as_i64().unwrap();

    let (status, ack) = common::put(
        &app,
        &format!("/api/workouts/{}/finish-batch", workout_id),
        json!({
            "duration_seconds": 3600,
            "sets": [{"id": first_set, "weight": 100, "reps": 5, "rir": null, "completed": true}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack, json!({"success": true}));

    let (_, last) = common::get(&app, "/api/last-performance/Squat").await;
    assert_eq!(last, json!({"weight": 100.0, "reps": 5, "weight_type": "total"}));

    let (_, full) = common::get(&app, &format!("/api/workouts/{}", workout_id)).await;
    assert_eq!(full["workout"]["duration_seconds"], 3600);
    assert!(full["workout"]["finished_at"].is_string());
}

#[tokio::test]
async fn test_simple_finish() {
    let app = common::create_test_app(common::setup_test_db());
    let (_, created) = common::post(
        &app,
        "/api/workouts",
        json!({"date": "2025-01-01", "name": "Upper"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = common::put(
        &app,
        &format!("/api/workouts/{}/finish", id),
        json!({"duration_seconds": 1800}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, full) = common::get(&app, &format!("/api/workouts/{}", id)).await;
    assert_eq!(full["workout"]["duration_seconds"], 1800);
    assert!(full["workout"]["finished_at"].is_string());
}

#[tokio::test]
async fn test_update_workout_partial() {
    let app = common::create_test_app(common::setup_test_db());
    let (_, created) = common::post(
        &app,
        "/api/workouts",
        json!({"date": "2025-01-01", "name": "Upper", "notes": "old"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = common::put(
        &app,
        &format!("/api/workouts/{}", id),
        json!({"name": "Push", "notes": null}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, full) = common::get(&app, &format!("/api/workouts/{}", id)).await;
    assert_eq!(full["workout"]["name"], "Push");
    assert!(full["workout"]["notes"].is_null());
    assert_eq!(full["workout"]["date"], "2025-01-01");
}

#[tokio::test]
async fn test_delete_workout_cascades() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let workout_id = common::create_logged_workout(&app, "2025-01-01", "Row", &[(60.0, "total", 8)]).await;

    let (status, ack) = common::delete(&app, &format!("/api/workouts/{}", workout_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["success"], true);

    let conn = pool.get().unwrap();
    for table in ["workouts", "exercises", "sets"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "{} not empty", table);
    }
}

#[tokio::test]
async fn test_exercise_and_set_routes() {
    let app = common::create_test_app(common::setup_test_db());
    let (_, workout) = common::post(
        &app,
        "/api/workouts",
        json!({"date": "2025-01-01", "name": "Upper"}),
    )
    .await;
    let workout_id = workout["id"].as_i64().unwrap();

    let (status, exercise) = common::post(
        &app,
        "/api/exercises",
        json!({"workout_id": workout_id, "name": "Dips", "order_index": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let exercise_id = exercise["id"].as_i64().unwrap();

    let (_, exercises) = common::get(&app, &format!("/api/workouts/{}/exercises", workout_id)).await;
    assert_eq!(exercises[0]["name"], "Dips");

    let (status, set) = common::post(
        &app,
        "/api/sets",
        json!({"exercise_id": exercise_id, "order_index": 0, "kind": "W", "weight_type": "extra"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let set_id = set["id"].as_i64().unwrap();

    common::put(&app, &format!("/api/sets/{}", set_id), json!({"weight": 10, "reps": 12})).await;
    let (status, _) = common::post(&app, &format!("/api/sets/{}/toggle", set_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, sets) = common::get(&app, &format!("/api/exercises/{}/sets", exercise_id)).await;
    assert_eq!(sets[0]["kind"], "W");
    assert_eq!(sets[0]["weight_type"], "extra");
    assert_eq!(sets[0]["weight"], 10.0);
    assert_eq!(sets[0]["reps"], 12);
    assert_eq!(sets[0]["completed"], true);

    let (status, _) = common::put(&app, &format!("/api/sets/{}", set_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    common::delete(&app, &format!("/api/sets/{}", set_id)).await;
    let (_, sets) = common::get(&app, &format!("/api/exercises/{}/sets", exercise_id)).await;
    assert!(sets.as_array().unwrap().is_empty());

    common::delete(&app, &format!("/api/exercises/{}", exercise_id)).await;
    let (_, exercises) = common::get(&app, &format!("/api/workouts/{}/exercises", workout_id)).await;
    assert!(exercises.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_exercise_for_missing_workout_fails() {
    let app = common::create_test_app(common::setup_test_db());

    let (status, body) = common::post(
        &app,
        "/api/exercises",
        json!({"workout_id": 404, "name": "Dips", "order_index": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database error");
}
