use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use gymlog::error::AppError;

#[test]
fn test_not_found_returns_404() {
    let error = AppError::NotFound("Resource not found".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_conflict_returns_409() {
    let error = AppError::Conflict("Busy".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[test]
fn test_bad_request_returns_400() {
    let error = AppError::BadRequest("Invalid input".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_internal_returns_500() {
    let error = AppError::Internal("Something went wrong".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_database_error_returns_500() {
    let error = AppError::Database(rusqlite::Error::QueryReturnedNoRows);
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_json_error_returns_400() {
    let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let response = AppError::from(parse_error).into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_body_hides_storage_details() {
    let error = AppError::Database(rusqlite::Error::InvalidQuery);
    let response = error.into_response();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Database error");
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = AppError::NotFound("Workout not found".to_string()).into_response();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Workout not found");
}
