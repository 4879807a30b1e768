pub mod dev;
pub mod exercises;
pub mod health;
pub mod performance;
pub mod sessions;
pub mod sets;
pub mod stats;
pub mod workouts;

use axum::Json;
use serde::Serialize;

/// Body of every write that has nothing else to report.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

pub fn ack() -> Json<Ack> {
    Json(Ack { success: true })
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
}
