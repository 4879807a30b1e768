use axum::{extract::State, Json};

use super::{ack, Ack};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::migrations::reset_database;

#[derive(Clone)]
pub struct DevState {
    pub pool: DbPool,
}

/// Drops every table and recreates the empty schema.
pub async fn reset(State(state): State<DevState>) -> Result<Json<Ack>> {
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || reset_database(&pool))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::warn!("Database reset through development route");
    Ok(ack())
}
