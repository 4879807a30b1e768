use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{ack, Ack};
use crate::error::Result;
use crate::models::CreateWorkoutBatch;
use crate::session::{CleanupPolicy, SessionManager, StartedSession};

#[derive(Clone)]
pub struct SessionsState {
    pub sessions: SessionManager,
}

#[derive(Debug, Deserialize)]
pub struct CancelQuery {
    #[serde(default)]
    pub policy: CleanupPolicy,
}

pub async fn start(
    State(state): State<SessionsState>,
    Json(request): Json<CreateWorkoutBatch>,
) -> Result<Json<StartedSession>> {
    Ok(Json(state.sessions.start(request).await?))
}

pub async fn cancel(
    State(state): State<SessionsState>,
    Path(id): Path<i64>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<Ack>> {
    state.sessions.cancel(id, query.policy).await?;
    Ok(ack())
}
