use axum::{
    extract::{Path, State},
    Json,
};

use super::{ack, Ack, Created};
use crate::error::Result;
use crate::models::{CreateSet, UpdateSet};
use crate::repositories::SetRepository;

#[derive(Clone)]
pub struct SetsState {
    pub set_repo: SetRepository,
}

pub async fn create(
    State(state): State<SetsState>,
    Json(input): Json<CreateSet>,
) -> Result<Json<Created>> {
    let id = state.set_repo.create(input).await?;
    Ok(Json(Created { id }))
}

pub async fn update(
    State(state): State<SetsState>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateSet>,
) -> Result<Json<Ack>> {
    state.set_repo.update(id, update).await?;
    Ok(ack())
}

pub async fn toggle(State(state): State<SetsState>, Path(id): Path<i64>) -> Result<Json<Ack>> {
    state.set_repo.toggle_completed(id).await?;
    Ok(ack())
}

pub async fn delete(State(state): State<SetsState>, Path(id): Path<i64>) -> Result<Json<Ack>> {
    state.set_repo.delete(id).await?;
    Ok(ack())
}
