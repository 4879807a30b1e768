use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{ack, Ack, Created};
use crate::error::{AppError, Result};
use crate::models::{
    CreateWorkout, CreateWorkoutBatch, Exercise, FinishWorkout, FinishWorkoutBatch, FullWorkout,
    UpdateWorkout, Workout, WorkoutBatchResult,
};
use crate::repositories::{ExerciseRepository, WorkoutRepository};

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// All workouts, newest first, or only the `limit` most recent.
pub async fn list(
    State(state): State<WorkoutsState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Workout>>> {
    let workouts = match query.limit {
        Some(limit) => state.workout_repo.recent(limit.max(0)).await?,
        None => state.workout_repo.list().await?,
    };
    Ok(Json(workouts))
}

pub async fn create(
    State(state): State<WorkoutsState>,
    Json(input): Json<CreateWorkout>,
) -> Result<Json<Created>> {
    let id = state.workout_repo.create(input).await?;
    Ok(Json(Created { id }))
}

pub async fn create_batch(
    State(state): State<WorkoutsState>,
    Json(batch): Json<CreateWorkoutBatch>,
) -> Result<Json<WorkoutBatchResult>> {
    Ok(Json(state.workout_repo.create_batch(batch).await?))
}

pub async fn show(
    State(state): State<WorkoutsState>,
    Path(id): Path<i64>,
) -> Result<Json<FullWorkout>> {
    let workout = state
        .workout_repo
        .get_full(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;
    Ok(Json(workout))
}

pub async fn update(
    State(state): State<WorkoutsState>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateWorkout>,
) -> Result<Json<Ack>> {
    state.workout_repo.update(id, update).await?;
    Ok(ack())
}

pub async fn delete(State(state): State<WorkoutsState>, Path(id): Path<i64>) -> Result<Json<Ack>> {
    state.workout_repo.delete(id).await?;
    Ok(ack())
}

pub async fn finish(
    State(state): State<WorkoutsState>,
    Path(id): Path<i64>,
    Json(input): Json<FinishWorkout>,
) -> Result<Json<Ack>> {
    state.workout_repo.finish(id, input.duration_seconds).await?;
    Ok(ack())
}

pub async fn finish_batch(
    State(state): State<WorkoutsState>,
    Path(id): Path<i64>,
    Json(batch): Json<FinishWorkoutBatch>,
) -> Result<Json<Ack>> {
    state.workout_repo.finish_batch(id, batch).await?;
    Ok(ack())
}

pub async fn exercises(
    State(state): State<WorkoutsState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Exercise>>> {
    Ok(Json(state.exercise_repo.find_by_workout(id).await?))
}
