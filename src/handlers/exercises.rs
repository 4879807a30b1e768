use axum::{
    extract::{Path, State},
    Json,
};

use super::{ack, Ack, Created};
use crate::error::Result;
use crate::models::{CreateExercise, WorkoutSet};
use crate::repositories::{ExerciseRepository, SetRepository};

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
    pub set_repo: SetRepository,
}

pub async fn create(
    State(state): State<ExercisesState>,
    Json(input): Json<CreateExercise>,
) -> Result<Json<Created>> {
    let id = state.exercise_repo.create(input).await?;
    Ok(Json(Created { id }))
}

pub async fn delete(State(state): State<ExercisesState>, Path(id): Path<i64>) -> Result<Json<Ack>> {
    state.exercise_repo.delete(id).await?;
    Ok(ack())
}

pub async fn sets(
    State(state): State<ExercisesState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<WorkoutSet>>> {
    Ok(Json(state.set_repo.find_by_exercise(id).await?))
}
