use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{ExerciseHistoryEntry, ExercisePRs, LastPerformance, SetPR};
use crate::repositories::PerformanceRepository;

const DEFAULT_HISTORY_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct PerformanceState {
    pub performance_repo: PerformanceRepository,
}

#[derive(Debug, Deserialize)]
pub struct LastPerformanceBatch {
    #[serde(default)]
    pub exercise_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PrBatch {
    #[serde(default)]
    pub exercises: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

pub async fn last_performance(
    State(state): State<PerformanceState>,
    Path(name): Path<String>,
) -> Result<Json<Option<LastPerformance>>> {
    Ok(Json(state.performance_repo.last_performance(&name).await?))
}

pub async fn last_performance_batch(
    State(state): State<PerformanceState>,
    Json(input): Json<LastPerformanceBatch>,
) -> Result<Json<BTreeMap<String, Option<LastPerformance>>>> {
    let results = state
        .performance_repo
        .last_performance_batch(input.exercise_names)
        .await?;
    Ok(Json(results))
}

pub async fn prs(
    State(state): State<PerformanceState>,
    Path(name): Path<String>,
) -> Result<Json<ExercisePRs>> {
    Ok(Json(state.performance_repo.prs(&name).await?))
}

pub async fn prs_batch(
    State(state): State<PerformanceState>,
    Json(input): Json<PrBatch>,
) -> Result<Json<BTreeMap<String, Vec<SetPR>>>> {
    Ok(Json(state.performance_repo.prs_batch(input.exercises).await?))
}

pub async fn history(
    State(state): State<PerformanceState>,
    Path(name): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ExerciseHistoryEntry>>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).max(0);
    Ok(Json(state.performance_repo.history(&name, limit).await?))
}
