use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{UserStats, WorkoutSummary};
use crate::repositories::{StatsRepository, WorkoutRepository};

#[derive(Clone)]
pub struct StatsState {
    pub stats_repo: StatsRepository,
    pub workout_repo: WorkoutRepository,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub async fn index(State(state): State<StatsState>) -> Result<Json<UserStats>> {
    let today = Local::now().date_naive();
    Ok(Json(state.stats_repo.user_stats(today).await?))
}

pub async fn summary(
    State(state): State<StatsState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<WorkoutSummary>> {
    if query.end < query.start {
        return Err(AppError::BadRequest(
            "Summary range ends before it starts".to_string(),
        ));
    }
    let summary = state.workout_repo.summary(query.start, query.end).await?;
    Ok(Json(summary))
}
