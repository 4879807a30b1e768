use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGoal {
    pub current: i64,
    pub target: i64,
}

/// First recorded weight against best effective load for one exercise family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub exercise: String,
    pub initial_weight: i64,
    pub current_weight: i64,
    /// Gain as a percentage of the current weight, not of the initial one.
    pub evolution_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_workouts: i64,
    pub total_duration_seconds: i64,
    pub total_duration_formatted: String,
    pub total_volume: i64,
    pub streak: u32,
    pub weekly_goal: WeeklyGoal,
    pub progression: Vec<Progression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_workouts: i64,
    pub total_exercises: i64,
    pub total_sets: i64,
}
