use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{WeightType, WorkoutSet};

/// Most recent qualifying set for an exercise, used to pre-fill a new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastPerformance {
    pub weight: f64,
    pub reps: i64,
    pub weight_type: WeightType,
}

/// Best effective load ever recorded at one set position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPR {
    pub order_index: i64,
    pub weight: f64,
    pub reps: i64,
    pub rir: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsolutePR {
    pub weight: f64,
    pub reps: i64,
    pub rir: Option<f64>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePRs {
    pub by_set: Vec<SetPR>,
    pub absolute: Option<AbsolutePR>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseHistoryEntry {
    pub workout_id: i64,
    pub date: NaiveDate,
    pub workout_name: String,
    pub exercise_id: i64,
    pub sets: Vec<WorkoutSet>,
}

impl LastPerformance {
    pub fn effective_load(&self) -> f64 {
        super::effective_load(self.weight, self.weight_type)
    }
}
