use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{FromSqliteRow, WorkoutSet};

/// A movement performed within a workout. Identity across workouts is the
/// case-insensitive name; there is no exercise catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub workout_id: i64,
    pub name: String,
    pub order_index: i64,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            name: row.get("name")?,
            order_index: row.get("order_index")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExercise {
    pub workout_id: i64,
    pub name: String,
    pub order_index: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseWithSets {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub sets: Vec<WorkoutSet>,
}
