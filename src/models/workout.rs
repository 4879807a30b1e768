use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Row, ToSql};
use serde::{Deserialize, Serialize};

use super::{deserialize_some, ExerciseWithSets, FromSqliteRow, SetKind};

/// One gym session. `finished_at` and `duration_seconds` are written together
/// by the finish operations and are either both set or both empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub template_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    pub duration_seconds: Option<i64>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            template_id: row.get("template_id")?,
            started_at: row.get("started_at")?,
            finished_at: row.get("finished_at")?,
            duration_seconds: row.get("duration_seconds")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkout {
    pub date: NaiveDate,
    pub name: String,
    pub template_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

/// Partial update of workout metadata. Finish metadata is deliberately
/// absent: it only changes through the finish operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkout {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub template_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub started_at: Option<Option<NaiveDateTime>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
}

impl UpdateWorkout {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    pub(crate) fn assignments(&self) -> Vec<(&'static str, Box<dyn ToSql + '_>)> {
        let mut fields: Vec<(&'static str, Box<dyn ToSql + '_>)> = Vec::new();

        if let Some(date) = &self.date {
            fields.push(("date", Box::new(date)));
        }
        if let Some(name) = &self.name {
            fields.push(("name", Box::new(name)));
        }
        if let Some(template_id) = &self.template_id {
            fields.push(("template_id", Box::new(template_id)));
        }
        if let Some(started_at) = &self.started_at {
            fields.push(("started_at", Box::new(started_at)));
        }
        if let Some(notes) = &self.notes {
            fields.push(("notes", Box::new(notes)));
        }

        fields
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinishWorkout {
    pub duration_seconds: i64,
}

/// Final values for one set, written by the batch finish.
#[derive(Debug, Clone, Deserialize)]
pub struct FinishSet {
    pub id: i64,
    pub weight: Option<f64>,
    pub reps: Option<i64>,
    pub rir: Option<f64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub kind: SetKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinishWorkoutBatch {
    pub duration_seconds: i64,
    #[serde(default)]
    pub sets: Vec<FinishSet>,
}

pub const MAX_SETS_PER_EXERCISE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct BatchExercise {
    pub name: String,
    pub set_count: u32,
    /// Opaque reference into the client's template data, echoed back.
    pub template_ref: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkoutBatch {
    pub date: NaiveDate,
    pub name: String,
    pub template_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub exercises: Vec<BatchExercise>,
}

impl CreateWorkoutBatch {
    /// First exercise asking for more than [`MAX_SETS_PER_EXERCISE`] sets.
    pub fn oversized_exercise(&self) -> Option<&BatchExercise> {
        self.exercises
            .iter()
            .find(|e| e.set_count > MAX_SETS_PER_EXERCISE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSetResult {
    pub order_index: i64,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchExerciseResult {
    pub id: i64,
    pub name: String,
    pub template_ref: Option<String>,
    pub sets: Vec<BatchSetResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutBatchResult {
    pub workout_id: i64,
    pub exercises: Vec<BatchExerciseResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FullWorkout {
    pub workout: Workout,
    pub exercises: Vec<ExerciseWithSets>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_workout_columns() {
        let update: UpdateWorkout =
            serde_json::from_str(r#"{"name": "Push", "notes": null}"#).unwrap();
        let columns: Vec<&str> = update.assignments().iter().map(|(c, _)| *c).collect();
        assert_eq!(columns, vec!["name", "notes"]);
        assert_eq!(update.notes, Some(None));
    }

    #[test]
    fn test_empty_update_workout() {
        assert!(UpdateWorkout::default().is_empty());
    }

    #[test]
    fn test_finish_set_defaults() {
        let set: FinishSet =
            serde_json::from_str(r#"{"id": 3, "weight": 100, "reps": 5, "rir": null}"#).unwrap();
        assert_eq!(set.kind, SetKind::Normal);
        assert!(!set.completed);
        assert_eq!(set.weight, Some(100.0));
    }

    #[test]
    fn test_batch_request_parses_started_at() {
        let batch: CreateWorkoutBatch = serde_json::from_str(
            r#"{"date": "2025-03-01", "name": "Legs", "started_at": "2025-03-01T18:30:00",
                "exercises": [{"name": "Squat", "set_count": 3}]}"#,
        )
        .unwrap();
        assert_eq!(batch.exercises.len(), 1);
        assert!(batch.started_at.is_some());
        assert!(batch.template_id.is_none());
    }
}
