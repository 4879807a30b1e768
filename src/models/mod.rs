pub mod exercise;
pub mod performance;
pub mod stats;
pub mod workout;
pub mod workout_set;

use chrono::{Local, NaiveDateTime, SubsecRound};
use rusqlite::Row;
use serde::{Deserialize, Deserializer};

pub use exercise::{CreateExercise, Exercise, ExerciseWithSets};
pub use performance::{AbsolutePR, ExerciseHistoryEntry, ExercisePRs, LastPerformance, SetPR};
pub use stats::{Progression, UserStats, WeeklyGoal, WorkoutSummary};
pub use workout::{
    BatchExercise, BatchExerciseResult, BatchSetResult, CreateWorkout, CreateWorkoutBatch,
    FinishSet, FinishWorkout, FinishWorkoutBatch, FullWorkout, UpdateWorkout, Workout,
    WorkoutBatchResult, MAX_SETS_PER_EXERCISE,
};
pub use workout_set::{effective_load, CreateSet, SetKind, UpdateSet, WeightType, WorkoutSet};

pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Current local wall-clock time, truncated to whole seconds.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Distinguish an absent field from an explicit `null` in partial updates.
///
/// Used with `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>`: absent stays `None`, `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
