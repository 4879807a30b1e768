use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    now_local, BatchExerciseResult, BatchSetResult, CreateWorkout, CreateWorkoutBatch,
    ExerciseWithSets, FinishWorkoutBatch, FromSqliteRow, FullWorkout, UpdateWorkout, Workout,
    WorkoutBatchResult, WorkoutSummary, MAX_SETS_PER_EXERCISE,
};

use super::exercise_repo::{insert_exercise, select_exercises_by_workout};
use super::set_repo::{insert_set, select_sets_by_exercise, NewSet};

/// Row values for a workout insert. Finish metadata is only filled by the
/// legacy import, which records sessions that already happened.
#[derive(Debug, Clone)]
pub(crate) struct NewWorkout {
    pub date: NaiveDate,
    pub name: String,
    pub template_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    pub duration_seconds: Option<i64>,
    pub notes: Option<String>,
}

impl From<CreateWorkout> for NewWorkout {
    fn from(input: CreateWorkout) -> Self {
        Self {
            date: input.date,
            name: input.name,
            template_id: input.template_id,
            started_at: input.started_at,
            finished_at: None,
            duration_seconds: None,
            notes: input.notes,
        }
    }
}

pub(crate) fn insert_workout(conn: &Connection, workout: &NewWorkout) -> rusqlite::Result<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO workouts (date, name, template_id, started_at, finished_at, duration_seconds, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )?;
    stmt.execute(rusqlite::params![
        workout.date,
        workout.name,
        workout.template_id,
        workout.started_at,
        workout.finished_at,
        workout.duration_seconds,
        workout.notes,
    ])?;
    Ok(conn.last_insert_rowid())
}

fn mark_finished(conn: &Connection, id: i64, duration_seconds: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE workouts
         SET finished_at = ?, duration_seconds = ?, updated_at = datetime('now', 'localtime')
         WHERE id = ?",
        rusqlite::params![now_local(), duration_seconds, id],
    )
}

fn select_workout(conn: &Connection, id: i64) -> rusqlite::Result<Option<Workout>> {
    conn.query_row(
        "SELECT * FROM workouts WHERE id = ?",
        [id],
        Workout::from_row,
    )
    .optional()
}

/// Insert the workout, its exercises and their empty sets on `conn`.
/// Callers wrap this in a transaction.
fn insert_workout_batch(
    conn: &Connection,
    batch: &CreateWorkoutBatch,
) -> rusqlite::Result<WorkoutBatchResult> {
    let workout_id = insert_workout(
        conn,
        &NewWorkout {
            date: batch.date,
            name: batch.name.clone(),
            template_id: batch.template_id.clone(),
            started_at: batch.started_at,
            finished_at: None,
            duration_seconds: None,
            notes: None,
        },
    )?;

    let mut exercises = Vec::with_capacity(batch.exercises.len());
    for (exercise_index, entry) in batch.exercises.iter().enumerate() {
        let exercise_id = insert_exercise(
            conn,
            workout_id,
            &entry.name,
            exercise_index as i64,
            None,
        )?;

        let mut sets = Vec::new();
        for order_index in 0..i64::from(entry.set_count) {
            let id = insert_set(conn, &NewSet::empty(exercise_id, order_index))?;
            sets.push(BatchSetResult { order_index, id });
        }

        exercises.push(BatchExerciseResult {
            id: exercise_id,
            name: entry.name.clone(),
            template_ref: entry.template_ref.clone(),
            sets,
        });
    }

    Ok(WorkoutBatchResult {
        workout_id,
        exercises,
    })
}

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: CreateWorkout) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let id = insert_workout(&conn, &NewWorkout::from(input))?;
            tracing::info!(workout_id = id, "Created workout");
            Ok(id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// All workouts, newest first. Same-day workouts are ordered by id.
    pub async fn list(&self) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts ORDER BY date DESC, id DESC")?;
            let workouts = stmt
                .query_map([], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM workouts ORDER BY date DESC, id DESC LIMIT ?")?;
            let workouts = stmt
                .query_map([limit], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            Ok(select_workout(&conn, id)?)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Apply the fields present in `update`. An empty update touches nothing
    /// and reports success.
    pub async fn update(&self, id: i64, update: UpdateWorkout) -> Result<bool> {
        if update.is_empty() {
            return Ok(true);
        }

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let fields = update.assignments();

            let mut clauses: Vec<String> = fields
                .iter()
                .map(|(column, _)| format!("{} = ?", column))
                .collect();
            clauses.push("updated_at = datetime('now', 'localtime')".to_string());
            let sql = format!("UPDATE workouts SET {} WHERE id = ?", clauses.join(", "));

            let mut params: Vec<&dyn rusqlite::ToSql> =
                fields.iter().map(|(_, value)| value.as_ref()).collect();
            params.push(&id);

            let rows = conn.execute(&sql, params.as_slice())?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Stamp the finish time (local) and duration. Single-row, no transaction.
    pub async fn finish(&self, id: i64, duration_seconds: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = mark_finished(&conn, id, duration_seconds)?;
            tracing::info!(workout_id = id, duration_seconds, "Finished workout");
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Deletes the workout; exercises and sets go with it through the
    /// foreign-key cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM workouts WHERE id = ?", [id])?;
            tracing::info!(workout_id = id, deleted = rows > 0, "Deleted workout");
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Create a workout with its exercises and empty sets in one transaction.
    /// Any failure rolls back the whole batch.
    pub async fn create_batch(&self, batch: CreateWorkoutBatch) -> Result<WorkoutBatchResult> {
        if let Some(entry) = batch.oversized_exercise() {
            return Err(AppError::BadRequest(format!(
                "{} asks for {} sets, at most {} are allowed",
                entry.name, entry.set_count, MAX_SETS_PER_EXERCISE
            )));
        }

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let result = insert_workout_batch(&tx, &batch)?;
            tx.commit()?;

            tracing::info!(
                workout_id = result.workout_id,
                exercises = result.exercises.len(),
                "Created workout batch"
            );
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Finish the workout and rewrite every listed set in one transaction.
    /// Either all of it is stored or none of it is.
    pub async fn finish_batch(&self, id: i64, batch: FinishWorkoutBatch) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let rows = mark_finished(&tx, id, batch.duration_seconds)?;
            {
                let mut stmt = tx.prepare_cached(
                    "UPDATE sets SET weight = ?, reps = ?, rir = ?, completed = ?, kind = ?
                     WHERE id = ?",
                )?;
                for set in &batch.sets {
                    stmt.execute(rusqlite::params![
                        set.weight,
                        set.reps,
                        set.rir,
                        set.completed,
                        set.kind.as_str(),
                        set.id,
                    ])?;
                }
            }

            tx.commit()?;
            tracing::info!(
                workout_id = id,
                sets = batch.sets.len(),
                duration_seconds = batch.duration_seconds,
                "Finished workout batch"
            );
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The workout with its exercises and their sets, each ordered by
    /// position. One query per exercise; a session has few of them.
    pub async fn get_full(&self, id: i64) -> Result<Option<FullWorkout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let Some(workout) = select_workout(&conn, id)? else {
                return Ok(None);
            };

            let exercises = select_exercises_by_workout(&conn, id)?
                .into_iter()
                .map(|exercise| -> rusqlite::Result<ExerciseWithSets> {
                    let sets = select_sets_by_exercise(&conn, exercise.id)?;
                    Ok(ExerciseWithSets { exercise, sets })
                })
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Some(FullWorkout { workout, exercises }))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Workout, exercise and set counts for workouts dated within
    /// `start..=end`.
    pub async fn summary(&self, start: NaiveDate, end: NaiveDate) -> Result<WorkoutSummary> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let (total_workouts, total_exercises, total_sets): (i64, i64, i64) = conn.query_row(
                "SELECT COUNT(DISTINCT w.id), COUNT(DISTINCT e.id), COUNT(s.id)
                 FROM workouts w
                 LEFT JOIN exercises e ON e.workout_id = w.id
                 LEFT JOIN sets s ON s.exercise_id = e.id
                 WHERE w.date BETWEEN ? AND ?",
                rusqlite::params![start, end],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

            Ok(WorkoutSummary {
                start,
                end,
                total_workouts,
                total_exercises,
                total_sets,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    #[cfg(test)]
    pub async fn count(&self) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count = conn.query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
