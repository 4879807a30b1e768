use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateExercise, Exercise, FromSqliteRow};

pub(crate) fn insert_exercise(
    conn: &Connection,
    workout_id: i64,
    name: &str,
    order_index: i64,
    notes: Option<&str>,
) -> rusqlite::Result<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO exercises (workout_id, name, order_index, notes) VALUES (?, ?, ?, ?)",
    )?;
    stmt.execute(rusqlite::params![workout_id, name, order_index, notes])?;
    Ok(conn.last_insert_rowid())
}

/// Exercises of a workout by position. Ties on `order_index` fall back to
/// insertion order.
pub(crate) fn select_exercises_by_workout(
    conn: &Connection,
    workout_id: i64,
) -> rusqlite::Result<Vec<Exercise>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM exercises WHERE workout_id = ? ORDER BY order_index, id",
    )?;
    let exercises = stmt
        .query_map([workout_id], Exercise::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(exercises)
}

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The caller owns `order_index`; nothing here deduplicates or reorders.
    pub async fn create(&self, input: CreateExercise) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let id = insert_exercise(
                &conn,
                input.workout_id,
                &input.name,
                input.order_index,
                input.notes.as_deref(),
            )?;
            tracing::info!(exercise_id = id, workout_id = input.workout_id, name = %input.name, "Created exercise");
            Ok(id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let result = stmt.query_row([id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_workout(&self, workout_id: i64) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            Ok(select_exercises_by_workout(&conn, workout_id)?)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM exercises WHERE id = ?", [id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
