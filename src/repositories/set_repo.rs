use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateSet, FromSqliteRow, SetKind, UpdateSet, WeightType, WorkoutSet};

/// Row values for a set insert.
#[derive(Debug, Clone, Default)]
pub(crate) struct NewSet {
    pub exercise_id: i64,
    pub order_index: i64,
    pub kind: SetKind,
    pub weight: Option<f64>,
    pub weight_type: WeightType,
    pub reps: Option<i64>,
    pub time_seconds: Option<i64>,
    pub rir: Option<f64>,
    pub completed: bool,
    pub notes: Option<String>,
}

impl NewSet {
    /// A not-yet-performed normal set with nothing recorded.
    pub fn empty(exercise_id: i64, order_index: i64) -> Self {
        Self {
            exercise_id,
            order_index,
            ..Default::default()
        }
    }
}

impl From<CreateSet> for NewSet {
    fn from(input: CreateSet) -> Self {
        Self {
            kind: input.kind,
            weight_type: input.weight_type,
            completed: input.completed,
            ..Self::empty(input.exercise_id, input.order_index)
        }
    }
}

pub(crate) fn insert_set(conn: &Connection, set: &NewSet) -> rusqlite::Result<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO sets (exercise_id, order_index, kind, weight, weight_type, reps, time_seconds, rir, completed, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )?;
    stmt.execute(rusqlite::params![
        set.exercise_id,
        set.order_index,
        set.kind.as_str(),
        set.weight,
        set.weight_type.as_str(),
        set.reps,
        set.time_seconds,
        set.rir,
        set.completed,
        set.notes,
    ])?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn select_sets_by_exercise(
    conn: &Connection,
    exercise_id: i64,
) -> rusqlite::Result<Vec<WorkoutSet>> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM sets WHERE exercise_id = ? ORDER BY order_index, id")?;
    let sets = stmt
        .query_map([exercise_id], WorkoutSet::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sets)
}

#[derive(Clone)]
pub struct SetRepository {
    pool: DbPool,
}

impl SetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: CreateSet) -> Result<i64> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let id = insert_set(&conn, &NewSet::from(input))?;
            Ok(id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<WorkoutSet>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM sets WHERE id = ?")?;
            let result = stmt.query_row([id], WorkoutSet::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_exercise(&self, exercise_id: i64) -> Result<Vec<WorkoutSet>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            Ok(select_sets_by_exercise(&conn, exercise_id)?)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Write the fields present in `update`. An update without fields is a
    /// successful no-op.
    pub async fn update(&self, id: i64, update: UpdateSet) -> Result<bool> {
        if update.is_empty() {
            return Ok(true);
        }

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let fields = update.assignments();

            let clauses: Vec<String> = fields
                .iter()
                .map(|(column, _)| format!("{} = ?", column))
                .collect();
            let sql = format!("UPDATE sets SET {} WHERE id = ?", clauses.join(", "));

            let mut params: Vec<&dyn rusqlite::ToSql> =
                fields.iter().map(|(_, value)| value.as_ref()).collect();
            params.push(&id);

            let rows = conn.execute(&sql, params.as_slice())?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn toggle_completed(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE sets SET completed = NOT completed WHERE id = ?",
                [id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM sets WHERE id = ?", [id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
