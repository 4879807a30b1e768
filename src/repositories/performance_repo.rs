//! Historical performance lookups keyed by exercise name.
//!
//! Names match case-insensitively. Only completed sets with both a weight and
//! a rep count take part; time-based holds never qualify. Loads are compared
//! as effective loads (per-side weights doubled).

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    AbsolutePR, ExerciseHistoryEntry, ExercisePRs, LastPerformance, SetPR, WeightType,
};

use super::set_repo::select_sets_by_exercise;

/// Qualifying sets of one exercise name (`?1`) with their effective load.
const QUALIFYING_SETS: &str = "
    qualifying AS (
        SELECT s.id, s.order_index, s.reps, s.rir, w.date, w.id AS workout_id,
               (CASE WHEN s.weight_type = 'per_side' THEN s.weight * 2 ELSE s.weight END) AS load
        FROM sets s
        JOIN exercises e ON s.exercise_id = e.id
        JOIN workouts w ON e.workout_id = w.id
        WHERE e.name = ?1 COLLATE NOCASE
          AND s.completed = 1
          AND s.weight IS NOT NULL
          AND s.reps IS NOT NULL
    )";

/// Most recent session first, then the later exercise and set within it.
/// Same-day sessions are ordered by id, which follows insertion order.
fn select_last_performance(
    conn: &Connection,
    exercise_name: &str,
) -> rusqlite::Result<Option<LastPerformance>> {
    let mut stmt = conn.prepare_cached(
        "SELECT s.weight, s.reps, s.weight_type
         FROM sets s
         JOIN exercises e ON s.exercise_id = e.id
         JOIN workouts w ON e.workout_id = w.id
         WHERE e.name = ?1 COLLATE NOCASE
           AND s.completed = 1
           AND s.weight IS NOT NULL
           AND s.reps IS NOT NULL
         ORDER BY w.date DESC, w.id DESC, e.order_index DESC, s.order_index DESC
         LIMIT 1",
    )?;

    stmt.query_row([exercise_name], |row| {
        let weight_type: String = row.get(2)?;
        Ok(LastPerformance {
            weight: row.get(0)?,
            reps: row.get(1)?,
            weight_type: WeightType::parse(&weight_type),
        })
    })
    .optional()
}

/// Best effective load per set position, with the reps and RIR recorded
/// alongside that load. When several sets tie on the maximum at a position,
/// the most recent one wins and the rest are dropped, so each position
/// appears once.
fn select_prs_by_set(conn: &Connection, exercise_name: &str) -> rusqlite::Result<Vec<SetPR>> {
    let sql = format!(
        "WITH {QUALIFYING_SETS},
         max_loads AS (
             SELECT order_index, MAX(load) AS max_load
             FROM qualifying
             GROUP BY order_index
         )
         SELECT q.order_index, q.load, q.reps, q.rir
         FROM max_loads m
         JOIN qualifying q ON q.order_index = m.order_index AND q.load = m.max_load
         ORDER BY q.order_index ASC, q.date DESC, q.workout_id DESC, q.id DESC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    let rows = stmt
        .query_map([exercise_name], |row| {
            Ok(SetPR {
                order_index: row.get(0)?,
                weight: row.get(1)?,
                reps: row.get(2)?,
                rir: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    Ok(rows
        .into_iter()
        .filter(|pr| seen.insert(pr.order_index))
        .collect())
}

/// Heaviest qualifying set across the whole history. Ties on load go to the
/// most recent session.
fn select_absolute_pr(
    conn: &Connection,
    exercise_name: &str,
) -> rusqlite::Result<Option<AbsolutePR>> {
    let sql = format!(
        "WITH {QUALIFYING_SETS}
         SELECT load, reps, rir, date
         FROM qualifying
         ORDER BY load DESC, date DESC, workout_id DESC, id DESC
         LIMIT 1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    stmt.query_row([exercise_name], |row| {
        Ok(AbsolutePR {
            weight: row.get(0)?,
            reps: row.get(1)?,
            rir: row.get(2)?,
            date: row.get(3)?,
        })
    })
    .optional()
}

#[derive(Clone)]
pub struct PerformanceRepository {
    pool: DbPool,
}

impl PerformanceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn last_performance(&self, exercise_name: &str) -> Result<Option<LastPerformance>> {
        let pool = self.pool.clone();
        let exercise_name = exercise_name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            Ok(select_last_performance(&conn, &exercise_name)?)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// One lookup per name on a single connection. Names are kept as given,
    /// so differently-cased duplicates get their own (identical) entries.
    pub async fn last_performance_batch(
        &self,
        exercise_names: Vec<String>,
    ) -> Result<BTreeMap<String, Option<LastPerformance>>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut results = BTreeMap::new();
            for name in exercise_names {
                let last = select_last_performance(&conn, &name)?;
                results.insert(name, last);
            }
            Ok(results)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn prs(&self, exercise_name: &str) -> Result<ExercisePRs> {
        let pool = self.pool.clone();
        let exercise_name = exercise_name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            Ok(ExercisePRs {
                by_set: select_prs_by_set(&conn, &exercise_name)?,
                absolute: select_absolute_pr(&conn, &exercise_name)?,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Per-position PRs for several exercises, for pre-filling a session.
    pub async fn prs_batch(
        &self,
        exercise_names: Vec<String>,
    ) -> Result<BTreeMap<String, Vec<SetPR>>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut results = BTreeMap::new();
            for name in exercise_names {
                let prs = select_prs_by_set(&conn, &name)?;
                results.insert(name, prs);
            }
            Ok(results)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The `limit` most recent sessions containing the exercise, with every
    /// set recorded for it.
    pub async fn history(
        &self,
        exercise_name: &str,
        limit: i64,
    ) -> Result<Vec<ExerciseHistoryEntry>> {
        let pool = self.pool.clone();
        let exercise_name = exercise_name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT w.id, w.date, w.name, e.id
                 FROM exercises e
                 JOIN workouts w ON e.workout_id = w.id
                 WHERE e.name = ?1 COLLATE NOCASE
                 ORDER BY w.date DESC, w.id DESC, e.order_index
                 LIMIT ?2",
            )?;
            let entries: Vec<(i64, NaiveDate, String, i64)> = stmt
                .query_map(rusqlite::params![exercise_name, limit], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let history = entries
                .into_iter()
                .map(
                    |(workout_id, date, workout_name, exercise_id)| -> rusqlite::Result<ExerciseHistoryEntry> {
                        Ok(ExerciseHistoryEntry {
                            workout_id,
                            date,
                            workout_name,
                            exercise_id,
                            sets: select_sets_by_exercise(&conn, exercise_id)?,
                        })
                    },
                )
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(history)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
