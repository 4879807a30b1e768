use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Progression, UserStats, WeeklyGoal};

pub const WEEKLY_GOAL_TARGET: i64 = 4;

/// Exercise families tracked for progression, matched as case-insensitive
/// substrings of the stored exercise name.
pub const PROGRESSION_EXERCISES: [&str; 5] =
    ["Supino", "Agachamento", "Barra Fixa", "RDL", "Desenvolvimento"];

const STREAK_WINDOW: i64 = 14;

/// Sunday on or before `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

/// `"{h}h {m}min"`, leftover seconds dropped.
pub fn format_duration(total_seconds: i64) -> String {
    let total_minutes = total_seconds.max(0) / 60;
    format!("{}h {}min", total_minutes / 60, total_minutes % 60)
}

/// Counts training days backwards from `today`. `dates` are distinct and
/// newest first. The newest counted date must be today or yesterday and each
/// next one at most two days before the previous, so a single rest day keeps
/// the streak alive. Dates after `today` are ignored.
pub fn compute_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut anchor = today + Duration::days(1);
    let mut streak = 0;
    for &date in dates.iter().filter(|d| **d <= today) {
        if (anchor - date).num_days() > 2 {
            break;
        }
        streak += 1;
        anchor = date;
    }
    streak
}

/// Gain relative to the current weight, rounded to a whole percent.
pub fn evolution_percent(initial: f64, current: f64) -> i64 {
    if current > 0.0 {
        (((current - initial) / current) * 100.0).round() as i64
    } else {
        0
    }
}

fn select_progression(conn: &Connection, family: &str) -> rusqlite::Result<Option<Progression>> {
    let pattern = format!("%{}%", family);

    // LIKE is case-insensitive for ASCII, LOWER covers the rest.
    let initial: Option<f64> = conn
        .query_row(
            "SELECT (CASE WHEN s.weight_type = 'per_side' THEN s.weight * 2 ELSE s.weight END)
             FROM sets s
             JOIN exercises e ON s.exercise_id = e.id
             JOIN workouts w ON e.workout_id = w.id
             WHERE LOWER(e.name) LIKE LOWER(?1)
               AND s.completed = 1 AND s.weight IS NOT NULL AND s.weight > 0
             ORDER BY w.date ASC, w.id ASC, s.order_index ASC
             LIMIT 1",
            [&pattern],
            |row| row.get(0),
        )
        .optional()?;

    let Some(initial) = initial.filter(|w| *w > 0.0) else {
        return Ok(None);
    };

    let best: Option<f64> = conn.query_row(
        "SELECT MAX(CASE WHEN s.weight_type = 'per_side' THEN s.weight * 2 ELSE s.weight END)
         FROM sets s
         JOIN exercises e ON s.exercise_id = e.id
         WHERE LOWER(e.name) LIKE LOWER(?1)
           AND s.completed = 1 AND s.weight IS NOT NULL",
        [&pattern],
        |row| row.get(0),
    )?;
    let current = best.unwrap_or(initial);

    Ok(Some(Progression {
        exercise: family.to_string(),
        initial_weight: initial.round() as i64,
        current_weight: current.round() as i64,
        evolution_percent: evolution_percent(initial, current),
    }))
}

fn select_user_stats(conn: &Connection, today: NaiveDate) -> rusqlite::Result<UserStats> {
    let (total_workouts, total_duration_seconds): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(duration_seconds), 0)
         FROM workouts WHERE finished_at IS NOT NULL",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let total_volume: f64 = conn.query_row(
        "SELECT COALESCE(SUM(
             (CASE WHEN s.weight_type = 'per_side' THEN s.weight * 2 ELSE s.weight END) * s.reps
         ), 0)
         FROM sets s
         JOIN exercises e ON s.exercise_id = e.id
         JOIN workouts w ON e.workout_id = w.id
         WHERE s.completed = 1 AND s.weight IS NOT NULL AND s.reps IS NOT NULL
           AND w.finished_at IS NOT NULL",
        [],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT DISTINCT date FROM workouts
         WHERE finished_at IS NOT NULL AND date <= ?1
         ORDER BY date DESC
         LIMIT ?2",
    )?;
    let recent_dates = stmt
        .query_map(rusqlite::params![today, STREAK_WINDOW], |row| {
            row.get::<_, NaiveDate>(0)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let this_week: i64 = conn.query_row(
        "SELECT COUNT(*) FROM workouts WHERE finished_at IS NOT NULL AND date >= ?",
        [start_of_week(today)],
        |row| row.get(0),
    )?;

    let mut progression = Vec::new();
    for family in PROGRESSION_EXERCISES {
        if let Some(entry) = select_progression(conn, family)? {
            progression.push(entry);
        }
    }

    Ok(UserStats {
        total_workouts,
        total_duration_seconds,
        total_duration_formatted: format_duration(total_duration_seconds),
        total_volume: total_volume.round() as i64,
        streak: compute_streak(&recent_dates, today),
        weekly_goal: WeeklyGoal {
            current: this_week,
            target: WEEKLY_GOAL_TARGET,
        },
        progression,
    })
}

#[derive(Clone)]
pub struct StatsRepository {
    pool: DbPool,
}

impl StatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Aggregates over finished workouts only.
    pub async fn user_stats(&self, today: NaiveDate) -> Result<UserStats> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            Ok(select_user_stats(&conn, today)?)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
