pub mod legacy;

use std::path::Path;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::MAX_SETS_PER_EXERCISE;
use crate::repositories::{insert_exercise, insert_set, insert_workout, NewSet, NewWorkout};

pub use legacy::{LegacyExercise, LegacySeries, LegacySet, LegacySetEntry, LegacyWorkout};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// The store already held workouts, so nothing was read.
    pub skipped: bool,
    pub workouts: usize,
    pub exercises: usize,
    pub sets: usize,
    /// Workouts rolled back because they could not be parsed or stored.
    pub failed: usize,
}

#[derive(Debug, Default)]
struct ImportCounts {
    exercises: usize,
    sets: usize,
}

fn exercise_sets(exercise_id: i64, series: &LegacySeries) -> Vec<NewSet> {
    let entries = match series {
        LegacySeries::Count(count) => {
            if *count > MAX_SETS_PER_EXERCISE {
                tracing::warn!(
                    count = *count,
                    max = MAX_SETS_PER_EXERCISE,
                    "Capping placeholder series"
                );
            }
            return (0..i64::from((*count).min(MAX_SETS_PER_EXERCISE)))
                .map(|i| NewSet::empty(exercise_id, i))
                .collect();
        }
        LegacySeries::Entries(entries) => entries,
    };

    // Only rep-range labels: a template that was never performed.
    if entries
        .iter()
        .all(|entry| matches!(entry, LegacySetEntry::Label(_)))
    {
        return (0..entries.len() as i64)
            .map(|i| NewSet::empty(exercise_id, i))
            .collect();
    }

    let records: Vec<&LegacySet> = entries
        .iter()
        .filter_map(|entry| match entry {
            LegacySetEntry::Record(set) if !set.is_sentinel() => Some(set.as_ref()),
            _ => None,
        })
        .collect();

    records
        .into_iter()
        .enumerate()
        .map(|(i, set)| {
            let (weight, weight_type) = legacy::detect_weight(set);
            NewSet {
                exercise_id,
                order_index: i as i64,
                kind: legacy::detect_kind(set),
                weight,
                weight_type,
                reps: set.reps.as_ref().and_then(|r| r.as_count()),
                time_seconds: set.tempo_seg.as_ref().and_then(|t| t.as_count()),
                rir: legacy::set_rir(set),
                completed: true,
                notes: legacy::set_notes(set),
            }
        })
        .collect()
}

fn import_workout(conn: &mut Connection, workout: &LegacyWorkout) -> rusqlite::Result<ImportCounts> {
    let tx = conn.transaction()?;
    let mut counts = ImportCounts::default();

    let (started_at, finished_at, duration_seconds) = legacy::session_times(
        workout.date,
        workout.horario_inicio.as_deref(),
        workout.horario_fim.as_deref(),
    );
    let workout_id = insert_workout(
        &tx,
        &NewWorkout {
            date: workout.date,
            name: workout.name.clone(),
            template_id: None,
            started_at: Some(started_at),
            finished_at: Some(finished_at),
            duration_seconds: Some(duration_seconds),
            notes: workout.notes(),
        },
    )?;

    for (index, exercise) in workout.exercises.iter().enumerate() {
        let exercise_id = insert_exercise(
            &tx,
            workout_id,
            &exercise.name,
            index as i64,
            exercise.notes.as_deref(),
        )?;
        counts.exercises += 1;

        for set in exercise_sets(exercise_id, &exercise.series) {
            insert_set(&tx, &set)?;
            counts.sets += 1;
        }
    }

    tx.commit()?;
    Ok(counts)
}

fn import_document(conn: &mut Connection, document: &serde_json::Value) -> Result<ImportReport> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))?;
    if existing > 0 {
        tracing::info!(existing, "Store already has workouts, skipping legacy import");
        return Ok(ImportReport {
            skipped: true,
            ..Default::default()
        });
    }

    let workouts = document
        .get("treinos")
        .and_then(|t| t.as_array())
        .ok_or_else(|| AppError::BadRequest("Legacy log has no \"treinos\" array".to_string()))?;

    let mut report = ImportReport::default();
    for (position, value) in workouts.iter().enumerate() {
        let workout: LegacyWorkout = match serde_json::from_value(value.clone()) {
            Ok(workout) => workout,
            Err(e) => {
                tracing::error!(position, error = %e, "Skipping unreadable legacy workout");
                report.failed += 1;
                continue;
            }
        };

        match import_workout(conn, &workout) {
            Ok(counts) => {
                report.workouts += 1;
                report.exercises += counts.exercises;
                report.sets += counts.sets;
            }
            Err(e) => {
                tracing::error!(date = %workout.date, name = %workout.name, error = %e, "Failed to import legacy workout");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        workouts = report.workouts,
        exercises = report.exercises,
        sets = report.sets,
        failed = report.failed,
        "Legacy import complete"
    );
    Ok(report)
}

/// Loads a legacy log into an empty store. Each workout commits on its own,
/// so one bad entry never blocks the rest.
pub async fn run_legacy_import(pool: &DbPool, document: serde_json::Value) -> Result<ImportReport> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        import_document(&mut conn, &document)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

pub async fn import_file(pool: &DbPool, path: &Path) -> Result<ImportReport> {
    tracing::info!("Importing legacy log from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let document: serde_json::Value = serde_json::from_str(&contents)?;
    run_legacy_import(pool, document).await
}
