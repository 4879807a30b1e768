use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{CreateWorkoutBatch, LastPerformance, SetPR, WorkoutBatchResult};
use crate::repositories::{PerformanceRepository, WorkoutRepository};

/// Admits one session start at a time. Clones share the same flag.
#[derive(Clone, Default)]
pub struct StartGuard {
    in_flight: Arc<AtomicBool>,
}

/// Held while a start is running; the flag is cleared on drop.
pub struct StartPermit {
    in_flight: Arc<AtomicBool>,
}

impl StartGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<StartPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| StartPermit {
                in_flight: self.in_flight.clone(),
            })
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for StartPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// What to do when deleting an abandoned session fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    Log,
    #[default]
    Propagate,
}

/// A freshly created workout plus everything needed to pre-fill its sets.
#[derive(Debug, Clone, Serialize)]
pub struct StartedSession {
    #[serde(flatten)]
    pub workout: WorkoutBatchResult,
    pub last_performance: BTreeMap<String, Option<LastPerformance>>,
    pub prs: BTreeMap<String, Vec<SetPR>>,
}

#[derive(Clone)]
pub struct SessionManager {
    workout_repo: WorkoutRepository,
    performance_repo: PerformanceRepository,
    guard: StartGuard,
}

impl SessionManager {
    pub fn new(
        workout_repo: WorkoutRepository,
        performance_repo: PerformanceRepository,
        guard: StartGuard,
    ) -> Self {
        Self {
            workout_repo,
            performance_repo,
            guard,
        }
    }

    pub async fn start(&self, request: CreateWorkoutBatch) -> Result<StartedSession> {
        let _permit = self
            .guard
            .try_acquire()
            .ok_or_else(|| AppError::Conflict("A session is already being started".to_string()))?;

        let names: Vec<String> = request.exercises.iter().map(|e| e.name.clone()).collect();

        // History reads go first so a failed lookup stores nothing.
        let last_performance = self
            .performance_repo
            .last_performance_batch(names.clone())
            .await?;
        let prs = self.performance_repo.prs_batch(names).await?;
        let workout = self.workout_repo.create_batch(request).await?;

        tracing::info!(
            workout_id = workout.workout_id,
            exercises = workout.exercises.len(),
            "Started session"
        );

        Ok(StartedSession {
            workout,
            last_performance,
            prs,
        })
    }

    /// Deletes an abandoned session. Returns whether a workout was removed.
    pub async fn cancel(&self, workout_id: i64, policy: CleanupPolicy) -> Result<bool> {
        match self.workout_repo.delete(workout_id).await {
            Ok(deleted) => Ok(deleted),
            Err(e) if policy == CleanupPolicy::Log => {
                tracing::warn!(workout_id, error = %e, "Failed to cancel session");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
