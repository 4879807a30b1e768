mod exercise_repo;
mod performance_repo;
mod set_repo;
mod stats_repo;
mod workout_repo;

pub use exercise_repo::ExerciseRepository;
pub use performance_repo::PerformanceRepository;
pub use set_repo::SetRepository;
pub use stats_repo::{
    compute_streak, format_duration, start_of_week, StatsRepository, PROGRESSION_EXERCISES,
    WEEKLY_GOAL_TARGET,
};
pub use workout_repo::WorkoutRepository;

pub(crate) use exercise_repo::insert_exercise;
pub(crate) use set_repo::{insert_set, NewSet};
pub(crate) use workout_repo::{insert_workout, NewWorkout};
