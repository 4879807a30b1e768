use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{
    dev, exercises, health, performance, sessions, sets, stats, workouts,
};

#[allow(clippy::too_many_arguments)]
pub fn create_router(
    workouts_state: workouts::WorkoutsState,
    exercises_state: exercises::ExercisesState,
    sets_state: sets::SetsState,
    performance_state: performance::PerformanceState,
    stats_state: stats::StatsState,
    sessions_state: sessions::SessionsState,
    dev_state: Option<dev::DevState>,
) -> Router {
    let router: Router = Router::new()
        .route("/api/health", get(health::health_check))
        // Workout routes
        .route("/api/workouts", get(workouts::list).post(workouts::create))
        .route("/api/workouts/batch", post(workouts::create_batch))
        .route(
            "/api/workouts/{id}",
            get(workouts::show)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route("/api/workouts/{id}/finish", put(workouts::finish))
        .route("/api/workouts/{id}/finish-batch", put(workouts::finish_batch))
        .route("/api/workouts/{id}/exercises", get(workouts::exercises))
        .with_state(workouts_state)
        // Exercise routes
        .route("/api/exercises", post(exercises::create))
        .route("/api/exercises/{id}", delete(exercises::delete))
        .route("/api/exercises/{id}/sets", get(exercises::sets))
        .with_state(exercises_state)
        // Set routes
        .route("/api/sets", post(sets::create))
        .route("/api/sets/{id}", put(sets::update).delete(sets::delete))
        .route("/api/sets/{id}/toggle", post(sets::toggle))
        .with_state(sets_state)
        // Performance routes
        .route(
            "/api/last-performance/batch",
            post(performance::last_performance_batch),
        )
        .route(
            "/api/last-performance/{name}",
            get(performance::last_performance),
        )
        .route("/api/pr/batch", post(performance::prs_batch))
        .route("/api/pr/{name}", get(performance::prs))
        .route("/api/history/{name}", get(performance::history))
        .with_state(performance_state)
        // Stats routes
        .route("/api/stats", get(stats::index))
        .route("/api/summary", get(stats::summary))
        .with_state(stats_state)
        // Session routes
        .route("/api/sessions", post(sessions::start))
        .route("/api/sessions/{id}", delete(sessions::cancel))
        .with_state(sessions_state);

    match dev_state {
        Some(dev_state) => router.merge(
            Router::new()
                .route("/api/dev/reset", post(dev::reset))
                .with_state(dev_state),
        ),
        None => router,
    }
}
