use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymlog::config::Config;
use gymlog::handlers::{dev, exercises, performance, sessions, sets, stats, workouts};
use gymlog::repositories::{
    ExerciseRepository, PerformanceRepository, SetRepository, StatsRepository, WorkoutRepository,
};
use gymlog::session::{SessionManager, StartGuard};
use gymlog::{db, import, migrations, routes, version};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymlog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!(version = version::GIT_VERSION, "Starting gymlog");
    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    migrations::run_migrations(&pool)?;

    if let Some(path) = &config.legacy_import_path {
        let report = import::import_file(&pool, path).await?;
        if report.skipped {
            tracing::info!("Legacy import skipped");
        }
    }

    // Create repositories
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let set_repo = SetRepository::new(pool.clone());
    let performance_repo = PerformanceRepository::new(pool.clone());
    let stats_repo = StatsRepository::new(pool.clone());

    // Create handler states
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo,
        set_repo: set_repo.clone(),
    };
    let sets_state = sets::SetsState { set_repo };
    let performance_state = performance::PerformanceState {
        performance_repo: performance_repo.clone(),
    };
    let stats_state = stats::StatsState {
        stats_repo,
        workout_repo: workout_repo.clone(),
    };
    let sessions_state = sessions::SessionsState {
        sessions: SessionManager::new(workout_repo, performance_repo, StartGuard::new()),
    };
    let dev_state = config.enable_dev_routes.then(|| {
        tracing::warn!("Development routes enabled");
        dev::DevState { pool: pool.clone() }
    });

    let app = routes::create_router(
        workouts_state,
        exercises_state,
        sets_state,
        performance_state,
        stats_state,
        sessions_state,
        dev_state,
    );

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
