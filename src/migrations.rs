//! Embedded schema and open-time version check.
//!
//! The store carries its schema version in `PRAGMA user_version`. When the
//! stored version is older than [`SCHEMA_VERSION`] the three tables are
//! dropped and recreated: schema changes wipe data, there are no column
//! migrations.

use rusqlite::Connection;

use crate::db::DbPool;

pub const SCHEMA_VERSION: i32 = 1;

pub const CREATE_TABLES_SQL: &str = include_str!("../migrations/001_create_tables.sql");
pub const DROP_TABLES_SQL: &str = include_str!("../migrations/drop_tables.sql");

/// Bring the store to [`SCHEMA_VERSION`], recreating the tables if needed.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    let current = schema_version(&conn)?;
    tracing::info!(
        current_version = current,
        target_version = SCHEMA_VERSION,
        "Checking database schema"
    );

    if current < SCHEMA_VERSION {
        tracing::warn!("Schema outdated, recreating tables");
        recreate_tables(&conn)?;
    } else {
        conn.execute_batch(CREATE_TABLES_SQL)?;
    }

    tracing::info!("Migrations completed");
    Ok(())
}

/// Drop and recreate every table regardless of the stored version.
pub fn reset_database(pool: &DbPool) -> anyhow::Result<()> {
    tracing::warn!("Resetting database");
    let conn = pool.get()?;
    recreate_tables(&conn)?;
    tracing::info!("Database reset complete");
    Ok(())
}

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

fn recreate_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = OFF;")?;

    let rebuilt = conn
        .execute_batch(DROP_TABLES_SQL)
        .and_then(|_| conn.execute_batch(CREATE_TABLES_SQL))
        .and_then(|_| conn.pragma_update(None, "user_version", SCHEMA_VERSION));

    // Re-enable even when the rebuild failed; the connection stays pooled.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    rebuilt
}

/// Create the schema on a fresh in-memory pool.
#[allow(dead_code)] // Used by integration tests
pub fn run_migrations_for_tests(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;
    recreate_tables(&conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, create_pool};

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_migrations_create_tables() {
        let pool = create_memory_pool().unwrap();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let names = table_names(&conn);
        assert!(names.contains(&"workouts".to_string()));
        assert!(names.contains(&"exercises".to_string()));
        assert!(names.contains(&"sets".to_string()));
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_foreign_keys_on_after_migration() {
        let pool = create_memory_pool().unwrap();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);

        let orphan = conn.execute(
            "INSERT INTO exercises (workout_id, name, order_index) VALUES (999, 'Squat', 0)",
            [],
        );
        assert!(orphan.is_err());
    }

    #[test]
    fn test_current_version_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("keep.db").display().to_string();

        let pool = create_pool(&url).unwrap();
        run_migrations(&pool).unwrap();
        pool.get()
            .unwrap()
            .execute(
                "INSERT INTO workouts (date, name) VALUES ('2025-01-01', 'Upper')",
                [],
            )
            .unwrap();
        drop(pool);

        let pool = create_pool(&url).unwrap();
        run_migrations(&pool).unwrap();
        let count: i64 = pool
            .get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_outdated_version_wipes_tables() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("outdated.db").display().to_string();

        let pool = create_pool(&url).unwrap();
        run_migrations(&pool).unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute(
                "INSERT INTO workouts (date, name) VALUES ('2025-01-01', 'Upper')",
                [],
            )
            .unwrap();
            conn.pragma_update(None, "user_version", 0).unwrap();
        }
        drop(pool);

        let pool = create_pool(&url).unwrap();
        run_migrations(&pool).unwrap();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_reset_database_wipes_data() {
        let pool = create_memory_pool().unwrap();
        run_migrations(&pool).unwrap();
        pool.get()
            .unwrap()
            .execute(
                "INSERT INTO workouts (date, name) VALUES ('2025-01-01', 'Upper')",
                [],
            )
            .unwrap();

        reset_database(&pool).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
