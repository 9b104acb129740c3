use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory SQLite with migrations applied. One connection only: each
/// in-memory connection is its own database.
pub async fn setup_in_memory_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}
