#![allow(dead_code)]

use std::sync::Once;

use sqlx::PgPool;

static TRACING: Once = Once::new();

/// Connects to the database named by `DATABASE_URL`.
pub async fn pool() -> PgPool {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| panic!("DATABASE_URL must point at a PostgreSQL database"));
    oxide_sqlblock_pg::connect_b(&url)
        .await
        .unwrap_or_else(|e| panic!("Failed to connect: {e}"))
}
