//! `pantry ping` – acquire a connection and run a trivial query.

use anyhow::{Context, Result};
use pantry_core::connect::{ConnectionAcquirer, PgOpener};
use std::time::Instant;

pub async fn run_ping(acquirer: &ConnectionAcquirer<PgOpener>) -> Result<()> {
    let policy = acquirer.backoff();
    println!(
        "Connecting to {} (up to {} attempts)...",
        acquirer.config().primary,
        policy.max_attempts
    );

    let started = Instant::now();
    let mut conn = acquirer.acquire().await?;
    println!(
        "Connected to {} in {} ms",
        conn.endpoint(),
        started.elapsed().as_millis()
    );

    let res: Result<(String, i32)> = async {
        let database: String = sqlx::query_scalar("SELECT current_database()")
            .fetch_one(&mut *conn)
            .await
            .context("query current database")?;
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&mut *conn)
            .await
            .context("run SELECT 1")?;
        Ok((database, one))
    }
    .await;

    if let Err(e) = conn.close().await {
        tracing::warn!("closing ping session failed: {}", e);
    }

    let (database, one) = res?;
    println!("Database: {database}");
    println!("Query result: {one}");
    Ok(())
}
