use chrono::Utc;
use libsql::{params, Connection};

use super::StorageError;

/// Embedded schema migrations, applied in ascending version order.
const MIGRATIONS: &[(i64, &str)] = &[
    (1, include_str!("../../migrations/0001_create_questions.sql")),
    (2, include_str!("../../migrations/0002_answered_at_and_indexes.sql")),
];

pub(super) async fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL)",
        (),
    )
    .await?;

    let current = current_version(conn).await?;
    debug!("Schema version: {}", current);

    for (version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
        info!("Applying migration {}", version);

        let tx = conn.transaction().await?;
        tx.execute_batch(sql).await.map_err(|e| StorageError::Migration {
            version: *version,
            reason: e.to_string(),
        })?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![*version, Utc::now().to_rfc3339()],
        )
        .await?;
        tx.commit().await?;
    }

    Ok(())
}

async fn current_version(conn: &Connection) -> Result<i64, StorageError> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", ())
        .await?;

    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)?),
        None => Ok(0),
    }
}
