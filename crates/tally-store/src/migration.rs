//! Versioned SQLite schema.
//!
//! [`MIGRATIONS`] is applied in order; the highest applied version is
//! recorded in `schema_version`. Opening a database whose recorded version
//! is newer than this build knows is refused.

use rusqlite::Connection;
use tally_core::now_millis;

use crate::error::{Result, StoreError};

/// One schema step.
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Every schema step, oldest first.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "users",
        sql: r#"
            CREATE TABLE users (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                username      TEXT NOT NULL UNIQUE,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    INTEGER NOT NULL
            );
        "#,
    },
    Migration {
        version: 2,
        name: "calculations",
        sql: r#"
            CREATE TABLE calculations (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                a          REAL NOT NULL,
                b          REAL NOT NULL,
                type       TEXT NOT NULL,
                result     REAL,
                user_id    INTEGER REFERENCES users(id),
                created_at INTEGER NOT NULL,
                updated_at INTEGER
            );
            CREATE INDEX calculations_by_user ON calculations(user_id);
            CREATE INDEX calculations_by_type ON calculations(type);
        "#,
    },
];

/// Newest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Recorded schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at INTEGER NOT NULL
        );",
    )?;
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Bring the schema up to [`latest_version`]. Safe to call on every open.
///
/// All pending steps run in one transaction; a failing step leaves the
/// database at its previous version.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(StoreError::Migration(format!(
            "database is at schema version {current}, newest known is {latest}"
        )));
    }

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql).map_err(|e| {
            StoreError::Migration(format!("step {} ({}) failed: {e}", step.version, step.name))
        })?;
        tx.execute(
            "INSERT INTO schema_version (version, name, applied_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![step.version, step.name, now_millis()],
        )?;
        tracing::debug!(version = step.version, name = step.name, "applied schema step");
    }
    tx.commit()?;
    Ok(())
}
