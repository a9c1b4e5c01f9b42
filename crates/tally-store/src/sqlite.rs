//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for Tally. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use tally_core::{
    now_millis, Calculation, CalculationId, NewCalculation, NewUser, OperationKind, User, UserId,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{CalculationFilter, Store};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";
const CALCULATION_COLUMNS: &str = "id, a, b, type, result, user_id, created_at, updated_at";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. Each operation holds the connection for
/// its own duration only; the guard is released on every exit path.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open a database from a connection string.
    ///
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>` or a bare path.
    pub fn connect(database_url: &str) -> Result<Self> {
        match database_url {
            "sqlite::memory:" | ":memory:" => Self::open_memory(),
            url => {
                let path = url.strip_prefix("sqlite://").unwrap_or(url);
                if path.is_empty() {
                    return Err(StoreError::InvalidData(
                        "empty database path in connection string".into(),
                    ));
                }
                Self::open(path)
            }
        }
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

/// Translate constraint failures into their store-level meaning.
fn map_write_error(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        match failure.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                let column = message
                    .as_deref()
                    .and_then(unique_column)
                    .unwrap_or("unknown")
                    .to_string();
                return StoreError::UniqueViolation { column };
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return StoreError::ForeignKeyViolation,
            _ => {}
        }
    }
    StoreError::Database(err)
}

/// Extract the column from "UNIQUE constraint failed: users.username".
fn unique_column(message: &str) -> Option<&str> {
    let columns = message.split("failed:").nth(1)?;
    let first = columns.split(',').next()?.trim();
    first.rsplit('.').next().filter(|c| !c.is_empty())
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get("id")?),
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}

fn row_to_calculation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Calculation> {
    let kind: String = row.get("type")?;
    let kind = kind.parse::<OperationKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Calculation {
        id: CalculationId(row.get("id")?),
        a: row.get("a")?,
        b: row.get("b")?,
        kind,
        result: row.get("result")?,
        user_id: row.get::<_, Option<i64>>("user_id")?.map(UserId),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn query_user<V: rusqlite::ToSql>(
    conn: &Connection,
    column: &str,
    value: V,
) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
    conn.query_row(&sql, params![value], row_to_user)
        .optional()
        .map_err(StoreError::from)
}

fn query_calculation(conn: &Connection, id: CalculationId) -> Result<Option<Calculation>> {
    let sql = format!("SELECT {CALCULATION_COLUMNS} FROM calculations WHERE id = ?1");
    conn.query_row(&sql, params![id.0], row_to_calculation)
        .optional()
        .map_err(StoreError::from)
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User> {
        let user = user.clone();

        self.run(move |conn| {
            let now = now_millis();
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO users (username, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user.username, user.email, user.password_hash, now],
            )
            .map_err(map_write_error)?;
            let id = UserId(tx.last_insert_rowid());

            tx.commit()?;
            tracing::debug!(user_id = %id, username = %user.username, "user row inserted");

            Ok(User {
                id,
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
                created_at: now,
            })
        })
        .await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.run(move |conn| query_user(conn, "id", id.0)).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        self.run(move |conn| query_user(conn, "username", &username))
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.run(move |conn| query_user(conn, "email", &email)).await
    }

    async fn insert_calculation(&self, calc: &NewCalculation) -> Result<Calculation> {
        let calc = calc.clone();

        self.run(move |conn| {
            let now = now_millis();
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO calculations (a, b, type, result, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    calc.a,
                    calc.b,
                    calc.kind.as_str(),
                    calc.result,
                    calc.user_id.map(UserId::get),
                    now,
                ],
            )
            .map_err(map_write_error)?;
            let id = CalculationId(tx.last_insert_rowid());

            tx.commit()?;
            tracing::debug!(calculation_id = %id, kind = %calc.kind, "calculation row inserted");

            Ok(Calculation {
                id,
                a: calc.a,
                b: calc.b,
                kind: calc.kind,
                result: calc.result,
                user_id: calc.user_id,
                created_at: now,
                updated_at: None,
            })
        })
        .await
    }

    async fn get_calculation(&self, id: CalculationId) -> Result<Option<Calculation>> {
        self.run(move |conn| query_calculation(conn, id)).await
    }

    async fn update_calculation(&self, calc: &Calculation) -> Result<Calculation> {
        let calc = calc.clone();

        self.run(move |conn| {
            let tx = conn.transaction()?;

            let changed = tx
                .execute(
                    "UPDATE calculations
                     SET a = ?1, b = ?2, type = ?3, result = ?4, updated_at = ?5
                     WHERE id = ?6",
                    params![
                        calc.a,
                        calc.b,
                        calc.kind.as_str(),
                        calc.result,
                        now_millis(),
                        calc.id.0,
                    ],
                )
                .map_err(map_write_error)?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("calculation {}", calc.id)));
            }

            let updated = query_calculation(&tx, calc.id)?.ok_or_else(|| {
                StoreError::InvalidData(format!("calculation {} vanished mid-update", calc.id))
            })?;

            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    async fn delete_calculation(&self, id: CalculationId) -> Result<bool> {
        self.run(move |conn| {
            let removed = conn.execute("DELETE FROM calculations WHERE id = ?1", params![id.0])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn list_calculations(&self, filter: &CalculationFilter) -> Result<Vec<Calculation>> {
        let filter = *filter;

        self.run(move |conn| {
            let sql = format!(
                "SELECT {CALCULATION_COLUMNS} FROM calculations
                 WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR type = ?2)
                 ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![
                    filter.user_id.map(UserId::get),
                    filter.kind.map(OperationKind::as_str)
                ],
                row_to_calculation,
            )?;
            let calcs = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(calcs)
        })
        .await
    }

    async fn count_calculations(&self, filter: &CalculationFilter) -> Result<u64> {
        let filter = *filter;

        self.run(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM calculations
                 WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR type = ?2)",
                params![
                    filter.user_id.map(UserId::get),
                    filter.kind.map(OperationKind::as_str)
                ],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
    }
}
