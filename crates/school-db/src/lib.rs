//! # school-db
//!
//! libSQL persistence for the school curriculum store.
//!
//! Holds every integrity rule that needs the store: the uniqueness checker,
//! association queries and attach operations, and the deletion policy engine.
//! Per-entity repositories live on [`service::SchoolService`] and gate every
//! write through field validation plus uniqueness in one transaction.
//!
//! Uses the `libsql` crate (v0.9.29) against a local file or `:memory:`.

pub mod associations;
pub mod deletion;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod store;
pub mod uniqueness;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use tracing::warn;

/// Central database handle for the curriculum store.
///
/// Wraps a libSQL database and connection. Provides ID generation and the
/// transaction boundary every multi-statement operation runs inside.
pub struct SchoolDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SchoolDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let school_db = Self { db, conn };
        school_db.run_migrations().await?;
        Ok(school_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"crs-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id(&self.conn, prefix).await
    }

    /// Run `f` inside a transaction. Commits when `f` returns `Ok`, rolls back
    /// on every `Err`.
    ///
    /// `f` receives the connection the transaction is open on; every statement
    /// it issues is part of the transaction.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or `DatabaseError::LibSql` if the
    /// transaction cannot be opened or committed.
    pub async fn run_in_transaction<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: AsyncFnOnce(&libsql::Connection) -> Result<T, DatabaseError>,
    {
        let tx = self.conn.transaction().await?;
        match f(&*tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// Generate a prefixed ID on `conn`.
///
/// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id(conn: &libsql::Connection, prefix: &str) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> SchoolDb {
        SchoolDb::open_local(":memory:").await.unwrap()
    }

    async fn count_schools(db: &SchoolDb) -> i64 {
        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM schools", ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "schools",
            "terms",
            "courses",
            "lessons",
            "readings",
            "assignments",
            "users",
            "course_students",
            "course_instructors",
            "lesson_assignments",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("crs").await.unwrap();
        assert!(id.starts_with("crs-"), "ID should start with 'crs-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in school_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn transaction_commits_on_ok() {
        let db = test_db().await;
        db.run_in_transaction(async |conn: &libsql::Connection| {
            conn.execute(
                "INSERT INTO schools (id, name) VALUES ('sch-t1', 'Elkins')",
                (),
            )
            .await?;
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(count_schools(&db).await, 1);
    }

    #[tokio::test]
    async fn transaction_rolls_back_on_err() {
        let db = test_db().await;
        let result: Result<(), DatabaseError> = db
            .run_in_transaction(async |conn: &libsql::Connection| {
                conn.execute(
                    "INSERT INTO schools (id, name) VALUES ('sch-t1', 'Elkins')",
                    (),
                )
                .await?;
                Err(DatabaseError::InvalidState("abort".into()))
            })
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
        assert_eq!(count_schools(&db).await, 0);
    }
}
