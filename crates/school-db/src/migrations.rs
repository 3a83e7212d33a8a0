//! Database migration runner.
//!
//! Embeds the SQL migration file at compile time and executes it on database
//! open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::SchoolDb;
use crate::error::DatabaseError;

/// Initial schema: 10 tables, 11 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl SchoolDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
