//! Service layer gating every write through validation.
//!
//! `SchoolService` wraps `SchoolDb`. All repo methods are implemented as
//! `impl SchoolService` blocks in `repos/`.
//!
//! Every create and update follows this protocol:
//! 1. Begin transaction
//! 2. Run the entity's field validators
//! 3. Run the uniqueness checker for fields that passed (updates exclude their own id)
//! 4. Check that every referenced parent exists
//! 5. Write the row and commit, or roll back with every failing field

use std::path::Path;

use anyhow::Context;
use school_config::DatabaseConfig;
use school_core::enums::EntityType;
use school_core::validation::Validate;
use tracing::debug;

use crate::SchoolDb;
use crate::error::DatabaseError;
use crate::store::{self, Query, Record};
use crate::uniqueness;

pub struct SchoolService {
    db: SchoolDb,
}

impl SchoolService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SchoolDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create a service from the `[database]` config section.
    ///
    /// For an on-disk path the parent directory is created first, so the
    /// default `.school/school.db` works in a fresh checkout.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created or the
    /// database cannot be opened.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if !config.is_in_memory() {
            if let Some(parent) = Path::new(&config.path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.with_context(|| {
                        format!("creating database directory {}", parent.display())
                    })?;
                }
            }
        }
        Self::new_local(&config.path).await
    }

    /// Create from an existing `SchoolDb` (for testing).
    #[must_use]
    pub const fn from_db(db: SchoolDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SchoolDb {
        &self.db
    }

    /// Number of stored records of `entity` type.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count(&self, entity: EntityType) -> Result<u64, DatabaseError> {
        store::count(self.db.conn(), entity, &Query::new()).await
    }
}

/// Run field validators, then uniqueness, then reference checks for `record`.
///
/// # Errors
///
/// Returns `DatabaseError::Validation` with every failing field, or
/// `DatabaseError::NotFound` if a referenced parent is missing.
pub(crate) async fn validate_record<T: Record + Validate>(
    conn: &libsql::Connection,
    record: &T,
    exclude_id: Option<&str>,
) -> Result<(), DatabaseError> {
    let mut errors = record.validate();
    let taken = uniqueness::check_keys(conn, &record.unique_keys(), exclude_id, &errors).await?;
    errors.merge(taken);
    if !errors.is_empty() {
        debug!(entity = %T::ENTITY, id = record.id(), %errors, "validation failed");
        return Err(DatabaseError::Validation(errors));
    }

    for (entity, id) in record.references() {
        store::ensure_exists(conn, entity, id).await?;
    }
    Ok(())
}

/// Validate then insert.
pub(crate) async fn insert_validated<T: Record + Validate>(
    conn: &libsql::Connection,
    record: &T,
) -> Result<(), DatabaseError> {
    validate_record(conn, record, None).await?;
    store::insert(conn, record).await?;
    debug!(entity = %T::ENTITY, id = record.id(), "created");
    Ok(())
}

/// Validate against every row but this one, then overwrite it.
pub(crate) async fn update_validated<T: Record + Validate>(
    conn: &libsql::Connection,
    record: &T,
) -> Result<(), DatabaseError> {
    validate_record(conn, record, Some(record.id())).await?;
    store::update(conn, record).await?;
    debug!(entity = %T::ENTITY, id = record.id(), "updated");
    Ok(())
}
