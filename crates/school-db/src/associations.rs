//! Association queries and the attach operation.
//!
//! Walks the declarations in `school_core::associations`. One-to-many pairs
//! are stored as a foreign key column on the child; many-to-many pairs as rows
//! in a join table.
//!
//! `attach` is the only way a child changes parent. Its postcondition: the
//! child's reference equals the parent id and `children_of(parent)` contains
//! the child. One-to-many attaches rewrite the child through the validation
//! gate, so an attach that would violate a scoped uniqueness rule fails with
//! `DatabaseError::Validation` and changes nothing.

use chrono::Utc;
use tracing::debug;

use school_core::associations::{Association, Link, between, owner_of};
use school_core::entities::{
    Assignment, Course, CourseInstructor, CourseStudent, Lesson, Reading, Term,
};
use school_core::enums::EntityType;
use school_core::validation::Validate;

use crate::error::DatabaseError;
use crate::service::{SchoolService, update_validated};
use crate::store::{self, Query, Record};

/// The declared association from `parent` to `child`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the pair is not related.
pub fn association(
    parent: EntityType,
    child: EntityType,
) -> Result<&'static Association, DatabaseError> {
    between(parent, child).ok_or_else(|| {
        DatabaseError::InvalidState(format!("no association from {parent} to {child}"))
    })
}

/// Ids of `assoc.child` records attached to `parent_id`, in insertion order.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn children_ids(
    conn: &libsql::Connection,
    assoc: &Association,
    parent_id: &str,
) -> Result<Vec<String>, DatabaseError> {
    match assoc.link {
        Link::ForeignKey { column } => {
            store::select_column(
                conn,
                assoc.child,
                "id",
                &Query::new().eq(column, parent_id).order_by("rowid"),
            )
            .await
        }
        Link::JoinTable {
            table,
            parent_column,
            child_column,
        } => {
            let sql = format!(
                "SELECT {child_column} FROM {table} WHERE {parent_column} = ?1 ORDER BY rowid"
            );
            let mut rows = conn.query(&sql, [parent_id]).await?;
            let mut ids = Vec::new();
            while let Some(row) = rows.next().await? {
                ids.push(row.get::<String>(0)?);
            }
            Ok(ids)
        }
    }
}

/// The id of the record owning `child_id`, or `None` when its reference is NULL.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the child does not exist, or
/// `DatabaseError::InvalidState` if `child` has no owning association.
pub async fn parent_id(
    conn: &libsql::Connection,
    child: EntityType,
    child_id: &str,
) -> Result<Option<String>, DatabaseError> {
    let assoc = owner_of(child)
        .ok_or_else(|| DatabaseError::InvalidState(format!("{child} has no owning parent")))?;
    let Link::ForeignKey { column } = assoc.link else {
        return Err(DatabaseError::InvalidState(format!(
            "{} is not a foreign-key association",
            assoc.name
        )));
    };
    store::ensure_exists(conn, child, child_id).await?;
    let values = store::select_column(conn, child, column, &Query::new().eq("id", child_id)).await?;
    Ok(values.into_iter().next())
}

/// Point `child_id`'s foreign key at `parent_id` and re-validate it.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if either side is missing, or
/// `DatabaseError::Validation` if the moved record breaks a rule.
pub async fn reparent<T: Record + Validate>(
    conn: &libsql::Connection,
    assoc: &Association,
    parent_id: &str,
    child_id: &str,
) -> Result<T, DatabaseError> {
    let Link::ForeignKey { column } = assoc.link else {
        return Err(DatabaseError::InvalidState(format!(
            "{} is stored in a join table",
            assoc.name
        )));
    };
    store::ensure_exists(conn, assoc.parent, parent_id).await?;
    let mut record: T = store::find(conn, child_id).await?;
    if !record.set_reference(column, parent_id) {
        return Err(DatabaseError::InvalidState(format!(
            "{} has no reference column {column}",
            T::ENTITY
        )));
    }
    record.touch(Utc::now());
    update_validated(conn, &record).await?;
    Ok(record)
}

/// Insert the join row pairing `parent_id` with `child_id`. Idempotent.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if either side is missing.
pub async fn link(
    conn: &libsql::Connection,
    assoc: &Association,
    parent_id: &str,
    child_id: &str,
) -> Result<(), DatabaseError> {
    let Link::JoinTable {
        table,
        parent_column,
        child_column,
    } = assoc.link
    else {
        return Err(DatabaseError::InvalidState(format!(
            "{} is not a join-table association",
            assoc.name
        )));
    };
    store::ensure_exists(conn, assoc.parent, parent_id).await?;
    store::ensure_exists(conn, assoc.child, child_id).await?;
    let sql = format!(
        "INSERT OR IGNORE INTO {table} ({parent_column}, {child_column}, created_at) VALUES (?1, ?2, ?3)"
    );
    conn.execute(
        &sql,
        libsql::params![parent_id, child_id, Utc::now().to_rfc3339()],
    )
    .await?;
    Ok(())
}

/// Remove the join row pairing `parent_id` with `child_id`.
///
/// Returns whether a row was removed.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for foreign-key associations.
pub async fn unlink(
    conn: &libsql::Connection,
    assoc: &Association,
    parent_id: &str,
    child_id: &str,
) -> Result<bool, DatabaseError> {
    let Link::JoinTable {
        table,
        parent_column,
        child_column,
    } = assoc.link
    else {
        return Err(DatabaseError::InvalidState(format!(
            "{} cannot be detached; attach the child elsewhere instead",
            assoc.name
        )));
    };
    let sql = format!("DELETE FROM {table} WHERE {parent_column} = ?1 AND {child_column} = ?2");
    let removed = conn.execute(&sql, libsql::params![parent_id, child_id]).await?;
    Ok(removed > 0)
}

async fn attach_in(
    conn: &libsql::Connection,
    assoc: &Association,
    parent_id: &str,
    child_id: &str,
) -> Result<(), DatabaseError> {
    if matches!(assoc.link, Link::JoinTable { .. }) {
        return link(conn, assoc, parent_id, child_id).await;
    }
    match assoc.child {
        EntityType::Term => reparent::<Term>(conn, assoc, parent_id, child_id).await.map(drop),
        EntityType::Course => reparent::<Course>(conn, assoc, parent_id, child_id).await.map(drop),
        EntityType::Lesson => reparent::<Lesson>(conn, assoc, parent_id, child_id).await.map(drop),
        EntityType::Reading => {
            reparent::<Reading>(conn, assoc, parent_id, child_id).await.map(drop)
        }
        EntityType::Assignment => {
            reparent::<Assignment>(conn, assoc, parent_id, child_id).await.map(drop)
        }
        EntityType::CourseStudent => {
            reparent::<CourseStudent>(conn, assoc, parent_id, child_id).await.map(drop)
        }
        EntityType::CourseInstructor => {
            reparent::<CourseInstructor>(conn, assoc, parent_id, child_id).await.map(drop)
        }
        EntityType::School | EntityType::User | EntityType::LessonAssignment => Err(
            DatabaseError::InvalidState(format!("{} cannot be attached", assoc.child)),
        ),
    }
}

impl SchoolService {
    /// Ids of `child` records attached to `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the pair is not related.
    pub async fn children_of(
        &self,
        parent: EntityType,
        parent_id: &str,
        child: EntityType,
    ) -> Result<Vec<String>, DatabaseError> {
        let assoc = association(parent, child)?;
        children_ids(self.db().conn(), assoc, parent_id).await
    }

    /// Id of the record that owns `child_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the child does not exist.
    pub async fn parent_of(
        &self,
        child: EntityType,
        child_id: &str,
    ) -> Result<Option<String>, DatabaseError> {
        parent_id(self.db().conn(), child, child_id).await
    }

    /// Attach `child_id` to `parent_id` through their declared association.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if either record is missing, or
    /// `DatabaseError::Validation` if the re-parented child breaks a rule.
    pub async fn attach(
        &self,
        parent: EntityType,
        parent_id: &str,
        child: EntityType,
        child_id: &str,
    ) -> Result<(), DatabaseError> {
        let assoc = association(parent, child)?;
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                attach_in(conn, assoc, parent_id, child_id).await
            })
            .await?;
        debug!(association = assoc.name, parent_id, child_id, "attached");
        Ok(())
    }

    /// Remove a many-to-many pairing. Returns whether a pairing existed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for one-to-many associations.
    pub async fn detach(
        &self,
        parent: EntityType,
        parent_id: &str,
        child: EntityType,
        child_id: &str,
    ) -> Result<bool, DatabaseError> {
        let assoc = association(parent, child)?;
        let removed = unlink(self.db().conn(), assoc, parent_id, child_id).await?;
        debug!(association = assoc.name, parent_id, child_id, removed, "detached");
        Ok(removed)
    }

    /// Typed one-to-many attach shared by the named repository operations.
    pub(crate) async fn attach_to<T: Record + Validate>(
        &self,
        parent: EntityType,
        parent_id: &str,
        child_id: &str,
    ) -> Result<T, DatabaseError> {
        let assoc = association(parent, T::ENTITY)?;
        let record = self
            .db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                reparent::<T>(conn, assoc, parent_id, child_id).await
            })
            .await?;
        debug!(association = assoc.name, parent_id, child_id, "attached");
        Ok(record)
    }
}
