//! Deletion policy engine.
//!
//! A delete is planned before anything is removed. The planner walks the
//! association graph depth-first from the requested record. At every node it
//! checks each `restrict` association first and aborts with
//! `DeleteRestricted` if any dependent exists. Only then does it descend into
//! `cascade` children. `unconstrained` dependents are ignored and keep their
//! (now dangling) reference.
//!
//! The finished plan lists children before their parents. It is applied in
//! that order inside the same transaction as the planning queries, so a
//! restrict found anywhere in the subtree leaves the store untouched.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use school_core::associations::dependents_of;
use school_core::enums::{EntityType, OnDelete};

use crate::associations::children_ids;
use crate::error::DatabaseError;
use crate::service::SchoolService;
use crate::store;

/// One record removed by a delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeletedEntity {
    pub entity_type: EntityType,
    pub id: String,
}

/// Every record a delete removed, children before parents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub deleted: Vec<DeletedEntity>,
}

impl DeleteReport {
    /// How many records of `entity_type` were removed.
    #[must_use]
    pub fn count_of(&self, entity_type: EntityType) -> usize {
        self.deleted
            .iter()
            .filter(|d| d.entity_type == entity_type)
            .count()
    }

    #[must_use]
    pub fn contains(&self, entity_type: EntityType, id: &str) -> bool {
        self.deleted
            .iter()
            .any(|d| d.entity_type == entity_type && d.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deleted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty()
    }
}

/// Build the ordered delete plan for `entity`/`id`.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the root record is missing, or
/// `DatabaseError::DeleteRestricted` naming the first blocking relationship.
pub async fn plan(
    conn: &libsql::Connection,
    entity: EntityType,
    id: &str,
) -> Result<Vec<DeletedEntity>, DatabaseError> {
    store::ensure_exists(conn, entity, id).await?;

    let mut order = Vec::new();
    let mut seen = HashSet::new();
    // (entity, id, children already pushed)
    let mut stack = vec![(entity, id.to_string(), false)];

    while let Some((entity_type, id, expanded)) = stack.pop() {
        if expanded {
            order.push(DeletedEntity { entity_type, id });
            continue;
        }
        if !seen.insert((entity_type, id.clone())) {
            continue;
        }

        for assoc in dependents_of(entity_type).filter(|a| a.on_delete == OnDelete::Restrict) {
            if !children_ids(conn, assoc, &id).await?.is_empty() {
                return Err(DatabaseError::DeleteRestricted {
                    entity_type,
                    id,
                    relationship: assoc.name,
                });
            }
        }

        stack.push((entity_type, id.clone(), true));
        for assoc in dependents_of(entity_type).filter(|a| a.on_delete == OnDelete::Cascade) {
            for child_id in children_ids(conn, assoc, &id).await?.into_iter().rev() {
                stack.push((assoc.child, child_id, false));
            }
        }
    }

    Ok(order)
}

/// Plan and apply a delete on `conn`. Must run inside a transaction.
///
/// # Errors
///
/// Returns any planning error, or `DatabaseError` if a DELETE fails.
pub async fn delete_in(
    conn: &libsql::Connection,
    entity: EntityType,
    id: &str,
) -> Result<DeleteReport, DatabaseError> {
    let deleted = plan(conn, entity, id).await?;
    for record in &deleted {
        store::delete(conn, record.entity_type, &record.id).await?;
    }
    Ok(DeleteReport { deleted })
}

impl SchoolService {
    /// Delete a record and apply every delete policy below it atomically.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DeleteRestricted` if a restrict policy blocks
    /// the delete, `DatabaseError::NotFound` if the record is missing. On any
    /// error nothing is removed.
    ///
    /// `DeleteRestricted` names the record that owns the blocking children,
    /// which may be a descendant of `entity`/`id`: deleting a school whose
    /// term has courses reports that term and `term_courses`.
    pub async fn delete(
        &self,
        entity: EntityType,
        id: &str,
    ) -> Result<DeleteReport, DatabaseError> {
        if entity == EntityType::LessonAssignment {
            return Err(DatabaseError::InvalidState(
                "join rows are removed with detach".into(),
            ));
        }

        let result = self
            .db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                delete_in(conn, entity, id).await
            })
            .await;

        match &result {
            Ok(report) => info!(
                entity = %entity,
                id,
                removed = report.len(),
                "deleted"
            ),
            Err(DatabaseError::DeleteRestricted {
                entity_type,
                id: blocked_id,
                relationship,
            }) => warn!(
                entity = %entity,
                id,
                blocked_by = %entity_type,
                blocked_id = blocked_id.as_str(),
                relationship = *relationship,
                "delete restricted"
            ),
            Err(_) => {}
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{course, lesson, school, term, test_service};

    #[tokio::test]
    async fn plan_lists_children_before_parents() {
        let svc = test_service().await;
        let c = course(&svc, None, "Math101", "REG123").await;
        let l = lesson(&svc, Some(&c.id), "Fractions").await;

        let order = plan(svc.db().conn(), EntityType::Course, &c.id).await.unwrap();
        let position = |entity, id: &str| {
            order
                .iter()
                .position(|d| d.entity_type == entity && d.id == id)
                .unwrap()
        };
        assert!(position(EntityType::Lesson, &l.id) < position(EntityType::Course, &c.id));
        assert_eq!(order.last().map(|d| d.id.as_str()), Some(c.id.as_str()));
    }

    #[tokio::test]
    async fn restrict_deep_in_the_tree_blocks_the_root() {
        let svc = test_service().await;
        let s = school(&svc, "Elkins").await;
        let t = term(&svc, Some(&s.id), "First Term").await;
        course(&svc, Some(&t.id), "Math101", "REG123").await;

        let err = svc.delete(EntityType::School, &s.id).await.unwrap_err();
        match err {
            DatabaseError::DeleteRestricted {
                entity_type,
                id,
                relationship,
            } => {
                assert_eq!(entity_type, EntityType::Term);
                assert_eq!(id, t.id);
                assert_eq!(relationship, "term_courses");
            }
            other => panic!("expected DeleteRestricted, got {other:?}"),
        }
        assert_eq!(svc.count(EntityType::School).await.unwrap(), 1);
        assert_eq!(svc.count(EntityType::Term).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_school_cascades_to_terms() {
        let svc = test_service().await;
        let s = school(&svc, "Elkins").await;
        let t1 = term(&svc, Some(&s.id), "First Term").await;
        let t2 = term(&svc, Some(&s.id), "Second Term").await;

        let report = svc.delete(EntityType::School, &s.id).await.unwrap();
        assert_eq!(report.count_of(EntityType::Term), 2);
        assert!(report.contains(EntityType::Term, &t1.id));
        assert!(report.contains(EntityType::Term, &t2.id));
        assert_eq!(svc.count(EntityType::Term).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_root_is_not_found() {
        let svc = test_service().await;
        let err = svc.delete(EntityType::Course, "crs-missing0").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn join_rows_cannot_be_deleted_directly() {
        let svc = test_service().await;
        let err = svc
            .delete(EntityType::LessonAssignment, "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[test]
    fn report_counts_by_type() {
        let report = DeleteReport {
            deleted: vec![
                DeletedEntity {
                    entity_type: EntityType::Reading,
                    id: "rdg-1".into(),
                },
                DeletedEntity {
                    entity_type: EntityType::Reading,
                    id: "rdg-2".into(),
                },
                DeletedEntity {
                    entity_type: EntityType::Lesson,
                    id: "lsn-1".into(),
                },
            ],
        };
        assert_eq!(report.count_of(EntityType::Reading), 2);
        assert_eq!(report.count_of(EntityType::Course), 0);
        assert_eq!(report.len(), 3);
        assert!(!report.is_empty());
    }
}
