//! Lesson ↔ assignment pairings (many-to-many).
//!
//! Pairings live in `lesson_assignments` and are managed only through
//! link/unlink. Deleting either side leaves its pairings in place; the
//! listing queries join through the live tables so stale rows never surface.

use school_core::entities::{Assignment, Lesson, LessonAssignment};
use school_core::enums::EntityType;

use crate::associations::{association, link, unlink};
use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::SchoolService;
use crate::store::{self, column_list};

fn row_to_lesson_assignment(row: &libsql::Row) -> Result<LessonAssignment, DatabaseError> {
    Ok(LessonAssignment {
        lesson_id: row.get::<String>(0)?,
        assignment_id: row.get::<String>(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl SchoolService {
    /// Pair a lesson with an assignment. Linking an existing pair is a no-op
    /// and returns the original row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if either side is missing.
    pub async fn link_lesson_assignment(
        &self,
        lesson_id: &str,
        assignment_id: &str,
    ) -> Result<LessonAssignment, DatabaseError> {
        let assoc = association(EntityType::Lesson, EntityType::Assignment)?;
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                link(conn, assoc, lesson_id, assignment_id).await?;
                let mut rows = conn
                    .query(
                        "SELECT lesson_id, assignment_id, created_at FROM lesson_assignments
                         WHERE lesson_id = ?1 AND assignment_id = ?2",
                        libsql::params![lesson_id, assignment_id],
                    )
                    .await?;
                let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
                row_to_lesson_assignment(&row)
            })
            .await
    }

    /// Remove a pairing. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn unlink_lesson_assignment(
        &self,
        lesson_id: &str,
        assignment_id: &str,
    ) -> Result<bool, DatabaseError> {
        let assoc = association(EntityType::Lesson, EntityType::Assignment)?;
        unlink(self.db().conn(), assoc, lesson_id, assignment_id).await
    }

    pub async fn assignments_of_lesson(
        &self,
        lesson_id: &str,
    ) -> Result<Vec<Assignment>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM assignments
             WHERE id IN (SELECT assignment_id FROM lesson_assignments WHERE lesson_id = ?1)
             ORDER BY name, id",
            column_list::<Assignment>()
        );
        store::query_records(self.db().conn(), &sql, vec![lesson_id.into()]).await
    }

    pub async fn lessons_of_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<Lesson>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM lessons
             WHERE id IN (SELECT lesson_id FROM lesson_assignments WHERE assignment_id = ?1)
             ORDER BY name, id",
            column_list::<Lesson>()
        );
        store::query_records(self.db().conn(), &sql, vec![assignment_id.into()]).await
    }

    /// Every stored pairing for `lesson_id`, including ones whose assignment
    /// has since been deleted.
    pub async fn lesson_assignment_rows(
        &self,
        lesson_id: &str,
    ) -> Result<Vec<LessonAssignment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT lesson_id, assignment_id, created_at FROM lesson_assignments
                 WHERE lesson_id = ?1 ORDER BY rowid",
                [lesson_id],
            )
            .await?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next().await? {
            pairs.push(row_to_lesson_assignment(&row)?);
        }
        Ok(pairs)
    }
}
