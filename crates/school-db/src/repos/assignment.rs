//! Assignment repository.

use chrono::{DateTime, Utc};

use school_core::entities::{Assignment, Course};
use school_core::enums::EntityType;
use school_core::ids::PREFIX_ASSIGNMENT;

use crate::associations::parent_id;
use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::{SchoolService, insert_validated, update_validated};
use crate::store::{self, Query, Record};
use crate::updates::assignment::{AssignmentUpdate, NewAssignment};

impl Record for Assignment {
    const ENTITY: EntityType = EntityType::Assignment;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "course_id",
        "percent_of_grade",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get::<String>(0)?,
            name: row.get::<String>(1)?,
            course_id: get_opt_string(row, 2)?,
            percent_of_grade: row.get::<Option<f64>>(3)?,
            created_at: parse_datetime(&row.get::<String>(4)?)?,
            updated_at: parse_datetime(&row.get::<String>(5)?)?,
        })
    }

    fn values(&self) -> Vec<libsql::Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            self.course_id.as_deref().into(),
            self.percent_of_grade.into(),
            self.created_at.to_rfc3339().into(),
            self.updated_at.to_rfc3339().into(),
        ]
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn references(&self) -> Vec<(EntityType, &str)> {
        self.course_id
            .as_deref()
            .map(|id| (EntityType::Course, id))
            .into_iter()
            .collect()
    }

    fn set_reference(&mut self, column: &str, parent_id: &str) -> bool {
        if column != "course_id" {
            return false;
        }
        self.course_id = Some(parent_id.to_string());
        true
    }
}

impl SchoolService {
    pub async fn create_assignment(&self, new: NewAssignment) -> Result<Assignment, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ASSIGNMENT).await?;
        let assignment = Assignment {
            id,
            name: new.name,
            course_id: new.course_id,
            percent_of_grade: new.percent_of_grade,
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &assignment).await
            })
            .await?;
        Ok(assignment)
    }

    pub async fn get_assignment(&self, id: &str) -> Result<Assignment, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: &str,
        update: AssignmentUpdate,
    ) -> Result<Assignment, DatabaseError> {
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                let mut assignment: Assignment = store::find(conn, assignment_id).await?;
                update.apply(&mut assignment);
                assignment.touch(Utc::now());
                update_validated(conn, &assignment).await?;
                Ok(assignment)
            })
            .await
    }

    pub async fn delete_assignment(&self, assignment_id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::Assignment, assignment_id).await
    }

    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, DatabaseError> {
        store::find_all(self.db().conn(), &Query::new().order_by("name").order_by("id")).await
    }

    pub async fn course_of_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Option<Course>, DatabaseError> {
        let conn = self.db().conn();
        match parent_id(conn, EntityType::Assignment, assignment_id).await? {
            Some(course_id) => Ok(Some(store::find(conn, &course_id).await?)),
            None => Ok(None),
        }
    }
}
