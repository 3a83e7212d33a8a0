//! Course repository.
//!
//! A course's code is unique within its term. Deleting a course cascades to
//! its lessons (and their readings) and assignments, and is refused while any
//! student is enrolled.

use chrono::{DateTime, Utc};

use school_core::entities::{Assignment, Course, Lesson, Term};
use school_core::enums::EntityType;
use school_core::ids::PREFIX_COURSE;

use crate::associations::parent_id;
use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::{SchoolService, insert_validated, update_validated};
use crate::store::{self, Query, Record};
use crate::updates::course::{CourseUpdate, NewCourse};

impl Record for Course {
    const ENTITY: EntityType = EntityType::Course;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "course_code",
        "term_id",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get::<String>(0)?,
            name: row.get::<String>(1)?,
            course_code: row.get::<String>(2)?,
            term_id: get_opt_string(row, 3)?,
            created_at: parse_datetime(&row.get::<String>(4)?)?,
            updated_at: parse_datetime(&row.get::<String>(5)?)?,
        })
    }

    fn values(&self) -> Vec<libsql::Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            self.course_code.as_str().into(),
            self.term_id.as_deref().into(),
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
        self.term_id
            .as_deref()
            .map(|id| (EntityType::Term, id))
            .into_iter()
            .collect()
    }

    fn set_reference(&mut self, column: &str, parent_id: &str) -> bool {
        if column != "term_id" {
            return false;
        }
        self.term_id = Some(parent_id.to_string());
        true
    }
}

impl SchoolService {
    pub async fn create_course(&self, new: NewCourse) -> Result<Course, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COURSE).await?;
        let course = Course {
            id,
            name: new.name,
            course_code: new.course_code,
            term_id: new.term_id,
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &course).await
            })
            .await?;
        Ok(course)
    }

    pub async fn get_course(&self, id: &str) -> Result<Course, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn update_course(
        &self,
        course_id: &str,
        update: CourseUpdate,
    ) -> Result<Course, DatabaseError> {
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                let mut course: Course = store::find(conn, course_id).await?;
                update.apply(&mut course);
                course.touch(Utc::now());
                update_validated(conn, &course).await?;
                Ok(course)
            })
            .await
    }

    pub async fn delete_course(&self, course_id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::Course, course_id).await
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, DatabaseError> {
        store::find_all(self.db().conn(), &Query::new().order_by("name").order_by("id")).await
    }

    /// Attach an existing lesson to a course.
    pub async fn add_lesson(&self, course_id: &str, lesson_id: &str) -> Result<Lesson, DatabaseError> {
        self.attach_to(EntityType::Course, course_id, lesson_id).await
    }

    /// Attach an existing assignment to a course. Fails if the assignment's
    /// name is already used in that course.
    pub async fn add_assignment(
        &self,
        course_id: &str,
        assignment_id: &str,
    ) -> Result<Assignment, DatabaseError> {
        self.attach_to(EntityType::Course, course_id, assignment_id).await
    }

    pub async fn lessons_of_course(&self, course_id: &str) -> Result<Vec<Lesson>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().eq("course_id", course_id).order_by("rowid"),
        )
        .await
    }

    pub async fn assignments_of_course(
        &self,
        course_id: &str,
    ) -> Result<Vec<Assignment>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().eq("course_id", course_id).order_by("name"),
        )
        .await
    }

    pub async fn term_of_course(&self, course_id: &str) -> Result<Option<Term>, DatabaseError> {
        let conn = self.db().conn();
        match parent_id(conn, EntityType::Course, course_id).await? {
            Some(term_id) => Ok(Some(store::find(conn, &term_id).await?)),
            None => Ok(None),
        }
    }
}
