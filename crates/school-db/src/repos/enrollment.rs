//! Course enrollment repository: student seats and instructor assignments.
//!
//! Both rows belong to a course and optionally point at a user. A course
//! refuses deletion while it has students; instructor rows are left behind.

use chrono::{DateTime, Utc};

use school_core::entities::{CourseInstructor, CourseStudent, User};
use school_core::enums::EntityType;
use school_core::ids::{PREFIX_COURSE_INSTRUCTOR, PREFIX_COURSE_STUDENT};

use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::{SchoolService, insert_validated};
use crate::store::{self, Query, Record};

macro_rules! enrollment_record {
    ($ty:ty, $entity:expr) => {
        impl Record for $ty {
            const ENTITY: EntityType = $entity;
            const COLUMNS: &'static [&'static str] =
                &["id", "course_id", "user_id", "created_at", "updated_at"];

            fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
                Ok(Self {
                    id: row.get::<String>(0)?,
                    course_id: row.get::<String>(1)?,
                    user_id: get_opt_string(row, 2)?,
                    created_at: parse_datetime(&row.get::<String>(3)?)?,
                    updated_at: parse_datetime(&row.get::<String>(4)?)?,
                })
            }

            fn values(&self) -> Vec<libsql::Value> {
                vec![
                    self.id.as_str().into(),
                    self.course_id.as_str().into(),
                    self.user_id.as_deref().into(),
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
                let mut refs = vec![(EntityType::Course, self.course_id.as_str())];
                if let Some(user_id) = self.user_id.as_deref() {
                    refs.push((EntityType::User, user_id));
                }
                refs
            }

            fn set_reference(&mut self, column: &str, parent_id: &str) -> bool {
                match column {
                    "course_id" => self.course_id = parent_id.to_string(),
                    "user_id" => self.user_id = Some(parent_id.to_string()),
                    _ => return false,
                }
                true
            }
        }
    };
}

enrollment_record!(CourseStudent, EntityType::CourseStudent);
enrollment_record!(CourseInstructor, EntityType::CourseInstructor);

impl SchoolService {
    /// Give `user_id` a seat in `course_id`. A seat may be created before
    /// it is assigned to a user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the course or user is missing.
    pub async fn enroll_student(
        &self,
        course_id: &str,
        user_id: Option<&str>,
    ) -> Result<CourseStudent, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COURSE_STUDENT).await?;
        let seat = CourseStudent {
            id,
            course_id: course_id.to_string(),
            user_id: user_id.map(String::from),
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &seat).await
            })
            .await?;
        Ok(seat)
    }

    /// Record `user_id` as an instructor of `course_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the course or user is missing.
    pub async fn add_instructor(
        &self,
        course_id: &str,
        user_id: Option<&str>,
    ) -> Result<CourseInstructor, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COURSE_INSTRUCTOR).await?;
        let instructor = CourseInstructor {
            id,
            course_id: course_id.to_string(),
            user_id: user_id.map(String::from),
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &instructor).await
            })
            .await?;
        Ok(instructor)
    }

    pub async fn get_course_student(&self, id: &str) -> Result<CourseStudent, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn get_course_instructor(&self, id: &str) -> Result<CourseInstructor, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    /// Assign an existing seat to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the seat or user is missing.
    pub async fn assign_seat(
        &self,
        user_id: &str,
        seat_id: &str,
    ) -> Result<CourseStudent, DatabaseError> {
        self.attach_to(EntityType::User, user_id, seat_id).await
    }

    pub async fn students_of_course(
        &self,
        course_id: &str,
    ) -> Result<Vec<CourseStudent>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().eq("course_id", course_id).order_by("rowid"),
        )
        .await
    }

    pub async fn instructors_of_course(
        &self,
        course_id: &str,
    ) -> Result<Vec<CourseInstructor>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().eq("course_id", course_id).order_by("rowid"),
        )
        .await
    }

    /// Seats held by `user_id` across every course.
    pub async fn enrollments_of_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<CourseStudent>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().eq("user_id", user_id).order_by("rowid"),
        )
        .await
    }

    pub async fn user_of_seat(&self, seat_id: &str) -> Result<Option<User>, DatabaseError> {
        let conn = self.db().conn();
        let seat: CourseStudent = store::find(conn, seat_id).await?;
        match seat.user_id {
            Some(user_id) => Ok(Some(store::find(conn, &user_id).await?)),
            None => Ok(None),
        }
    }

    pub async fn delete_course_student(&self, id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::CourseStudent, id).await
    }

    pub async fn delete_course_instructor(&self, id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::CourseInstructor, id).await
    }
}
