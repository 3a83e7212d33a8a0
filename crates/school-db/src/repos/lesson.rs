//! Lesson repository.

use chrono::{DateTime, Utc};

use school_core::entities::{Course, Lesson, Reading};
use school_core::enums::EntityType;
use school_core::ids::PREFIX_LESSON;

use crate::associations::parent_id;
use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::{SchoolService, insert_validated, update_validated};
use crate::store::{self, Query, Record};
use crate::updates::lesson::{LessonUpdate, NewLesson};

impl Record for Lesson {
    const ENTITY: EntityType = EntityType::Lesson;
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "course_id", "created_at", "updated_at"];

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get::<String>(0)?,
            name: row.get::<String>(1)?,
            course_id: get_opt_string(row, 2)?,
            created_at: parse_datetime(&row.get::<String>(3)?)?,
            updated_at: parse_datetime(&row.get::<String>(4)?)?,
        })
    }

    fn values(&self) -> Vec<libsql::Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            self.course_id.as_deref().into(),
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
    pub async fn create_lesson(&self, new: NewLesson) -> Result<Lesson, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_LESSON).await?;
        let lesson = Lesson {
            id,
            name: new.name,
            course_id: new.course_id,
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &lesson).await
            })
            .await?;
        Ok(lesson)
    }

    pub async fn get_lesson(&self, id: &str) -> Result<Lesson, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn update_lesson(
        &self,
        lesson_id: &str,
        update: LessonUpdate,
    ) -> Result<Lesson, DatabaseError> {
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                let mut lesson: Lesson = store::find(conn, lesson_id).await?;
                update.apply(&mut lesson);
                lesson.touch(Utc::now());
                update_validated(conn, &lesson).await?;
                Ok(lesson)
            })
            .await
    }

    /// Delete a lesson and its readings. Links to assignments are left behind.
    pub async fn delete_lesson(&self, lesson_id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::Lesson, lesson_id).await
    }

    pub async fn list_lessons(&self) -> Result<Vec<Lesson>, DatabaseError> {
        store::find_all(self.db().conn(), &Query::new().order_by("name").order_by("id")).await
    }

    /// Move an existing reading to a lesson.
    pub async fn add_reading(&self, lesson_id: &str, reading_id: &str) -> Result<Reading, DatabaseError> {
        self.attach_to(EntityType::Lesson, lesson_id, reading_id).await
    }

    /// The lesson's readings in `order_number` order.
    pub async fn readings_of_lesson(&self, lesson_id: &str) -> Result<Vec<Reading>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new()
                .eq("lesson_id", lesson_id)
                .order_by("order_number")
                .order_by("rowid"),
        )
        .await
    }

    pub async fn course_of_lesson(&self, lesson_id: &str) -> Result<Option<Course>, DatabaseError> {
        let conn = self.db().conn();
        match parent_id(conn, EntityType::Lesson, lesson_id).await? {
            Some(course_id) => Ok(Some(store::find(conn, &course_id).await?)),
            None => Ok(None),
        }
    }
}
