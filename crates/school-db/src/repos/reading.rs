//! Reading repository.
//!
//! Readings are created and edited through their text form, so a
//! non-numeric `order_number` is reported as `not_a_number` rather than
//! failing to parse before validation.

use chrono::{DateTime, Utc};

use school_core::entities::{Lesson, Reading, ReadingForm};
use school_core::enums::EntityType;
use school_core::ids::PREFIX_READING;

use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::{SchoolService, insert_validated, update_validated};
use crate::store::{self, Query, Record};
use crate::updates::reading::ReadingUpdate;

impl Record for Reading {
    const ENTITY: EntityType = EntityType::Reading;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "caption",
        "order_number",
        "lesson_id",
        "url",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get::<String>(0)?,
            caption: get_opt_string(row, 1)?,
            order_number: row.get::<i64>(2)?,
            lesson_id: row.get::<String>(3)?,
            url: row.get::<String>(4)?,
            created_at: parse_datetime(&row.get::<String>(5)?)?,
            updated_at: parse_datetime(&row.get::<String>(6)?)?,
        })
    }

    fn values(&self) -> Vec<libsql::Value> {
        vec![
            self.id.as_str().into(),
            self.caption.as_deref().into(),
            self.order_number.into(),
            self.lesson_id.as_str().into(),
            self.url.as_str().into(),
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
        vec![(EntityType::Lesson, self.lesson_id.as_str())]
    }

    fn set_reference(&mut self, column: &str, parent_id: &str) -> bool {
        if column != "lesson_id" {
            return false;
        }
        self.lesson_id = parent_id.to_string();
        true
    }
}

impl SchoolService {
    pub async fn create_reading(&self, form: ReadingForm) -> Result<Reading, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_READING).await?;
        let reading = form.into_reading(id, now, now)?;

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &reading).await
            })
            .await?;
        Ok(reading)
    }

    pub async fn get_reading(&self, id: &str) -> Result<Reading, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn update_reading(
        &self,
        reading_id: &str,
        update: ReadingUpdate,
    ) -> Result<Reading, DatabaseError> {
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                let current: Reading = store::find(conn, reading_id).await?;
                let mut form = ReadingForm::from(&current);
                update.apply(&mut form);
                let reading = form.into_reading(current.id, current.created_at, Utc::now())?;
                update_validated(conn, &reading).await?;
                Ok(reading)
            })
            .await
    }

    pub async fn delete_reading(&self, reading_id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::Reading, reading_id).await
    }

    pub async fn list_readings(&self) -> Result<Vec<Reading>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().order_by("lesson_id").order_by("order_number"),
        )
        .await
    }

    pub async fn lesson_of_reading(&self, reading_id: &str) -> Result<Lesson, DatabaseError> {
        let conn = self.db().conn();
        let reading: Reading = store::find(conn, reading_id).await?;
        store::find(conn, &reading.lesson_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use school_core::validation::Rule;

    use crate::test_support::helpers::{lesson, test_service};
    use crate::updates::reading::ReadingUpdateBuilder;

    fn form(lesson_id: &str, order_number: &str, url: &str) -> ReadingForm {
        ReadingForm {
            caption: None,
            order_number: order_number.into(),
            lesson_id: lesson_id.into(),
            url: url.into(),
        }
    }

    #[tokio::test]
    async fn create_reading_roundtrip() {
        let svc = test_service().await;
        let l = lesson(&svc, None, "Fractions").await;
        let created = svc
            .create_reading(form(&l.id, "1", "https://example.com/ch1"))
            .await
            .unwrap();
        assert!(created.id.starts_with("rdg-"));
        assert_eq!(svc.get_reading(&created.id).await.unwrap(), created);
        assert_eq!(svc.lesson_of_reading(&created.id).await.unwrap().id, l.id);
    }

    #[tokio::test]
    async fn every_failing_field_is_reported() {
        let svc = test_service().await;
        let err = svc
            .create_reading(form("", "", "htttp://example.com"))
            .await
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors.has("order_number", Rule::Blank));
        assert!(errors.has("lesson_id", Rule::Blank));
        assert!(errors.has("url", Rule::Invalid));
        assert_eq!(svc.count(EntityType::Reading).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_lesson_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .create_reading(form("lsn-missing0", "1", "https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::NotFound { entity_type: EntityType::Lesson, .. }
        ));
    }

    #[tokio::test]
    async fn update_reparses_order_number() {
        let svc = test_service().await;
        let l = lesson(&svc, None, "Fractions").await;
        let created = svc
            .create_reading(form(&l.id, "1", "https://example.com/ch1"))
            .await
            .unwrap();

        let updated = svc
            .update_reading(&created.id, ReadingUpdateBuilder::new().order_number("4").build())
            .await
            .unwrap();
        assert_eq!(updated.order_number, 4);
        assert_eq!(updated.created_at, created.created_at);

        let err = svc
            .update_reading(&created.id, ReadingUpdateBuilder::new().order_number("four").build())
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().has("order_number", Rule::NotANumber));
        assert_eq!(svc.get_reading(&created.id).await.unwrap().order_number, 4);
    }
}
