//! Term repository.

use chrono::{DateTime, Utc};

use school_core::entities::{Course, School, Term};
use school_core::enums::EntityType;
use school_core::ids::PREFIX_TERM;

use crate::associations::parent_id;
use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::{format_date, get_opt_string, parse_datetime, parse_optional_date};
use crate::service::{SchoolService, insert_validated, update_validated};
use crate::store::{self, Query, Record};
use crate::updates::term::{NewTerm, TermUpdate};

impl Record for Term {
    const ENTITY: EntityType = EntityType::Term;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "starts_on",
        "ends_on",
        "school_id",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get::<String>(0)?,
            name: row.get::<String>(1)?,
            starts_on: parse_optional_date(get_opt_string(row, 2)?.as_deref())?,
            ends_on: parse_optional_date(get_opt_string(row, 3)?.as_deref())?,
            school_id: get_opt_string(row, 4)?,
            created_at: parse_datetime(&row.get::<String>(5)?)?,
            updated_at: parse_datetime(&row.get::<String>(6)?)?,
        })
    }

    fn values(&self) -> Vec<libsql::Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
            format_date(self.starts_on).into(),
            format_date(self.ends_on).into(),
            self.school_id.as_deref().into(),
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
        self.school_id
            .as_deref()
            .map(|id| (EntityType::School, id))
            .into_iter()
            .collect()
    }

    fn set_reference(&mut self, column: &str, parent_id: &str) -> bool {
        if column != "school_id" {
            return false;
        }
        self.school_id = Some(parent_id.to_string());
        true
    }
}

impl SchoolService {
    pub async fn create_term(&self, new: NewTerm) -> Result<Term, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TERM).await?;
        let term = Term {
            id,
            name: new.name,
            starts_on: new.starts_on,
            ends_on: new.ends_on,
            school_id: new.school_id,
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &term).await
            })
            .await?;
        Ok(term)
    }

    pub async fn get_term(&self, id: &str) -> Result<Term, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn update_term(&self, term_id: &str, update: TermUpdate) -> Result<Term, DatabaseError> {
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                let mut term: Term = store::find(conn, term_id).await?;
                update.apply(&mut term);
                term.touch(Utc::now());
                update_validated(conn, &term).await?;
                Ok(term)
            })
            .await
    }

    /// Delete a term. Refused while any course belongs to it.
    pub async fn delete_term(&self, term_id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::Term, term_id).await
    }

    pub async fn list_terms(&self) -> Result<Vec<Term>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().order_by("starts_on").order_by("name"),
        )
        .await
    }

    /// Attach an existing course to a term. Fails if the course code is
    /// already taken in that term.
    pub async fn add_course(&self, term_id: &str, course_id: &str) -> Result<Course, DatabaseError> {
        self.attach_to(EntityType::Term, term_id, course_id).await
    }

    pub async fn courses_of_term(&self, term_id: &str) -> Result<Vec<Course>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new().eq("term_id", term_id).order_by("name").order_by("id"),
        )
        .await
    }

    /// The school that owns the term, if it has one.
    pub async fn school_of_term(&self, term_id: &str) -> Result<Option<School>, DatabaseError> {
        let conn = self.db().conn();
        match parent_id(conn, EntityType::Term, term_id).await? {
            Some(school_id) => Ok(Some(store::find(conn, &school_id).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use school_core::validation::Rule;

    use crate::test_support::helpers::{course, term, test_service};
    use crate::updates::term::TermUpdateBuilder;

    #[tokio::test]
    async fn create_term_roundtrip_with_dates() {
        let svc = test_service().await;
        let created = term(&svc, None, "First Term").await;
        assert!(created.id.starts_with("trm-"));

        let fetched = svc.get_term(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.starts_on, NaiveDate::from_ymd_opt(2026, 9, 1));
    }

    #[tokio::test]
    async fn term_with_unknown_school_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .create_term(NewTerm {
                name: "Ghost".into(),
                school_id: Some("sch-missing0".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::NotFound { entity_type: EntityType::School, .. }
        ));
    }

    #[tokio::test]
    async fn end_before_start_is_rejected_on_update() {
        let svc = test_service().await;
        let created = term(&svc, None, "First Term").await;
        let err = svc
            .update_term(
                &created.id,
                TermUpdateBuilder::new()
                    .ends_on(NaiveDate::from_ymd_opt(2026, 1, 1))
                    .build(),
            )
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().has("ends_on", Rule::BeforeStart));
    }

    #[tokio::test]
    async fn add_course_links_both_sides() {
        let svc = test_service().await;
        let first = term(&svc, None, "First Term").await;
        let math = course(&svc, None, "Math101", "REG123").await;

        let attached = svc.add_course(&first.id, &math.id).await.unwrap();
        assert_eq!(attached.term_id.as_deref(), Some(first.id.as_str()));

        let names: Vec<_> = svc
            .courses_of_term(&first.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Math101"]);
        let owner = svc.term_of_course(&math.id).await.unwrap().unwrap();
        assert_eq!(owner.name, "First Term");
    }

    #[tokio::test]
    async fn add_course_rejects_code_taken_in_target_term() {
        let svc = test_service().await;
        let first = term(&svc, None, "First Term").await;
        let second = term(&svc, None, "Second Term").await;
        course(&svc, Some(&first.id), "Math101", "REG123").await;
        let moving = course(&svc, Some(&second.id), "Math102", "REG123").await;

        let err = svc.add_course(&first.id, &moving.id).await.unwrap_err();
        assert!(err.validation_errors().unwrap().has("course_code", Rule::Taken));
        assert_eq!(
            svc.get_course(&moving.id).await.unwrap().term_id.as_deref(),
            Some(second.id.as_str())
        );
        assert_eq!(svc.courses_of_term(&first.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unowned_term_has_no_school() {
        let svc = test_service().await;
        let floating = term(&svc, None, "Floating").await;
        assert!(svc.school_of_term(&floating.id).await.unwrap().is_none());
        assert_eq!(svc.list_terms().await.unwrap().len(), 1);
    }
}
