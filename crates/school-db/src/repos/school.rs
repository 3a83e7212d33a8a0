//! School repository: CRUD plus the terms and courses a school owns.

use chrono::{DateTime, Utc};

use school_core::entities::{Course, School, Term};
use school_core::enums::EntityType;
use school_core::ids::PREFIX_SCHOOL;

use crate::deletion::DeleteReport;
use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::{SchoolService, insert_validated, update_validated};
use crate::store::{self, Query, Record, column_list};
use crate::updates::school::{NewSchool, SchoolUpdate};

impl Record for School {
    const ENTITY: EntityType = EntityType::School;
    const COLUMNS: &'static [&'static str] = &["id", "name", "created_at", "updated_at"];

    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: row.get::<String>(0)?,
            name: row.get::<String>(1)?,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
            updated_at: parse_datetime(&row.get::<String>(3)?)?,
        })
    }

    fn values(&self) -> Vec<libsql::Value> {
        vec![
            self.id.as_str().into(),
            self.name.as_str().into(),
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
}

impl SchoolService {
    pub async fn create_school(&self, new: NewSchool) -> Result<School, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SCHOOL).await?;
        let school = School {
            id,
            name: new.name,
            created_at: now,
            updated_at: now,
        };

        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                insert_validated(conn, &school).await
            })
            .await?;
        Ok(school)
    }

    pub async fn get_school(&self, id: &str) -> Result<School, DatabaseError> {
        store::find(self.db().conn(), id).await
    }

    pub async fn update_school(
        &self,
        school_id: &str,
        update: SchoolUpdate,
    ) -> Result<School, DatabaseError> {
        self.db()
            .run_in_transaction(async |conn: &libsql::Connection| {
                let mut school: School = store::find(conn, school_id).await?;
                update.apply(&mut school);
                school.touch(Utc::now());
                update_validated(conn, &school).await?;
                Ok(school)
            })
            .await
    }

    /// Delete a school and, through cascade, its terms.
    pub async fn delete_school(&self, school_id: &str) -> Result<DeleteReport, DatabaseError> {
        self.delete(EntityType::School, school_id).await
    }

    /// Every school, in ascending name order.
    pub async fn find_all_schools(&self) -> Result<Vec<School>, DatabaseError> {
        store::find_all(self.db().conn(), &Query::new().order_by("name").order_by("id")).await
    }

    /// Attach an existing term to a school.
    pub async fn add_term(&self, school_id: &str, term_id: &str) -> Result<Term, DatabaseError> {
        self.attach_to(EntityType::School, school_id, term_id).await
    }

    pub async fn terms_of_school(&self, school_id: &str) -> Result<Vec<Term>, DatabaseError> {
        store::find_all(
            self.db().conn(),
            &Query::new()
                .eq("school_id", school_id)
                .order_by("starts_on")
                .order_by("name"),
        )
        .await
    }

    /// Courses of every term of the school.
    pub async fn courses_of_school(&self, school_id: &str) -> Result<Vec<Course>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM courses
             WHERE term_id IN (SELECT id FROM terms WHERE school_id = ?1)
             ORDER BY name, id",
            column_list::<Course>()
        );
        store::query_records(self.db().conn(), &sql, vec![school_id.into()]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use school_core::validation::Rule;

    use crate::test_support::helpers::{course, school, term, test_service};
    use crate::updates::school::SchoolUpdateBuilder;

    #[tokio::test]
    async fn create_school_roundtrip() {
        let svc = test_service().await;
        let created = school(&svc, "Elkins").await;
        assert!(created.id.starts_with("sch-"));

        let fetched = svc.get_school(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Elkins");
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_and_nothing_is_stored() {
        let svc = test_service().await;
        for name in ["", "   "] {
            let err = svc
                .create_school(NewSchool { name: name.into() })
                .await
                .unwrap_err();
            let errors = err.validation_errors().expect("validation error");
            assert!(errors.has("name", Rule::Blank));
        }
        assert_eq!(svc.count(EntityType::School).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_all_schools_sorts_by_name() {
        let svc = test_service().await;
        for name in ["Zion", "Adams", "Madison"] {
            school(&svc, name).await;
        }
        let names: Vec<_> = svc
            .find_all_schools()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Adams", "Madison", "Zion"]);
    }

    #[tokio::test]
    async fn update_school_renames() {
        let svc = test_service().await;
        let created = school(&svc, "Elkins").await;
        let updated = svc
            .update_school(&created.id, SchoolUpdateBuilder::new().name("Elkins High").build())
            .await
            .unwrap();
        assert_eq!(updated.name, "Elkins High");
        assert!(updated.updated_at >= created.updated_at);

        let err = svc
            .update_school(&created.id, SchoolUpdateBuilder::new().name("").build())
            .await
            .unwrap_err();
        assert!(err.validation_errors().is_some());
        assert_eq!(svc.get_school(&created.id).await.unwrap().name, "Elkins High");
    }

    #[tokio::test]
    async fn add_term_links_both_sides() {
        let svc = test_service().await;
        let elkins = school(&svc, "Elkins").await;
        let t = term(&svc, None, "First Term").await;

        let attached = svc.add_term(&elkins.id, &t.id).await.unwrap();
        assert_eq!(attached.school_id.as_deref(), Some(elkins.id.as_str()));

        let terms: Vec<_> = svc
            .terms_of_school(&elkins.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(terms, vec!["First Term"]);
        let owner = svc.school_of_term(&t.id).await.unwrap().unwrap();
        assert_eq!(owner.name, "Elkins");
    }

    #[tokio::test]
    async fn add_term_to_missing_school_changes_nothing() {
        let svc = test_service().await;
        let t = term(&svc, None, "First Term").await;

        let err = svc.add_term("sch-missing0", &t.id).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::NotFound {
                entity_type: EntityType::School,
                ..
            }
        ));
        assert_eq!(svc.get_term(&t.id).await.unwrap().school_id, None);
    }

    #[tokio::test]
    async fn courses_of_school_goes_through_terms() {
        let svc = test_service().await;
        let elkins = school(&svc, "Elkins").await;
        let other = school(&svc, "Other").await;
        let first = term(&svc, Some(&elkins.id), "First Term").await;
        let second = term(&svc, Some(&elkins.id), "Second Term").await;
        let elsewhere = term(&svc, Some(&other.id), "Elsewhere").await;
        course(&svc, Some(&first.id), "Math101", "REG123").await;
        course(&svc, Some(&second.id), "Art101", "ART101").await;
        course(&svc, Some(&elsewhere.id), "Bio101", "BIO101").await;

        let names: Vec<_> = svc
            .courses_of_school(&elkins.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Art101", "Math101"]);
        assert_eq!(svc.terms_of_school(&elkins.id).await.unwrap().len(), 2);
    }
}
