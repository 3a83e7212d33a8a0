//! Shared test utilities for school-db unit tests.

pub(crate) mod helpers {
    use chrono::NaiveDate;

    use school_core::entities::{Course, Lesson, School, Term};

    use crate::SchoolDb;
    use crate::service::SchoolService;
    use crate::updates::course::NewCourse;
    use crate::updates::lesson::NewLesson;
    use crate::updates::school::NewSchool;
    use crate::updates::term::NewTerm;

    /// Create an in-memory `SchoolService`.
    pub async fn test_service() -> SchoolService {
        school_config::init_test_tracing();
        let db = SchoolDb::open_local(":memory:").await.unwrap();
        SchoolService::from_db(db)
    }

    pub async fn school(svc: &SchoolService, name: &str) -> School {
        svc.create_school(NewSchool { name: name.into() }).await.unwrap()
    }

    pub async fn term(svc: &SchoolService, school_id: Option<&str>, name: &str) -> Term {
        svc.create_term(NewTerm {
            name: name.into(),
            starts_on: NaiveDate::from_ymd_opt(2026, 9, 1),
            ends_on: NaiveDate::from_ymd_opt(2026, 12, 18),
            school_id: school_id.map(String::from),
        })
        .await
        .unwrap()
    }

    pub async fn course(svc: &SchoolService, term_id: Option<&str>, name: &str, code: &str) -> Course {
        svc.create_course(NewCourse {
            name: name.into(),
            course_code: code.into(),
            term_id: term_id.map(String::from),
        })
        .await
        .unwrap()
    }

    pub async fn lesson(svc: &SchoolService, course_id: Option<&str>, name: &str) -> Lesson {
        svc.create_lesson(NewLesson {
            name: name.into(),
            course_id: course_id.map(String::from),
        })
        .await
        .unwrap()
    }
}
