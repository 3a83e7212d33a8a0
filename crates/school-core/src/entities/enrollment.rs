use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student seat in a course. Courses refuse deletion while seats exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseStudent {
    pub id: String,
    pub course_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An instructor assignment on a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseInstructor {
    pub id: String,
    pub course_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row pairing a lesson with an assignment (many-to-many).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonAssignment {
    pub lesson_id: String,
    pub assignment_id: String,
    pub created_at: DateTime<Utc>,
}
