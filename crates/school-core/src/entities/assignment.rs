use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Graded work. The course link is weak: an assignment may exist without one.
///
/// `name` is unique among the assignments sharing a `course_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub id: String,
    pub name: String,
    pub course_id: Option<String>,
    pub percent_of_grade: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
