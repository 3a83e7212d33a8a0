use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A course offered in a term.
///
/// `course_code` is three letters followed by three digits and is unique among
/// the courses of the same term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub course_code: String,
    pub term_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
