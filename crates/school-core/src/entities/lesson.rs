use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A lesson within a course. Owns its readings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lesson {
    pub id: String,
    pub name: String,
    pub course_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
