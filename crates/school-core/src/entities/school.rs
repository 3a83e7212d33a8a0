use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A school. Owns terms; read back in ascending name order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct School {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
