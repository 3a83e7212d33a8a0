use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::EntityType;
use crate::errors::CoreError;
use crate::validation::{Rule, Validate, ValidationErrors, rules};

/// A reading attached to a lesson, shown in `order_number` order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reading {
    pub id: String,
    pub caption: Option<String>,
    pub order_number: i64,
    pub lesson_id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable representation of a reading.
///
/// `order_number` and `lesson_id` arrive as text, the way a form submits them.
/// An empty string is absent even though the stored column is numeric.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingForm {
    pub caption: Option<String>,
    pub order_number: String,
    pub lesson_id: String,
    pub url: String,
}

impl ReadingForm {
    /// Parse the form into a typed reading with the given identity and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` carrying every failing field if the form
    /// does not validate.
    pub fn into_reading(
        self,
        id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Reading, CoreError> {
        self.validate().into_result()?;
        let order_number = rules::parse_integer(&self.order_number).ok_or_else(|| {
            let mut errors = ValidationErrors::new(EntityType::Reading);
            errors.push("order_number", Rule::NotANumber);
            CoreError::Validation(errors)
        })?;
        Ok(Reading {
            id,
            caption: self.caption.filter(|c| !c.is_empty()),
            order_number,
            lesson_id: self.lesson_id,
            url: self.url,
            created_at,
            updated_at,
        })
    }
}

impl From<&Reading> for ReadingForm {
    fn from(reading: &Reading) -> Self {
        Self {
            caption: reading.caption.clone(),
            order_number: reading.order_number.to_string(),
            lesson_id: reading.lesson_id.clone(),
            url: reading.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(order_number: &str, lesson_id: &str) -> ReadingForm {
        ReadingForm {
            caption: Some(String::new()),
            order_number: order_number.into(),
            lesson_id: lesson_id.into(),
            url: "https://example.com/chapter-1".into(),
        }
    }

    #[test]
    fn into_reading_parses_order_number() {
        let now = Utc::now();
        let reading = form(" 3 ", "lsn-00000001")
            .into_reading("rdg-00000001".into(), now, now)
            .unwrap();
        assert_eq!(reading.order_number, 3);
        assert_eq!(reading.lesson_id, "lsn-00000001");
        assert!(reading.caption.is_none(), "empty caption is stored as NULL");
    }

    #[test]
    fn into_reading_rejects_blank_numeric_fields() {
        let now = Utc::now();
        let err = form("", "")
            .into_reading("rdg-00000001".into(), now, now)
            .unwrap_err();
        let CoreError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.has("order_number", Rule::Blank));
        assert!(errors.has("lesson_id", Rule::Blank));
    }

    #[test]
    fn form_roundtrips_from_reading() {
        let now = Utc::now();
        let reading = form("7", "lsn-00000002")
            .into_reading("rdg-00000002".into(), now, now)
            .unwrap();
        let back = ReadingForm::from(&reading);
        assert_eq!(back.order_number, "7");
        assert_eq!(back.lesson_id, "lsn-00000002");
    }
}
