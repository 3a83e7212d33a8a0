//! Field validation for curriculum records.
//!
//! Each entity implements [`Validate`]: a fixed-order list of field rules whose
//! failures are collected into one [`ValidationErrors`] value instead of
//! stopping at the first failure. Uniqueness needs the store, so entities only
//! *declare* their unique keys here; `school-db` runs the queries and merges
//! the result into the same error value.

mod entities;
pub mod rules;

use serde::Serialize;
use std::fmt;

use crate::enums::EntityType;

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// The rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Required value is missing or empty.
    Blank,
    /// Value does not match the field's declared shape.
    Invalid,
    /// Numeric field supplied as text that is not an integer.
    NotANumber,
    /// Numeric value outside its allowed range.
    OutOfRange,
    /// Another record already holds this value in the same scope.
    Taken,
    /// End date precedes the start date.
    BeforeStart,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Invalid => "invalid",
            Self::NotANumber => "not_a_number",
            Self::OutOfRange => "out_of_range",
            Self::Taken => "taken",
            Self::BeforeStart => "before_start",
        }
    }

    /// Human-readable message fragment, e.g. `"can't be blank"`.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Blank => "can't be blank",
            Self::Invalid => "is invalid",
            Self::NotANumber => "is not a number",
            Self::OutOfRange => "is out of range",
            Self::Taken => "has already been taken",
            Self::BeforeStart => "must not be before the start date",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ValidationErrors
// ---------------------------------------------------------------------------

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: Rule,
}

/// Every field failure for one candidate record, in rule evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    entity: EntityType,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new(entity: EntityType) -> Self {
        Self {
            entity,
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, field: &'static str, rule: Rule) {
        self.errors.push(FieldError { field, rule });
    }

    /// Append all failures from `other`, keeping their order.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    #[must_use]
    pub const fn entity(&self) -> EntityType {
        self.entity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether `field` failed any rule.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Whether `field` failed exactly `rule`.
    #[must_use]
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.errors.iter().any(|e| e.field == field && e.rule == rule)
    }

    /// Distinct failing field names, in first-failure order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field) {
                fields.push(error.field);
            }
        }
        fields
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.entity)?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", error.field, error.rule.message())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------------------------------------------------------
// Uniqueness declarations
// ---------------------------------------------------------------------------

/// A uniqueness constraint on one column, optionally partitioned by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueRule {
    pub entity: EntityType,
    pub field: &'static str,
    /// Partition column. `None` means the value is unique across the whole table.
    pub scope: Option<&'static str>,
}

pub static USER_EMAIL: UniqueRule = UniqueRule {
    entity: EntityType::User,
    field: "email",
    scope: None,
};

pub static COURSE_CODE_PER_TERM: UniqueRule = UniqueRule {
    entity: EntityType::Course,
    field: "course_code",
    scope: Some("term_id"),
};

pub static ASSIGNMENT_NAME_PER_COURSE: UniqueRule = UniqueRule {
    entity: EntityType::Assignment,
    field: "name",
    scope: Some("course_id"),
};

/// A candidate value to check against a [`UniqueRule`].
///
/// `scope_value` is the candidate's partition key; `None` is its own partition
/// (records whose scope column is NULL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueKey<'a> {
    pub rule: &'static UniqueRule,
    pub value: &'a str,
    pub scope_value: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

/// Declarative, store-independent validation for a candidate record.
pub trait Validate {
    /// Run every field rule in a fixed order and collect all failures.
    fn validate(&self) -> ValidationErrors;

    /// Values that must be unique within their scope. Empty by default.
    fn unique_keys(&self) -> Vec<UniqueKey<'_>> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_every_failure_in_order() {
        let mut errors = ValidationErrors::new(EntityType::Course);
        errors.push("name", Rule::Blank);
        errors.push("course_code", Rule::Invalid);
        errors.push("name", Rule::Taken);

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.fields(), vec!["name", "course_code"]);
        assert!(errors.has("course_code", Rule::Invalid));
        assert!(!errors.has("course_code", Rule::Blank));
    }

    #[test]
    fn display_lists_fields_with_messages() {
        let mut errors = ValidationErrors::new(EntityType::User);
        errors.push("email", Rule::Taken);
        errors.push("photo_url", Rule::Invalid);
        assert_eq!(
            errors.to_string(),
            "user: email has already been taken, photo_url is invalid"
        );
    }

    #[test]
    fn into_result_ok_when_empty() {
        assert!(ValidationErrors::new(EntityType::School).into_result().is_ok());
    }

    #[test]
    fn merge_appends() {
        let mut a = ValidationErrors::new(EntityType::Assignment);
        a.push("name", Rule::Blank);
        let mut b = ValidationErrors::new(EntityType::Assignment);
        b.push("percent_of_grade", Rule::OutOfRange);
        a.merge(b);
        assert_eq!(a.fields(), vec!["name", "percent_of_grade"]);
    }

    #[test]
    fn serializes_as_field_rule_pairs() {
        let mut errors = ValidationErrors::new(EntityType::Course);
        errors.push("name", Rule::Blank);
        errors.push("course_code", Rule::Taken);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entity": "course",
                "errors": [
                    { "field": "name", "rule": "blank" },
                    { "field": "course_code", "rule": "taken" },
                ],
            })
        );
    }
}
