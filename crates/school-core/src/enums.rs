//! Entity types, relationship cardinalities and delete policies.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for the string stored in SQL and shown in error messages.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Every kind of record the curriculum store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    School,
    Term,
    Course,
    Lesson,
    Reading,
    Assignment,
    User,
    CourseStudent,
    CourseInstructor,
    LessonAssignment,
}

impl EntityType {
    pub const ALL: &'static [Self] = &[
        Self::School,
        Self::Term,
        Self::Course,
        Self::Lesson,
        Self::Reading,
        Self::Assignment,
        Self::User,
        Self::CourseStudent,
        Self::CourseInstructor,
        Self::LessonAssignment,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::School => "school",
            Self::Term => "term",
            Self::Course => "course",
            Self::Lesson => "lesson",
            Self::Reading => "reading",
            Self::Assignment => "assignment",
            Self::User => "user",
            Self::CourseStudent => "course_student",
            Self::CourseInstructor => "course_instructor",
            Self::LessonAssignment => "lesson_assignment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Cardinality
// ---------------------------------------------------------------------------

/// How many children a parent may have, and whether children may have many parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Child rows carry a foreign key to exactly one parent.
    OneToMany,
    /// Parents and children are paired through a join table.
    ManyToMany,
}

impl Cardinality {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneToMany => "one_to_many",
            Self::ManyToMany => "many_to_many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OnDelete
// ---------------------------------------------------------------------------

/// What happens to dependents when their parent is deleted.
///
/// ```text
/// cascade       → dependents are deleted in the same transaction
/// restrict      → the delete fails while any dependent exists
/// unconstrained → dependents are left untouched (join rows may be orphaned)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    Cascade,
    Restrict,
    Unconstrained,
}

impl OnDelete {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
            Self::Unconstrained => "unconstrained",
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
