//! ID prefix constants.
//!
//! Every stored record gets an identifier of the form `<prefix>-<8 hex chars>`,
//! e.g. `crs-a3f8b2c1`. The random part is generated by the database.

use crate::enums::EntityType;

pub const PREFIX_SCHOOL: &str = "sch";
pub const PREFIX_TERM: &str = "trm";
pub const PREFIX_COURSE: &str = "crs";
pub const PREFIX_LESSON: &str = "lsn";
pub const PREFIX_READING: &str = "rdg";
pub const PREFIX_ASSIGNMENT: &str = "asg";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_COURSE_STUDENT: &str = "cst";
pub const PREFIX_COURSE_INSTRUCTOR: &str = "cin";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_SCHOOL,
    PREFIX_TERM,
    PREFIX_COURSE,
    PREFIX_LESSON,
    PREFIX_READING,
    PREFIX_ASSIGNMENT,
    PREFIX_USER,
    PREFIX_COURSE_STUDENT,
    PREFIX_COURSE_INSTRUCTOR,
];

/// Prefix used for records of the given type.
///
/// Join rows (`LessonAssignment`) are keyed by their endpoints and have no prefix.
#[must_use]
pub const fn prefix_for(entity: EntityType) -> Option<&'static str> {
    match entity {
        EntityType::School => Some(PREFIX_SCHOOL),
        EntityType::Term => Some(PREFIX_TERM),
        EntityType::Course => Some(PREFIX_COURSE),
        EntityType::Lesson => Some(PREFIX_LESSON),
        EntityType::Reading => Some(PREFIX_READING),
        EntityType::Assignment => Some(PREFIX_ASSIGNMENT),
        EntityType::User => Some(PREFIX_USER),
        EntityType::CourseStudent => Some(PREFIX_COURSE_STUDENT),
        EntityType::CourseInstructor => Some(PREFIX_COURSE_INSTRUCTOR),
        EntityType::LessonAssignment => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique_three_letter_codes() {
        let mut seen = std::collections::HashSet::new();
        for prefix in ALL_PREFIXES {
            assert_eq!(prefix.len(), 3, "prefix '{prefix}' should be 3 chars");
            assert!(seen.insert(*prefix), "duplicate prefix '{prefix}'");
        }
    }

    #[test]
    fn every_keyed_entity_has_a_prefix() {
        for entity in EntityType::ALL {
            match entity {
                EntityType::LessonAssignment => assert!(prefix_for(*entity).is_none()),
                _ => assert!(prefix_for(*entity).is_some(), "{entity} has no prefix"),
            }
        }
    }
}
