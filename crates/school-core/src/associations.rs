//! The association graph.
//!
//! One [`Association`] per ordered (parent, child) pair. Each declares how the
//! pair is stored, whether the parent owns the child, and what a delete of the
//! parent does to the children. The storage crate walks this table to answer
//! `children_of` / `parent_of` and to drive the deletion policy engine; nothing
//! else hard-codes relationships.
//!
//! ```text
//! School ─1:N cascade─▶ Term ─1:N restrict─▶ Course
//! Course ─1:N cascade──▶ Lesson ─1:N cascade─▶ Reading
//! Course ─1:N cascade──▶ Assignment
//! Course ─1:N restrict─▶ CourseStudent
//! Course ─1:N ─────────▶ CourseInstructor   (unconstrained)
//! Lesson ─N:M ─────────▶ Assignment         (unconstrained join rows)
//! User   ─1:N ─────────▶ CourseStudent / CourseInstructor (unconstrained)
//! ```

use crate::enums::{Cardinality, EntityType, OnDelete};

/// Where the parent/child pairing is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The child table carries `column` pointing at the parent id.
    ForeignKey { column: &'static str },
    /// A join table holds one row per (parent, child) pair.
    JoinTable {
        table: &'static str,
        parent_column: &'static str,
        child_column: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    /// Stable name used in error messages, e.g. `"term_courses"`.
    pub name: &'static str,
    pub parent: EntityType,
    pub child: EntityType,
    pub cardinality: Cardinality,
    pub link: Link,
    /// The parent owns the child (answers `parent_of`).
    pub owning: bool,
    /// The child cannot exist without a parent reference.
    pub required: bool,
    pub on_delete: OnDelete,
}

pub const ASSOCIATIONS: &[Association] = &[
    Association {
        name: "school_terms",
        parent: EntityType::School,
        child: EntityType::Term,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey {
            column: "school_id",
        },
        owning: true,
        required: false,
        on_delete: OnDelete::Cascade,
    },
    Association {
        name: "term_courses",
        parent: EntityType::Term,
        child: EntityType::Course,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey { column: "term_id" },
        owning: true,
        required: false,
        on_delete: OnDelete::Restrict,
    },
    Association {
        name: "course_students",
        parent: EntityType::Course,
        child: EntityType::CourseStudent,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey {
            column: "course_id",
        },
        owning: true,
        required: true,
        on_delete: OnDelete::Restrict,
    },
    Association {
        name: "course_assignments",
        parent: EntityType::Course,
        child: EntityType::Assignment,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey {
            column: "course_id",
        },
        owning: true,
        required: false,
        on_delete: OnDelete::Cascade,
    },
    Association {
        name: "course_lessons",
        parent: EntityType::Course,
        child: EntityType::Lesson,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey {
            column: "course_id",
        },
        owning: true,
        required: false,
        on_delete: OnDelete::Cascade,
    },
    Association {
        name: "course_instructors",
        parent: EntityType::Course,
        child: EntityType::CourseInstructor,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey {
            column: "course_id",
        },
        owning: true,
        required: true,
        on_delete: OnDelete::Unconstrained,
    },
    Association {
        name: "lesson_readings",
        parent: EntityType::Lesson,
        child: EntityType::Reading,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey {
            column: "lesson_id",
        },
        owning: true,
        required: true,
        on_delete: OnDelete::Cascade,
    },
    Association {
        name: "lesson_assignments",
        parent: EntityType::Lesson,
        child: EntityType::Assignment,
        cardinality: Cardinality::ManyToMany,
        link: Link::JoinTable {
            table: "lesson_assignments",
            parent_column: "lesson_id",
            child_column: "assignment_id",
        },
        owning: false,
        required: false,
        on_delete: OnDelete::Unconstrained,
    },
    Association {
        name: "user_enrollments",
        parent: EntityType::User,
        child: EntityType::CourseStudent,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey { column: "user_id" },
        owning: false,
        required: false,
        on_delete: OnDelete::Unconstrained,
    },
    Association {
        name: "user_teaching_assignments",
        parent: EntityType::User,
        child: EntityType::CourseInstructor,
        cardinality: Cardinality::OneToMany,
        link: Link::ForeignKey { column: "user_id" },
        owning: false,
        required: false,
        on_delete: OnDelete::Unconstrained,
    },
];

/// The association between `parent` and `child`, if one is declared.
#[must_use]
pub fn between(parent: EntityType, child: EntityType) -> Option<&'static Association> {
    ASSOCIATIONS
        .iter()
        .find(|a| a.parent == parent && a.child == child)
}

/// Every association in which `parent` is the parent side.
pub fn dependents_of(parent: EntityType) -> impl Iterator<Item = &'static Association> {
    ASSOCIATIONS.iter().filter(move |a| a.parent == parent)
}

/// The one-to-many association through which `child` is owned, if any.
#[must_use]
pub fn owner_of(child: EntityType) -> Option<&'static Association> {
    ASSOCIATIONS.iter().find(|a| {
        a.child == child && a.owning && a.cardinality == Cardinality::OneToMany
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_pairs_are_unique() {
        let mut names = HashSet::new();
        let mut pairs = HashSet::new();
        for a in ASSOCIATIONS {
            assert!(names.insert(a.name), "duplicate association name {}", a.name);
            assert!(
                pairs.insert((a.parent, a.child)),
                "duplicate pair {} -> {}",
                a.parent,
                a.child
            );
        }
    }

    #[test]
    fn every_child_has_at_most_one_owner() {
        for entity in EntityType::ALL {
            let owners = ASSOCIATIONS
                .iter()
                .filter(|a| a.child == *entity && a.owning)
                .count();
            assert!(owners <= 1, "{entity} has {owners} owners");
        }
    }

    #[test]
    fn join_tables_are_many_to_many() {
        for a in ASSOCIATIONS {
            let is_join = matches!(a.link, Link::JoinTable { .. });
            assert_eq!(is_join, a.cardinality == Cardinality::ManyToMany, "{}", a.name);
        }
    }

    #[test]
    fn delete_policies_match_the_curriculum_rules() {
        let policy = |p, c| between(p, c).map(|a| a.on_delete);
        assert_eq!(policy(EntityType::School, EntityType::Term), Some(OnDelete::Cascade));
        assert_eq!(policy(EntityType::Term, EntityType::Course), Some(OnDelete::Restrict));
        assert_eq!(
            policy(EntityType::Course, EntityType::CourseStudent),
            Some(OnDelete::Restrict)
        );
        assert_eq!(
            policy(EntityType::Course, EntityType::Assignment),
            Some(OnDelete::Cascade)
        );
        assert_eq!(policy(EntityType::Course, EntityType::Lesson), Some(OnDelete::Cascade));
        assert_eq!(policy(EntityType::Lesson, EntityType::Reading), Some(OnDelete::Cascade));
        assert_eq!(
            policy(EntityType::Course, EntityType::CourseInstructor),
            Some(OnDelete::Unconstrained)
        );
        assert_eq!(
            policy(EntityType::Lesson, EntityType::Assignment),
            Some(OnDelete::Unconstrained)
        );
    }

    #[test]
    fn owner_lookup() {
        assert_eq!(owner_of(EntityType::Reading).map(|a| a.parent), Some(EntityType::Lesson));
        assert_eq!(
            owner_of(EntityType::CourseStudent).map(|a| a.parent),
            Some(EntityType::Course)
        );
        assert_eq!(
            owner_of(EntityType::Assignment).map(|a| a.parent),
            Some(EntityType::Course)
        );
        assert!(owner_of(EntityType::School).is_none());
        assert!(owner_of(EntityType::User).is_none());
    }

    #[test]
    fn dependents_of_course() {
        let children: Vec<_> = dependents_of(EntityType::Course).map(|a| a.child).collect();
        assert_eq!(children.len(), 4);
        assert!(children.contains(&EntityType::Lesson));
        assert!(children.contains(&EntityType::Assignment));
    }
}
