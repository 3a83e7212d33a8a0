//! Whole-graph properties of the association table.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use rstest::rstest;

use school_core::associations::{ASSOCIATIONS, dependents_of, owner_of};
use school_core::enums::{EntityType, OnDelete};

fn cascade_reach(from: EntityType, path: &mut Vec<EntityType>, seen: &mut HashSet<EntityType>) {
    for assoc in dependents_of(from).filter(|a| a.on_delete == OnDelete::Cascade) {
        assert!(
            !path.contains(&assoc.child),
            "cascade cycle through {path:?} -> {}",
            assoc.child
        );
        seen.insert(assoc.child);
        path.push(assoc.child);
        cascade_reach(assoc.child, path, seen);
        path.pop();
    }
}

#[test]
fn cascades_form_a_tree() {
    for entity in EntityType::ALL {
        let mut seen = HashSet::new();
        cascade_reach(*entity, &mut vec![*entity], &mut seen);
    }
}

#[test]
fn school_delete_reaches_the_whole_curriculum() {
    let mut seen = HashSet::new();
    cascade_reach(EntityType::School, &mut vec![EntityType::School], &mut seen);
    assert!(seen.contains(&EntityType::Term));
    // Terms restrict on courses, so the cascade stops there.
    assert!(!seen.contains(&EntityType::Course));
}

#[rstest]
#[case(EntityType::Term, Some(EntityType::School))]
#[case(EntityType::Course, Some(EntityType::Term))]
#[case(EntityType::Lesson, Some(EntityType::Course))]
#[case(EntityType::Assignment, Some(EntityType::Course))]
#[case(EntityType::CourseInstructor, Some(EntityType::Course))]
#[case(EntityType::School, None)]
#[case(EntityType::User, None)]
fn owners(#[case] child: EntityType, #[case] parent: Option<EntityType>) {
    assert_eq!(owner_of(child).map(|a| a.parent), parent);
}

#[test]
fn every_restrict_guards_an_owned_child() {
    for assoc in ASSOCIATIONS.iter().filter(|a| a.on_delete == OnDelete::Restrict) {
        assert!(assoc.owning, "{} restricts a child it does not own", assoc.name);
    }
}
