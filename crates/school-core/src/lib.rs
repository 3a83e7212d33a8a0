//! # school-core
//!
//! Core types and pure rules for the school curriculum store.
//!
//! This crate provides the foundational types shared by the storage crate:
//! - Entity structs for every curriculum record (schools, terms, courses, ...)
//! - `EntityType` and the ID prefix constants
//! - The association graph: cardinality, ownership and delete policy per relationship
//! - Field validators and the `Validate` trait each entity implements
//! - Uniqueness rule declarations consumed by the storage-side checker
//! - Cross-cutting error types

pub mod associations;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod validation;
