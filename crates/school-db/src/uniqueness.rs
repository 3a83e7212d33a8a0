//! Scoped uniqueness checks.
//!
//! Entities declare [`UniqueKey`]s in school-core; this module answers them
//! against the store. A key collides when another row of the same entity has
//! the same value in the same scope partition. Rows whose scope column is NULL
//! form their own partition. Comparison is exact and case-sensitive.

use school_core::validation::{Rule, UniqueKey, UniqueRule, ValidationErrors};

use crate::error::DatabaseError;
use crate::store::{self, Query};

/// Whether a row other than `exclude_id` already holds `value` within
/// `scope_value`'s partition of `rule`.
///
/// # Errors
///
/// Returns `DatabaseError` if the lookup query fails.
pub async fn is_taken(
    conn: &libsql::Connection,
    rule: &UniqueRule,
    value: &str,
    scope_value: Option<&str>,
    exclude_id: Option<&str>,
) -> Result<bool, DatabaseError> {
    let mut query = Query::new().eq(rule.field, value);
    if let Some(scope) = rule.scope {
        query = query.eq_or_null(scope, scope_value);
    }
    if let Some(id) = exclude_id {
        query = query.not_eq("id", id);
    }
    store::exists(conn, rule.entity, &query).await
}

/// Check every key and return a `taken` failure for each collision.
///
/// Keys whose field already failed in `field_errors` are skipped.
///
/// # Errors
///
/// Returns `DatabaseError` if a lookup query fails.
pub async fn check_keys(
    conn: &libsql::Connection,
    keys: &[UniqueKey<'_>],
    exclude_id: Option<&str>,
    field_errors: &ValidationErrors,
) -> Result<ValidationErrors, DatabaseError> {
    let mut taken = ValidationErrors::new(field_errors.entity());
    for key in keys {
        if field_errors.has_field(key.rule.field) {
            continue;
        }
        if is_taken(conn, key.rule, key.value, key.scope_value, exclude_id).await? {
            taken.push(key.rule.field, Rule::Taken);
        }
    }
    Ok(taken)
}
