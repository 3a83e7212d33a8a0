//! Generic record store over libSQL.
//!
//! Every persisted entity implements [`Record`]: a table, a column list with
//! `id` first, and conversions to and from a row. The free functions here are
//! the only place that builds SQL for entity tables. They take a bare
//! connection so they run the same inside or outside
//! [`SchoolDb::run_in_transaction`](crate::SchoolDb::run_in_transaction).
//!
//! Column names always come from `&'static str` constants, never from callers'
//! data. Values are bound as positional parameters.

use chrono::{DateTime, Utc};
use libsql::Value;

use school_core::enums::EntityType;

use crate::error::DatabaseError;
use crate::helpers::entity_type_to_table;

/// A typed row of one entity table.
pub trait Record: Sized {
    const ENTITY: EntityType;

    /// Column names in storage order. The first column is always `id`.
    const COLUMNS: &'static [&'static str];

    /// Build the record from a row selected with [`Self::COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a column is missing or cannot be parsed.
    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError>;

    /// One value per entry in [`Self::COLUMNS`], in the same order.
    fn values(&self) -> Vec<Value>;

    fn id(&self) -> &str;

    /// Set `updated_at`.
    fn touch(&mut self, at: DateTime<Utc>);

    /// Records this one points at. Each must exist before the record is written.
    fn references(&self) -> Vec<(EntityType, &str)> {
        Vec::new()
    }

    /// Point the reference column `column` at `parent_id`.
    ///
    /// Returns `false` when the record has no such column.
    fn set_reference(&mut self, _column: &str, _parent_id: &str) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Filter {
    Eq(&'static str, Value),
    NotEq(&'static str, Value),
    IsNull(&'static str),
}

/// A conjunction of column predicates plus ordering and an optional limit.
///
/// ```ignore
/// let q = Query::new().eq("term_id", term_id).order_by("name");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order_by: Vec<&'static str>,
    limit: Option<u32>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column, value.into()));
        self
    }

    #[must_use]
    pub fn not_eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::NotEq(column, value.into()));
        self
    }

    #[must_use]
    pub fn is_null(mut self, column: &'static str) -> Self {
        self.filters.push(Filter::IsNull(column));
        self
    }

    /// `column = value`, or `column IS NULL` when `value` is `None`.
    #[must_use]
    pub fn eq_or_null(self, column: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.eq(column, value),
            None => self.is_null(column),
        }
    }

    /// Ascending sort key. Later calls break ties of earlier ones.
    #[must_use]
    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order_by.push(column);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the WHERE clause, appending its parameters to `params`.
    fn where_clause(&self, params: &mut Vec<Value>) -> String {
        let mut conditions = Vec::new();
        for filter in &self.filters {
            match filter {
                Filter::Eq(column, value) => {
                    params.push(value.clone());
                    conditions.push(format!("{column} = ?{}", params.len()));
                }
                Filter::NotEq(column, value) => {
                    params.push(value.clone());
                    conditions.push(format!("{column} != ?{}", params.len()));
                }
                Filter::IsNull(column) => conditions.push(format!("{column} IS NULL")),
            }
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    fn tail(&self) -> String {
        let mut tail = String::new();
        if !self.order_by.is_empty() {
            tail.push_str(" ORDER BY ");
            tail.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            tail.push_str(&format!(" LIMIT {limit}"));
        }
        tail
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// `T`'s columns as a comma-separated SELECT list.
#[must_use]
pub fn column_list<T: Record>() -> String {
    T::COLUMNS.join(", ")
}

/// Run a SELECT that yields `T`'s columns and collect the rows.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or a row cannot be parsed.
pub async fn query_records<T: Record>(
    conn: &libsql::Connection,
    sql: &str,
    params: Vec<Value>,
) -> Result<Vec<T>, DatabaseError> {
    let mut rows = conn.query(sql, libsql::params_from_iter(params)).await?;
    let mut records = Vec::new();
    while let Some(row) = rows.next().await? {
        records.push(T::from_row(&row)?);
    }
    Ok(records)
}

/// Fetch one record by id.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no row has this id.
pub async fn find<T: Record>(conn: &libsql::Connection, id: &str) -> Result<T, DatabaseError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        column_list::<T>(),
        entity_type_to_table(T::ENTITY)
    );
    let mut rows = conn.query(&sql, [id]).await?;
    let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: T::ENTITY,
        id: id.to_string(),
    })?;
    T::from_row(&row)
}

/// Fetch every record matching `query`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or a row cannot be parsed.
pub async fn find_all<T: Record>(
    conn: &libsql::Connection,
    query: &Query,
) -> Result<Vec<T>, DatabaseError> {
    let mut params = Vec::new();
    let where_clause = query.where_clause(&mut params);
    let sql = format!(
        "SELECT {} FROM {}{where_clause}{}",
        column_list::<T>(),
        entity_type_to_table(T::ENTITY),
        query.tail()
    );
    query_records(conn, &sql, params).await
}

/// Non-NULL values of one column across the rows matching `query`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn select_column(
    conn: &libsql::Connection,
    entity: EntityType,
    column: &'static str,
    query: &Query,
) -> Result<Vec<String>, DatabaseError> {
    let mut params = Vec::new();
    let where_clause = query.where_clause(&mut params);
    let sql = format!(
        "SELECT {column} FROM {}{where_clause}{}",
        entity_type_to_table(entity),
        query.tail()
    );
    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    let mut values = Vec::new();
    while let Some(row) = rows.next().await? {
        if let Some(value) = row.get::<Option<String>>(0)? {
            values.push(value);
        }
    }
    Ok(values)
}

/// Whether any row matches `query`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn exists(
    conn: &libsql::Connection,
    entity: EntityType,
    query: &Query,
) -> Result<bool, DatabaseError> {
    let mut params = Vec::new();
    let where_clause = query.where_clause(&mut params);
    let sql = format!(
        "SELECT 1 FROM {}{where_clause} LIMIT 1",
        entity_type_to_table(entity)
    );
    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    Ok(rows.next().await?.is_some())
}

/// Fail with `NotFound` unless a row with this id exists.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the row is missing.
pub async fn ensure_exists(
    conn: &libsql::Connection,
    entity: EntityType,
    id: &str,
) -> Result<(), DatabaseError> {
    if exists(conn, entity, &Query::new().eq("id", id)).await? {
        Ok(())
    } else {
        Err(DatabaseError::NotFound {
            entity_type: entity,
            id: id.to_string(),
        })
    }
}

/// Number of rows matching `query`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn count(
    conn: &libsql::Connection,
    entity: EntityType,
    query: &Query,
) -> Result<u64, DatabaseError> {
    let mut params = Vec::new();
    let where_clause = query.where_clause(&mut params);
    let sql = format!(
        "SELECT COUNT(*) FROM {}{where_clause}",
        entity_type_to_table(entity)
    );
    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let n = row.get::<i64>(0)?;
    u64::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("negative count {n}")))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert a new row for `record`.
///
/// # Errors
///
/// Returns `DatabaseError` if the INSERT fails.
pub async fn insert<T: Record>(conn: &libsql::Connection, record: &T) -> Result<(), DatabaseError> {
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        entity_type_to_table(T::ENTITY),
        column_list::<T>(),
        placeholders.join(", ")
    );
    conn.execute(&sql, libsql::params_from_iter(record.values()))
        .await?;
    Ok(())
}

/// Overwrite every non-id column of the row with `record`'s id.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no row has this id.
pub async fn update<T: Record>(conn: &libsql::Connection, record: &T) -> Result<(), DatabaseError> {
    let sets: Vec<String> = T::COLUMNS
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, column)| format!("{column} = ?{}", i + 1))
        .collect();
    // `id` is the first value; the WHERE clause reuses its slot.
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?1",
        entity_type_to_table(T::ENTITY),
        sets.join(", ")
    );
    let changed = conn
        .execute(&sql, libsql::params_from_iter(record.values()))
        .await?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: T::ENTITY,
            id: record.id().to_string(),
        });
    }
    Ok(())
}

/// Delete one row by id.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no row has this id.
pub async fn delete(
    conn: &libsql::Connection,
    entity: EntityType,
    id: &str,
) -> Result<(), DatabaseError> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", entity_type_to_table(entity));
    let changed = conn.execute(&sql, [id]).await?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: entity,
            id: id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use school_core::entities::School;

    use crate::SchoolDb;

    async fn test_db() -> SchoolDb {
        SchoolDb::open_local(":memory:").await.unwrap()
    }

    fn school(id: &str, name: &str) -> School {
        let now = Utc::now();
        School {
            id: id.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn where_clause_numbers_parameters_in_order() {
        let query = Query::new()
            .eq("term_id", "trm-1")
            .is_null("school_id")
            .not_eq("id", "crs-1")
            .order_by("name")
            .limit(5);
        let mut params = Vec::new();
        let clause = query.where_clause(&mut params);
        assert_eq!(
            clause,
            " WHERE term_id = ?1 AND school_id IS NULL AND id != ?2"
        );
        assert_eq!(params.len(), 2);
        assert_eq!(query.tail(), " ORDER BY name LIMIT 5");
    }

    #[test]
    fn empty_query_renders_nothing() {
        let mut params = Vec::new();
        assert_eq!(Query::new().where_clause(&mut params), "");
        assert_eq!(Query::new().tail(), "");
    }

    #[tokio::test]
    async fn insert_find_update_delete() {
        let db = test_db().await;
        let conn = db.conn();

        let mut record = school("sch-00000001", "Elkins");
        insert(conn, &record).await.unwrap();
        let fetched: School = find(conn, "sch-00000001").await.unwrap();
        assert_eq!(fetched.name, "Elkins");

        record.name = "Elkins High".into();
        update(conn, &record).await.unwrap();
        let fetched: School = find(conn, "sch-00000001").await.unwrap();
        assert_eq!(fetched.name, "Elkins High");

        delete(conn, EntityType::School, "sch-00000001").await.unwrap();
        let missing = find::<School>(conn, "sch-00000001").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let db = test_db().await;
        let conn = db.conn();

        let result = update(conn, &school("sch-missing0", "Ghost")).await;
        assert!(matches!(
            result,
            Err(DatabaseError::NotFound { entity_type: EntityType::School, .. })
        ));
        let result = delete(conn, EntityType::School, "sch-missing0").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        let result = ensure_exists(conn, EntityType::School, "sch-missing0").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn find_all_orders_and_counts() {
        let db = test_db().await;
        let conn = db.conn();
        for (id, name) in [("sch-3", "Zion"), ("sch-1", "Adams"), ("sch-2", "Madison")] {
            insert(conn, &school(id, name)).await.unwrap();
        }

        let all: Vec<School> = find_all(conn, &Query::new().order_by("name"))
            .await
            .unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Adams", "Madison", "Zion"]);

        assert_eq!(count(conn, EntityType::School, &Query::new()).await.unwrap(), 3);
        let ids = select_column(
            conn,
            EntityType::School,
            "id",
            &Query::new().not_eq("name", "Zion").order_by("id"),
        )
        .await
        .unwrap();
        assert_eq!(ids, vec!["sch-1", "sch-2"]);
    }
}
