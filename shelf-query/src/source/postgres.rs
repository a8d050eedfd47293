//! PostgreSQL record source
//!
//! Renders a [`QueryPlan`] into SQL with `sqlx::QueryBuilder`. Column names come
//! from the field registry and are double-quoted; every caller-supplied value is
//! a bound parameter. Containment filters escape `%`, `_` and `\` so the query
//! text is always matched literally.
//!
//! Values are compared through their text form. Float columns are cast to
//! `float8` first, so a `numeric(10,2)` price of `12.50` still matches `12.5`.
//! Ordering follows [`FieldValue::total_cmp`](crate::fields::FieldValue::total_cmp):
//! nulls first when ascending, last when descending, and text in byte order
//! (`COLLATE "C"`).

use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{RecordSource, SourceError, SourceOperation, SourceResult};
use crate::fields::{Column, FieldKind, MatchStrategy};
use crate::query::{DupeProbe, QueryPlan, SortDirection};

/// One table (or view) of `T` rows
///
/// # Example
///
/// ```rust,ignore
/// use shelf_query::catalog::Book;
/// use shelf_query::source::PgSource;
///
/// let pool = sqlx::PgPool::connect(&url).await?;
/// let books = PgSource::<Book>::new(pool, "book_listing");
/// let page = shelf_query::create_result(&books, &request).await?;
/// ```
pub struct PgSource<T> {
    pool: PgPool,
    table: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> PgSource<T> {
    /// Source over `table` using `pool`
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            _record: PhantomData,
        }
    }

    /// Table or view name
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl<T> Clone for PgSource<T> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone(), self.table.clone())
    }
}

impl<T> std::fmt::Debug for PgSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSource")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl<T> RecordSource<T> for PgSource<T>
where
    T: for<'row> FromRow<'row, PgRow> + Send + Sync + Unpin,
{
    async fn count(&self, plan: &QueryPlan<'_, T>) -> SourceResult<u64> {
        let mut builder = count_query(&self.table, plan);
        tracing::trace!(sql = builder.sql(), "count");
        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SourceError::from(e).with_operation(SourceOperation::Count))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn fetch(&self, plan: &QueryPlan<'_, T>) -> SourceResult<Vec<T>> {
        let mut builder = fetch_query(&self.table, plan);
        tracing::trace!(sql = builder.sql(), "fetch");
        builder
            .build_query_as::<T>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SourceError::from(e).with_operation(SourceOperation::Fetch))
    }

    async fn exists(&self, probe: &DupeProbe<'_, T>) -> SourceResult<bool> {
        let mut builder = exists_query(&self.table, probe);
        tracing::trace!(sql = builder.sql(), "exists");
        builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SourceError::from(e).with_operation(SourceOperation::Exists))
    }
}

fn count_query<T>(table: &str, plan: &QueryPlan<'_, T>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder.push(quote_ident(table));
    push_filter(&mut builder, plan);
    builder
}

fn fetch_query<T>(table: &str, plan: &QueryPlan<'_, T>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM ");
    builder.push(quote_ident(table));
    push_filter(&mut builder, plan);

    let sort = plan.sort();
    let key = plan.registry().key();
    builder.push(" ORDER BY ");
    builder.push(quote_ident(sort.column().storage_name()));
    if sort.column().kind() == FieldKind::Text {
        builder.push(" COLLATE \"C\"");
    }
    builder.push(" ");
    builder.push(sort.direction().as_sql());
    builder.push(match sort.direction() {
        SortDirection::Ascending => " NULLS FIRST",
        SortDirection::Descending => " NULLS LAST",
    });
    // Key tiebreak keeps equal sort values in a repeatable order
    if sort.column() != key {
        builder.push(", ");
        builder.push(quote_ident(key.storage_name()));
        builder.push(" ASC");
    }

    if let Some(window) = plan.window() {
        builder.push(" LIMIT ");
        builder.push_bind(bind_u64(window.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(bind_u64(window.offset()));
    }
    builder
}

fn exists_query<T>(table: &str, probe: &DupeProbe<'_, T>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT EXISTS(SELECT 1 FROM ");
    builder.push(quote_ident(table));
    builder.push(" WHERE ");
    if probe.conditions().is_empty() {
        builder.push("FALSE)");
        return builder;
    }

    {
        let mut clauses = builder.separated(" AND ");
        for (column, value) in probe.conditions() {
            clauses.push(format!("{} IS NOT DISTINCT FROM ", as_text(*column)));
            clauses.push_bind_unseparated(value.clone());
        }
        if let Some(key) = probe.exclude().and_then(|k| k.render()) {
            clauses.push(format!("{} <> ", as_text(probe.key())));
            clauses.push_bind_unseparated(key);
        }
    }
    builder.push(")");
    builder
}

/// Scope and filter, joined with AND
fn push_filter<T>(builder: &mut QueryBuilder<'static, Postgres>, plan: &QueryPlan<'_, T>) {
    if plan.scope().is_none() && plan.filter().is_none() {
        return;
    }
    builder.push(" WHERE ");

    let mut clauses = builder.separated(" AND ");
    if let Some(scope) = plan.scope() {
        clauses.push(format!("{} IS NOT DISTINCT FROM ", as_text(scope.column())));
        clauses.push_bind_unseparated(scope.value().render());
    }
    if let Some(predicate) = plan.filter() {
        match predicate.strategy() {
            MatchStrategy::Contains => {
                clauses.push(format!("{} ILIKE ", as_text(predicate.column())));
                clauses.push_bind_unseparated(like_contains(predicate.query()));
                clauses.push_unseparated(" ESCAPE '\\'");
            }
            MatchStrategy::Equals => {
                clauses.push(format!("{} = ", as_text(predicate.column())));
                clauses.push_bind_unseparated(predicate.query().to_string());
            }
        }
    }
}

/// Quoted column rendered as text
fn as_text<T>(column: Column<'_, T>) -> String {
    let ident = quote_ident(column.storage_name());
    match column.kind() {
        FieldKind::Float => format!("{ident}::float8::text"),
        _ => format!("{ident}::text"),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn bind_u64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Book, Category};
    use crate::fields::Record;
    use crate::fields::FieldValue;
    use crate::query::{build_filter, build_sort, Scope, Window};

    #[test]
    fn test_like_escape() {
        assert_eq!(like_escape("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(like_contains("tolkien"), "%tolkien%");
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("author_name"), "\"author_name\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_count_sql_uses_filter_only() {
        let registry = Book::registry();
        let plan = QueryPlan::new(registry)
            .with_filter(build_filter(registry, Some("authorName"), Some("Tolkien")).unwrap())
            .with_sort(build_sort(registry, Some("price"), Some("desc")).unwrap())
            .with_window(Window::new(2, 10).unwrap());
        let builder = count_query("books", &plan);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM \"books\" WHERE \"author_name\"::text ILIKE $1 ESCAPE '\\'"
        );
    }

    #[test]
    fn test_fetch_sql_with_everything() {
        let registry = Book::registry();
        let plan = QueryPlan::new(registry)
            .with_filter(build_filter(registry, Some("edition"), Some("2")).unwrap())
            .with_sort(build_sort(registry, Some("price"), Some("desc")).unwrap())
            .with_window(Window::new(2, 10).unwrap());
        let builder = fetch_query("books", &plan);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM \"books\" WHERE \"edition\"::text = $1 \
             ORDER BY \"price\" DESC NULLS LAST, \"id\" ASC LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn test_fetch_sql_default_order() {
        let plan = QueryPlan::new(Category::registry());
        let builder = fetch_query("categories", &plan);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM \"categories\" ORDER BY \"id\" ASC NULLS FIRST"
        );
    }

    #[test]
    fn test_nullable_text_sort_places_nulls_like_memory() {
        let registry = Book::registry();
        let plan = QueryPlan::new(registry)
            .with_sort(build_sort(registry, Some("subtitle"), Some("asc")).unwrap());
        assert_eq!(
            fetch_query("books", &plan).sql(),
            "SELECT * FROM \"books\" ORDER BY \"subtitle\" COLLATE \"C\" ASC NULLS FIRST, \"id\" ASC"
        );

        let plan = QueryPlan::new(registry)
            .with_sort(build_sort(registry, Some("subtitle"), Some("desc")).unwrap());
        assert_eq!(
            fetch_query("books", &plan).sql(),
            "SELECT * FROM \"books\" ORDER BY \"subtitle\" COLLATE \"C\" DESC NULLS LAST, \"id\" ASC"
        );
    }

    #[test]
    fn test_float_filter_casts_to_float8() {
        let registry = Book::registry();
        let plan = QueryPlan::new(registry)
            .with_filter(build_filter(registry, Some("price"), Some("12.5")).unwrap());
        assert_eq!(
            count_query("books", &plan).sql(),
            "SELECT COUNT(*) FROM \"books\" WHERE \"price\"::float8::text = $1"
        );
    }

    #[test]
    fn test_scope_and_filter_share_where() {
        let registry = Book::registry();
        let scope = Scope::new(registry.validate("authorId").unwrap(), 3_i64);
        let plan = QueryPlan::new(registry)
            .with_scope(Some(scope))
            .with_filter(build_filter(registry, Some("title"), Some("ring")).unwrap());
        let expected_where = "WHERE \"author_id\"::text IS NOT DISTINCT FROM $1 \
             AND \"title\"::text ILIKE $2 ESCAPE '\\'";
        assert_eq!(
            count_query("books", &plan).sql(),
            format!("SELECT COUNT(*) FROM \"books\" {expected_where}")
        );
        assert!(fetch_query("books", &plan)
            .sql()
            .starts_with(&format!("SELECT * FROM \"books\" {expected_where} ORDER BY")));

        let plan = QueryPlan::new(registry).with_scope(Some(Scope::new(
            registry.validate("categoryId").unwrap(),
            FieldValue::Integer(1),
        )));
        assert_eq!(
            count_query("books", &plan).sql(),
            "SELECT COUNT(*) FROM \"books\" WHERE \"category_id\"::text IS NOT DISTINCT FROM $1"
        );
    }

    #[test]
    fn test_exists_sql() {
        let registry = Book::registry();
        let column = registry.validate_dupe_field("isbn13").unwrap();

        let probe = DupeProbe::new(registry, column, "9780261103573", None);
        assert_eq!(
            exists_query("books", &probe).sql(),
            "SELECT EXISTS(SELECT 1 FROM \"books\" WHERE \"isbn13\"::text IS NOT DISTINCT FROM $1)"
        );

        let probe = DupeProbe::new(registry, column, "9780261103573", Some(4_i64.into()));
        assert_eq!(
            exists_query("books", &probe).sql(),
            "SELECT EXISTS(SELECT 1 FROM \"books\" WHERE \"isbn13\"::text IS NOT DISTINCT FROM $1 \
             AND \"id\"::text <> $2)"
        );
    }

    #[test]
    fn test_exists_sql_for_record() {
        let registry = Book::registry();
        let probe = DupeProbe::for_record(registry, &Book::sample(4));
        assert_eq!(
            exists_query("books", &probe).sql(),
            "SELECT EXISTS(SELECT 1 FROM \"books\" WHERE \
             \"title\"::text IS NOT DISTINCT FROM $1 AND \
             \"subtitle\"::text IS NOT DISTINCT FROM $2 AND \
             \"edition\"::text IS NOT DISTINCT FROM $3 AND \
             \"isbn13\"::text IS NOT DISTINCT FROM $4 AND \
             \"author_id\"::text IS NOT DISTINCT FROM $5 AND \
             \"category_id\"::text IS NOT DISTINCT FROM $6 AND \
             \"id\"::text <> $7)"
        );

        let probe = DupeProbe::for_record(Category::registry(), &category());
        assert_eq!(
            exists_query("categories", &probe).sql(),
            "SELECT EXISTS(SELECT 1 FROM \"categories\" WHERE FALSE)"
        );
    }

    fn category() -> Category {
        Category {
            id: 1,
            label: "Fantasy".to_string(),
            total_books: None,
        }
    }
}
