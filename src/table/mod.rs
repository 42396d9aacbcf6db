//! Table-facing surface: builds guarded queries and resolves them to columns.

mod guard;
mod option;
mod view;

use std::sync::Arc;

use arrow::datatypes::{Field, FieldRef, SchemaRef};
pub use guard::{OriginGuard, OriginGuarded};
pub use option::TableViewOptions;
use regex::Regex;
pub use view::TableColumnView;

use crate::{
    error::QueryError,
    logging::{query_log, LogContext},
    query::{ColumnQuery, ColumnQueryExpression, NameComparer},
};

const TABLE_LOG_CTX: LogContext = LogContext::new("component=table_view");

/// Query entry point bound to one Arrow schema.
///
/// Every query built here carries the view's [`OriginGuard`], so queries from
/// different tables cannot be combined or resolved against the wrong table.
#[derive(Debug, Clone)]
pub struct TableView {
    table: SchemaRef,
    guard: OriginGuard,
    options: TableViewOptions,
}

impl TableView {
    /// Creates a view over `table` with default options.
    #[must_use]
    pub fn new(table: SchemaRef) -> Self {
        Self::with_options(table, TableViewOptions::default())
    }

    /// Creates a view over `table`.
    #[must_use]
    pub fn with_options(table: SchemaRef, options: TableViewOptions) -> Self {
        let guard = OriginGuard::new(&table);
        Self {
            table,
            guard,
            options,
        }
    }

    /// The table this view queries.
    #[must_use]
    pub fn table(&self) -> &SchemaRef {
        &self.table
    }

    /// Selects columns named `name` under the configured comparer.
    #[must_use]
    pub fn by_name(&self, name: impl Into<Arc<str>>) -> ColumnQuery {
        ColumnQuery::by_name_with(self.guard.clone(), name, Arc::clone(&self.options.comparer))
    }

    /// Selects columns named `name` under `comparer`.
    #[must_use]
    pub fn by_name_with(
        &self,
        name: impl Into<Arc<str>>,
        comparer: impl NameComparer + 'static,
    ) -> ColumnQuery {
        ColumnQuery::by_name_with(self.guard.clone(), name, Arc::new(comparer))
    }

    /// Selects columns accepted by `predicate`.
    #[must_use]
    pub fn by_predicate<F>(&self, predicate: F) -> ColumnQuery
    where
        F: Fn(&Field) -> bool + Send + Sync + 'static,
    {
        ColumnQuery::by_predicate(self.guard.clone(), predicate)
    }

    /// Selects exactly `column`.
    #[must_use]
    pub fn by_column(&self, column: &FieldRef) -> ColumnQuery {
        ColumnQuery::by_column(self.guard.clone(), column)
    }

    /// Selects columns whose name matches `pattern`.
    #[must_use]
    pub fn by_pattern(&self, pattern: &Regex) -> ColumnQuery {
        let pattern = pattern.clone();
        self.by_predicate(move |field| pattern.is_match(field.name()))
    }

    /// Expression matching no column.
    #[must_use]
    pub fn empty(&self) -> ColumnQueryExpression {
        ColumnQueryExpression::default()
    }

    /// Resolves `expression` to the matching columns, in schema order.
    pub fn columns(
        &self,
        expression: impl Into<ColumnQueryExpression>,
    ) -> Result<TableColumnView, QueryError> {
        let expression = expression.into();
        if !expression.is_empty() {
            self.guard.assert_same_source(expression.guard())?;
        }
        let indices: Vec<usize> = self
            .table
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| expression.matches(field))
            .map(|(index, _)| index)
            .collect();
        if self.options.log_resolution {
            query_log!(
                log::Level::Debug,
                ctx: TABLE_LOG_CTX,
                "columns_resolved",
                "expression=\"{}\" matched={} total={}",
                expression,
                indices.len(),
                self.table.fields().len(),
            );
        }
        Ok(TableColumnView::new(
            expression,
            Arc::clone(&self.table),
            self.guard.clone(),
            indices,
        ))
    }
}

impl OriginGuarded for TableView {
    fn guard(&self) -> &OriginGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use arrow::datatypes::{DataType, Schema};

    use super::*;
    use crate::query::IgnoreAsciiCase;

    fn orders() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("order_id", DataType::Int64, false),
            Field::new("customer", DataType::Utf8, false),
            Field::new("Amount", DataType::Float64, true),
            Field::new("note", DataType::Utf8, true),
        ]))
    }

    fn names(view: &TableColumnView) -> Vec<&str> {
        view.fields().map(|field| field.name().as_str()).collect()
    }

    #[test]
    fn resolves_columns_in_schema_order() {
        let table = TableView::new(orders());
        let expression = table.by_name("note") | table.by_predicate(|f| !f.is_nullable());
        let columns = table.columns(expression).expect("same table");

        assert_eq!(columns.indices(), &[0, 1, 3]);
        assert_eq!(names(&columns), vec!["order_id", "customer", "note"]);
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn configured_comparer_applies_to_by_name() {
        let strict = TableView::new(orders());
        assert!(strict.columns(strict.by_name("amount")).expect("resolve").is_empty());

        let folded = TableView::with_options(
            orders(),
            TableViewOptions::default()
                .comparer(IgnoreAsciiCase)
                .log_resolution(false),
        );
        let columns = folded.columns(folded.by_name("amount")).expect("resolve");
        assert_eq!(names(&columns), vec!["Amount"]);

        let explicit = strict.columns(strict.by_name_with("AMOUNT", IgnoreAsciiCase));
        assert_eq!(explicit.expect("resolve").indices(), &[2]);
    }

    #[test]
    fn pattern_and_identity_queries() {
        let table = TableView::new(orders());
        let pattern = Regex::new("^(order|cust)").expect("valid regex");
        let amount = Arc::clone(&table.table().fields()[2]);

        let columns = table
            .columns(table.by_pattern(&pattern) & table.by_column(&amount))
            .expect("resolve");
        assert!(columns.is_empty());

        let columns = table
            .columns(table.by_pattern(&pattern) | table.by_column(&amount))
            .expect("resolve");
        assert_eq!(columns.indices(), &[0, 1, 2]);
    }

    #[test]
    fn empty_expression_resolves_to_nothing() {
        let table = TableView::new(orders());
        let columns = table.columns(table.empty()).expect("empty is accepted");
        assert!(columns.is_empty());
        assert!(columns.expression().is_empty());
    }

    #[test]
    fn rejects_queries_from_another_table() {
        let table = TableView::new(orders());
        let other = TableView::new(orders());
        let err = table
            .columns(other.by_name("note"))
            .expect_err("foreign query");
        assert!(matches!(err, QueryError::OriginMismatch { .. }));
    }
}
