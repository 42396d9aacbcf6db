//! Columns resolved from a query expression.

use std::sync::Arc;

use arrow::{
    datatypes::{FieldRef, SchemaRef},
    record_batch::RecordBatch,
};

use super::guard::{OriginGuard, OriginGuarded};
use crate::{
    error::QueryError,
    logging::{query_log, LogContext},
    query::ColumnQueryExpression,
};

const VIEW_LOG_CTX: LogContext = LogContext::new("component=column_view");

/// Columns of a table selected by a [`ColumnQueryExpression`].
#[derive(Debug, Clone)]
pub struct TableColumnView {
    expression: ColumnQueryExpression,
    table: SchemaRef,
    guard: OriginGuard,
    indices: Vec<usize>,
}

impl TableColumnView {
    pub(crate) fn new(
        expression: ColumnQueryExpression,
        table: SchemaRef,
        guard: OriginGuard,
        indices: Vec<usize>,
    ) -> Self {
        Self {
            expression,
            table,
            guard,
            indices,
        }
    }

    /// The expression that selected the columns.
    #[must_use]
    pub fn expression(&self) -> &ColumnQueryExpression {
        &self.expression
    }

    /// Positions of the selected columns in the table schema.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Selected column fields, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldRef> + '_ {
        let fields = self.table.fields();
        self.indices.iter().map(move |index| &fields[*index])
    }

    /// Number of selected columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true when no column was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Schema holding only the selected columns.
    pub fn project_schema(&self) -> Result<SchemaRef, QueryError> {
        Ok(Arc::new(self.table.project(&self.indices)?))
    }

    /// Projects `batch` onto the selected columns.
    ///
    /// The batch must carry the exact schema instance the view was built from.
    pub fn project_batch(&self, batch: &RecordBatch) -> Result<RecordBatch, QueryError> {
        let schema = batch.schema();
        if !self.guard.is_guarding(&schema) {
            return Err(QueryError::SchemaMismatch(format!(
                "expected {:?}, got {:?}",
                self.guard,
                OriginGuard::new(&schema)
            )));
        }
        let projected = batch.project(&self.indices)?;
        query_log!(
            log::Level::Trace,
            ctx: VIEW_LOG_CTX,
            "batch_projected",
            "rows={} columns={}",
            projected.num_rows(),
            projected.num_columns(),
        );
        Ok(projected)
    }
}

impl OriginGuarded for TableColumnView {
    fn guard(&self) -> &OriginGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use arrow::{
        array::{Float64Array, Int64Array, StringArray},
        datatypes::{DataType, Field, Schema},
    };

    use super::*;
    use crate::table::TableView;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("score", DataType::Float64, true),
        ]))
    }

    fn batch(schema: &SchemaRef) -> RecordBatch {
        RecordBatch::try_new(
            Arc::clone(schema),
            vec![
                Arc::new(Int64Array::from(vec![1, 2])) as _,
                Arc::new(StringArray::from(vec!["a", "b"])) as _,
                Arc::new(Float64Array::from(vec![Some(0.5), None])) as _,
            ],
        )
        .expect("record batch")
    }

    #[test]
    fn projects_schema_and_batch() {
        let schema = schema();
        let table = TableView::new(Arc::clone(&schema));
        let columns = table
            .columns(table.by_name("id") | table.by_name("score"))
            .expect("resolve");

        let projected = columns.project_schema().expect("project schema");
        let names: Vec<_> = projected.fields().iter().map(|f| f.name().clone()).collect();
        assert_eq!(names, vec!["id".to_string(), "score".to_string()]);

        let projected = columns.project_batch(&batch(&schema)).expect("project batch");
        assert_eq!(projected.num_columns(), 2);
        assert_eq!(projected.num_rows(), 2);
        assert_eq!(projected.schema().field(1).name(), "score");
    }

    #[test]
    fn rejects_batch_from_another_schema() {
        let table = TableView::new(schema());
        let columns = table.columns(table.by_name("id")).expect("resolve");
        let err = columns
            .project_batch(&batch(&schema()))
            .expect_err("foreign batch");
        assert!(matches!(err, QueryError::SchemaMismatch(_)));
    }
}
