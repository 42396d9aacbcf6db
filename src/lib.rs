#![deny(missing_docs)]
//! Composable column queries over Arrow schemas.
//!
//! Callers select columns of a table (an Arrow [`SchemaRef`]) by name, by
//! predicate or by identity, and combine the selections with `&` and `|`.
//! Combined expressions are flat operator sequences backed by an append-only
//! buffer, so deriving a new expression from an existing one shares storage
//! instead of copying it, while every earlier expression stays valid.
//!
//! ```
//! use std::sync::Arc;
//!
//! use arrow::datatypes::{DataType, Field, Schema};
//! use column_query::TableView;
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("id", DataType::Int64, false),
//!     Field::new("name", DataType::Utf8, true),
//! ]));
//! let table = TableView::new(schema);
//! let query = table.by_name("id") | table.by_predicate(|field| field.is_nullable());
//! let columns = table.columns(query).unwrap();
//! assert_eq!(columns.indices(), &[0, 1]);
//! ```
//!
//! [`SchemaRef`]: arrow::datatypes::SchemaRef

mod logging;

/// Append-only buffer with copy-on-divergence views.
pub mod buffer;

/// Error types.
pub mod error;

/// Column queries, expressions and their evaluation.
pub mod query;

/// Table views, origin guards and column resolution.
pub mod table;

pub use crate::{
    buffer::AppendBuffer,
    error::{BufferError, QueryError},
    query::{ColumnQuery, ColumnQueryExpression, LogicOperator, NameComparer},
    table::{OriginGuard, OriginGuarded, TableColumnView, TableView, TableViewOptions},
};
