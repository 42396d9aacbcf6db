use arrow::error::ArrowError;
use thiserror::Error;

/// Errors raised while composing or resolving column queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Two queries built against different tables were combined.
    #[error("column queries must be built from the same table (left: {left}, right: {right})")]
    OriginMismatch {
        /// Rendering of the left-hand operand.
        left: String,
        /// Rendering of the right-hand operand.
        right: String,
    },
    /// A record batch does not belong to the table a view was built against.
    #[error("record batch schema is not the table schema: {0}")]
    SchemaMismatch(String),
    /// The backing buffer of an expression could not grow.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
    /// Arrow rejected a projection.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

/// Errors raised by the append-only buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not provide the requested capacity.
    #[error("failed to reserve capacity for {requested} elements")]
    Allocation {
        /// Total capacity that was requested.
        requested: usize,
    },
}
