//! Same-origin capability tying queries to the table they were built from.

use std::{
    fmt,
    sync::{Arc, Weak},
};

use arrow::datatypes::{Schema, SchemaRef};

use crate::{
    error::QueryError,
    logging::{query_log, LogContext},
};

const GUARD_LOG_CTX: LogContext = LogContext::new("component=origin_guard");

/// Non-owning handle on the identity of the table a query was built against.
///
/// Guards compare by table identity, never by schema equality: two tables with
/// identical fields are still different sources.
#[derive(Clone, Default)]
pub struct OriginGuard {
    table: Weak<Schema>,
}

impl OriginGuard {
    /// Creates a guard for `table`.
    #[must_use]
    pub fn new(table: &SchemaRef) -> Self {
        Self {
            table: Arc::downgrade(table),
        }
    }

    /// Creates a guard that is not bound to any table.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Returns true when the guard is not bound to a table.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        Weak::ptr_eq(&self.table, &Weak::new())
    }

    /// Returns true when the guard refers to `table`.
    #[must_use]
    pub fn is_guarding(&self, table: &SchemaRef) -> bool {
        std::ptr::eq(self.table.as_ptr(), Arc::as_ptr(table))
    }

    /// Returns true when both guards refer to the identical table instance.
    #[must_use]
    pub fn is_same_source(&self, other: &OriginGuard) -> bool {
        Weak::ptr_eq(&self.table, &other.table)
    }

    /// Fails with [`QueryError::OriginMismatch`] when the guards refer to different tables.
    pub fn assert_same_source(&self, other: &OriginGuard) -> Result<(), QueryError> {
        if self.is_same_source(other) {
            return Ok(());
        }
        query_log!(
            log::Level::Debug,
            ctx: GUARD_LOG_CTX,
            "origin_mismatch",
            "left={:?} right={:?}",
            self,
            other,
        );
        Err(QueryError::OriginMismatch {
            left: format!("{self:?}"),
            right: format!("{other:?}"),
        })
    }
}

impl fmt::Debug for OriginGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detached() {
            f.write_str("OriginGuard(detached)")
        } else {
            write!(f, "OriginGuard({:p})", self.table.as_ptr())
        }
    }
}

/// Types bound to the table they were built from.
pub trait OriginGuarded {
    /// Returns the origin guard of this value.
    fn guard(&self) -> &OriginGuard;
}

impl OriginGuarded for OriginGuard {
    fn guard(&self) -> &OriginGuard {
        self
    }
}

#[cfg(test)]
mod tests {
    use arrow::datatypes::{DataType, Field};

    use super::*;

    fn table() -> SchemaRef {
        Arc::new(Schema::new(vec![Field::new("id", DataType::Utf8, false)]))
    }

    #[test]
    fn guards_compare_by_table_identity() {
        let left = table();
        let right = table();
        assert_eq!(left, right);

        let guard = OriginGuard::new(&left);
        assert!(guard.is_same_source(&OriginGuard::new(&left)));
        assert!(guard.is_guarding(&left));
        assert!(!guard.is_guarding(&right));
        assert!(!guard.is_same_source(&OriginGuard::new(&right)));
        assert!(guard.assert_same_source(&OriginGuard::new(&left)).is_ok());

        let err = guard
            .assert_same_source(&OriginGuard::new(&right))
            .expect_err("distinct tables");
        assert!(matches!(err, QueryError::OriginMismatch { .. }));
    }

    #[test]
    fn detached_guards_only_match_each_other() {
        let detached = OriginGuard::detached();
        assert!(detached.is_detached());
        assert!(detached.is_same_source(&OriginGuard::default()));

        let schema = table();
        let bound = OriginGuard::new(&schema);
        assert!(!bound.is_detached());
        assert!(detached.assert_same_source(&bound).is_err());
        assert_eq!(format!("{detached:?}"), "OriginGuard(detached)");
    }

    #[test]
    fn guard_does_not_keep_the_table_alive() {
        let schema = table();
        let weak = Arc::downgrade(&schema);
        let guard = OriginGuard::new(&schema);
        drop(schema);
        assert!(weak.upgrade().is_none());
        assert!(!guard.is_detached());
    }
}
