//! Options for table views.

use std::sync::Arc;

use crate::query::{default_comparer, NameComparer};

/// Options applied to every query built through a [`TableView`](super::TableView).
#[derive(Debug, Clone)]
pub struct TableViewOptions {
    pub(crate) comparer: Arc<dyn NameComparer>,
    pub(crate) log_resolution: bool,
}

impl Default for TableViewOptions {
    fn default() -> Self {
        TableViewOptions {
            comparer: default_comparer(),
            log_resolution: true,
        }
    }
}

impl TableViewOptions {
    /// Name comparer used by [`TableView::by_name`](super::TableView::by_name).
    pub fn comparer(self, comparer: impl NameComparer + 'static) -> Self {
        TableViewOptions {
            comparer: Arc::new(comparer),
            ..self
        }
    }

    /// Emit a debug event each time an expression is resolved to columns.
    pub fn log_resolution(self, log_resolution: bool) -> Self {
        TableViewOptions {
            log_resolution,
            ..self
        }
    }
}
