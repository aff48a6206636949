//! Top-level grid error type

use super::{ColumnError, SourceError, StoreError};

/// Errors returned by the grid's public operations.
///
/// Fetch failures never surface here; they degrade to the placeholder view.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// No operation is registered under this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Column index out of range.
    #[error("no column at index {0}")]
    NoSuchColumn(usize),

    /// Column is custom, has no field, or was declared unsortable.
    #[error("column {0} is not sortable")]
    NotSortable(usize),

    /// The grid was torn down with `remove()`.
    #[error("grid has been removed")]
    Removed,
}
