//! Column schema error types

/// Errors found while normalizing caller-supplied columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    /// A column has nothing to display: no field, no custom content, no action.
    #[error("column {index} needs a field, custom content or an action")]
    MissingFieldAndCustom {
        /// Position of the offending column.
        index: usize,
    },
}
