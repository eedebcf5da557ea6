use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while mirroring schema-change commands.
///
/// Command batches come from a trusted schema-definition DSL, so most of
/// these indicate a malformed batch rather than a recoverable condition.
/// Unknown command names are not an error at all; the dispatcher skips them.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    /// A command referenced a column that does not exist in the table.
    #[error("column not found: {column} in table {table}")]
    ColumnNotFound { table: String, column: String },

    /// A known command was delivered without a parameter its kind requires.
    #[error("command '{command}' is missing required parameter '{parameter}'")]
    MissingParameter {
        command: String,
        parameter: &'static str,
    },

    /// A known command carried a parameter with the wrong shape
    /// (e.g. a list where a single name was expected).
    #[error("command '{command}' has malformed parameter '{parameter}'")]
    InvalidParameter {
        command: String,
        parameter: &'static str,
    },
}
