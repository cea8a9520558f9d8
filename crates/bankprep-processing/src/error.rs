//! Error types for the cleaning pipeline.
//!
//! A single `thiserror` hierarchy covers the boundary I/O failures and the
//! few invariant violations the pipeline can surface. Stage-level
//! transformations are total over a well-formed table; the only errors they
//! propagate come from the underlying table engine.

use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Input could not be interpreted as the expected tabular extract.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] crate::config::ConfigValidationError),

    /// The pipeline mutated the row count, which no stage is allowed to do.
    #[error("Row count changed during cleaning: {before} rows in, {after} rows out")]
    RowCountChanged { before: usize, after: usize },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CleaningError::ColumnNotFound("pdays".to_string());
        assert_eq!(err.to_string(), "Column 'pdays' not found in table");

        let err = CleaningError::RowCountChanged {
            before: 10,
            after: 9,
        };
        assert!(err.to_string().contains("10 rows in, 9 rows out"));
    }

    #[test]
    fn test_with_context() {
        let err = CleaningError::ColumnNotFound("education".to_string())
            .with_context("During derivation");
        assert!(err.to_string().contains("During derivation"));
        assert!(matches!(err, CleaningError::WithContext { .. }));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> =
            Err(CleaningError::MalformedInput("one column".to_string())).context("While loading");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("While loading"));
    }
}
