//! Result and error types for rowscope.

use crate::config::IndexBase;
use crate::driver::DriverError;
use thiserror::Error;

/// Boxed error used for factory failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for rowscope operations
pub type RowscopeResult<T> = Result<T, RowscopeError>;

/// Errors that can occur in rowscope
#[derive(Debug, Error)]
pub enum RowscopeError {
    /// A component or resolver factory could not produce an instance
    #[error("Failed to construct {component}: {source}")]
    ComponentConstruction {
        /// Type name of the component or resolver being built
        component: &'static str,
        /// Underlying factory error
        #[source]
        source: BoxError,
    },

    /// Row index cannot be mapped to a 1-based position
    #[error("Row index {index} is invalid for {base} indexing")]
    InvalidRowIndex {
        /// Index supplied by the caller
        index: usize,
        /// Index base in effect
        base: IndexBase,
    },

    /// Driver command failed
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Logging setup error
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl RowscopeError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap a factory failure for the named component type
    #[must_use]
    pub fn construction(component: &'static str, source: BoxError) -> Self {
        Self::ComponentConstruction { component, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_construction_keeps_cause() {
        let err = RowscopeError::construction("u32", "missing cell".into());
        assert!(matches!(
            err,
            RowscopeError::ComponentConstruction { component: "u32", .. }
        ));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("missing cell"));
        assert_eq!(err.to_string(), "Failed to construct u32: missing cell");
    }

    #[test]
    fn test_invalid_index_display() {
        let err = RowscopeError::InvalidRowIndex {
            index: 0,
            base: IndexBase::OneBased,
        };
        assert_eq!(err.to_string(), "Row index 0 is invalid for one-based indexing");
    }

    #[test]
    fn test_driver_error_converts() {
        let err: RowscopeError = DriverError::command("detached").into();
        assert!(matches!(err, RowscopeError::Driver(_)));
    }
}
