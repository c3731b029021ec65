//! Error handling for GeoEdit
//!
//! Interactive edit paths do not return errors: a missing drag target, a
//! missing projection surface or a structural minimum are handled as no-ops
//! or deletions. The types here cover the remaining fallible surface:
//! - Data source operations on elements that are not present
//! - Configuration loading, saving and validation
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A tolerance is negative or not a finite number
    #[error("Invalid tolerance '{field}': {value}")]
    InvalidTolerance {
        /// The offending field name.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// Event channel must be able to hold at least one event
    #[error("Event channel capacity must be greater than zero")]
    ZeroCapacity,

    /// Log filter directive is empty
    #[error("Log filter must not be empty")]
    EmptyLogFilter,
}

/// Main error type for GeoEdit
#[derive(Error, Debug)]
pub enum Error {
    /// Element is not part of the data source
    #[error("Element {id} not found in data source")]
    ElementNotFound {
        /// Id of the missing element (-1 for anonymous elements).
        id: i64,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for GeoEdit operations
pub type Result<T> = std::result::Result<T, Error>;
