//! # Error Types
//!
//! Structured error types for trestle_core. Every failure the engine can
//! report is a variant here, so a host can tell a rejected input apart from
//! an unsupported configuration or a physically meaningless section.
//!
//! Note that an empty section's centroid is *not* an error: it is the
//! documented sentinel `0.0`.
//!
//! ## Example
//!
//! ```rust
//! use trestle_core::errors::{CalcError, CalcResult};
//!
//! fn validate_span(span_mm: f64) -> CalcResult<()> {
//!     if span_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "span_mm",
//!             span_mm.to_string(),
//!             "Span must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_span(-5.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for trestle_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong count, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A rectangle reference or adjacency claim does not match the section
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// The requested configuration is declared but not implemented
    #[error("Not supported: {feature}")]
    Unsupported { feature: String },

    /// The section cannot be evaluated by the requested formula
    #[error("Degenerate section: {reason}")]
    DegenerateSection { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Create an Unsupported error
    pub fn unsupported(feature: impl Into<String>) -> Self {
        CalcError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create a DegenerateSection error
    pub fn degenerate_section(reason: impl Into<String>) -> Self {
        CalcError::DegenerateSection {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Wrap a serde_json failure
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    ///
    /// The analysis itself performs no I/O, so only a held file lock
    /// can change between attempts.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::Unsupported { .. } => "UNSUPPORTED",
            CalcError::DegenerateSection { .. } => "DEGENERATE_SECTION",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
