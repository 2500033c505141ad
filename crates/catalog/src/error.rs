//! Error types for the catalog crate.
//!
//! Only whole-document problems surface as errors (unreadable file, a body
//! that is not a JSON array). Individual bad records are dropped during
//! normalization and never reach the caller as an error.

use thiserror::Error;

/// Errors that can occur while loading and normalizing catalog data
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document is not valid JSON
    #[error("Malformed JSON in {origin}: {reason}")]
    ParseError { origin: String, reason: String },

    /// The document parsed, but the top level is not the expected list
    #[error("Expected a JSON array of {what} but found {found}")]
    NotAnArray { what: String, found: String },

    /// A record lacks a field it cannot exist without
    #[error("Missing field {field} in {entity} record")]
    MissingField { entity: String, field: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
