//! Unified error type for the type database.
//!
//! Absence of a match is never an error: lookups answer with `Option` or an
//! empty collection. Errors here describe broken inputs and broken plumbing.
use thiserror::Error;

/// Main error type for taxon operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A package file is not well-formed XML
    #[error("XML error: {0}")]
    Xml(String),

    /// A glob or regular expression did not compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A `<match>` attribute could not be decoded
    #[error("Invalid value for {attribute}: {value:?}")]
    InvalidValue { attribute: &'static str, value: String },

    /// The query service worker and its supervisor are gone
    #[error("Query service stopped")]
    ServiceStopped,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for taxon operations.
pub type Result<T> = std::result::Result<T, Error>;
