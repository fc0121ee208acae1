//! Unified error types for the type database.
//!
//! This module provides one error type shared by the parser, the matchers
//! and the query service.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
