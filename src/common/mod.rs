//! Common types, traits, and utilities shared across modules.
//!
//! This module provides the unified error type and the low-level decoding
//! helpers used by the package parser and the pattern primitives.

// Submodule declarations
pub mod binary;
pub mod error;
pub mod literal;
pub mod xml;

// Re-exports for convenience
pub use binary::{Endian, Width};
pub use error::{Error, Result};
