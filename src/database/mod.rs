//! The type database engine.
//!
//! A [`Database`] owns a package set, the type hierarchy and the filename
//! and content indices, and answers every kind of query synchronously. The
//! [`crate::service`] module puts one behind a worker thread.

// Submodule declarations
pub mod attributes;
pub mod engine;
pub mod options;


// Re-exports
pub use attributes::{AttributeSource, ExtendedAttributes, NoAttributes, TYPE_ATTRIBUTES};
pub use engine::Database;
pub use options::DatabaseOptions;
