//! Type records: identities plus the evidence accumulated from packages.

// Submodule declarations
pub mod evidence;
pub mod type_record;

// Re-exports
pub use evidence::Evidence;
pub use type_record::{RootXml, TypeRecord};
