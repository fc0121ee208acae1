//! Type identities.
//!
//! An identity is the immutable `(kingdom, phylum, genus)` triad that names a
//! content type. Suffixed types such as `image/svg+xml` are represented as a
//! [`CompositeType`] of their primary identity and the identities of their
//! syntax suffixes. [`MediaType`] covers both shapes and is the key every
//! record is stored under.

// Submodule declarations
pub mod composite;
pub mod kingdom;
pub mod media;
pub mod suffix;
pub mod type_identity;

// Re-exports
pub use composite::CompositeType;
pub use kingdom::{Kingdom, is_registered_phylum};
pub use media::MediaType;
pub use type_identity::TypeIdentity;
