//! Package files and their enabled state.
//!
//! Where package files live on disk is decided by a [`PackageLocator`]; this
//! module only keeps the ordered list, remembers which entries are enabled
//! and hands out readable handles for scans.

// Submodule declarations
pub mod locator;
pub mod set;

// Re-exports
pub use locator::{PackageLocator, StaticLocator};
pub use set::{PackageHandle, PackageSet, PackageStatus};
