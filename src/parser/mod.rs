//! Streaming package parser.
//!
//! Packages are read element by element through a [`Visitor`]; no document
//! tree is ever built. Two visitors exist:
//!
//! - [`scan`] answers "which types could this filename or content be?"
//!   without building records, skipping whole element categories that no
//!   needle can match;
//! - [`build`] collects the complete records of selected types across every
//!   enabled package, honoring `<glob-deleteall>` and `<magic-deleteall>`.

// Submodule declarations
pub mod build;
pub mod driver;
pub mod element;
pub mod magic;
pub mod needle;
pub mod scan;


// Re-exports
pub use build::{BuildOutput, BuildTarget, build};
pub use driver::{Attributes, Visitor, drive};
pub use element::{Element, Interest};
pub use needle::Needle;
pub use scan::scan;
