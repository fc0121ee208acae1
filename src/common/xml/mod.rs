//! XML helpers shared by the package parser.

pub mod escape;

pub use escape::{resolve_reference, unescape_xml};
