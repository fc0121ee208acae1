//! Pattern primitives: weights, filename globs and byte-sequence chains.

// Submodule declarations
pub mod chain;
pub mod filename;
pub mod glob;
pub mod sequence;
pub mod weight;

// Re-exports
pub use chain::{Chain, ChainId};
pub use filename::FileName;
pub use glob::GlobPattern;
pub use sequence::{Sequence, ValueKind};
pub use weight::{Weight, Weighted, heaviest};
