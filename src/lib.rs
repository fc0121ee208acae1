//! Taxon - content-type identification over freedesktop.org shared-mime-info
//! packages
//!
//! Taxon reads the XML package files of the shared-mime-info database and
//! answers "what type is this?" for filenames, byte streams, files on disk
//! and type strings.
//!
//! # Features
//!
//! - **Lazy loading**: packages are scanned for the types a query needs and
//!   only those records are built
//! - **Filename matching**: single-extension globs through a case-folded
//!   table, everything else through weighted glob buckets
//! - **Content matching**: magic chains indexed by the byte range they
//!   touch, evaluated through a sliding read window
//! - **Type hierarchy**: explicit `sub-class-of` edges plus the implicit
//!   `text/plain` and `application/octet-stream` rules
//! - **Query service**: supervised single-threaded workers with a bounded
//!   answer cache, reachable from blocking and async code
//!
//! # Example - Identifying a file
//!
//! ```no_run
//! use taxon::{Database, DatabaseOptions};
//! use taxon::package::StaticLocator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let locator = StaticLocator::new(["/usr/share/mime/packages/freedesktop.org.xml"]);
//! let mut db = Database::new(&locator, DatabaseOptions::default());
//!
//! match db.by_path("memo.doc".as_ref())? {
//!     Some(record) => println!("{}", record.media_type()),
//!     None => println!("unknown"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Type strings
//!
//! ```
//! use taxon::MediaType;
//!
//! let svg = MediaType::parse("Image/SVG+XML").unwrap();
//! assert_eq!(svg.as_str(), "image/svg+xml");
//! assert_eq!(svg.primary().phylum(), "image");
//! assert_eq!(svg.suffix().map(|s| s.as_str()), Some("application/xml"));
//! ```

/// Common types, error handling and decoding helpers
pub mod common;

/// Type identities and type strings
pub mod identity;

/// Globs, filenames, byte sequences and chains
pub mod pattern;

/// Type records and their evidence fields
pub mod record;

/// Parent, child and alias edges between records
pub mod hierarchy;

/// Package files and where they come from
pub mod package;

/// Streaming package parser: candidate scan and record build
pub mod parser;

/// Filename and content indices
pub mod matcher;

/// Combining filename and content evidence
pub mod decision;

/// The database handle tying packages, hierarchy and indices together
pub mod database;

/// Supervised workers serving databases over channels
pub mod service;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use database::{Database, DatabaseOptions};
pub use decision::ConflictPolicy;
pub use identity::{MediaType, TypeIdentity};
pub use record::TypeRecord;
pub use service::{ServiceHandle, ServiceOptions};
