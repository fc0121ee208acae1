//! Query service: databases behind message-passing workers.
//!
//! An *area* is one database owned by one worker thread. Callers talk to
//! it through a [`ServiceHandle`]; requests are answered strictly in
//! arrival order, one at a time, so the database itself needs no locking.
//! A supervisor thread sits between the handle and the worker, restarts
//! the worker when it dies and retries the request that was in flight.
//! Any number of areas can run side by side; they share nothing.
//!
//! Each worker keeps a bounded cache of recent answers keyed by request.
//! A toggle that changes the package set empties it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use taxon::package::StaticLocator;
//! use taxon::service::{self, Request, ServiceOptions};
//!
//! # fn main() -> taxon::Result<()> {
//! let locator = StaticLocator::new(["/usr/share/mime/packages/freedesktop.org.xml"]);
//! let handle = service::spawn(&locator, ServiceOptions::new().with_area("system"))?;
//!
//! let reply = handle.request_blocking(Request::Path("report.pdf".into()))?;
//! if let Some(record) = reply.into_record() {
//!     println!("{}", record.media_type());
//! }
//! # Ok(())
//! # }
//! ```

// Submodule declarations
pub mod cache;
pub mod dispatch;
pub mod handle;
pub mod options;
pub mod protocol;
mod supervisor;
mod worker;


// Re-exports
pub use cache::RecentCache;
pub use dispatch::Service;
pub use handle::{ServiceHandle, spawn, spawn_with};
pub use options::ServiceOptions;
pub use protocol::{Delivery, Recipient, Reply, Request};
