//! Caller-side handle of an area and the functions that start one.

use std::sync::Arc;
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::dispatch::Service;
use super::options::ServiceOptions;
use super::protocol::{Delivery, Envelope, Recipient, Reply, Request};
use super::supervisor::Supervisor;
use crate::common::Result;
use crate::database::Database;
use crate::package::PackageLocator;

/// A cheap, cloneable way to talk to one area.
///
/// Requests from all clones are answered one at a time in arrival order.
/// When the last handle is dropped the area shuts down.
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    area: Arc<str>,
    inbox: mpsc::UnboundedSender<Envelope>,
}

impl ServiceHandle {
    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }

    /// Send `request` and wait for its reply.
    ///
    /// Fails with [`Error::ServiceStopped`](crate::Error::ServiceStopped)
    /// when the area is gone or the request was dropped after killing its
    /// worker twice.
    pub async fn request(&self, request: Request) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.inbox.send(Envelope {
            request,
            recipient: Recipient::Caller(reply_tx),
        })?;
        reply_rx.await?
    }

    /// Blocking form of [`request`](Self::request) for callers outside an
    /// async runtime.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn request_blocking(&self, request: Request) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.inbox.send(Envelope {
            request,
            recipient: Recipient::Caller(reply_tx),
        })?;
        reply_rx.blocking_recv()?
    }

    /// Send `request` and return at once; the answer goes to `recipient`.
    pub fn send_to(&self, request: Request, recipient: mpsc::UnboundedSender<Delivery>) -> Result<()> {
        self.inbox.send(Envelope {
            request,
            recipient: Recipient::Forward(recipient),
        })?;
        Ok(())
    }
}

/// Start an area serving a database over the packages named by `locator`.
///
/// The package list is read once; every replacement worker opens a fresh
/// database over the same list.
pub fn spawn(locator: &dyn PackageLocator, options: ServiceOptions) -> Result<ServiceHandle> {
    let paths = locator.packages();
    let database = options.database.clone();
    spawn_with(options, move || Database::from_paths(paths.iter(), database.clone()))
}

/// Start an area whose workers run services made by `factory`.
pub fn spawn_with<S, F>(options: ServiceOptions, factory: F) -> Result<ServiceHandle>
where
    S: Service,
    F: FnMut() -> S + Send + 'static,
{
    let ServiceOptions { area, database } = options;
    let supervisor = Supervisor::new(
        area.clone(),
        Box::new(factory),
        database.cache_capacity,
        database.retry_memory,
    )?;

    let (inbox, envelopes) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name(format!("taxon-{area}-supervisor"))
        .spawn(move || supervisor.run(envelopes))?;
    info!(area = %area, "query service started");

    Ok(ServiceHandle {
        area: area.into(),
        inbox,
    })
}
