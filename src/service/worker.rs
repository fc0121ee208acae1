//! The worker: one thread owning one service instance.

use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::cache::RecentCache;
use super::dispatch::Service;
use super::protocol::{Reply, Request};
use crate::common::Result;

pub(crate) struct Job {
    pub request: Request,
    pub reply: oneshot::Sender<Result<Reply>>,
}

/// A running worker thread and the queue feeding it.
pub(crate) struct Worker {
    pub generation: u64,
    jobs: mpsc::UnboundedSender<Job>,
    thread: JoinHandle<()>,
}

impl Worker {
    pub fn spawn<S: Service>(area: &str, generation: u64, service: S, cache_capacity: usize) -> Result<Self> {
        let (jobs, mut inbox) = mpsc::unbounded_channel::<Job>();
        let thread = thread::Builder::new()
            .name(format!("taxon-{area}-{generation}"))
            .spawn(move || {
                let mut service = service;
                let mut cache = RecentCache::new(cache_capacity);
                while let Some(job) = inbox.blocking_recv() {
                    let outcome = serve(&mut service, &mut cache, &job.request);
                    let _ = job.reply.send(outcome);
                }
            })?;
        debug!(area, generation, "worker started");
        Ok(Self {
            generation,
            jobs,
            thread,
        })
    }

    /// Queue `request` and wait for its answer. `None` means the worker died
    /// before answering.
    pub fn call(&self, request: &Request) -> Option<Result<Reply>> {
        let (reply, answer) = oneshot::channel();
        self.jobs
            .send(Job {
                request: request.clone(),
                reply,
            })
            .ok()?;
        answer.blocking_recv().ok()
    }

    /// Close the queue and wait for the thread. Returns the panic message if
    /// the thread panicked.
    pub fn stop(self) -> Option<String> {
        drop(self.jobs);
        self.thread.join().err().map(|payload| {
            payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string())
        })
    }
}

fn serve<S: Service>(service: &mut S, cache: &mut RecentCache<Request, Reply>, request: &Request) -> Result<Reply> {
    if let Some(reply) = cache.get(request) {
        return Ok(reply.clone());
    }
    let reply = service.handle(request)?;
    match (request, &reply) {
        (Request::TogglePackage { .. }, Reply::Toggled(true)) => cache.clear(),
        _ if request.is_cacheable() => cache.insert(request.clone(), reply.clone()),
        _ => {},
    }
    Ok(reply)
}
