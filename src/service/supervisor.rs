//! The supervisor: forwards requests to the worker and replaces it when it
//! dies.
//!
//! A request whose worker dies is retried once on a fresh worker. The
//! supervisor remembers the last few requests that killed a worker; one that
//! kills the replacement too, or that shows up again while still remembered,
//! is dropped and its caller sees the service as stopped for that request.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::dispatch::Service;
use super::protocol::{Envelope, Reply, Request};
use super::worker::Worker;
use crate::common::Result;

pub(crate) type Factory<S> = Box<dyn FnMut() -> S + Send>;

pub(crate) struct Supervisor<S> {
    area: String,
    factory: Factory<S>,
    cache_capacity: usize,
    worker: Option<Worker>,
    generation: u64,
    /// Requests that recently killed a worker, oldest first.
    failures: VecDeque<Request>,
    retry_memory: usize,
    /// Last toggle applied to each package, replayed onto new workers.
    toggles: HashMap<PathBuf, bool>,
}

impl<S: Service> Supervisor<S> {
    pub fn new(area: String, mut factory: Factory<S>, cache_capacity: usize, retry_memory: usize) -> Result<Self> {
        let worker = Worker::spawn(&area, 0, factory(), cache_capacity)?;
        Ok(Self {
            area,
            factory,
            cache_capacity,
            worker: Some(worker),
            generation: 0,
            failures: VecDeque::new(),
            retry_memory: retry_memory.max(1),
            toggles: HashMap::new(),
        })
    }

    pub fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Envelope>) {
        while let Some(Envelope { request, recipient }) = inbox.blocking_recv() {
            match self.dispatch(&request) {
                Some(outcome) => {
                    if let (Request::TogglePackage { path, enabled }, Ok(_)) = (&request, &outcome) {
                        self.toggles.insert(path.clone(), *enabled);
                    }
                    recipient.deliver(request, outcome);
                },
                None => {
                    warn!(area = %self.area, request = ?request, "dropping request that keeps killing the worker");
                },
            }
        }

        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
        debug!(area = %self.area, "supervisor stopped");
    }

    fn dispatch(&mut self, request: &Request) -> Option<Result<Reply>> {
        if let Some(outcome) = self.attempt(request) {
            return Some(outcome);
        }
        self.restart();

        if self.failures.contains(request) {
            return None;
        }
        self.remember_failure(request);

        match self.attempt(request) {
            Some(outcome) => {
                self.failures.retain(|r| r != request);
                Some(outcome)
            },
            None => {
                self.restart();
                None
            },
        }
    }

    fn attempt(&self, request: &Request) -> Option<Result<Reply>> {
        self.worker.as_ref()?.call(request)
    }

    fn remember_failure(&mut self, request: &Request) {
        while self.failures.len() >= self.retry_memory {
            self.failures.pop_front();
        }
        self.failures.push_back(request.clone());
    }

    /// Reap the current worker and start the next generation.
    fn restart(&mut self) {
        if let Some(worker) = self.worker.take() {
            let generation = worker.generation;
            match worker.stop() {
                Some(panic) => error!(area = %self.area, generation, panic = %panic, "worker crashed"),
                None => error!(area = %self.area, generation, "worker exited unexpectedly"),
            }
        }

        self.generation += 1;
        let service = (self.factory)();
        match Worker::spawn(&self.area, self.generation, service, self.cache_capacity) {
            Ok(worker) => {
                for (path, enabled) in &self.toggles {
                    let replay = Request::TogglePackage {
                        path: path.clone(),
                        enabled: *enabled,
                    };
                    if worker.call(&replay).is_none() {
                        error!(area = %self.area, path = %path.display(), "worker died replaying a package toggle");
                    }
                }
                info!(area = %self.area, generation = self.generation, "worker restarted");
                self.worker = Some(worker);
            },
            Err(err) => {
                error!(area = %self.area, error = %err, "cannot start worker");
            },
        }
    }
}
