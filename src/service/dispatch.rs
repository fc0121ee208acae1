//! Mapping requests onto a database.

use regex::Regex;

use super::protocol::{Reply, Request};
use crate::common::Result;
use crate::database::Database;
use crate::identity::MediaType;

/// Anything a worker can run requests against.
pub trait Service: Send + 'static {
    fn handle(&mut self, request: &Request) -> Result<Reply>;
}

impl Service for Database {
    fn handle(&mut self, request: &Request) -> Result<Reply> {
        let reply = match request {
            Request::Identity(raw) => Reply::Record(MediaType::parse(raw).and_then(|media| self.by_identity(&media))),
            Request::FileName(name) => Reply::Record(self.by_filename(name)),
            Request::RawString(raw) => Reply::Records(self.by_raw_string(raw)?),
            Request::Pattern(pattern) => Reply::Records(self.by_pattern(&Regex::new(pattern)?)),
            Request::Path(path) => Reply::Record(self.by_path(path)?),
            Request::TogglePackage { path, enabled } => Reply::Toggled(self.toggle_package(path, *enabled)),
            Request::Packages => Reply::Packages(self.packages()),
        };
        Ok(reply)
    }
}
