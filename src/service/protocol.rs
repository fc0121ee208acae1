//! Messages exchanged between callers, the supervisor and the worker.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use crate::common::Result;
use crate::package::PackageStatus;
use crate::record::TypeRecord;

/// One query or command for an area.
///
/// Requests double as cache keys, so two requests that compare equal get
/// the same cached answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    /// The record of an exact type string, its alias target or composite.
    Identity(String),
    /// The best type for a bare filename.
    FileName(String),
    /// An exact type string, or every type matching a wildcard string.
    RawString(String),
    /// Every type whose string matches a regular expression.
    Pattern(String),
    /// The type of a file on disk.
    Path(PathBuf),
    /// Enable or disable one package.
    TogglePackage { path: PathBuf, enabled: bool },
    /// Every package with its enabled flag.
    Packages,
}

impl Request {
    /// Whether the answer may be served from the cache.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Request::TogglePackage { .. } | Request::Packages)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Record(Option<TypeRecord>),
    Records(Vec<TypeRecord>),
    Toggled(bool),
    Packages(Vec<PackageStatus>),
}

impl Reply {
    /// The single record carried by a `Record` reply.
    pub fn into_record(self) -> Option<TypeRecord> {
        match self {
            Reply::Record(record) => record,
            Reply::Records(records) => records.into_iter().next(),
            _ => None,
        }
    }

    /// Every record carried by the reply.
    pub fn into_records(self) -> Vec<TypeRecord> {
        match self {
            Reply::Record(record) => record.into_iter().collect(),
            Reply::Records(records) => records,
            _ => Vec::new(),
        }
    }
}

/// A reply sent to a recipient other than the caller.
#[derive(Debug)]
pub struct Delivery {
    pub request: Request,
    pub outcome: Result<Reply>,
}

/// Where the answer to a request goes.
#[derive(Debug)]
pub enum Recipient {
    /// The caller waits on the other end.
    Caller(oneshot::Sender<Result<Reply>>),
    /// Someone else receives the answer; the caller has moved on.
    Forward(mpsc::UnboundedSender<Delivery>),
}

impl Recipient {
    /// Hand `outcome` over. A recipient that went away is not an error.
    pub(crate) fn deliver(self, request: Request, outcome: Result<Reply>) {
        match self {
            Recipient::Caller(reply) => {
                let _ = reply.send(outcome);
            },
            Recipient::Forward(sink) => {
                let _ = sink.send(Delivery { request, outcome });
            },
        }
    }
}

/// A request on its way to the supervisor.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub request: Request,
    pub recipient: Recipient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_are_not_cacheable() {
        assert!(Request::Identity("image/png".into()).is_cacheable());
        assert!(Request::Path(PathBuf::from("/tmp/memo.doc")).is_cacheable());
        assert!(!Request::Packages.is_cacheable());
        assert!(
            !Request::TogglePackage {
                path: PathBuf::from("/usr/share/mime/packages/freedesktop.org.xml"),
                enabled: false,
            }
            .is_cacheable()
        );
    }

    #[test]
    fn test_forward_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Recipient::Forward(tx).deliver(Request::Packages, Ok(Reply::Toggled(false)));
        let delivery = rx.try_recv().unwrap();
        assert_eq!(delivery.request, Request::Packages);
        assert!(matches!(delivery.outcome, Ok(Reply::Toggled(false))));
    }

    #[test]
    fn test_reply_accessors() {
        assert_eq!(Reply::Record(None).into_records(), Vec::<TypeRecord>::new());
        assert_eq!(Reply::Toggled(true).into_record(), None);
    }
}
