//! Needle-driven partial scan.
//!
//! Reports which types have a glob or a content chain that matches one of
//! the needles, without building any record.

use std::collections::HashSet;
use std::io::BufReader;

use tracing::{debug, warn};

use super::driver::{Attributes, Visitor, drive};
use super::element::{Element, Interest};
use super::magic::MagicTree;
use super::needle::Needle;
use crate::identity::MediaType;
use crate::package::PackageSet;
use crate::pattern::{GlobPattern, Weight};

/// Types whose evidence matches at least one of `needles`, in discovery
/// order.
///
/// A package that is not well-formed is abandoned at the error; the types
/// it reported before that point are kept.
pub fn scan(packages: &mut PackageSet, needles: &[Needle]) -> Vec<MediaType> {
    let mut scanner = Scanner::new(needles);
    if scanner.interest.is_empty() {
        return Vec::new();
    }

    let visited = packages.for_each_enabled(|path, handle| {
        if let Err(e) = drive(BufReader::new(handle), &mut scanner) {
            warn!(path = %path.display(), error = %e, "malformed package, skipping the rest of it");
        }
        scanner.end_package();
    });
    debug!(packages = visited, found = scanner.found.len(), "needle scan finished");
    scanner.found
}

struct Scanner<'n> {
    needles: &'n [Needle],
    interest: Interest,
    current: Option<MediaType>,
    magic: Option<MagicTree>,
    found: Vec<MediaType>,
    seen: HashSet<MediaType>,
}

impl<'n> Scanner<'n> {
    fn new(needles: &'n [Needle]) -> Self {
        let mut interest = Interest::empty();
        for needle in needles {
            interest |= match needle {
                Needle::FileName(_) => Interest::GLOB,
                Needle::Content(_) => Interest::MAGIC,
            };
        }
        Self {
            needles,
            interest,
            current: None,
            magic: None,
            found: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn emit(&mut self) {
        if let Some(media) = &self.current
            && self.seen.insert(media.clone())
        {
            self.found.push(media.clone());
        }
    }

    fn end_package(&mut self) {
        self.current = None;
        self.magic = None;
    }
}

impl Visitor for Scanner<'_> {
    fn interest(&self) -> Interest {
        self.interest
    }

    fn start(&mut self, element: Element, attributes: &Attributes) {
        match element {
            Element::MimeType => {
                self.current = attributes.get("type").and_then(MediaType::parse);
            },
            Element::Glob if self.current.is_some() => {
                let Some(pattern) = attributes.get("pattern") else {
                    return;
                };
                let case_sensitive = attributes.get("case-sensitive") == Some("true");
                if let Ok(glob) = GlobPattern::new(pattern, Weight::DEFAULT, case_sensitive)
                    && self.needles.iter().any(|n| n.matches_glob(&glob))
                {
                    self.emit();
                }
            },
            Element::Magic => self.magic = Some(MagicTree::open(attributes)),
            Element::Match => {
                if let Some(tree) = &mut self.magic {
                    tree.push(attributes);
                }
            },
            _ => {},
        }
    }

    fn end(&mut self, element: Element) {
        match element {
            Element::Match => {
                let chain = self.magic.as_mut().and_then(MagicTree::pop);
                if let Some(chain) = chain
                    && self.needles.iter().any(|n| n.matches_chain(&chain))
                {
                    self.emit();
                }
            },
            Element::Magic => self.magic = None,
            Element::MimeType => self.current = None,
            _ => {},
        }
    }
}
