//! Filename index.
//!
//! Single-extension globs (`*.png`) live in hash maps keyed by extension,
//! case-folded unless the glob is case-sensitive. Everything else is a
//! complex glob: literal multi-extension ones (`*.tar.bz2`) are bucketed by
//! their last extension, freeform ones (`Makefile`, `*.[ch]`) are tested one
//! by one.

use std::collections::HashMap;

use super::{Candidate, Hit};
use crate::identity::MediaType;
use crate::pattern::{FileName, GlobPattern, Weighted};

#[derive(Debug, Clone)]
struct Entry {
    media: MediaType,
    glob: GlobPattern,
}

impl Entry {
    fn candidate(&self) -> Candidate {
        Candidate::new(self.media.clone(), self.glob.weight(), self.glob.len())
    }
}

#[derive(Debug, Default)]
pub struct FileNameIndex {
    folded: HashMap<Box<str>, Vec<Entry>>,
    exact: HashMap<Box<str>, Vec<Entry>>,
    by_last_component: HashMap<Box<str>, Vec<Entry>>,
    freeform: Vec<Entry>,
}

impl FileNameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed globs.
    pub fn len(&self) -> usize {
        let keyed: usize = self
            .folded
            .values()
            .chain(self.exact.values())
            .chain(self.by_last_component.values())
            .map(Vec::len)
            .sum();
        keyed + self.freeform.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, media: &MediaType, glob: &GlobPattern) {
        let entry = Entry {
            media: media.clone(),
            glob: glob.clone(),
        };
        if let Some(key) = glob.postfix_key() {
            let map = if glob.is_case_sensitive() { &mut self.exact } else { &mut self.folded };
            map.entry(key.into()).or_default().push(entry);
        } else if let Some(components) = glob.components() {
            let last = components[0].clone();
            self.by_last_component.entry(last).or_default().push(entry);
        } else {
            self.freeform.push(entry);
        }
    }

    /// Forget every glob of `media`.
    pub fn remove_type(&mut self, media: &MediaType) {
        for map in [&mut self.folded, &mut self.exact, &mut self.by_last_component] {
            map.retain(|_, entries| {
                entries.retain(|e| &e.media != media);
                !entries.is_empty()
            });
        }
        self.freeform.retain(|e| &e.media != media);
    }

    pub fn clear(&mut self) {
        self.folded.clear();
        self.exact.clear();
        self.by_last_component.clear();
        self.freeform.clear();
    }

    /// Look up a bare filename.
    ///
    /// The single-extension maps answer first; the complex globs are only
    /// consulted when they have nothing.
    pub fn lookup(&self, name: &FileName) -> Option<Hit> {
        if let Some(hit) = self.lookup_postfix(name) {
            return Some(hit);
        }
        self.lookup_complex(name)
    }

    fn lookup_postfix(&self, name: &FileName) -> Option<Hit> {
        let ext = name.last_extension()?;
        let folded = ext.to_ascii_lowercase();
        let candidates = self
            .exact
            .get(ext)
            .into_iter()
            .chain(self.folded.get(folded.as_str()))
            .flatten()
            .map(Entry::candidate);
        Hit::from_candidates(candidates)
    }

    fn lookup_complex(&self, name: &FileName) -> Option<Hit> {
        let text = name.as_str();
        let mut entries: Vec<&Entry> = Vec::new();
        if let Some(ext) = name.last_extension() {
            let folded = ext.to_ascii_lowercase();
            entries.extend(self.by_last_component.get(ext).into_iter().flatten());
            if folded != ext {
                entries.extend(self.by_last_component.get(folded.as_str()).into_iter().flatten());
            }
        }
        let candidates = entries
            .into_iter()
            .chain(self.freeform.iter())
            .filter(|e| e.glob.matches(text))
            .map(Entry::candidate);
        Hit::from_candidates(candidates)
    }
}
