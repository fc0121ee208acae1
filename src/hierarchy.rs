//! The type hierarchy: record storage plus parent, child and alias edges.
//!
//! Two implicit rules apply to a type with no recorded parent:
//!
//! - every `text/*` type other than `text/plain` descends from `text/plain`;
//! - every type outside the non-streamable phyla (`inode`, `x-content`,
//!   `x-scheme-handler`) descends from `application/octet-stream`.
//!
//! A suffixed type with no recorded parent also descends from its syntax
//! type (`image/svg+xml` from `application/xml`).
//!
//! Edges come from package data and nothing prevents cycles, so every walk
//! tracks what it has visited and every result includes the starting type.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::identity::{MediaType, TypeIdentity};
use crate::record::TypeRecord;

/// Phyla whose members are not byte streams and so never descend from
/// `application/octet-stream`.
pub const IRREGULAR_PHYLA: &[&str] = &["inode", "x-content", "x-scheme-handler"];

/// Record storage and ancestry queries for one database.
#[derive(Debug, Default)]
pub struct Hierarchy {
    records: HashMap<MediaType, TypeRecord>,
    /// Alias key to canonical key.
    aliases: HashMap<MediaType, MediaType>,
    /// Primary identity of a composite key to that key.
    composites: HashMap<TypeIdentity, MediaType>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, built or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record stored under exactly `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&TypeRecord> {
        self.records.get(key)
    }

    /// Follow aliases and composite members to the key a record lives under.
    ///
    /// `application/vnd.ms-word` resolves to `application/msword` once the
    /// alias is known; `image/svg` resolves to `image/svg+xml` when only the
    /// composite record exists.
    pub fn resolve(&self, key: &MediaType) -> Option<&MediaType> {
        if let Some((stored, _)) = self.records.get_key_value(key.as_str())
            && self.records[stored.as_str()].defined
        {
            return Some(stored);
        }
        if let Some(canonical) = self.aliases.get(key.as_str()) {
            return Some(canonical);
        }
        if let MediaType::Simple(id) = key {
            return self.composites.get(id.as_str());
        }
        None
    }

    /// The record for `media`, created empty when missing.
    pub fn entry(&mut self, media: &MediaType) -> &mut TypeRecord {
        if let MediaType::Composite(c) = media {
            self.composites
                .entry(c.primary().clone())
                .or_insert_with(|| media.clone());
        }
        self.records
            .entry(media.clone())
            .or_insert_with(|| TypeRecord::new(media.clone()))
    }

    /// Record that `child` is a subclass of `parent`.
    pub fn add_parent(&mut self, child: &MediaType, parent: &MediaType) {
        self.entry(child).parents.insert(parent.clone());
        self.entry(parent).children.insert(child.clone());
    }

    /// Record that `alias` is another name for `canonical`.
    pub fn add_alias(&mut self, canonical: &MediaType, alias: &MediaType) {
        if canonical == alias {
            return;
        }
        self.entry(canonical).aliases.insert(alias.clone());
        self.aliases.insert(alias.clone(), canonical.clone());
    }

    /// Replace every evidence field of `record`'s key with `record`'s, and
    /// wire its parent and alias edges. Child edges already recorded on the
    /// stored record are kept.
    pub(crate) fn commit(&mut self, mut record: TypeRecord) {
        let media = record.media_type().clone();
        let parents: Vec<MediaType> = record.parents.iter().cloned().collect();
        let aliases: Vec<MediaType> = record.aliases.iter().cloned().collect();

        let stored = self.entry(&media);
        record.children = std::mem::take(&mut stored.children);
        *stored = record;

        for parent in &parents {
            self.entry(parent).children.insert(media.clone());
        }
        for alias in &aliases {
            self.aliases.insert(alias.clone(), media.clone());
        }
    }

    /// Clear every record and edge learned from packages.
    ///
    /// Keys survive so outstanding references stay meaningful; every record
    /// goes back to unbuilt.
    pub(crate) fn reset(&mut self) {
        for record in self.records.values_mut() {
            record.reset();
        }
        self.aliases.clear();
    }

    pub fn records(&self) -> impl Iterator<Item = &TypeRecord> {
        self.records.values()
    }

    /// Recorded parents of `media`, or the implicit ones when none are
    /// recorded.
    pub fn parents_of(&self, media: &MediaType) -> Vec<MediaType> {
        if let Some(record) = self.records.get(media.as_str())
            && !record.parents.is_unset()
        {
            return record.parents.iter().cloned().collect();
        }
        implicit_parents(media)
    }

    /// `media` followed by every ancestor, nearest first.
    pub fn ancestors(&self, media: &MediaType) -> Vec<MediaType> {
        self.walk(media, |h, m| h.parents_of(m))
    }

    /// `media` followed by every recorded descendant, nearest first.
    pub fn descendants(&self, media: &MediaType) -> Vec<MediaType> {
        self.walk(media, |h, m| {
            h.records
                .get(m.as_str())
                .map(|r| r.children.iter().cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Ancestors and descendants of `media`, including itself.
    pub fn family(&self, media: &MediaType) -> Vec<MediaType> {
        let mut family = self.ancestors(media);
        let mut seen: HashSet<MediaType> = family.iter().cloned().collect();
        for descendant in self.descendants(media) {
            if seen.insert(descendant.clone()) {
                family.push(descendant);
            }
        }
        family
    }

    /// Whether `ancestor` is `media` itself or one of its ancestors.
    pub fn is_a(&self, media: &MediaType, ancestor: &MediaType) -> bool {
        media == ancestor || self.ancestors(media).iter().any(|a| a == ancestor)
    }

    /// Order two types by specificity: a subtype sorts above its supertype,
    /// unrelated types compare equal.
    pub fn compare(&self, a: &MediaType, b: &MediaType) -> Ordering {
        if a == b {
            Ordering::Equal
        } else if self.is_a(b, a) {
            Ordering::Less
        } else if self.is_a(a, b) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    fn walk(
        &self,
        start: &MediaType,
        next: impl Fn(&Self, &MediaType) -> Vec<MediaType>,
    ) -> Vec<MediaType> {
        let mut out = vec![start.clone()];
        let mut seen: HashSet<MediaType> = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(current) = queue.pop_front() {
            for related in next(self, &current) {
                if seen.insert(related.clone()) {
                    out.push(related.clone());
                    queue.push_back(related);
                }
            }
        }
        out
    }
}

/// Parents a type has when its packages record none.
pub fn implicit_parents(media: &MediaType) -> Vec<MediaType> {
    let mut parents = Vec::new();
    if let Some(suffix) = media.suffix() {
        parents.push(MediaType::Simple(suffix.clone()));
    }

    let id = media.primary();
    if id.phylum() == "text" && id.subtype() != "plain" {
        parents.push(MediaType::Simple(TypeIdentity::text_plain()));
    } else if !IRREGULAR_PHYLA.contains(&id.phylum())
        && *id != TypeIdentity::octet_stream()
        && parents.is_empty()
    {
        parents.push(MediaType::Simple(TypeIdentity::octet_stream()));
    }
    parents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(s: &str) -> MediaType {
        MediaType::parse(s).unwrap()
    }

    fn strings(types: &[MediaType]) -> Vec<&str> {
        types.iter().map(MediaType::as_str).collect()
    }

    #[test]
    fn test_implicit_rules() {
        let h = Hierarchy::new();
        assert_eq!(
            strings(&h.ancestors(&media("text/x-python"))),
            vec!["text/x-python", "text/plain", "application/octet-stream"]
        );
        assert_eq!(
            strings(&h.ancestors(&media("image/png"))),
            vec!["image/png", "application/octet-stream"]
        );
        assert_eq!(strings(&h.ancestors(&media("inode/directory"))), vec!["inode/directory"]);
        assert_eq!(
            strings(&h.ancestors(&media("application/octet-stream"))),
            vec!["application/octet-stream"]
        );
    }

    #[test]
    fn test_suffix_is_implicit_parent() {
        let h = Hierarchy::new();
        assert_eq!(
            strings(&h.ancestors(&media("image/svg+xml"))),
            vec!["image/svg+xml", "application/xml", "application/octet-stream"]
        );
    }

    #[test]
    fn test_explicit_parents_replace_implicit_rules() {
        let mut h = Hierarchy::new();
        h.add_parent(&media("application/msword"), &media("application/x-ole-storage"));
        assert_eq!(
            strings(&h.ancestors(&media("application/msword"))),
            vec!["application/msword", "application/x-ole-storage", "application/octet-stream"]
        );
        assert_eq!(
            strings(&h.descendants(&media("application/x-ole-storage"))),
            vec!["application/x-ole-storage", "application/msword"]
        );
    }

    #[test]
    fn test_cycles_terminate() {
        let mut h = Hierarchy::new();
        h.add_parent(&media("application/x-a"), &media("application/x-b"));
        h.add_parent(&media("application/x-b"), &media("application/x-a"));
        assert_eq!(h.ancestors(&media("application/x-a")).len(), 2);
        assert_eq!(h.family(&media("application/x-a")).len(), 2);
    }

    #[test]
    fn test_compare_by_specificity() {
        let mut h = Hierarchy::new();
        let doc = media("application/msword");
        let ole = media("application/x-ole-storage");
        h.add_parent(&doc, &ole);
        assert_eq!(h.compare(&doc, &ole), Ordering::Greater);
        assert_eq!(h.compare(&ole, &doc), Ordering::Less);
        assert_eq!(h.compare(&doc, &doc), Ordering::Equal);
        assert_eq!(h.compare(&doc, &media("image/png")), Ordering::Equal);
    }

    #[test]
    fn test_family_unions_both_directions() {
        let mut h = Hierarchy::new();
        let ole = media("application/x-ole-storage");
        h.add_parent(&media("application/msword"), &ole);
        h.add_parent(&media("application/vnd.ms-excel"), &ole);
        let family = h.family(&ole);
        assert!(family.contains(&media("application/msword")));
        assert!(family.contains(&media("application/vnd.ms-excel")));
        assert!(family.contains(&media("application/octet-stream")));
    }

    #[test]
    fn test_resolve_alias_and_composite_member() {
        let mut h = Hierarchy::new();
        let doc = media("application/msword");
        h.entry(&doc).defined = true;
        h.add_alias(&doc, &media("application/vnd.ms-word"));
        assert_eq!(h.resolve(&media("application/vnd.ms-word")), Some(&doc));

        let svg = media("image/svg+xml");
        h.entry(&svg).defined = true;
        assert_eq!(h.resolve(&media("image/svg")), Some(&svg));
        assert_eq!(h.resolve(&media("image/png")), None);
    }
}
