//! The type database: packages, hierarchy and indices behind one handle.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use regex::Regex;
use tracing::{debug, info};

use super::attributes::{AttributeSource, ExtendedAttributes};
use super::options::DatabaseOptions;
use crate::common::Result;
use crate::decision::decide;
use crate::hierarchy::Hierarchy;
use crate::identity::MediaType;
use crate::matcher::{ContentIndex, FileNameIndex, Hit};
use crate::package::{PackageLocator, PackageSet, PackageStatus};
use crate::parser::{self, BuildTarget, Needle};
use crate::pattern::FileName;
use crate::record::TypeRecord;
use crate::service::RecentCache;

/// Characters that turn a raw type string into a type pattern.
const WILDCARDS: &[char] = &['*', '?', '['];

/// One database instance.
///
/// Records are built lazily: before the indices answer a filename or
/// stream query, the packages are scanned for every type that could match
/// it and the complete records of those types (and their ancestors) are
/// built. The answer therefore does not depend on which records earlier
/// queries happened to build. Nothing here is synchronized; a database is
/// meant to be owned by a single worker.
pub struct Database {
    options: DatabaseOptions,
    packages: PackageSet,
    hierarchy: Hierarchy,
    filenames: FileNameIndex,
    content: ContentIndex,
    attributes: Box<dyn AttributeSource>,
    /// Filenames whose matching types are known to be built.
    scanned_names: RecentCache<FileName, ()>,
    /// Every declared type is built; no query needs a scan.
    fully_built: bool,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("options", &self.options)
            .field("packages", &self.packages)
            .field("records", &self.hierarchy.len())
            .field("globs", &self.filenames.len())
            .field("chains", &self.content.len())
            .field("fully_built", &self.fully_built)
            .finish()
    }
}

impl Database {
    /// Open a database over the packages named by `locator`.
    ///
    /// No package is read until the first query.
    pub fn new(locator: &dyn PackageLocator, options: DatabaseOptions) -> Self {
        let packages = PackageSet::from_locator(locator, options.keep_packages_open);
        Self::with_packages(packages, options)
    }

    /// Open a database over an explicit list of package files.
    pub fn from_paths<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>, options: DatabaseOptions) -> Self {
        let packages = PackageSet::new(paths, options.keep_packages_open);
        Self::with_packages(packages, options)
    }

    fn with_packages(packages: PackageSet, options: DatabaseOptions) -> Self {
        Self {
            scanned_names: RecentCache::new(options.cache_capacity),
            fully_built: false,
            options,
            packages,
            hierarchy: Hierarchy::new(),
            filenames: FileNameIndex::new(),
            content: ContentIndex::new(),
            attributes: Box::new(ExtendedAttributes),
        }
    }

    /// Replace the source of extended-attribute overrides.
    pub fn with_attribute_source(mut self, source: impl AttributeSource + 'static) -> Self {
        self.attributes = Box::new(source);
        self
    }

    #[inline]
    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    #[inline]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn packages(&self) -> Vec<PackageStatus> {
        self.packages.status()
    }

    /// Enable or disable one package.
    ///
    /// Any change invalidates every built record and empties both indices;
    /// records are rebuilt from the new package set on demand. Returns
    /// whether anything changed.
    pub fn toggle_package(&mut self, path: &Path, enabled: bool) -> bool {
        if !self.packages.toggle(path, enabled) {
            return false;
        }
        info!(records = self.hierarchy.len(), "package set changed, invalidating records");
        self.hierarchy.reset();
        self.filenames.clear();
        self.content.clear();
        self.scanned_names.clear();
        self.fully_built = false;
        true
    }

    /// Build every type declared by the enabled packages. Returns the
    /// number of records built.
    pub fn preload(&mut self) -> usize {
        let built = self.build_and_commit(&[BuildTarget::All]).len();
        self.fully_built = true;
        built
    }

    /// The record of `media`, its alias target, or the composite it is the
    /// primary member of.
    pub fn by_identity(&mut self, media: &MediaType) -> Option<TypeRecord> {
        if let Some(record) = self.built(media) {
            return Some(record.clone());
        }
        self.build_and_commit(&[BuildTarget::Identity(media.clone())]);
        self.built(media).cloned()
    }

    /// The best type for a bare filename.
    pub fn by_filename(&mut self, name: &str) -> Option<TypeRecord> {
        let name = FileName::new(name);
        self.discover(vec![Needle::FileName(name.clone())]);
        let hit = self.filenames.lookup(&name)?;
        let media = decide(Some(&hit), None, &self.hierarchy, self.options.conflict_policy)?;
        self.record(&media)
    }

    /// Exact lookup of a type string, or every type matching it when it
    /// contains shell wildcards (`image/*`).
    pub fn by_raw_string(&mut self, raw: &str) -> Result<Vec<TypeRecord>> {
        if raw.contains(WILDCARDS) {
            let pattern = glob::Pattern::new(&raw.trim().to_ascii_lowercase())?;
            let built = self.build_and_commit(&[BuildTarget::TypeGlob(pattern)]);
            return Ok(self.records(&built));
        }
        Ok(MediaType::parse(raw)
            .and_then(|media| self.by_identity(&media))
            .into_iter()
            .collect())
    }

    /// Every type whose string matches `pattern`.
    pub fn by_pattern(&mut self, pattern: &Regex) -> Vec<TypeRecord> {
        let built = self.build_and_commit(&[BuildTarget::TypeRegex(pattern.clone())]);
        self.records(&built)
    }

    /// Identify a file on disk.
    ///
    /// An extended-attribute override wins outright. Otherwise the filename
    /// and the leading bytes of the file are matched and combined.
    pub fn by_path(&mut self, path: &Path) -> Result<Option<TypeRecord>> {
        if self.options.xattr_override
            && let Some(media) = self.attributes.type_override(path).as_deref().and_then(MediaType::parse)
        {
            debug!(path = %path.display(), media = %media, "type taken from extended attribute");
            let record = self.by_identity(&media).unwrap_or_else(|| TypeRecord::new(media));
            return Ok(Some(record));
        }

        let mut file = File::open(path)?;
        let name = path.file_name().and_then(|n| n.to_str());
        self.by_stream(name, &mut file)
    }

    /// Identify a stream, optionally named.
    ///
    /// Unless every type is built already, the packages are first scanned
    /// for types matching the name or the leading bytes and those are
    /// built; the indices then answer.
    pub fn by_stream<R: Read + Seek>(&mut self, name: Option<&str>, stream: &mut R) -> Result<Option<TypeRecord>> {
        let name = name.map(FileName::new);
        if !self.fully_built {
            let mut needles = Vec::with_capacity(2);
            if let Some(name) = &name {
                needles.push(Needle::FileName(name.clone()));
            }
            needles.push(Needle::sample(stream, self.options.max_scan_bytes)?);
            self.discover(needles);
        }
        let media = self.identify(name.as_ref(), stream)?;
        Ok(media.and_then(|m| self.record(&m)))
    }

    /// `media` and all its ancestors, building unbuilt records on the way.
    pub fn ancestors(&mut self, media: &MediaType) -> Vec<MediaType> {
        let key = match self.by_identity(media) {
            Some(record) => record.media_type().clone(),
            None => media.clone(),
        };
        self.hierarchy.ancestors(&key)
    }

    fn identify<R: Read + Seek>(&self, name: Option<&FileName>, stream: &mut R) -> Result<Option<MediaType>> {
        let glob = name.and_then(|n| self.filenames.lookup(n));
        let matches = self.content.scan(stream, self.options.max_scan_bytes)?;
        let magic = Hit::from_candidates(matches.into_values());
        Ok(decide(
            glob.as_ref(),
            magic.as_ref(),
            &self.hierarchy,
            self.options.conflict_policy,
        ))
    }

    /// Scan the packages for types matching `needles` and build the ones
    /// not built yet. Filenames scanned before are skipped.
    fn discover(&mut self, mut needles: Vec<Needle>) {
        if self.fully_built {
            return;
        }
        needles.retain(|needle| match needle {
            Needle::FileName(name) => self.scanned_names.get(name).is_none(),
            Needle::Content(_) => true,
        });
        if needles.is_empty() {
            return;
        }

        let found: Vec<MediaType> = parser::scan(&mut self.packages, &needles)
            .into_iter()
            .filter(|m| !self.is_complete(m))
            .collect();
        if !found.is_empty() {
            self.build_types(found);
        }
        for needle in needles {
            if let Needle::FileName(name) = needle {
                self.scanned_names.insert(name, ());
            }
        }
    }

    /// A complete, declared record reachable from `media`.
    fn built(&self, media: &MediaType) -> Option<&TypeRecord> {
        let key = self.hierarchy.resolve(media)?;
        self.hierarchy
            .get(key.as_str())
            .filter(|r| r.complete && r.defined)
    }

    fn record(&self, media: &MediaType) -> Option<TypeRecord> {
        self.hierarchy.get(media.as_str()).cloned()
    }

    fn records(&self, types: &[MediaType]) -> Vec<TypeRecord> {
        types.iter().filter_map(|m| self.record(m)).collect()
    }

    fn build_types(&mut self, types: Vec<MediaType>) {
        let targets: Vec<BuildTarget> = types.into_iter().map(BuildTarget::Identity).collect();
        self.build_and_commit(&targets);
    }

    fn is_complete(&self, media: &MediaType) -> bool {
        self.hierarchy.get(media.as_str()).is_some_and(|r| r.complete)
    }

    /// Build the records selected by `targets`, then the canonical records
    /// of requested aliases and every ancestor not built yet. Returns the
    /// types selected directly by `targets`.
    fn build_and_commit(&mut self, targets: &[BuildTarget]) -> Vec<MediaType> {
        let output = parser::build(&mut self.packages, targets);
        let mut selected = Vec::with_capacity(output.records.len());
        let mut attempted: HashSet<MediaType> = HashSet::new();
        let mut pending: Vec<MediaType> = Vec::new();

        for media in output.redirects {
            if attempted.insert(media.clone()) {
                pending.push(media);
            }
        }
        for record in output.records {
            attempted.insert(record.media_type().clone());
            selected.push(self.commit(record, &mut pending, &mut attempted));
        }

        let mut rounds = 0;
        while !pending.is_empty() {
            let targets: Vec<BuildTarget> = pending
                .drain(..)
                .filter(|m| !self.is_complete(m))
                .map(BuildTarget::Identity)
                .collect();
            if targets.is_empty() {
                break;
            }
            rounds += 1;
            let output = parser::build(&mut self.packages, &targets);
            for media in output.redirects {
                if attempted.insert(media.clone()) {
                    pending.push(media);
                }
            }
            for record in output.records {
                self.commit(record, &mut pending, &mut attempted);
            }
        }

        if rounds > 0 {
            debug!(selected = selected.len(), rounds, "follow-up builds finished");
        }
        selected
    }

    /// Install a freshly built record in the hierarchy and both indices,
    /// queueing its unbuilt parents.
    fn commit(
        &mut self,
        mut record: TypeRecord,
        pending: &mut Vec<MediaType>,
        attempted: &mut HashSet<MediaType>,
    ) -> MediaType {
        let media = record.media_type().clone();
        record.complete = true;

        for parent in record.parents().iter() {
            if !self.is_complete(parent) && attempted.insert(parent.clone()) {
                pending.push(parent.clone());
            }
        }

        self.filenames.remove_type(&media);
        self.content.remove_type(&media);
        for glob in record.globs() {
            self.filenames.insert(&media, glob);
        }
        for chain in record.magic() {
            self.content.insert(&media, chain);
        }
        self.hierarchy.commit(record);
        media
    }
}
