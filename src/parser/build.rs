//! Full record build.
//!
//! Re-reads every enabled package and accumulates everything declared for
//! the selected types. Each package is staged separately and merged only
//! once it has parsed completely, so a malformed package contributes
//! nothing.

use std::collections::HashMap;
use std::io::BufReader;

use regex::Regex;
use tracing::{debug, warn};

use super::driver::{Attributes, Visitor, drive};
use super::element::{Element, Interest};
use super::magic::MagicTree;
use crate::identity::MediaType;
use crate::package::PackageSet;
use crate::pattern::{GlobPattern, Weight};
use crate::record::{RootXml, TypeRecord};

/// Selects the `<mime-type>` elements a build collects.
#[derive(Debug, Clone)]
pub enum BuildTarget {
    /// Every declared type.
    All,
    /// One type, also found through a composite whose primary member it is.
    Identity(MediaType),
    /// Every type whose string matches a shell-style pattern.
    TypeGlob(glob::Pattern),
    /// Every type whose string matches a regular expression.
    TypeRegex(Regex),
}

impl BuildTarget {
    pub fn selects(&self, media: &MediaType) -> bool {
        match self {
            BuildTarget::All => true,
            BuildTarget::Identity(target) => {
                target == media
                    || matches!(target, MediaType::Simple(id) if media.is_composite() && media.primary() == id)
            },
            BuildTarget::TypeGlob(pattern) => pattern.matches(media.as_str()),
            BuildTarget::TypeRegex(regex) => regex.is_match(media.as_str()),
        }
    }

    fn is_identity(&self, media: &MediaType) -> bool {
        matches!(self, BuildTarget::Identity(target) if target == media)
    }
}

/// Records collected by one build.
#[derive(Debug, Default)]
pub struct BuildOutput {
    /// Every selected type that some package declares, in discovery order.
    pub records: Vec<TypeRecord>,
    /// Types that were not selected but declare one of the requested
    /// identities as an alias.
    pub redirects: Vec<MediaType>,
}

/// Build the records selected by `targets` from every enabled package.
pub fn build(packages: &mut PackageSet, targets: &[BuildTarget]) -> BuildOutput {
    if targets.is_empty() {
        return BuildOutput::default();
    }
    let mut builder = Builder::new(targets);

    let visited = packages.for_each_enabled(|path, handle| match drive(BufReader::new(handle), &mut builder) {
        Ok(()) => builder.commit_package(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed package, ignoring it");
            builder.discard_package();
        },
    });

    let output = builder.finish();
    debug!(
        packages = visited,
        records = output.records.len(),
        redirects = output.redirects.len(),
        "record build finished"
    );
    output
}

/// One package's contribution to one type.
#[derive(Debug)]
struct Draft {
    record: TypeRecord,
    clear_globs: bool,
    clear_magic: bool,
}

impl Draft {
    fn new(media: MediaType) -> Self {
        Self {
            record: TypeRecord::new(media),
            clear_globs: false,
            clear_magic: false,
        }
    }

    fn merge_into(self, acc: &mut TypeRecord) {
        if self.clear_globs {
            acc.clear_globs();
        }
        if self.clear_magic {
            acc.magic.clear();
        }

        let r = self.record;
        acc.defined |= r.defined;
        overwrite(&mut acc.description, r.description);
        overwrite(&mut acc.acronym, r.acronym);
        overwrite(&mut acc.expanded_acronym, r.expanded_acronym);
        overwrite(&mut acc.icon, r.icon);
        overwrite(&mut acc.generic_icon, r.generic_icon);

        for parent in r.parents.iter() {
            acc.parents.insert(parent.clone());
        }
        for alias in r.aliases.iter() {
            acc.aliases.insert(alias.clone());
        }
        for glob in r.postfixes.iter().chain(r.complex_globs.iter()) {
            acc.add_glob(glob.clone());
        }
        for chain in r.magic.iter() {
            acc.magic.insert(chain.clone());
        }
        for root in r.root_xml.iter() {
            acc.root_xml.insert(root.clone());
        }
    }
}

fn overwrite(slot: &mut Option<Box<str>>, value: Option<Box<str>>) {
    if value.is_some() {
        *slot = value;
    }
}

struct Builder<'t> {
    targets: &'t [BuildTarget],
    records: Vec<TypeRecord>,
    positions: HashMap<MediaType, usize>,
    redirects: Vec<MediaType>,

    // Current package
    drafts: Vec<Draft>,
    package_redirects: Vec<MediaType>,

    // Current element path
    current: Option<MediaType>,
    draft: Option<usize>,
    magic: Option<MagicTree>,
    translated_comment: bool,
}

impl<'t> Builder<'t> {
    fn new(targets: &'t [BuildTarget]) -> Self {
        Self {
            targets,
            records: Vec::new(),
            positions: HashMap::new(),
            redirects: Vec::new(),
            drafts: Vec::new(),
            package_redirects: Vec::new(),
            current: None,
            draft: None,
            magic: None,
            translated_comment: false,
        }
    }

    fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.draft.map(|i| &mut self.drafts[i])
    }

    fn open_type(&mut self, media: MediaType) {
        if self.targets.iter().any(|t| t.selects(&media)) {
            let index = match self.drafts.iter().position(|d| *d.record.media_type() == media) {
                Some(i) => i,
                None => {
                    self.drafts.push(Draft::new(media.clone()));
                    self.drafts.len() - 1
                },
            };
            self.drafts[index].record.defined = true;
            self.draft = Some(index);
        }
        self.current = Some(media);
    }

    fn close_element_path(&mut self) {
        self.current = None;
        self.draft = None;
        self.magic = None;
        self.translated_comment = false;
    }

    fn commit_package(&mut self) {
        self.close_element_path();
        for draft in self.drafts.drain(..) {
            let media = draft.record.media_type().clone();
            let index = *self.positions.entry(media.clone()).or_insert_with(|| {
                self.records.push(TypeRecord::new(media));
                self.records.len() - 1
            });
            draft.merge_into(&mut self.records[index]);
        }
        for media in self.package_redirects.drain(..) {
            if !self.redirects.contains(&media) {
                self.redirects.push(media);
            }
        }
    }

    fn discard_package(&mut self) {
        self.close_element_path();
        self.drafts.clear();
        self.package_redirects.clear();
    }

    fn finish(self) -> BuildOutput {
        let records = self.records;
        let redirects = self
            .redirects
            .into_iter()
            .filter(|m| !records.iter().any(|r| r.media_type() == m))
            .collect();
        BuildOutput { records, redirects }
    }

    fn on_glob(&mut self, attributes: &Attributes) {
        let Some(pattern) = attributes.get("pattern") else {
            return;
        };
        let weight = attributes.get("weight").and_then(Weight::parse).unwrap_or_default();
        let case_sensitive = attributes.get("case-sensitive") == Some("true");
        match GlobPattern::new(pattern, weight, case_sensitive) {
            Ok(glob) => {
                if let Some(draft) = self.draft_mut() {
                    draft.record.add_glob(glob);
                }
            },
            Err(e) => warn!(pattern, error = %e, "skipping invalid glob"),
        }
    }

    fn on_alias(&mut self, alias: MediaType) {
        if let Some(draft) = self.draft_mut() {
            draft.record.aliases.insert(alias);
            return;
        }
        if self.targets.iter().any(|t| t.is_identity(&alias))
            && let Some(current) = &self.current
            && !self.package_redirects.contains(current)
        {
            self.package_redirects.push(current.clone());
        }
    }
}

impl Visitor for Builder<'_> {
    fn interest(&self) -> Interest {
        Interest::all()
    }

    fn start(&mut self, element: Element, attributes: &Attributes) {
        let type_attr = || attributes.get("type").and_then(MediaType::parse);
        match element {
            Element::MimeType => match type_attr() {
                Some(media) => self.open_type(media),
                None => warn!(value = ?attributes.get("type"), "skipping <mime-type> with an unusable type"),
            },
            Element::Alias => {
                if let Some(alias) = type_attr() {
                    self.on_alias(alias);
                }
            },
            _ if self.draft.is_none() => {},
            Element::Comment => self.translated_comment = attributes.contains("xml:lang"),
            Element::SubClassOf => {
                if let Some(parent) = type_attr()
                    && let Some(draft) = self.draft_mut()
                {
                    draft.record.parents.insert(parent);
                }
            },
            Element::Glob => self.on_glob(attributes),
            Element::GlobDeleteAll => {
                if let Some(draft) = self.draft_mut() {
                    draft.record.clear_globs();
                    draft.clear_globs = true;
                }
            },
            Element::Magic => self.magic = Some(MagicTree::open(attributes)),
            Element::Match => {
                if let Some(tree) = &mut self.magic {
                    tree.push(attributes);
                }
            },
            Element::MagicDeleteAll => {
                if let Some(draft) = self.draft_mut() {
                    draft.record.magic.clear();
                    draft.clear_magic = true;
                }
            },
            Element::Icon | Element::GenericIcon => {
                let name = attributes.get("name").map(Box::from);
                if let Some(draft) = self.draft_mut() {
                    match element {
                        Element::Icon => overwrite(&mut draft.record.icon, name),
                        _ => overwrite(&mut draft.record.generic_icon, name),
                    }
                }
            },
            Element::RootXml => {
                let (Some(ns), Some(local)) = (attributes.get("namespaceURI"), attributes.get("localName")) else {
                    return;
                };
                let root = RootXml {
                    namespace_uri: ns.into(),
                    local_name: local.into(),
                };
                if let Some(draft) = self.draft_mut() {
                    draft.record.root_xml.insert(root);
                }
            },
            Element::MimeInfo | Element::Acronym | Element::ExpandedAcronym => {},
        }
    }

    fn text(&mut self, element: Element, text: &str) {
        if text.is_empty() {
            return;
        }
        let translated = self.translated_comment;
        let Some(draft) = self.draft_mut() else {
            return;
        };
        match element {
            Element::Comment if !translated => draft.record.description = Some(text.into()),
            Element::Acronym | Element::ExpandedAcronym => draft.record.set_acronym(text),
            _ => {},
        }
    }

    fn end(&mut self, element: Element) {
        match element {
            Element::Match => {
                let chain = self.magic.as_mut().and_then(MagicTree::pop);
                if let Some(chain) = chain
                    && let Some(draft) = self.draft_mut()
                {
                    draft.record.magic.insert(chain);
                }
            },
            Element::Magic => self.magic = None,
            Element::Comment => self.translated_comment = false,
            Element::MimeType => {
                self.current = None;
                self.draft = None;
            },
            _ => {},
        }
    }
}
