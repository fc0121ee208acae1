//! Accumulated evidence about one type.

use crate::identity::{MediaType, TypeIdentity};
use crate::pattern::{Chain, GlobPattern};

use super::evidence::Evidence;

/// A `<root-XML>` declaration: documents whose root element has this
/// namespace and local name are of the declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootXml {
    pub namespace_uri: Box<str>,
    pub local_name: Box<str>,
}

/// Everything the loaded packages say about one type.
///
/// Records are created empty on first reference and filled in by the
/// package parser. They are never removed; a package's deletion directives
/// and package toggles clear individual fields instead.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRecord {
    media: MediaType,
    pub(crate) defined: bool,
    pub(crate) complete: bool,
    pub(crate) description: Option<Box<str>>,
    pub(crate) acronym: Option<Box<str>>,
    pub(crate) expanded_acronym: Option<Box<str>>,
    pub(crate) icon: Option<Box<str>>,
    pub(crate) generic_icon: Option<Box<str>>,
    pub(crate) parents: Evidence<MediaType>,
    pub(crate) children: Evidence<MediaType>,
    pub(crate) aliases: Evidence<MediaType>,
    pub(crate) postfixes: Evidence<GlobPattern>,
    pub(crate) complex_globs: Evidence<GlobPattern>,
    pub(crate) magic: Evidence<Chain>,
    pub(crate) root_xml: Evidence<RootXml>,
}

impl TypeRecord {
    /// An empty record for `media`.
    pub fn new(media: MediaType) -> Self {
        Self {
            media,
            defined: false,
            complete: false,
            description: None,
            acronym: None,
            expanded_acronym: None,
            icon: None,
            generic_icon: None,
            parents: Evidence::Unset,
            children: Evidence::Unset,
            aliases: Evidence::Unset,
            postfixes: Evidence::Unset,
            complex_globs: Evidence::Unset,
            magic: Evidence::Unset,
            root_xml: Evidence::Unset,
        }
    }

    #[inline]
    pub fn media_type(&self) -> &MediaType {
        &self.media
    }

    #[inline]
    pub fn identity(&self) -> &TypeIdentity {
        self.media.primary()
    }

    /// Syntax type of a suffixed record, e.g. `application/xml` for
    /// `image/svg+xml`.
    #[inline]
    pub fn suffix(&self) -> Option<&TypeIdentity> {
        self.media.suffix()
    }

    /// Whether any enabled package declares this type.
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn acronym(&self) -> Option<&str> {
        self.acronym.as_deref()
    }

    #[inline]
    pub fn expanded_acronym(&self) -> Option<&str> {
        self.expanded_acronym.as_deref()
    }

    #[inline]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    #[inline]
    pub fn generic_icon(&self) -> Option<&str> {
        self.generic_icon.as_deref()
    }

    #[inline]
    pub fn parents(&self) -> &Evidence<MediaType> {
        &self.parents
    }

    #[inline]
    pub fn children(&self) -> &Evidence<MediaType> {
        &self.children
    }

    #[inline]
    pub fn aliases(&self) -> &Evidence<MediaType> {
        &self.aliases
    }

    /// Single-extension globs such as `*.png`.
    #[inline]
    pub fn postfixes(&self) -> &Evidence<GlobPattern> {
        &self.postfixes
    }

    /// Multi-extension and freeform globs such as `*.tar.gz` or `Makefile`.
    #[inline]
    pub fn complex_globs(&self) -> &Evidence<GlobPattern> {
        &self.complex_globs
    }

    /// Every glob regardless of index.
    pub fn globs(&self) -> impl Iterator<Item = &GlobPattern> {
        self.postfixes.iter().chain(self.complex_globs.iter())
    }

    #[inline]
    pub fn magic(&self) -> &Evidence<Chain> {
        &self.magic
    }

    #[inline]
    pub fn root_xml(&self) -> &Evidence<RootXml> {
        &self.root_xml
    }

    /// Route a glob into the postfix or complex set.
    pub(crate) fn add_glob(&mut self, glob: GlobPattern) -> bool {
        if glob.is_postfix() {
            self.postfixes.insert(glob)
        } else {
            self.complex_globs.insert(glob)
        }
    }

    pub(crate) fn clear_globs(&mut self) {
        self.postfixes.clear();
        self.complex_globs.clear();
    }

    /// Set a short or expanded acronym. Values containing a space are the
    /// expanded form.
    pub(crate) fn set_acronym(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if value.contains(' ') {
            self.expanded_acronym = Some(value.into());
        } else {
            self.acronym = Some(value.into());
        }
    }

    /// Drop everything learned from packages, keeping the key.
    pub(crate) fn reset(&mut self) {
        let media = self.media.clone();
        *self = TypeRecord::new(media);
    }
}
