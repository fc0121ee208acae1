//! Package element vocabulary and the interest categories it falls into.

use bitflags::bitflags;
use phf::phf_map;

bitflags! {
    /// Categories of package elements a scan can care about.
    ///
    /// Structural elements (`<mime-info>`, `<mime-type>`) belong to no
    /// category and are always delivered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Interest: u8 {
        /// `<glob>` and `<glob-deleteall>`
        const GLOB = 0x01;
        /// `<magic>`, `<match>` and `<magic-deleteall>`
        const MAGIC = 0x02;
        /// `<sub-class-of>` and `<alias>`
        const HIERARCHY = 0x04;
        /// Descriptions, acronyms, icons and `<root-XML>`
        const TEXT = 0x08;
    }
}

/// A package element the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    MimeInfo,
    MimeType,
    Comment,
    Acronym,
    ExpandedAcronym,
    Icon,
    GenericIcon,
    SubClassOf,
    Alias,
    Glob,
    GlobDeleteAll,
    Magic,
    Match,
    MagicDeleteAll,
    RootXml,
}

static ELEMENTS: phf::Map<&'static str, Element> = phf_map! {
    "mime-info" => Element::MimeInfo,
    "mime-type" => Element::MimeType,
    "comment" => Element::Comment,
    "acronym" => Element::Acronym,
    "expanded-acronym" => Element::ExpandedAcronym,
    "icon" => Element::Icon,
    "generic-icon" => Element::GenericIcon,
    "sub-class-of" => Element::SubClassOf,
    "alias" => Element::Alias,
    "glob" => Element::Glob,
    "glob-deleteall" => Element::GlobDeleteAll,
    "magic" => Element::Magic,
    "match" => Element::Match,
    "magic-deleteall" => Element::MagicDeleteAll,
    "root-XML" => Element::RootXml,
};

impl Element {
    /// Look up an element by local name. Unknown elements (such as
    /// `<treemagic>`) are `None` and skipped with their subtree.
    pub fn from_local_name(name: &[u8]) -> Option<Self> {
        std::str::from_utf8(name).ok().and_then(|n| ELEMENTS.get(n).copied())
    }

    pub fn category(self) -> Interest {
        match self {
            Element::MimeInfo | Element::MimeType => Interest::empty(),
            Element::Glob | Element::GlobDeleteAll => Interest::GLOB,
            Element::Magic | Element::Match | Element::MagicDeleteAll => Interest::MAGIC,
            Element::SubClassOf | Element::Alias => Interest::HIERARCHY,
            Element::Comment
            | Element::Acronym
            | Element::ExpandedAcronym
            | Element::Icon
            | Element::GenericIcon
            | Element::RootXml => Interest::TEXT,
        }
    }

    /// Whether a scan with `interest` needs this element.
    #[inline]
    pub fn wanted_by(self, interest: Interest) -> bool {
        let category = self.category();
        category.is_empty() || interest.intersects(category)
    }

    /// Elements whose text content carries the value.
    #[inline]
    pub fn has_text(self) -> bool {
        matches!(self, Element::Comment | Element::Acronym | Element::ExpandedAcronym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Element::from_local_name(b"glob"), Some(Element::Glob));
        assert_eq!(Element::from_local_name(b"root-XML"), Some(Element::RootXml));
        assert_eq!(Element::from_local_name(b"treemagic"), None);
    }

    #[test]
    fn test_structural_elements_always_wanted() {
        assert!(Element::MimeType.wanted_by(Interest::empty()));
        assert!(!Element::Glob.wanted_by(Interest::MAGIC));
        assert!(Element::Match.wanted_by(Interest::MAGIC | Interest::GLOB));
    }
}
