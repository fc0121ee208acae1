//! Lookup keys covering both simple and suffixed types.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use super::composite::CompositeType;
use super::suffix::is_known_suffix;
use super::type_identity::TypeIdentity;

/// A parsed type string: either a plain identity or a suffixed composite.
///
/// Like [`TypeIdentity`], a `MediaType` hashes and compares through its
/// canonical string and can be looked up by `&str`.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaType {
    Simple(TypeIdentity),
    Composite(CompositeType),
}

impl MediaType {
    /// Parse an IANA-style type string.
    ///
    /// The input is trimmed, lowercased and stripped of parameters. Trailing
    /// `+suffix` tags are peeled off into a composite only when they are
    /// registered structured syntax suffixes. Empty or malformed input yields
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxon::identity::{Kingdom, MediaType};
    ///
    /// let svg = MediaType::parse("image/svg+xml").unwrap();
    /// assert_eq!(svg.primary().phylum(), "image");
    /// assert_eq!(svg.primary().genus(), "svg");
    /// assert_eq!(svg.primary().kingdom(), Kingdom::Standards);
    /// assert_eq!(svg.suffix().unwrap().as_str(), "application/xml");
    /// assert_eq!(svg.to_string(), "image/svg+xml");
    ///
    /// assert!(MediaType::parse("   ").is_none());
    /// assert!(MediaType::parse("image").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        let raw = raw[..raw.find(';').unwrap_or(raw.len())].trim();
        if raw.is_empty() || raw.contains(char::is_whitespace) {
            return None;
        }

        let lower = raw.to_ascii_lowercase();
        let (phylum, subtype) = lower.split_once('/')?;
        if phylum.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }

        let mut base = subtype;
        let mut tags: SmallVec<[&str; 2]> = SmallVec::new();
        while let Some(plus) = base.rfind('+') {
            let tag = &base[plus + 1..];
            if plus == 0 || !is_known_suffix(tag) {
                break;
            }
            tags.push(tag);
            base = &base[..plus];
        }
        tags.reverse();

        let primary = TypeIdentity::parse_plain(phylum, base);
        if tags.is_empty() {
            return Some(MediaType::Simple(primary));
        }
        CompositeType::new(primary, tags).map(MediaType::Composite)
    }

    /// Canonical string form.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Simple(id) => id.as_str(),
            MediaType::Composite(c) => c.as_str(),
        }
    }

    /// The primary identity (the type itself for a simple type).
    #[inline]
    pub fn primary(&self) -> &TypeIdentity {
        match self {
            MediaType::Simple(id) => id,
            MediaType::Composite(c) => c.primary(),
        }
    }

    /// The first suffix syntax type, if any.
    #[inline]
    pub fn suffix(&self) -> Option<&TypeIdentity> {
        match self {
            MediaType::Simple(_) => None,
            MediaType::Composite(c) => c.suffixes().first(),
        }
    }

    /// Every identity this key decomposes into, primary first.
    pub fn members(&self) -> &[TypeIdentity] {
        match self {
            MediaType::Simple(id) => std::slice::from_ref(id),
            MediaType::Composite(c) => c.members(),
        }
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, MediaType::Composite(_))
    }
}

impl From<TypeIdentity> for MediaType {
    fn from(id: TypeIdentity) -> Self {
        MediaType::Simple(id)
    }
}

impl From<CompositeType> for MediaType {
    fn from(composite: CompositeType) -> Self {
        MediaType::Composite(composite)
    }
}

impl Hash for MediaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for MediaType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MediaType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Borrow<str> for MediaType {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for MediaType {
    /// Compares against a raw type string, ignoring case and parameters.
    fn eq(&self, other: &str) -> bool {
        let other = other.trim();
        let other = other[..other.find(';').unwrap_or(other.len())].trim_end();
        self.as_str().eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for MediaType {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MediaType({})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Kingdom;
    use proptest::prelude::*;

    #[test]
    fn test_parse_strips_parameters_and_case() {
        let html = MediaType::parse(" Text/HTML; charset=UTF-8 ").unwrap();
        assert_eq!(html.as_str(), "text/html");
        assert!(!html.is_composite());
        assert!(html == "text/html;charset=utf-8");
    }

    #[test]
    fn test_unknown_plus_stays_in_genus() {
        let cpp = MediaType::parse("text/x-c++src").unwrap();
        assert!(!cpp.is_composite());
        assert_eq!(cpp.primary().kingdom(), Kingdom::Experimental);
        assert_eq!(cpp.primary().genus(), "c++src");
    }

    #[test]
    fn test_multiple_suffixes_keep_order() {
        let media = MediaType::parse("application/vnd.foo+json+zip").unwrap();
        assert_eq!(media.members().len(), 3);
        assert_eq!(media.members()[1].as_str(), "application/json");
        assert_eq!(media.members()[2].as_str(), "application/zip");
        assert_eq!(media.to_string(), "application/vnd.foo+json+zip");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(MediaType::parse("/png").is_none());
        assert!(MediaType::parse("image/").is_none());
        assert!(MediaType::parse("image/png/extra").is_none());
        assert!(MediaType::parse("image/p ng").is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_render_parse_round_trip(
            phylum in prop_oneof![Just("application"), Just("image"), Just("text"), Just("inode"), Just("x-content")],
            facet in prop_oneof![Just(""), Just("vnd."), Just("prs."), Just("x-"), Just("x-ms-"), Just("x.")],
            genus in "[a-zA-Z][a-zA-Z0-9.-]{0,12}",
            suffix in prop_oneof![Just(""), Just("+xml"), Just("+json"), Just("+zip")],
            params in prop_oneof![Just(""), Just(";charset=utf-8"), Just(" ; q=1")],
        ) {
            let raw = format!("{phylum}/{facet}{genus}{suffix}{params}");
            let canonical = format!("{phylum}/{facet}{genus}{suffix}").to_ascii_lowercase();
            let parsed = MediaType::parse(&raw).unwrap();
            prop_assert_eq!(parsed.to_string(), canonical.clone());
            let reparsed = MediaType::parse(&parsed.to_string()).unwrap();
            prop_assert_eq!(reparsed, parsed);
        }
    }
}
