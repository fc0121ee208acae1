//! The immutable `(kingdom, phylum, genus)` triad naming a type.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::kingdom::Kingdom;

/// Immutable identity of a content type.
///
/// The canonical rendering (`phylum/` + kingdom prefix + genus, lowercase)
/// is computed once and shared. Equality, ordering and hashing all go
/// through that rendering, which makes an identity and its `&str` form
/// interchangeable as map keys:
///
/// ```
/// use std::collections::HashMap;
/// use taxon::identity::TypeIdentity;
///
/// let png = TypeIdentity::parse("image/png").unwrap();
/// let mut names = HashMap::new();
/// names.insert(png, "PNG image");
/// assert_eq!(names.get("image/png"), Some(&"PNG image"));
/// ```
#[derive(Clone)]
pub struct TypeIdentity {
    kingdom: Kingdom,
    repr: Arc<str>,
    slash: usize,
    genus_at: usize,
}

impl TypeIdentity {
    /// Build an identity from its parts.
    ///
    /// Parts are lowercased; `genus` must not carry the kingdom's facet
    /// prefix.
    pub fn new(kingdom: Kingdom, phylum: &str, genus: &str) -> Self {
        let phylum = phylum.to_ascii_lowercase();
        let prefix = kingdom.prefix();
        let mut repr = String::with_capacity(phylum.len() + 1 + prefix.len() + genus.len());
        repr.push_str(&phylum);
        repr.push('/');
        repr.push_str(prefix);
        let genus_at = repr.len();
        repr.extend(genus.chars().map(|c| c.to_ascii_lowercase()));

        Self {
            kingdom,
            slash: phylum.len(),
            genus_at,
            repr: Arc::from(repr),
        }
    }

    /// Parse a type string into the identity of its primary type.
    ///
    /// Parameters (`;charset=...`) and structured syntax suffixes (`+xml`)
    /// are ignored; use [`MediaType::parse`](super::MediaType::parse) to keep
    /// the suffix. Returns `None` for empty or malformed input.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxon::identity::{Kingdom, TypeIdentity};
    /// let doc = TypeIdentity::parse("application/vnd.ms-excel").unwrap();
    /// assert_eq!(doc.kingdom(), Kingdom::Vendor);
    /// assert_eq!(doc.genus(), "ms-excel");
    /// assert!(TypeIdentity::parse("").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        super::MediaType::parse(input).map(|media| media.primary().clone())
    }

    /// Parse a bare `phylum/subtype` string with no suffix handling.
    pub(crate) fn parse_plain(phylum: &str, subtype: &str) -> Self {
        let phylum = phylum.to_ascii_lowercase();
        let subtype = subtype.to_ascii_lowercase();
        let (kingdom, genus) = Kingdom::detect(&phylum, &subtype);
        Self::new(kingdom, &phylum, genus)
    }

    /// Registration tree of this type.
    #[inline]
    pub fn kingdom(&self) -> Kingdom {
        self.kingdom
    }

    /// Top-level media category, e.g. `image`.
    #[inline]
    pub fn phylum(&self) -> &str {
        &self.repr[..self.slash]
    }

    /// Subtype name without its facet prefix, e.g. `ms-excel`.
    #[inline]
    pub fn genus(&self) -> &str {
        &self.repr[self.genus_at..]
    }

    /// Subtype name including its facet prefix, e.g. `vnd.ms-excel`.
    #[inline]
    pub fn subtype(&self) -> &str {
        &self.repr[self.slash + 1..]
    }

    /// Canonical string form, e.g. `application/vnd.ms-excel`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// `application/octet-stream`, the root of every streamable type.
    pub fn octet_stream() -> Self {
        Self::new(Kingdom::Standards, "application", "octet-stream")
    }

    /// `text/plain`, the root of every textual type.
    pub fn text_plain() -> Self {
        Self::new(Kingdom::Standards, "text", "plain")
    }
}

/// Strip parameters and structured syntax suffixes from a raw type string.
///
/// Only registered suffix tags are removed, so the `+` characters inside
/// `text/x-c++src` survive.
pub(crate) fn primary_part(raw: &str) -> &str {
    let raw = raw.trim();
    let mut primary = raw[..raw.find(';').unwrap_or(raw.len())].trim_end();
    while let Some(plus) = primary.rfind('+') {
        let tag = &primary[plus + 1..];
        if !super::suffix::is_known_suffix(&tag.to_ascii_lowercase()) {
            break;
        }
        primary = &primary[..plus];
    }
    primary
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.repr == other.repr
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must hash exactly like the `str` it borrows as.
        self.as_str().hash(state);
    }
}

impl PartialOrd for TypeIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.repr.cmp(&other.repr)
    }
}

impl Borrow<str> for TypeIdentity {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for TypeIdentity {
    /// Compares against a raw type string, ignoring case, any `+suffix`
    /// and any `;parameter` tail.
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(primary_part(other))
    }
}

impl PartialEq<&str> for TypeIdentity {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_render_restores_facet_prefix() {
        let id = TypeIdentity::new(Kingdom::ExperimentalMicrosoft, "Application", "DOS-Executable");
        assert_eq!(id.as_str(), "application/x-ms-dos-executable");
        assert_eq!(id.phylum(), "application");
        assert_eq!(id.genus(), "dos-executable");
        assert_eq!(id.subtype(), "x-ms-dos-executable");
    }

    #[test]
    fn test_hash_matches_string_hash() {
        let id = TypeIdentity::parse("text/x-csrc").unwrap();
        assert_eq!(hash_of(&id), hash_of("text/x-csrc"));
    }

    #[test]
    fn test_string_comparison_ignores_suffix_and_parameters() {
        let svg = TypeIdentity::parse("image/svg+xml").unwrap();
        assert_eq!(svg.as_str(), "image/svg");
        assert!(svg == "image/svg+xml");
        assert!(svg == "IMAGE/SVG; charset=utf-8");
        assert!(svg != "image/png");
    }

    #[test]
    fn test_primary_part() {
        assert_eq!(primary_part(" text/plain ; charset=utf-8"), "text/plain");
        assert_eq!(primary_part("application/atom+xml"), "application/atom");
        assert_eq!(primary_part("text/x-c++src"), "text/x-c++src");
    }
}
