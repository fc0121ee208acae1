use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Unescape XML special characters in an attribute value.
///
/// Replaces the five standard XML entities with their corresponding characters.
/// Unknown or malformed entities are left unchanged. Values without an
/// ampersand are returned borrowed.
///
/// # Examples
///
/// ```
/// use taxon::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;?xml"), "<?xml");
/// assert_eq!(unescape_xml("a & b"), "a & b"); // unchanged
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;"); // &amp; is matched first
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> Cow<'_, str> {
    if memchr::memchr(b'&', s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }
    Cow::Owned(XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"]))
}

/// Resolve the name of a general reference reported between text runs.
///
/// Handles the predefined entities and numeric character references
/// (`#65`, `#x41`). Returns `None` for anything else.
pub fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    let predefined = match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    };
    if let Some(s) = predefined {
        return Some(Cow::Borrowed(s));
    }

    let numeric = name.strip_prefix('#')?;
    let code = match numeric.strip_prefix('x').or_else(|| numeric.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => numeric.parse::<u32>().ok()?,
    };
    char::from_u32(code).map(|c| Cow::Owned(c.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_borrows_plain_values() {
        assert!(matches!(unescape_xml("plain"), Cow::Borrowed(_)));
        assert_eq!(unescape_xml("&quot;hi&apos;"), "\"hi'");
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp").as_deref(), Some("&"));
        assert_eq!(resolve_reference("#x41").as_deref(), Some("A"));
        assert_eq!(resolve_reference("#66").as_deref(), Some("B"));
        assert_eq!(resolve_reference("nbsp"), None);
    }
}
