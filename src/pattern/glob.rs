//! Filename glob patterns from `<glob>` elements.

use std::borrow::Cow;
use std::fmt;

use glob::{MatchOptions, Pattern};
use smallvec::SmallVec;

use super::weight::{Weight, Weighted};
use crate::common::Result;

const METACHARACTERS: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// A weighted, optionally case-sensitive filename pattern.
///
/// Matching follows POSIX `fnmatch` semantics with leading-dot files
/// matchable by wildcards and `{a,b}` brace alternatives expanded up front.
#[derive(Clone)]
pub struct GlobPattern {
    source: Box<str>,
    weight: Weight,
    case_sensitive: bool,
    compiled: SmallVec<[Pattern; 1]>,
}

impl GlobPattern {
    /// Compile a pattern.
    pub fn new(source: &str, weight: Weight, case_sensitive: bool) -> Result<Self> {
        let compiled = expand_braces(source)
            .iter()
            .map(|alt| Pattern::new(alt))
            .collect::<std::result::Result<SmallVec<_>, _>>()?;

        Ok(Self {
            source: source.into(),
            weight,
            case_sensitive,
            compiled,
        })
    }

    /// The pattern as written in the package.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Length of the pattern, used to prefer longer globs on weight ties.
    #[inline]
    pub fn len(&self) -> usize {
        self.source.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Whether this is exactly `*.` followed by one literal extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxon::pattern::{GlobPattern, Weight};
    /// let png = GlobPattern::new("*.png", Weight::DEFAULT, false).unwrap();
    /// assert!(png.is_postfix());
    /// let tgz = GlobPattern::new("*.tar.gz", Weight::DEFAULT, false).unwrap();
    /// assert!(!tgz.is_postfix());
    /// ```
    pub fn is_postfix(&self) -> bool {
        self.literal_tail()
            .is_some_and(|tail| !tail.contains('.'))
    }

    /// Key of this pattern in the single-extension index.
    ///
    /// Case-insensitive patterns are folded to lowercase.
    pub fn postfix_key(&self) -> Option<Cow<'_, str>> {
        if !self.is_postfix() {
            return None;
        }
        let ext = &self.source[2..];
        Some(fold(ext, self.case_sensitive))
    }

    /// Extension components of a literal multi-extension pattern, last
    /// extension first: `*.tar.bz2` gives `["bz2", "tar"]`.
    pub fn components(&self) -> Option<SmallVec<[Box<str>; 3]>> {
        let tail = self.literal_tail()?;
        if !tail.contains('.') || tail.split('.').any(str::is_empty) {
            return None;
        }
        Some(
            tail.rsplit('.')
                .map(|c| fold(c, self.case_sensitive).into_owned().into_boxed_str())
                .collect(),
        )
    }

    fn literal_tail(&self) -> Option<&str> {
        let tail = self.source.strip_prefix("*.")?;
        (!tail.is_empty() && !tail.contains(METACHARACTERS)).then_some(tail)
    }

    /// Test a bare filename (no directory part) against this pattern.
    pub fn matches(&self, filename: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.compiled.iter().any(|p| p.matches_with(filename, options))
    }
}

pub(crate) fn fold(s: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive || !s.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.to_ascii_lowercase())
    }
}

impl Weighted for GlobPattern {
    fn weight(&self) -> Weight {
        self.weight
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.weight == other.weight
            && self.case_sensitive == other.case_sensitive
    }
}

impl Eq for GlobPattern {}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobPattern")
            .field("source", &self.source)
            .field("weight", &self.weight.get())
            .field("case_sensitive", &self.case_sensitive)
            .finish()
    }
}

/// Expand `{a,b}` alternatives, innermost groups included.
///
/// Unbalanced braces are kept literally.
///
/// # Examples
///
/// ```
/// use taxon::pattern::glob::expand_braces;
/// assert_eq!(expand_braces("*.{jpg,jpeg}"), vec!["*.jpg", "*.jpeg"]);
/// assert_eq!(expand_braces("a{b,c{d,e}}"), vec!["ab", "acd", "ace"]);
/// assert_eq!(expand_braces("*.{x"), vec!["*.{x"]);
/// ```
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    let Some(open) = bytes.iter().position(|&b| b == b'{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            },
            b',' if depth == 1 => splits.push(i),
            _ => {},
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    let mut bounds = Vec::with_capacity(splits.len() + 2);
    bounds.push(open);
    bounds.extend(splits);
    bounds.push(close);

    let mut out = Vec::new();
    for pair in bounds.windows(2) {
        let alternative = &pattern[pair[0] + 1..pair[1]];
        for expanded in expand_braces(&format!("{head}{alternative}{tail}")) {
            out.push(expanded);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(source: &str, case_sensitive: bool) -> GlobPattern {
        GlobPattern::new(source, Weight::DEFAULT, case_sensitive).unwrap()
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let pdf = glob("*.pdf", false);
        assert!(pdf.matches("REPORT.PDF"));
        assert!(pdf.matches("report.pdf"));
        assert_eq!(pdf.postfix_key().as_deref(), Some("pdf"));
    }

    #[test]
    fn test_case_sensitive_rejects_other_case() {
        let cpp = glob("*.C", true);
        assert!(cpp.matches("main.C"));
        assert!(!cpp.matches("main.c"));
        assert_eq!(cpp.postfix_key().as_deref(), Some("C"));
    }

    #[test]
    fn test_hidden_files_match_wildcards() {
        assert!(glob("*rc", false).matches(".bashrc"));
        assert!(glob("*.conf", false).matches(".hidden.conf"));
    }

    #[test]
    fn test_components_of_literal_multi_extension() {
        let tbz = glob("*.tar.bz2", false);
        let components = tbz.components().unwrap().to_vec();
        let expected: Vec<Box<str>> = vec!["bz2".into(), "tar".into()];
        assert_eq!(components, expected);
        assert!(glob("*.png", false).components().is_none());
        assert!(glob("*.tar.*", false).components().is_none());
        assert!(glob("README*", false).components().is_none());
    }

    #[test]
    fn test_freeform_is_neither_postfix_nor_components() {
        let makefile = glob("[Mm]akefile", false);
        assert!(!makefile.is_postfix());
        assert!(makefile.components().is_none());
        assert!(makefile.matches("makefile"));
    }

    #[test]
    fn test_brace_alternatives_match() {
        let jpeg = glob("*.{jpg,jpeg}", false);
        assert!(jpeg.matches("a.jpeg"));
        assert!(jpeg.matches("a.JPG"));
        assert!(!jpeg.is_postfix());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(GlobPattern::new("*.[", Weight::DEFAULT, false).is_err());
    }
}
