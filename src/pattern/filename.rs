//! Filenames decomposed for index lookups.

use std::path::Path;

use smallvec::SmallVec;

/// A bare filename and its extension components, last extension first.
///
/// `report.tar.bz2` decomposes into `["bz2", "tar"]`. The stem may be
/// empty: `.png` has the extension `png`, as `*.png` matches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName {
    name: Box<str>,
    extensions: SmallVec<[Box<str>; 3]>,
}

impl FileName {
    pub fn new(name: &str) -> Self {
        let mut parts = name.split('.');
        parts.next();
        let mut extensions: SmallVec<[Box<str>; 3]> = parts.map(Box::from).collect();
        extensions.reverse();
        // `archive.` has an empty trailing component that names nothing.
        while extensions.first().is_some_and(|e| e.is_empty()) {
            extensions.remove(0);
        }

        Self {
            name: name.into(),
            extensions,
        }
    }

    /// The final path component of `path`, if it is valid UTF-8.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()?.to_str().map(Self::new)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Extension components, last first.
    #[inline]
    pub fn extensions(&self) -> &[Box<str>] {
        &self.extensions
    }

    /// The final extension, e.g. `bz2`.
    #[inline]
    pub fn last_extension(&self) -> Option<&str> {
        self.extensions.first().map(|e| e.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_extension_order() {
        let file = FileName::new("report.tar.bz2");
        let exts: Vec<&str> = file.extensions().iter().map(|e| e.as_ref()).collect();
        assert_eq!(exts, vec!["bz2", "tar"]);
        assert_eq!(file.last_extension(), Some("bz2"));
    }

    #[test]
    fn test_hidden_and_bare_names() {
        assert_eq!(FileName::new(".png").last_extension(), Some("png"));
        assert_eq!(FileName::new(".bashrc").last_extension(), Some("bashrc"));
        let config = FileName::new(".config.json");
        let exts: Vec<&str> = config.extensions().iter().map(|e| e.as_ref()).collect();
        assert_eq!(exts, vec!["json", "config"]);
        assert!(FileName::new("Makefile").extensions().is_empty());
        assert!(FileName::new("weird.").extensions().is_empty());
    }

    #[test]
    fn test_from_path_takes_last_component() {
        let file = FileName::from_path(Path::new("/tmp/memo.doc")).unwrap();
        assert_eq!(file.as_str(), "memo.doc");
    }
}
