//! Sources of package file paths.

use std::path::{Path, PathBuf};

/// Produces the ordered list of package files a database loads.
///
/// Later entries may override or delete the contributions of earlier ones,
/// so the order is significant. A database asks once, at construction.
pub trait PackageLocator {
    fn packages(&self) -> Vec<PathBuf>;
}

/// A fixed list of package paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLocator {
    paths: Vec<PathBuf>,
}

impl StaticLocator {
    pub fn new<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }
}

impl PackageLocator for StaticLocator {
    fn packages(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

impl<F> PackageLocator for F
where
    F: Fn() -> Vec<PathBuf>,
{
    fn packages(&self) -> Vec<PathBuf> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_locator_keeps_order() {
        let locator = StaticLocator::new(["/b.xml", "/a.xml"]);
        assert_eq!(
            locator.packages(),
            vec![PathBuf::from("/b.xml"), PathBuf::from("/a.xml")]
        );
    }

    #[test]
    fn test_closure_locator() {
        let locator = || vec![PathBuf::from("/usr/share/mime/packages/freedesktop.org.xml")];
        assert_eq!(locator.packages().len(), 1);
    }
}
