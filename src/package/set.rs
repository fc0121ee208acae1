//! The ordered package list with per-entry enable flags and file handles.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::locator::PackageLocator;

/// Enabled state of one package file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageStatus {
    pub path: PathBuf,
    pub enabled: bool,
}

#[derive(Debug)]
struct PackageEntry {
    path: PathBuf,
    enabled: bool,
    file: Option<File>,
}

/// A readable package file for the duration of one scan.
///
/// With persistent handles the file stays open in the [`PackageSet`] and is
/// rewound before it is handed out; otherwise the file is opened for the
/// scan and closed when the handle drops.
#[derive(Debug)]
pub enum PackageHandle<'a> {
    Persistent(&'a mut File),
    Transient(File),
}

impl Read for PackageHandle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            PackageHandle::Persistent(file) => file.read(buf),
            PackageHandle::Transient(file) => file.read(buf),
        }
    }
}

/// Every package a database knows about, in load order.
#[derive(Debug)]
pub struct PackageSet {
    entries: Vec<PackageEntry>,
    keep_open: bool,
}

impl PackageSet {
    /// All `paths` enabled, in the given order. Duplicates keep their first
    /// position.
    pub fn new<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>, keep_open: bool) -> Self {
        let mut entries: Vec<PackageEntry> = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if entries.iter().any(|e| e.path == path) {
                continue;
            }
            entries.push(PackageEntry {
                path: path.to_path_buf(),
                enabled: true,
                file: None,
            });
        }
        Self { entries, keep_open }
    }

    pub fn from_locator(locator: &dyn PackageLocator, keep_open: bool) -> Self {
        Self::new(locator.packages(), keep_open)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether file handles are kept open between scans.
    #[inline]
    pub fn keeps_open(&self) -> bool {
        self.keep_open
    }

    /// Enable or disable the package at `path`.
    ///
    /// Returns `true` when the state actually changed. Unknown paths are
    /// left alone. Disabling a package also closes its persistent handle.
    pub fn toggle(&mut self, path: &Path, enabled: bool) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.path == path) else {
            warn!(path = %path.display(), "toggle requested for unknown package");
            return false;
        };
        if entry.enabled == enabled {
            return false;
        }
        entry.enabled = enabled;
        if !enabled {
            entry.file = None;
        }
        info!(path = %path.display(), enabled, "package toggled");
        true
    }

    pub fn is_enabled(&self, path: &Path) -> Option<bool> {
        self.entries.iter().find(|e| e.path == path).map(|e| e.enabled)
    }

    pub fn status(&self) -> Vec<PackageStatus> {
        self.entries
            .iter()
            .map(|e| PackageStatus {
                path: e.path.clone(),
                enabled: e.enabled,
            })
            .collect()
    }

    /// Call `visit` with a handle to every enabled package, in order.
    ///
    /// Packages that cannot be opened are logged and skipped. Returns the
    /// number of packages visited.
    pub fn for_each_enabled<F>(&mut self, mut visit: F) -> usize
    where
        F: FnMut(&Path, PackageHandle<'_>),
    {
        let keep_open = self.keep_open;
        let mut visited = 0;
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            match open(&entry.path, &mut entry.file, keep_open) {
                Ok(handle) => {
                    visit(&entry.path, handle);
                    visited += 1;
                },
                Err(e) => {
                    warn!(path = %entry.path.display(), error = %e, "cannot open package");
                },
            }
        }
        visited
    }
}

fn open<'a>(path: &Path, slot: &'a mut Option<File>, keep_open: bool) -> io::Result<PackageHandle<'a>> {
    if !keep_open {
        return File::open(path).map(PackageHandle::Transient);
    }

    let file = match slot.take() {
        Some(mut file) => {
            file.seek(SeekFrom::Start(0))?;
            file
        },
        None => File::open(path)?,
    };
    Ok(PackageHandle::Persistent(slot.insert(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn package(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn read_all(set: &mut PackageSet) -> Vec<String> {
        let mut out = Vec::new();
        set.for_each_enabled(|_, mut handle| {
            let mut s = String::new();
            handle.read_to_string(&mut s).unwrap();
            out.push(s);
        });
        out
    }

    #[test]
    fn test_toggle_skips_disabled() {
        let a = package("a");
        let b = package("b");
        let mut set = PackageSet::new([a.path(), b.path()], false);

        assert!(set.toggle(a.path(), false));
        assert!(!set.toggle(a.path(), false));
        assert_eq!(read_all(&mut set), vec!["b"]);
        assert_eq!(set.is_enabled(a.path()), Some(false));

        assert!(set.toggle(a.path(), true));
        assert_eq!(read_all(&mut set), vec!["a", "b"]);
    }

    #[test]
    fn test_persistent_handles_are_rewound() {
        let a = package("persistent");
        let mut set = PackageSet::new([a.path()], true);
        assert_eq!(read_all(&mut set), vec!["persistent"]);
        assert_eq!(read_all(&mut set), vec!["persistent"]);
    }

    #[test]
    fn test_missing_package_is_skipped() {
        let a = package("present");
        let mut set = PackageSet::new([Path::new("/nonexistent/pkg.xml"), a.path()], false);
        assert_eq!(read_all(&mut set), vec!["present"]);
    }

    #[test]
    fn test_duplicates_and_unknown_paths() {
        let a = package("a");
        let mut set = PackageSet::new([a.path(), a.path()], false);
        assert_eq!(set.len(), 1);
        assert!(!set.toggle(Path::new("/elsewhere.xml"), false));
        assert!(set.status()[0].enabled);
    }
}
