//! Configuration of a database instance.

use serde::{Deserialize, Serialize};

use crate::decision::ConflictPolicy;

/// Options fixed when a database is opened.
///
/// # Examples
///
/// ```rust
/// use taxon::database::DatabaseOptions;
/// use taxon::decision::ConflictPolicy;
///
/// let options = DatabaseOptions::new()
///     .with_cache_capacity(256)
///     .with_keep_packages_open(true)
///     .with_conflict_policy(ConflictPolicy::SubclassOnly);
/// assert_eq!(options.cache_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseOptions {
    /// Distinct requests whose answers the query service remembers.
    pub cache_capacity: usize,
    /// Keep package files open between scans instead of reopening them.
    pub keep_packages_open: bool,
    /// How conflicting filename and content evidence is settled.
    pub conflict_policy: ConflictPolicy,
    /// Upper bound on the bytes read from one stream for content matching.
    pub max_scan_bytes: u64,
    /// Consult extended attributes for an explicit type before matching.
    pub xattr_override: bool,
    /// Distinct crashing requests the supervisor remembers as poisoned.
    pub retry_memory: usize,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            cache_capacity: 111,
            keep_packages_open: false,
            conflict_policy: ConflictPolicy::Family,
            max_scan_bytes: 64 * 1024,
            xattr_override: true,
            retry_memory: 4,
        }
    }
}

impl DatabaseOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    #[inline]
    pub fn with_keep_packages_open(mut self, keep_open: bool) -> Self {
        self.keep_packages_open = keep_open;
        self
    }

    #[inline]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    #[inline]
    pub fn with_max_scan_bytes(mut self, bytes: u64) -> Self {
        self.max_scan_bytes = bytes;
        self
    }

    #[inline]
    pub fn with_xattr_override(mut self, enabled: bool) -> Self {
        self.xattr_override = enabled;
        self
    }

    #[inline]
    pub fn with_retry_memory(mut self, entries: usize) -> Self {
        self.retry_memory = entries;
        self
    }
}
