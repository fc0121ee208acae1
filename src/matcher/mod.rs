//! Filename and content indices over built records.
//!
//! Both indices are filled from complete records only and report every
//! structurally satisfied candidate; choosing between candidates is left to
//! [`crate::decision`].

// Submodule declarations
pub mod content;
pub mod filename;
pub mod window;

// Re-exports
pub use content::ContentIndex;
pub use filename::FileNameIndex;
pub use window::Window;

use std::cmp::Ordering;

use crate::identity::MediaType;
use crate::pattern::{Weight, Weighted};

/// One type proposed by an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub media: MediaType,
    pub weight: Weight,
    /// Length of the glob that produced the candidate; zero for content
    /// matches.
    pub pattern_len: usize,
}

impl Candidate {
    pub fn new(media: MediaType, weight: Weight, pattern_len: usize) -> Self {
        Self {
            media,
            weight,
            pattern_len,
        }
    }

    /// Order by weight, then pattern length; heavier and longer sort last.
    /// Remaining ties fall back to the reverse type string so that the
    /// alphabetically first type sorts last.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.pattern_len.cmp(&other.pattern_len))
            .then_with(|| other.media.as_str().cmp(self.media.as_str()))
    }
}

impl Weighted for Candidate {
    fn weight(&self) -> Weight {
        self.weight
    }
}

/// Result of one index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Single(Candidate),
    /// Several distinct types, strongest evidence per type.
    Set(Vec<Candidate>),
}

impl Hit {
    /// Collapse raw candidates into a hit, keeping the best candidate per
    /// type. `None` when there are no candidates.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Option<Self> {
        let mut best: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            match best.iter_mut().find(|c| c.media == candidate.media) {
                Some(existing) if candidate.rank(existing).is_gt() => *existing = candidate,
                Some(_) => {},
                None => best.push(candidate),
            }
        }
        match best.len() {
            0 => None,
            1 => best.pop().map(Hit::Single),
            _ => Some(Hit::Set(best)),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Hit::Single(c) => std::slice::from_ref(c),
            Hit::Set(cs) => cs,
        }
    }

    pub fn contains(&self, media: &MediaType) -> bool {
        self.candidates().iter().any(|c| &c.media == media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(s: &str, weight: u32, len: usize) -> Candidate {
        Candidate::new(MediaType::parse(s).unwrap(), Weight::new(weight), len)
    }

    #[test]
    fn test_hit_keeps_best_per_type() {
        let hit = Hit::from_candidates([
            candidate("image/png", 50, 5),
            candidate("image/png", 80, 5),
        ])
        .unwrap();
        assert_eq!(hit, Hit::Single(candidate("image/png", 80, 5)));

        let hit = Hit::from_candidates([candidate("image/png", 50, 5), candidate("image/apng", 50, 5)]).unwrap();
        assert_eq!(hit.candidates().len(), 2);
        assert!(hit.contains(&MediaType::parse("image/apng").unwrap()));
        assert!(Hit::from_candidates([]).is_none());
    }

    #[test]
    fn test_rank() {
        assert!(candidate("a/b", 60, 1).rank(&candidate("a/c", 50, 9)).is_gt());
        assert!(candidate("a/b", 50, 9).rank(&candidate("a/c", 50, 1)).is_gt());
        assert!(candidate("a/b", 50, 1).rank(&candidate("a/c", 50, 1)).is_gt());
    }
}
