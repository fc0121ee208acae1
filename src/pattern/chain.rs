//! AND-chains of byte sequences.
//!
//! A chain is one structural signature: every sequence in it must match.
//! Alternative signatures for the same type are separate chains.

use smallvec::SmallVec;

use super::sequence::Sequence;
use super::weight::{Weight, Weighted};

/// Index of a chain in the content matcher's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub(crate) u32);

impl ChainId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sequences that must all match, weighted by their `<magic>` priority.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chain {
    sequences: SmallVec<[Sequence; 2]>,
    weight: Weight,
}

impl Chain {
    /// Build a chain from the sequences on one path of a `<match>` tree.
    ///
    /// A chain of one sequence collapses onto that sequence: the priority is
    /// transferred to the sequence itself. Returns `None` for an empty path.
    pub fn new(sequences: impl IntoIterator<Item = Sequence>, priority: Weight) -> Option<Self> {
        let mut sequences: SmallVec<[Sequence; 2]> = sequences.into_iter().collect();
        if sequences.is_empty() {
            return None;
        }
        if let [only] = sequences.as_mut_slice() {
            only.set_weight(priority);
        }
        Some(Self {
            sequences,
            weight: priority,
        })
    }

    #[inline]
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Whether the chain collapsed to a single sequence.
    #[inline]
    pub fn is_single(&self) -> bool {
        self.sequences.len() == 1
    }

    /// Earliest offset any sequence may start at.
    pub fn earliest_start(&self) -> u64 {
        self.sequences.iter().map(Sequence::start).min().unwrap_or(0)
    }

    /// One past the last byte any sequence may inspect.
    pub fn reach(&self) -> u64 {
        self.sequences.iter().map(Sequence::reach).max().unwrap_or(0)
    }

    /// Test every sequence against `data`, which starts at offset `base`.
    pub fn matches_in(&self, data: &[u8], base: u64) -> bool {
        self.sequences.iter().all(|s| s.matches_in(data, base))
    }
}

impl Weighted for Chain {
    fn weight(&self) -> Weight {
        match self.sequences.as_slice() {
            [only] => only.weight(),
            _ => self.weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sequence_takes_container_weight() {
        let chain = Chain::new([Sequence::new(b"GIF8".to_vec(), 0, 0)], Weight::new(80)).unwrap();
        assert!(chain.is_single());
        assert_eq!(chain.sequences()[0].weight(), Weight::new(80));
        assert_eq!(chain.weight(), Weight::new(80));
    }

    #[test]
    fn test_all_sequences_must_match() {
        let chain = Chain::new(
            [
                Sequence::new(b"RIFF".to_vec(), 0, 0),
                Sequence::new(b"WAVE".to_vec(), 8, 8),
            ],
            Weight::DEFAULT,
        )
        .unwrap();
        assert_eq!(chain.earliest_start(), 0);
        assert_eq!(chain.reach(), 12);
        assert!(chain.matches_in(b"RIFF\0\0\0\0WAVE", 0));
        assert!(!chain.matches_in(b"RIFF\0\0\0\0AVI ", 0));
    }

    #[test]
    fn test_empty_chain_is_rejected() {
        assert!(Chain::new(std::iter::empty(), Weight::DEFAULT).is_none());
    }
}
