//! Offset-range index of content chains.
//!
//! Chains live in a flat arena addressed by [`ChainId`]. The index maps a
//! chain's earliest start offset, then the end of the furthest byte it can
//! inspect, to the chains sharing that range. Scans walk start offsets from
//! the highest down so that the byte window only ever grows towards the
//! front of the stream, and bytes beyond what the remaining ranges need are
//! released as soon as they are no longer reachable.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Read, Seek};

use tracing::trace;

use super::Candidate;
use super::window::Window;
use crate::identity::MediaType;
use crate::pattern::{Chain, ChainId, Weighted};

/// Every chain satisfied by a stream, with the type it belongs to.
pub type ContentMatches = BTreeMap<ChainId, Candidate>;

#[derive(Debug, Clone)]
struct Slot {
    chain: Chain,
    media: MediaType,
}

#[derive(Debug, Default)]
pub struct ContentIndex {
    arena: Vec<Option<Slot>>,
    free: Vec<ChainId>,
    ranges: BTreeMap<u64, BTreeMap<u64, Vec<ChainId>>>,
    owners: HashMap<MediaType, Vec<ChainId>>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live chains.
    pub fn len(&self) -> usize {
        self.arena.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, media: &MediaType, chain: &Chain) -> ChainId {
        let slot = Slot {
            chain: chain.clone(),
            media: media.clone(),
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.arena[id.index()] = Some(slot);
                id
            },
            None => {
                self.arena.push(Some(slot));
                ChainId((self.arena.len() - 1) as u32)
            },
        };

        self.ranges
            .entry(chain.earliest_start())
            .or_default()
            .entry(chain.reach())
            .or_default()
            .push(id);
        self.owners.entry(media.clone()).or_default().push(id);
        id
    }

    pub fn get(&self, id: ChainId) -> Option<(&Chain, &MediaType)> {
        self.arena
            .get(id.index())
            .and_then(Option::as_ref)
            .map(|slot| (&slot.chain, &slot.media))
    }

    /// Forget every chain of `media`.
    pub fn remove_type(&mut self, media: &MediaType) {
        let Some(ids) = self.owners.remove(media) else {
            return;
        };
        for id in ids {
            let Some(slot) = self.arena[id.index()].take() else {
                continue;
            };
            let start = slot.chain.earliest_start();
            if let Some(inner) = self.ranges.get_mut(&start) {
                if let Some(bucket) = inner.get_mut(&slot.chain.reach()) {
                    bucket.retain(|&other| other != id);
                    if bucket.is_empty() {
                        inner.remove(&slot.chain.reach());
                    }
                }
                if inner.is_empty() {
                    self.ranges.remove(&start);
                }
            }
            self.free.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.free.clear();
        self.ranges.clear();
        self.owners.clear();
    }

    /// Test every indexed chain against `source`, reading no byte at or past
    /// `limit`.
    pub fn scan<R: Read + Seek>(&self, source: &mut R, limit: u64) -> io::Result<ContentMatches> {
        // (start, furthest end) per start offset, highest start first.
        let spans: Vec<(u64, u64)> = self
            .ranges
            .iter()
            .rev()
            .filter(|&(&start, _)| start < limit)
            .map(|(&start, inner)| (start, inner.keys().next_back().copied().unwrap_or(start)))
            .collect();

        // needed_after[i]: furthest end any span after i can inspect.
        let mut needed_after = vec![0; spans.len()];
        let mut furthest = 0;
        for i in (0..spans.len()).rev() {
            needed_after[i] = furthest;
            furthest = furthest.max(spans[i].1);
        }

        let mut window = Window::new(source, limit);
        let mut matches = ContentMatches::new();
        for (i, &(start, end)) in spans.iter().enumerate() {
            window.fill(start, end)?;
            let (data, base) = window.data();
            for id in self.ranges[&start].values().flatten() {
                if let Some((chain, media)) = self.get(*id)
                    && chain.matches_in(data, base)
                {
                    matches.insert(*id, Candidate::new(media.clone(), chain.weight(), 0));
                }
            }
            window.retain_until(needed_after[i]);
        }
        trace!(
            chains = self.len(),
            matched = matches.len(),
            bytes_read = window.bytes_read(),
            "content scan finished"
        );
        Ok(matches)
    }
}
