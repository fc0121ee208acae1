//! Weights shared by glob and content-match evidence.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Relative priority of a piece of evidence, from 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(u8);

impl Weight {
    /// Weight of a glob or magic entry that does not declare one.
    pub const DEFAULT: Weight = Weight(50);
    pub const MIN: Weight = Weight(0);
    pub const MAX: Weight = Weight(100);

    /// Create a weight, clamping to `0..=100`.
    #[inline]
    pub const fn new(value: u32) -> Self {
        if value > 100 { Weight(100) } else { Weight(value as u8) }
    }

    /// Parse a `weight`/`priority` attribute. Out-of-range values clamp.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<u32>().ok().map(Weight::new)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::DEFAULT
    }
}

/// Anything that carries a [`Weight`].
pub trait Weighted {
    fn weight(&self) -> Weight;

    /// Order two items by weight, heaviest last.
    #[inline]
    fn cmp_weight(&self, other: &Self) -> Ordering
    where
        Self: Sized,
    {
        self.weight().cmp(&other.weight())
    }
}

impl Weighted for Weight {
    fn weight(&self) -> Weight {
        *self
    }
}

/// The heaviest item of `items`. Ties keep the first one seen.
pub fn heaviest<'a, T: Weighted>(items: impl IntoIterator<Item = &'a T>) -> Option<&'a T> {
    items.into_iter().fold(None, |best: Option<&T>, item| match best {
        Some(b) if b.weight() >= item.weight() => Some(b),
        _ => Some(item),
    })
}
