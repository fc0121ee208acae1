//! Byte-sequence candidates from `<match>` elements.

use std::fmt;

use crate::common::binary::{Endian, Width, encode_int};
use crate::common::literal::{decode_c_escapes, parse_hex_bytes, parse_number};
use crate::common::{Error, Result};

use super::weight::{Weight, Weighted};

/// Encoding of a `<match>` value, from its `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Byte,
    Int16(Endian),
    Int32(Endian),
    /// An unrecognized `type`; the value is taken as raw text.
    Raw,
}

impl ValueKind {
    /// Map a `type` attribute to its encoding. `host16`/`host32` resolve to
    /// the platform byte order here, once, at load time.
    pub fn from_attribute(kind: &str) -> Self {
        match kind {
            "string" => ValueKind::String,
            "byte" => ValueKind::Byte,
            "host16" => ValueKind::Int16(Endian::HOST),
            "host32" => ValueKind::Int32(Endian::HOST),
            "big16" => ValueKind::Int16(Endian::Big),
            "big32" => ValueKind::Int32(Endian::Big),
            "little16" => ValueKind::Int16(Endian::Little),
            "little32" => ValueKind::Int32(Endian::Little),
            _ => ValueKind::Raw,
        }
    }

    fn integer(self) -> Option<(Width, Endian)> {
        match self {
            ValueKind::Byte => Some((Width::One, Endian::HOST)),
            ValueKind::Int16(e) => Some((Width::Two, e)),
            ValueKind::Int32(e) => Some((Width::Four, e)),
            ValueKind::String | ValueKind::Raw => None,
        }
    }
}

/// One byte pattern, optionally masked, anchored at an offset or a range of
/// offsets.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    pattern: Box<[u8]>,
    mask: Option<Box<[u8]>>,
    start: u64,
    end: u64,
    weight: Weight,
}

impl Sequence {
    /// A sequence that must appear at some offset in `start..=end`.
    pub fn new(pattern: impl Into<Box<[u8]>>, start: u64, end: u64) -> Self {
        Self {
            pattern: pattern.into(),
            mask: None,
            start,
            end: end.max(start),
            weight: Weight::DEFAULT,
        }
    }

    /// Apply a mask. A mask shorter than the pattern is padded with `0xFF`,
    /// a longer one is truncated.
    pub fn with_mask(mut self, mask: impl Into<Vec<u8>>) -> Self {
        let mut mask = mask.into();
        mask.resize(self.pattern.len(), 0xFF);
        self.mask = Some(mask.into_boxed_slice());
        self
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    pub(crate) fn set_weight(&mut self, weight: Weight) {
        self.weight = weight;
    }

    /// Decode the attributes of a `<match>` element.
    ///
    /// Values that do not decode in their declared encoding fall back to the
    /// raw attribute text. Numbers wider than the declared width keep their
    /// low-order bytes. Only an empty value or an unreadable offset is an
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxon::pattern::Sequence;
    /// let elf = Sequence::from_attributes("string", r"\177ELF", "0", None).unwrap();
    /// assert_eq!(elf.pattern(), b"\x7fELF");
    ///
    /// let be = Sequence::from_attributes("big16", "0xfeff", "0:4", None).unwrap();
    /// assert_eq!(be.pattern(), &[0xFE, 0xFF]);
    /// assert_eq!((be.start(), be.end()), (0, 4));
    /// ```
    pub fn from_attributes(kind: &str, value: &str, offset: &str, mask: Option<&str>) -> Result<Self> {
        let kind = ValueKind::from_attribute(kind);
        let (start, end) = parse_offset(offset)?;

        let (pattern, mask) = match kind.integer() {
            Some((width, endian)) => match parse_number(value) {
                Some(number) => {
                    let mask = mask
                        .and_then(parse_number)
                        .map(|m| encode_int(m, width, endian));
                    (encode_int(number, width, endian), mask)
                },
                None => (value.as_bytes().to_vec(), None),
            },
            None if kind == ValueKind::String => {
                (decode_c_escapes(value), mask.and_then(parse_hex_bytes))
            },
            None => (value.as_bytes().to_vec(), None),
        };

        if pattern.is_empty() {
            return Err(Error::InvalidValue {
                attribute: "value",
                value: value.to_string(),
            });
        }

        let sequence = Sequence::new(pattern, start, end);
        Ok(match mask {
            Some(mask) => sequence.with_mask(mask),
            None => sequence,
        })
    }

    #[inline]
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    #[inline]
    pub fn mask(&self) -> Option<&[u8]> {
        self.mask.as_deref()
    }

    /// First offset the pattern may start at.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last offset the pattern may start at.
    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// One past the last byte this sequence can ever inspect, capped at
    /// `u64::MAX`.
    #[inline]
    pub fn reach(&self) -> u64 {
        self.end.saturating_add(self.pattern.len() as u64)
    }

    /// Test the sequence against `data`, whose first byte sits at absolute
    /// stream offset `base`.
    ///
    /// Offsets of the range that fall outside `data` simply do not match.
    pub fn matches_in(&self, data: &[u8], base: u64) -> bool {
        let len = self.pattern.len() as u64;
        let data_end = base.saturating_add(data.len() as u64);
        let first = self.start.max(base);
        if first > self.end || first.saturating_add(len) > data_end {
            return false;
        }

        let from = (first - base) as usize;
        let to = (self.reach().min(data_end) - base) as usize;
        let haystack = &data[from..to];

        match &self.mask {
            None => memchr::memmem::find(haystack, &self.pattern).is_some(),
            Some(mask) => haystack.windows(self.pattern.len()).any(|window| {
                window
                    .iter()
                    .zip(self.pattern.iter())
                    .zip(mask.iter())
                    .all(|((&w, &p), &m)| w & m == p & m)
            }),
        }
    }
}

/// Parse `offset="a"` or `offset="a:b"`. A missing offset means zero.
pub fn parse_offset(offset: &str) -> Result<(u64, u64)> {
    let offset = offset.trim();
    if offset.is_empty() {
        return Ok((0, 0));
    }
    let invalid = || Error::InvalidValue {
        attribute: "offset",
        value: offset.to_string(),
    };

    match offset.split_once(':') {
        Some((start, end)) => {
            let start = start.trim().parse::<u64>().map_err(|_| invalid())?;
            let end = end.trim().parse::<u64>().map_err(|_| invalid())?;
            Ok((start, end.max(start)))
        },
        None => {
            let start = offset.parse::<u64>().map_err(|_| invalid())?;
            Ok((start, start))
        },
    }
}

impl Weighted for Sequence {
    fn weight(&self) -> Weight {
        self.weight
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Sequence");
        dbg.field("pattern", &self.pattern.escape_ascii().to_string())
            .field("offset", &(self.start..=self.end));
        if let Some(mask) = &self.mask {
            dbg.field("mask", &mask.escape_ascii().to_string());
        }
        dbg.field("weight", &self.weight.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_range_matches_anywhere_inside() {
        let seq = Sequence::new(b"PK".to_vec(), 2, 6);
        assert!(seq.matches_in(b"....PK..", 0));
        assert!(seq.matches_in(b"......PK", 0));
        assert!(!seq.matches_in(b"PK......", 0));
        assert_eq!(seq.reach(), 8);
    }

    #[test]
    fn test_masked_match_at_nonzero_offset() {
        // Low nibble of both bytes is ignored.
        let seq = Sequence::new(vec![0x40, 0x50], 4, 4).with_mask(vec![0xF0, 0xF0]);
        assert!(seq.matches_in(&[0, 0, 0, 0, 0x4A, 0x5B], 0));
        assert!(!seq.matches_in(&[0, 0, 0, 0, 0x3A, 0x5B], 0));
        // Same bytes at the wrong offset do not match.
        assert!(!seq.matches_in(&[0, 0, 0, 0x4A, 0x5B, 0], 0));
    }

    #[test]
    fn test_window_base_is_respected() {
        let seq = Sequence::new(b"ID3".to_vec(), 10, 10);
        assert!(seq.matches_in(b"ID3", 10));
        assert!(!seq.matches_in(b"ID3", 9));
        assert!(!seq.matches_in(b"ID", 10));
    }

    #[test]
    fn test_integer_encodings() {
        let le = Sequence::from_attributes("little32", "0x04034b50", "0", None).unwrap();
        assert_eq!(le.pattern(), b"PK\x03\x04");
        let byte = Sequence::from_attributes("byte", "0x1f", "1", Some("0xff")).unwrap();
        assert_eq!(byte.pattern(), &[0x1F]);
        assert_eq!(byte.mask(), Some(&[0xFF][..]));
        let host = Sequence::from_attributes("host16", "0x0102", "0", None).unwrap();
        assert_eq!(host.pattern(), &0x0102u16.to_ne_bytes());
    }

    #[test]
    fn test_oversized_integers_keep_low_order_bytes() {
        let wide = Sequence::from_attributes("big16", "0x12345", "0", Some("0x1ff00")).unwrap();
        assert_eq!(wide.pattern(), &[0x23, 0x45]);
        assert_eq!(wide.mask(), Some(&[0xFF, 0x00][..]));
        let byte = Sequence::from_attributes("byte", "256", "0", None).unwrap();
        assert_eq!(byte.pattern(), &[0x00]);
    }

    #[test]
    fn test_huge_offsets_do_not_overflow() {
        let seq = Sequence::from_attributes("string", "A", "18446744073709551615", None).unwrap();
        assert_eq!(seq.reach(), u64::MAX);
        assert!(!seq.matches_in(b"AAAA", 0));
        assert!(!seq.matches_in(b"A", u64::MAX - 1));

        let ranged = Sequence::new(b"AB".to_vec(), 0, u64::MAX);
        assert_eq!(ranged.reach(), u64::MAX);
        assert!(ranged.matches_in(b"xxAB", 0));
    }

    #[test]
    fn test_unrecognized_values_fall_back_to_raw_text() {
        let odd = Sequence::from_attributes("regex", "abc", "0", None).unwrap();
        assert_eq!(odd.pattern(), b"abc");
        let bad_number = Sequence::from_attributes("big16", "oops", "0", None).unwrap();
        assert_eq!(bad_number.pattern(), b"oops");
    }

    #[test]
    fn test_string_mask_is_hex() {
        let seq = Sequence::from_attributes("string", "AB", "0", Some("0xFFDF")).unwrap();
        assert_eq!(seq.mask(), Some(&[0xFF, 0xDF][..]));
        assert!(seq.matches_in(b"Ab", 0));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(Sequence::from_attributes("string", "", "0", None).is_err());
        assert!(Sequence::from_attributes("string", "x", "a:b", None).is_err());
        assert_eq!(parse_offset("").unwrap(), (0, 0));
        assert_eq!(parse_offset("8:2").unwrap(), (8, 8));
    }
}
