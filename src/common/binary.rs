//! Fixed-width integer encodings used by `<match>` values.
//!
//! Package files describe numeric signatures as 16- or 32-bit integers in a
//! declared byte order. The host byte order is resolved once, at compile
//! time, from the running target.

use zerocopy::{BE, IntoBytes, LE, U16, U32};

/// Byte order of an encoded integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    /// Byte order of the platform this crate was built for.
    pub const HOST: Endian = if cfg!(target_endian = "big") {
        Endian::Big
    } else {
        Endian::Little
    };
}

/// Width of an encoded integer in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    One = 1,
    Two = 2,
    Four = 4,
}

/// Encode `value` as `width` bytes in the given byte order.
///
/// Values wider than `width` are truncated to their low-order bytes, the way
/// a C cast would.
///
/// # Examples
///
/// ```
/// use taxon::common::binary::{encode_int, Endian, Width};
/// assert_eq!(encode_int(0x1234, Width::Two, Endian::Big), vec![0x12, 0x34]);
/// assert_eq!(encode_int(0x1234, Width::Two, Endian::Little), vec![0x34, 0x12]);
/// assert_eq!(encode_int(0x1FF, Width::One, Endian::Big), vec![0xFF]);
/// ```
pub fn encode_int(value: u64, width: Width, endian: Endian) -> Vec<u8> {
    match (width, endian) {
        (Width::One, _) => vec![value as u8],
        (Width::Two, Endian::Big) => U16::<BE>::new(value as u16).as_bytes().to_vec(),
        (Width::Two, Endian::Little) => U16::<LE>::new(value as u16).as_bytes().to_vec(),
        (Width::Four, Endian::Big) => U32::<BE>::new(value as u32).as_bytes().to_vec(),
        (Width::Four, Endian::Little) => U32::<LE>::new(value as u32).as_bytes().to_vec(),
    }
}
