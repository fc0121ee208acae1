//! A sliding byte window over a seekable stream.

use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;

/// Holds one contiguous range of a stream and grows it in either
/// direction on demand, reading only the bytes it does not already hold.
///
/// Nothing at or past `limit` is ever read.
#[derive(Debug)]
pub struct Window<'s, R> {
    source: &'s mut R,
    limit: u64,
    base: u64,
    data: Vec<u8>,
    stream_len: Option<u64>,
    bytes_read: u64,
}

impl<'s, R: Read + Seek> Window<'s, R> {
    pub fn new(source: &'s mut R, limit: u64) -> Self {
        Self {
            source,
            limit,
            base: 0,
            data: Vec::new(),
            stream_len: None,
            bytes_read: 0,
        }
    }

    /// Absolute range currently held.
    #[inline]
    pub fn held(&self) -> Range<u64> {
        self.base..self.base + self.data.len() as u64
    }

    /// The held bytes and the stream offset of the first one.
    #[inline]
    pub fn data(&self) -> (&[u8], u64) {
        (&self.data, self.base)
    }

    /// Total bytes pulled from the stream so far.
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Make `start..end` available, clipped to the limit and to the end of
    /// the stream. Afterwards the window holds one contiguous range that
    /// covers the request.
    pub fn fill(&mut self, start: u64, end: u64) -> io::Result<()> {
        let mut end = end.min(self.limit);
        if let Some(len) = self.stream_len {
            end = end.min(len);
        }
        if start >= end {
            return Ok(());
        }

        if self.data.is_empty() {
            self.data = self.read_range(start, end)?;
            self.base = start;
            return Ok(());
        }

        let held = self.held();
        if start < held.start {
            let mut head = self.read_range(start, held.start)?;
            head.extend_from_slice(&self.data);
            self.data = head;
            self.base = start;
        }
        if end > held.end {
            let tail = self.read_range(held.end, end)?;
            self.data.extend_from_slice(&tail);
        }
        Ok(())
    }

    /// Drop every held byte at or after `end`.
    pub fn retain_until(&mut self, end: u64) {
        if end <= self.base {
            self.data.clear();
        } else {
            self.data.truncate((end - self.base) as usize);
        }
    }

    fn read_range(&mut self, start: u64, end: u64) -> io::Result<Vec<u8>> {
        let wanted = end - start;
        self.source.seek(SeekFrom::Start(start))?;
        let mut buf = Vec::with_capacity(wanted as usize);
        self.source.by_ref().take(wanted).read_to_end(&mut buf)?;

        let got = buf.len() as u64;
        self.bytes_read += got;
        if got < wanted {
            self.stream_len = Some(start + got);
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream() -> Cursor<Vec<u8>> {
        Cursor::new((0u8..100).collect())
    }

    #[test]
    fn test_grows_both_ways_without_rereading() {
        let mut source = stream();
        let mut window = Window::new(&mut source, 1000);
        window.fill(10, 20).unwrap();
        window.fill(0, 30).unwrap();
        assert_eq!(window.held(), 0..30);
        assert_eq!(window.bytes_read(), 30);
        let (data, base) = window.data();
        assert_eq!((data[15], base), (15, 0));
    }

    #[test]
    fn test_clipped_to_limit_and_stream_end() {
        let mut source = stream();
        let mut window = Window::new(&mut source, 50);
        window.fill(40, 80).unwrap();
        assert_eq!(window.held(), 40..50);

        let mut source = stream();
        let mut window = Window::new(&mut source, 1000);
        window.fill(90, 200).unwrap();
        assert_eq!(window.held(), 90..100);
        window.fill(95, 300).unwrap();
        assert_eq!(window.bytes_read(), 10);
    }

    #[test]
    fn test_retain_until() {
        let mut source = stream();
        let mut window = Window::new(&mut source, 1000);
        window.fill(10, 40).unwrap();
        window.retain_until(20);
        assert_eq!(window.held(), 10..20);
        window.retain_until(5);
        assert!(window.held().is_empty());
    }
}
