//! Things a needle-driven scan looks for.

use std::io::{self, Read, Seek, SeekFrom};

use crate::pattern::{Chain, FileName, GlobPattern};

/// A filename or a content sample to match package entries against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Needle {
    FileName(FileName),
    /// Leading bytes of a stream.
    Content(Vec<u8>),
}

impl Needle {
    pub fn file_name(name: &str) -> Self {
        Needle::FileName(FileName::new(name))
    }

    /// Sample at most `limit` bytes from the start of `source`, leaving
    /// the stream rewound.
    pub fn sample<R: Read + Seek>(source: &mut R, limit: u64) -> io::Result<Self> {
        source.seek(SeekFrom::Start(0))?;
        let mut data = Vec::new();
        source.by_ref().take(limit).read_to_end(&mut data)?;
        source.seek(SeekFrom::Start(0))?;
        Ok(Needle::Content(data))
    }

    pub fn matches_glob(&self, glob: &GlobPattern) -> bool {
        match self {
            Needle::FileName(name) => glob.matches(name.as_str()),
            Needle::Content(_) => false,
        }
    }

    pub fn matches_chain(&self, chain: &Chain) -> bool {
        match self {
            Needle::Content(data) => chain.matches_in(data, 0),
            Needle::FileName(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Sequence, Weight};
    use std::io::Cursor;

    #[test]
    fn test_sample_is_capped_and_rewinds() {
        let mut cursor = Cursor::new(b"0123456789".to_vec());
        cursor.set_position(5);
        let needle = Needle::sample(&mut cursor, 4).unwrap();
        assert_eq!(needle, Needle::Content(b"0123".to_vec()));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_needle_kinds_are_disjoint() {
        let glob = GlobPattern::new("*.png", Weight::DEFAULT, false).unwrap();
        let chain = Chain::new([Sequence::new(b"\x89PNG".to_vec(), 0, 0)], Weight::DEFAULT).unwrap();
        let name = Needle::file_name("IMAGE.PNG");
        let content = Needle::Content(b"\x89PNG\r\n".to_vec());
        assert!(name.matches_glob(&glob));
        assert!(!name.matches_chain(&chain));
        assert!(content.matches_chain(&chain));
        assert!(!content.matches_glob(&glob));
    }
}
