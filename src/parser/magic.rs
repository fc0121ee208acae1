//! Decoding of `<magic>` / `<match>` trees into chains.
//!
//! Sibling `<match>` elements are alternatives and a nested `<match>`
//! extends its parent's chain, so every root-to-leaf path is one chain. A
//! chain is produced when its leaf closes.

use tracing::warn;

use super::driver::Attributes;
use crate::pattern::{Chain, Sequence, Weight};

#[derive(Debug)]
struct Frame {
    sequence: Option<Sequence>,
    has_children: bool,
}

/// The open `<match>` path inside one `<magic>` element.
#[derive(Debug, Default)]
pub struct MagicTree {
    priority: Weight,
    frames: Vec<Frame>,
}

impl MagicTree {
    /// Start a `<magic>` element.
    pub fn open(attributes: &Attributes) -> Self {
        Self {
            priority: attributes
                .get("priority")
                .and_then(Weight::parse)
                .unwrap_or_default(),
            frames: Vec::new(),
        }
    }

    #[inline]
    pub fn priority(&self) -> Weight {
        self.priority
    }

    /// Enter a `<match>`. A match that cannot be decoded poisons every
    /// chain running through it.
    pub fn push(&mut self, attributes: &Attributes) {
        let kind = attributes.get("type").unwrap_or("string");
        let value = attributes.get("value").unwrap_or("");
        let offset = attributes.get("offset").unwrap_or("0");
        let sequence = match Sequence::from_attributes(kind, value, offset, attributes.get("mask")) {
            Ok(sequence) => Some(sequence),
            Err(e) => {
                warn!(error = %e, "skipping undecodable <match>");
                None
            },
        };

        if let Some(parent) = self.frames.last_mut() {
            parent.has_children = true;
        }
        self.frames.push(Frame {
            sequence,
            has_children: false,
        });
    }

    /// Leave a `<match>`, returning the chain it completes if it is a leaf.
    pub fn pop(&mut self) -> Option<Chain> {
        let chain = match self.frames.last() {
            Some(leaf) if !leaf.has_children => self
                .frames
                .iter()
                .map(|f| f.sequence.clone())
                .collect::<Option<Vec<_>>>()
                .and_then(|path| Chain::new(path, self.priority)),
            _ => None,
        };
        self.frames.pop();
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(xml: &str) -> Attributes {
        use crate::parser::driver::{Visitor, drive};
        use crate::parser::element::{Element, Interest};

        struct Grab(Option<Attributes>);
        impl Visitor for Grab {
            fn interest(&self) -> Interest {
                Interest::all()
            }
            fn start(&mut self, _: Element, attributes: &Attributes) {
                self.0.get_or_insert_with(|| attributes.clone());
            }
            fn end(&mut self, _: Element) {}
        }

        let mut grab = Grab(None);
        drive(xml.as_bytes(), &mut grab).unwrap();
        grab.0.unwrap()
    }

    #[test]
    fn test_paths_become_chains() {
        let mut tree = MagicTree::open(&attrs(r#"<magic priority="80"/>"#));
        // <match A><match B/><match C/></match><match D/>
        tree.push(&attrs(r#"<match type="string" value="A" offset="0"/>"#));
        tree.push(&attrs(r#"<match type="string" value="B" offset="1"/>"#));
        let ab = tree.pop().unwrap();
        tree.push(&attrs(r#"<match type="string" value="C" offset="1"/>"#));
        let ac = tree.pop().unwrap();
        assert!(tree.pop().is_none());
        tree.push(&attrs(r#"<match type="string" value="D" offset="0"/>"#));
        let d = tree.pop().unwrap();

        assert_eq!(ab.sequences().len(), 2);
        assert!(ab.matches_in(b"AB", 0));
        assert!(ac.matches_in(b"AC", 0));
        assert!(!ac.matches_in(b"AB", 0));
        assert!(d.is_single());
        assert_eq!(tree.priority(), Weight::new(80));
    }

    #[test]
    fn test_bad_match_poisons_its_paths_only() {
        let mut tree = MagicTree::open(&attrs("<magic/>"));
        tree.push(&attrs(r#"<match type="string" value="" offset="0"/>"#));
        tree.push(&attrs(r#"<match type="string" value="B" offset="1"/>"#));
        assert!(tree.pop().is_none());
        assert!(tree.pop().is_none());
        tree.push(&attrs(r#"<match type="byte" value="7" offset="0"/>"#));
        assert!(tree.pop().is_some());
    }
}
