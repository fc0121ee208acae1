//! Event pump from a package file to a [`Visitor`].

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use smallvec::SmallVec;

use super::element::{Element, Interest};
use crate::common::Result;
use crate::common::xml::{resolve_reference, unescape_xml};

/// Attributes of one element, qualified names kept (`xml:lang`).
#[derive(Debug, Default, Clone)]
pub struct Attributes {
    items: SmallVec<[(Box<str>, Box<str>); 4]>,
}

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| &**v)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn decode(start: &BytesStart<'_>) -> Result<Self> {
        let mut items = SmallVec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref());
            let raw = String::from_utf8_lossy(&attr.value);
            items.push((key.into(), unescape_xml(&raw).into()));
        }
        Ok(Self { items })
    }
}

/// Receiver of package events.
///
/// Every delivered `start` is matched by exactly one `end`. Elements whose
/// category the visitor is not interested in when they open are skipped
/// together with their subtree, so neither their attributes nor their end
/// reach the visitor.
pub trait Visitor {
    /// Categories the visitor currently needs.
    fn interest(&self) -> Interest;

    fn start(&mut self, element: Element, attributes: &Attributes);

    /// Text content of a text-bearing element, trimmed, delivered once
    /// before its `end`.
    fn text(&mut self, _element: Element, _text: &str) {}

    fn end(&mut self, element: Element);
}

/// Feed one package to `visitor`.
///
/// Stops at the first well-formedness error. Events already delivered stay
/// delivered; callers that need file-scoped atomicity stage their state.
pub fn drive<R: BufRead, V: Visitor + ?Sized>(source: R, visitor: &mut V) -> Result<()> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut skip = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match accept(e, visitor.interest()) {
                Some(element) => {
                    let attributes = Attributes::decode(e)?;
                    visitor.start(element, &attributes);
                    open.push(element);
                    text.clear();
                },
                None => {
                    let name = e.name().as_ref().to_vec();
                    reader.read_to_end_into(QName(&name), &mut skip)?;
                    skip.clear();
                },
            },
            Event::Empty(ref e) => {
                if let Some(element) = accept(e, visitor.interest()) {
                    let attributes = Attributes::decode(e)?;
                    visitor.start(element, &attributes);
                    visitor.end(element);
                }
            },
            Event::Text(ref e) if wants_text(&open) => {
                text.push_str(&String::from_utf8_lossy(e));
            },
            Event::CData(ref e) if wants_text(&open) => {
                text.push_str(&String::from_utf8_lossy(e));
            },
            Event::GeneralRef(ref e) if wants_text(&open) => {
                let name = String::from_utf8_lossy(e);
                match resolve_reference(&name) {
                    Some(resolved) => text.push_str(&resolved),
                    None => {
                        text.push('&');
                        text.push_str(&name);
                        text.push(';');
                    },
                }
            },
            Event::End(_) => {
                if let Some(element) = open.pop() {
                    if element.has_text() {
                        visitor.text(element, text.trim());
                        text.clear();
                    }
                    visitor.end(element);
                }
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }
    Ok(())
}

fn accept(start: &BytesStart<'_>, interest: Interest) -> Option<Element> {
    Element::from_local_name(start.local_name().as_ref()).filter(|e| e.wanted_by(interest))
}

#[inline]
fn wants_text(open: &[Element]) -> bool {
    open.last().is_some_and(|e| e.has_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        interest: Interest,
        events: Vec<String>,
    }

    impl Recorder {
        fn new(interest: Interest) -> Self {
            Self {
                interest,
                events: Vec::new(),
            }
        }
    }

    impl Visitor for Recorder {
        fn interest(&self) -> Interest {
            self.interest
        }

        fn start(&mut self, element: Element, attributes: &Attributes) {
            let ty = attributes.get("type").unwrap_or("");
            self.events.push(format!("+{element:?}{ty}"));
        }

        fn text(&mut self, _element: Element, text: &str) {
            self.events.push(format!("'{text}'"));
        }

        fn end(&mut self, element: Element) {
            self.events.push(format!("-{element:?}"));
        }
    }

    const PACKAGE: &str = r#"<?xml version="1.0"?>
<mime-info xmlns="http://www.freedesktop.org/standards/shared-mime-info">
  <mime-type type="text/x-a">
    <comment>Tom &amp; Jerry</comment>
    <glob pattern="*.a"/>
    <magic><match type="string" value="A" offset="0"/></magic>
    <treemagic><treematch path="x"/></treemagic>
  </mime-type>
</mime-info>"#;

    #[test]
    fn test_full_interest_delivers_everything() {
        let mut v = Recorder::new(Interest::all());
        drive(PACKAGE.as_bytes(), &mut v).unwrap();
        assert_eq!(
            v.events,
            vec![
                "+MimeInfo",
                "+MimeTypetext/x-a",
                "+Comment",
                "'Tom & Jerry'",
                "-Comment",
                "+Glob",
                "-Glob",
                "+Magic",
                "+Matchstring",
                "-Match",
                "-Magic",
                "-MimeType",
                "-MimeInfo",
            ]
        );
    }

    #[test]
    fn test_uninteresting_subtrees_are_skipped() {
        let mut v = Recorder::new(Interest::GLOB);
        drive(PACKAGE.as_bytes(), &mut v).unwrap();
        assert_eq!(
            v.events,
            vec!["+MimeInfo", "+MimeTypetext/x-a", "+Glob", "-Glob", "-MimeType", "-MimeInfo"]
        );
    }

    #[test]
    fn test_malformed_package_is_an_error() {
        let mut v = Recorder::new(Interest::all());
        assert!(drive("<mime-info><mime-type></mime-info>".as_bytes(), &mut v).is_err());
    }
}
