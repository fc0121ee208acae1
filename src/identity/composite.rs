//! Types carrying structured syntax suffixes, e.g. `image/svg+xml`.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::suffix::syntax_type;
use super::type_identity::TypeIdentity;

/// An ordered set of two or more identities naming one suffixed type.
///
/// The first member is the primary type (`image/svg`), the rest are the
/// syntax types named by each suffix (`application/xml`), in the order the
/// suffixes appear.
#[derive(Clone)]
pub struct CompositeType {
    members: SmallVec<[TypeIdentity; 2]>,
    tags: SmallVec<[Box<str>; 1]>,
    repr: Arc<str>,
}

impl CompositeType {
    /// Combine a primary identity with one or more suffix tags.
    ///
    /// Returns `None` when `tags` is empty: a composite always has at least
    /// two members.
    pub fn new<'a>(primary: TypeIdentity, tags: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut repr = String::from(primary.as_str());
        let mut members: SmallVec<[TypeIdentity; 2]> = SmallVec::new();
        let mut stored = SmallVec::new();
        members.push(primary);

        for tag in tags {
            let tag = tag.to_ascii_lowercase();
            let syntax = match syntax_type(&tag) {
                Some(known) => TypeIdentity::parse_plain("application", &known["application/".len()..]),
                None => TypeIdentity::parse_plain("application", &tag),
            };
            repr.push('+');
            repr.push_str(&tag);
            members.push(syntax);
            stored.push(tag.into_boxed_str());
        }

        (members.len() >= 2).then(|| Self {
            members,
            tags: stored,
            repr: Arc::from(repr),
        })
    }

    /// The primary identity, e.g. `image/svg`.
    #[inline]
    pub fn primary(&self) -> &TypeIdentity {
        &self.members[0]
    }

    /// Identities of the suffix syntaxes, e.g. `[application/xml]`.
    #[inline]
    pub fn suffixes(&self) -> &[TypeIdentity] {
        &self.members[1..]
    }

    /// All members, primary first.
    #[inline]
    pub fn members(&self) -> &[TypeIdentity] {
        &self.members
    }

    /// The raw suffix tags, e.g. `["xml"]`.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.as_ref())
    }

    /// Canonical string form, e.g. `image/svg+xml`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl PartialEq for CompositeType {
    fn eq(&self, other: &Self) -> bool {
        self.repr == other.repr
    }
}

impl Eq for CompositeType {}

impl fmt::Debug for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeType({})", self.as_str())
    }
}
