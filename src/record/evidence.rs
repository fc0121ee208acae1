//! Append-only evidence fields that start unset.

/// A record field that is unset, holds one value, or holds a set of values.
///
/// A single value is stored unwrapped; inserting a second distinct value
/// promotes the field to a set. Duplicates are ignored, so replaying the same
/// package file leaves the field unchanged. Read through [`Evidence::as_slice`]
/// to stay independent of the shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence<T> {
    Unset,
    One(T),
    Many(Vec<T>),
}

impl<T> Default for Evidence<T> {
    fn default() -> Self {
        Evidence::Unset
    }
}

impl<T: PartialEq> Evidence<T> {
    /// Add `value` unless an equal value is already present.
    ///
    /// Returns whether the field changed.
    pub fn insert(&mut self, value: T) -> bool {
        if self.contains(&value) {
            return false;
        }
        match std::mem::take(self) {
            Evidence::Unset => *self = Evidence::One(value),
            Evidence::One(first) => *self = Evidence::Many(vec![first, value]),
            Evidence::Many(mut values) => {
                values.push(value);
                *self = Evidence::Many(values);
            },
        }
        true
    }

    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.as_slice().contains(value)
    }

    /// Keep only the values for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        match std::mem::take(self) {
            Evidence::Unset => {},
            Evidence::One(value) => {
                if keep(&value) {
                    *self = Evidence::One(value);
                }
            },
            Evidence::Many(mut values) => {
                values.retain(|v| keep(v));
                *self = match values.len() {
                    0 => Evidence::Unset,
                    1 => Evidence::One(values.remove(0)),
                    _ => Evidence::Many(values),
                };
            },
        }
    }
}

impl<T> Evidence<T> {
    /// Reset the field to unset.
    #[inline]
    pub fn clear(&mut self) {
        *self = Evidence::Unset;
    }

    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Evidence::Unset)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_unset()
    }

    /// View the field as a slice regardless of its shape.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Evidence::Unset => &[],
            Evidence::One(value) => std::slice::from_ref(value),
            Evidence::Many(values) => values,
        }
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a Evidence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotes_on_second_distinct_value() {
        let mut field = Evidence::Unset;
        assert!(field.insert("a"));
        assert_eq!(field, Evidence::One("a"));
        assert!(!field.insert("a"));
        assert_eq!(field, Evidence::One("a"));
        assert!(field.insert("b"));
        assert_eq!(field, Evidence::Many(vec!["a", "b"]));
        assert_eq!(field.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_clear_and_retain() {
        let mut field = Evidence::Many(vec![1, 2, 3]);
        field.retain(|v| *v == 2);
        assert_eq!(field, Evidence::One(2));
        field.retain(|_| false);
        assert!(field.is_unset());
        field.insert(4);
        field.clear();
        assert_eq!(field.len(), 0);
    }
}
