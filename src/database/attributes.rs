//! Explicit type overrides stored in extended filesystem attributes.

use std::path::Path;

/// Attribute keys that may carry a type string, in lookup order.
pub const TYPE_ATTRIBUTES: &[&str] = &["user.mime_type", "user.xdg.mime_type"];

/// Where explicit per-file type overrides come from.
///
/// A missing or unreadable override is `None`, never an error.
pub trait AttributeSource: Send {
    fn type_override(&self, path: &Path) -> Option<String>;
}

/// Reads [`TYPE_ATTRIBUTES`] from the filesystem.
///
/// Always reports nothing on platforms without extended attributes or when
/// the `xattr` feature is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtendedAttributes;

#[cfg(all(unix, feature = "xattr"))]
impl AttributeSource for ExtendedAttributes {
    fn type_override(&self, path: &Path) -> Option<String> {
        TYPE_ATTRIBUTES.iter().find_map(|key| match xattr::get(path, key) {
            Ok(Some(raw)) => {
                let value = String::from_utf8_lossy(&raw).trim().to_string();
                (!value.is_empty()).then_some(value)
            },
            Ok(None) | Err(_) => None,
        })
    }
}

#[cfg(not(all(unix, feature = "xattr")))]
impl AttributeSource for ExtendedAttributes {
    fn type_override(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Never reports an override.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAttributes;

impl AttributeSource for NoAttributes {
    fn type_override(&self, _path: &Path) -> Option<String> {
        None
    }
}

impl<F> AttributeSource for F
where
    F: Fn(&Path) -> Option<String> + Send,
{
    fn type_override(&self, path: &Path) -> Option<String> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_has_no_override() {
        assert_eq!(ExtendedAttributes.type_override(Path::new("/nonexistent/file")), None);
        assert_eq!(NoAttributes.type_override(Path::new("/")), None);
    }

    #[cfg(all(target_os = "linux", feature = "xattr"))]
    #[test]
    fn test_reads_user_attribute_when_supported() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // tmpfs without user xattr support is common; only check when writable.
        if xattr::set(file.path(), TYPE_ATTRIBUTES[0], b"image/png\n").is_ok() {
            assert_eq!(
                ExtendedAttributes.type_override(file.path()),
                Some("image/png".to_string())
            );
        }
    }
}
