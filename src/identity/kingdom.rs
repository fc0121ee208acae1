//! Registration-tree facets of a subtype name.

/// Top-level media types registered with IANA.
const REGISTERED_PHYLA: &[&str] = &[
    "application",
    "audio",
    "example",
    "font",
    "haptics",
    "image",
    "message",
    "model",
    "multipart",
    "text",
    "video",
];

/// The registration tree a subtype belongs to.
///
/// The tree is encoded in the subtype name as a facet prefix (`vnd.`,
/// `prs.`, `x-`, ...). The prefix is removed from the genus when an identity
/// is parsed and restored when it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kingdom {
    /// IETF standards tree, no prefix.
    Standards,
    /// Vendor tree, `vnd.`
    Vendor,
    /// Personal or vanity tree, `prs.`
    Personal,
    /// Unregistered experimental names, `x-`
    Experimental,
    /// Microsoft's experimental names, `x-ms-`
    ExperimentalMicrosoft,
    /// Dotted experimental names, `x.`
    ExperimentalDotted,
    /// Names under a top-level type that is not IANA-registered
    /// (`inode/`, `x-content/`, `x-scheme-handler/`, ...), no prefix.
    Unregistered,
}

impl Kingdom {
    /// The facet prefix this tree adds in front of the genus.
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            Kingdom::Standards | Kingdom::Unregistered => "",
            Kingdom::Vendor => "vnd.",
            Kingdom::Personal => "prs.",
            Kingdom::Experimental => "x-",
            Kingdom::ExperimentalMicrosoft => "x-ms-",
            Kingdom::ExperimentalDotted => "x.",
        }
    }

    /// Split a lowercase subtype into its tree and the bare genus.
    ///
    /// A prefix is only recognized when something follows it, so `x-` on its
    /// own stays a standards-tree genus.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxon::identity::Kingdom;
    /// assert_eq!(Kingdom::detect("image", "vnd.adobe.photoshop"), (Kingdom::Vendor, "adobe.photoshop"));
    /// assert_eq!(Kingdom::detect("application", "x-ms-dos-executable"), (Kingdom::ExperimentalMicrosoft, "dos-executable"));
    /// assert_eq!(Kingdom::detect("inode", "directory"), (Kingdom::Unregistered, "directory"));
    /// ```
    pub fn detect<'a>(phylum: &str, subtype: &'a str) -> (Kingdom, &'a str) {
        // Longer prefixes first: `x-ms-` must win over `x-`.
        const FACETS: [Kingdom; 5] = [
            Kingdom::ExperimentalMicrosoft,
            Kingdom::Experimental,
            Kingdom::ExperimentalDotted,
            Kingdom::Vendor,
            Kingdom::Personal,
        ];

        for kingdom in FACETS {
            if let Some(genus) = subtype.strip_prefix(kingdom.prefix())
                && !genus.is_empty()
            {
                return (kingdom, genus);
            }
        }

        if is_registered_phylum(phylum) {
            (Kingdom::Standards, subtype)
        } else {
            (Kingdom::Unregistered, subtype)
        }
    }

    /// Whether names in this tree are experimental (`x-`, `x-ms-`, `x.`).
    #[inline]
    pub const fn is_experimental(self) -> bool {
        matches!(
            self,
            Kingdom::Experimental | Kingdom::ExperimentalMicrosoft | Kingdom::ExperimentalDotted
        )
    }
}

/// Whether `phylum` is an IANA-registered top-level type.
pub fn is_registered_phylum(phylum: &str) -> bool {
    REGISTERED_PHYLA.contains(&phylum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_facets() {
        assert_eq!(Kingdom::detect("application", "prs.plucker"), (Kingdom::Personal, "plucker"));
        assert_eq!(Kingdom::detect("application", "x.foo"), (Kingdom::ExperimentalDotted, "foo"));
        assert_eq!(Kingdom::detect("application", "x-tar"), (Kingdom::Experimental, "tar"));
        assert_eq!(Kingdom::detect("image", "png"), (Kingdom::Standards, "png"));
    }

    #[test]
    fn test_bare_prefix_is_not_a_facet() {
        assert_eq!(Kingdom::detect("application", "x-"), (Kingdom::Standards, "x-"));
        assert_eq!(Kingdom::detect("application", "vnd."), (Kingdom::Standards, "vnd."));
    }

    #[test]
    fn test_unregistered_phylum() {
        assert_eq!(Kingdom::detect("x-content", "image-dcf"), (Kingdom::Unregistered, "image-dcf"));
        // A facet still wins under an unregistered phylum.
        assert_eq!(Kingdom::detect("x-scheme-handler", "x-foo").0, Kingdom::Experimental);
    }
}
