//! Combining filename evidence with content evidence.
//!
//! | filename | content | answer                                              |
//! |----------|---------|-----------------------------------------------------|
//! | none     | none    | no match                                            |
//! | hit      | none    | best filename candidate                             |
//! | none     | hit     | best content candidate                              |
//! | hit      | hit     | the shared answer when both agree, otherwise the    |
//! |          |         | best filename candidate related to a content one,   |
//! |          |         | otherwise the best content candidate                |
//!
//! Filename candidates are ranked by weight and then glob length, content
//! candidates by weight alone.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::hierarchy::Hierarchy;
use crate::identity::MediaType;
use crate::matcher::{Candidate, Hit};

/// Which filename candidates may overrule conflicting content evidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Any ancestor or descendant of a content candidate.
    #[default]
    Family,
    /// Only subclasses of a content candidate.
    SubclassOnly,
}

/// Pick one type from the available evidence, or `None` when neither index
/// produced anything.
pub fn decide(
    glob: Option<&Hit>,
    magic: Option<&Hit>,
    hierarchy: &Hierarchy,
    policy: ConflictPolicy,
) -> Option<MediaType> {
    match (glob, magic) {
        (None, None) => None,
        (Some(glob), None) => best_glob(glob.candidates()),
        (None, Some(magic)) => best_magic(magic.candidates()),
        (Some(glob), Some(magic)) => {
            let from_glob = best_glob(glob.candidates());
            let from_magic = best_magic(magic.candidates());
            if from_glob.is_some() && from_glob == from_magic {
                return from_glob;
            }

            let related = related_types(magic, hierarchy, policy);
            let agreeing: Vec<Candidate> = glob
                .candidates()
                .iter()
                .filter(|c| related.contains(&c.media))
                .cloned()
                .collect();
            best_glob(&agreeing).or(from_magic)
        },
    }
}

fn related_types(magic: &Hit, hierarchy: &Hierarchy, policy: ConflictPolicy) -> HashSet<MediaType> {
    magic
        .candidates()
        .iter()
        .flat_map(|c| match policy {
            ConflictPolicy::Family => hierarchy.family(&c.media),
            ConflictPolicy::SubclassOnly => hierarchy.descendants(&c.media),
        })
        .collect()
}

fn best_glob(candidates: &[Candidate]) -> Option<MediaType> {
    candidates.iter().max_by(|a, b| a.rank(b)).map(|c| c.media.clone())
}

fn best_magic(candidates: &[Candidate]) -> Option<MediaType> {
    candidates
        .iter()
        .max_by(|a, b| {
            a.weight
                .cmp(&b.weight)
                .then_with(|| b.media.as_str().cmp(a.media.as_str()))
        })
        .map(|c| c.media.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Weight;

    fn media(s: &str) -> MediaType {
        MediaType::parse(s).unwrap()
    }

    fn hit(entries: &[(&str, u32, usize)]) -> Hit {
        Hit::from_candidates(
            entries
                .iter()
                .map(|&(ty, weight, len)| Candidate::new(media(ty), Weight::new(weight), len)),
        )
        .unwrap()
    }

    fn office() -> Hierarchy {
        let mut h = Hierarchy::new();
        h.add_parent(&media("application/msword"), &media("application/x-ole-storage"));
        h.add_parent(&media("application/vnd.ms-excel"), &media("application/x-ole-storage"));
        h
    }

    #[test]
    fn test_nothing_is_no_match() {
        assert_eq!(decide(None, None, &Hierarchy::new(), ConflictPolicy::Family), None);
    }

    #[test]
    fn test_single_sided_evidence() {
        let h = Hierarchy::new();
        let glob = hit(&[("text/x-a", 50, 3), ("text/x-b", 50, 9)]);
        assert_eq!(decide(Some(&glob), None, &h, ConflictPolicy::Family), Some(media("text/x-b")));

        let magic = hit(&[("image/png", 80, 0), ("image/apng", 50, 0)]);
        assert_eq!(decide(None, Some(&magic), &h, ConflictPolicy::Family), Some(media("image/png")));
    }

    #[test]
    fn test_agreement() {
        let glob = hit(&[("image/png", 50, 5)]);
        let magic = hit(&[("image/png", 50, 0)]);
        assert_eq!(
            decide(Some(&glob), Some(&magic), &Hierarchy::new(), ConflictPolicy::Family),
            Some(media("image/png"))
        );
    }

    #[test]
    fn test_conflict_resolved_through_family() {
        let glob = hit(&[("application/msword", 50, 5)]);
        let magic = hit(&[("application/x-ole-storage", 50, 0)]);
        assert_eq!(
            decide(Some(&glob), Some(&magic), &office(), ConflictPolicy::Family),
            Some(media("application/msword"))
        );
        assert_eq!(
            decide(Some(&glob), Some(&magic), &office(), ConflictPolicy::SubclassOnly),
            Some(media("application/msword"))
        );
    }

    #[test]
    fn test_policy_controls_ancestor_globs() {
        // The filename says the generic container, the content says Word.
        let glob = hit(&[("application/x-ole-storage", 50, 5)]);
        let magic = hit(&[("application/msword", 60, 0)]);
        assert_eq!(
            decide(Some(&glob), Some(&magic), &office(), ConflictPolicy::Family),
            Some(media("application/x-ole-storage"))
        );
        assert_eq!(
            decide(Some(&glob), Some(&magic), &office(), ConflictPolicy::SubclassOnly),
            Some(media("application/msword"))
        );
    }

    #[test]
    fn test_unrelated_conflict_trusts_content() {
        let glob = hit(&[("text/x-a", 90, 5)]);
        let magic = hit(&[("image/gif", 40, 0), ("image/png", 70, 0)]);
        assert_eq!(
            decide(Some(&glob), Some(&magic), &Hierarchy::new(), ConflictPolicy::Family),
            Some(media("image/png"))
        );
    }

    #[test]
    fn test_family_intersection_prefers_heaviest() {
        let glob = hit(&[
            ("application/msword", 50, 5),
            ("application/vnd.ms-excel", 70, 5),
            ("text/x-unrelated", 100, 5),
        ]);
        let magic = hit(&[("application/x-ole-storage", 50, 0)]);
        assert_eq!(
            decide(Some(&glob), Some(&magic), &office(), ConflictPolicy::Family),
            Some(media("application/vnd.ms-excel"))
        );
    }
}
