//! URL-safe slug construction and batch-scoped collision tracking.

use crate::selector::select_in_range;
use std::collections::HashSet;

/// Maximum slug length issued by the registry (Google truncates past ~75).
pub const MAX_SLUG_LEN: usize = 72;

/// Lower-cases the input and maps every run of non-alphanumeric characters to
/// a single hyphen, trimming hyphens at both ends.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Joins slugified parts with hyphens, bounded to `max_len`.
///
/// Never returns an empty string: when every part normalizes away, the
/// caller-supplied `fallback` is used instead.
pub fn build_slug(parts: &[&str], max_len: usize, fallback: &str) -> String {
    let joined = parts
        .iter()
        .map(|part| slugify(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let truncated = truncate_slug(&joined, max_len);
    if truncated.is_empty() {
        truncate_slug(&slugify(fallback), max_len)
    } else {
        truncated
    }
}

/// First letter of each hyphen-separated token of the slugified input, capped
/// at `max` characters. Used to abbreviate long pain/benefit phrases into
/// slug fragments.
pub fn initials(input: &str, max: usize) -> String {
    slugify(input)
        .split('-')
        .filter_map(|token| token.chars().next())
        .take(max)
        .collect()
}

/// Truncates to `max_len` without leaving a trailing hyphen.
pub fn truncate_slug(slug: &str, max_len: usize) -> String {
    let mut truncated: String = slug.chars().take(max_len).collect();
    while truncated.ends_with('-') {
        truncated.pop();
    }
    truncated
}

/// Batch-scoped set of issued slugs with deterministic collision resolution.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    issued: HashSet<String>,
}

impl SlugRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slugs issued so far.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// True when no slug has been issued yet.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    /// True when the slug has already been issued in this batch.
    pub fn contains(&self, slug: &str) -> bool {
        self.issued.contains(slug)
    }

    /// Issues `base` unchanged when free; on collision, appends a four-digit
    /// suffix derived by hashing `collision_seed` (re-truncating to stay
    /// within [`MAX_SLUG_LEN`]), walking sub-seeds until an unissued slug is
    /// found. The suffix is a pure function of the inputs, so collisions
    /// resolve identically across runs.
    pub fn claim(&mut self, base: &str, collision_seed: &str) -> String {
        if !self.issued.contains(base) {
            self.issued.insert(base.to_string());
            return base.to_string();
        }
        let stem = truncate_slug(base, MAX_SLUG_LEN - 5);
        let mut round = 0u64;
        loop {
            let suffix = select_in_range(&format!("{collision_seed}|{round}"), 1000, 9999);
            let candidate = format!("{stem}-{suffix}");
            if !self.issued.contains(&candidate) {
                self.issued.insert(candidate.clone());
                return candidate;
            }
            round += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= MAX_SLUG_LEN
            && slug
                .split('-')
                .all(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric()))
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn slugify_normalizes_mixed_input() {
        assert_eq!(slugify("Hapag-Lloyd & ONE"), "hapag-lloyd-one");
        assert_eq!(slugify("  CargoWise -> SAP  "), "cargowise-sap");
        assert_eq!(slugify("São Paulo"), "s-o-paulo");
    }

    #[test]
    fn build_slug_joins_and_bounds() {
        let slug = build_slug(&["Antwerp", "CargoWise", "NetSuite"], MAX_SLUG_LEN, "page-1");
        assert_eq!(slug, "antwerp-cargowise-netsuite");
        assert!(is_valid_slug(&slug));

        let long = "a very long city name that keeps going and going and going forever";
        let bounded = build_slug(&[long, long], 30, "page-1");
        assert!(bounded.len() <= 30);
        assert!(is_valid_slug(&bounded));
    }

    #[test]
    fn build_slug_falls_back_when_parts_vanish() {
        assert_eq!(build_slug(&["!!!", "***"], MAX_SLUG_LEN, "page-7"), "page-7");
    }

    #[test]
    fn initials_abbreviate_phrases() {
        assert_eq!(initials("manual data entry causes delays", 4), "mdec");
        assert_eq!(initials("automated extraction", 4), "ae");
    }

    #[test]
    fn truncation_never_leaves_trailing_hyphen() {
        assert_eq!(truncate_slug("antwerp-cargowise", 8), "antwerp");
    }

    #[test]
    fn registry_resolves_collisions_deterministically() {
        let issue = || {
            let mut registry = SlugRegistry::new();
            let first = registry.claim("antwerp-cargowise-sap", "combo|0");
            let second = registry.claim("antwerp-cargowise-sap", "combo|1");
            (first, second)
        };
        let mut registry = SlugRegistry::new();
        assert!(registry.is_empty());
        registry.claim("antwerp-cargowise-sap", "combo|0");
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("antwerp-cargowise-sap"));

        let (first_a, second_a) = issue();
        let (first_b, second_b) = issue();
        assert_eq!(first_a, "antwerp-cargowise-sap");
        assert_eq!(first_a, first_b);
        assert_eq!(second_a, second_b);
        assert_ne!(first_a, second_a);
        assert!(is_valid_slug(&second_a));
    }

    #[test]
    fn collision_suffixes_stay_within_bounds() {
        let mut registry = SlugRegistry::new();
        let base = "a".repeat(MAX_SLUG_LEN);
        let first = registry.claim(&base, "seed|0");
        let second = registry.claim(&base, "seed|1");
        assert!(first.len() <= MAX_SLUG_LEN);
        assert!(second.len() <= MAX_SLUG_LEN);
        assert_ne!(first, second);
        assert!(is_valid_slug(&second));
    }
}
