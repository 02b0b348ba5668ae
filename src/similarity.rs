//! Shingle fingerprints and Jaccard similarity for near-duplicate detection.
//!
//! Exact-hash duplicate detection misses pages that differ only by a city
//! name substitution; hashing every window of five tokens and comparing the
//! resulting sets catches that class while tolerating local word-order
//! variation. Candidates are compared against every accepted fingerprint in
//! the batch, which is quadratic over the batch but fine at the hundreds-to-
//! low-thousands scale this tool targets.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Default shingle window, in tokens.
pub const DEFAULT_SHINGLE_SIZE: usize = 5;

/// Lower-cases the text, strips everything outside `[a-z0-9]`, and splits on
/// whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
        } else {
            cleaned.push(' ');
        }
    }
    cleaned
        .split_whitespace()
        .map(|token| token.to_string())
        .collect()
}

fn shingle_hash(tokens: &[String]) -> u64 {
    let mut hasher = Sha256::new();
    for (position, token) in tokens.iter().enumerate() {
        if position > 0 {
            hasher.update(b" ");
        }
        hasher.update(token.as_bytes());
    }
    let digest = hasher.finalize();
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

/// Set of shingle hashes representing one document.
#[derive(Debug, Clone, Default)]
pub struct Fingerprint {
    shingles: HashSet<u64>,
}

impl Fingerprint {
    /// Builds the fingerprint of `text` using `shingle_size`-token windows.
    ///
    /// Texts shorter than one window produce an empty fingerprint, which
    /// compares as dissimilar to everything.
    pub fn of_text(text: &str, shingle_size: usize) -> Self {
        let tokens = tokenize(text);
        let mut shingles = HashSet::new();
        if shingle_size > 0 && tokens.len() >= shingle_size {
            for window in tokens.windows(shingle_size) {
                shingles.insert(shingle_hash(window));
            }
        }
        Self { shingles }
    }

    /// Number of distinct shingles.
    pub fn len(&self) -> usize {
        self.shingles.len()
    }

    /// True when the document was too short to shingle.
    pub fn is_empty(&self) -> bool {
        self.shingles.is_empty()
    }
}

/// Jaccard similarity of two fingerprints: `|a ∩ b| / |a ∪ b|`.
///
/// Defined as 0.0 when either fingerprint is empty.
pub fn jaccard(a: &Fingerprint, b: &Fingerprint) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.shingles.intersection(&b.shingles).count();
    let union = a.shingles.len() + b.shingles.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Rejects candidates whose fingerprint is too close to any accepted page.
#[derive(Debug)]
pub struct SimilarityGuard {
    threshold: f64,
    accepted: Vec<Fingerprint>,
}

impl SimilarityGuard {
    /// Creates a guard with an explicit threshold in `[0, 1]`.
    ///
    /// There is deliberately no default: a threshold of 1.0 only rejects
    /// shingle-set equality, and callers must opt into that rather than
    /// inherit it silently.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            accepted: Vec::new(),
        }
    }

    /// Configured rejection threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of admitted fingerprints.
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// True when nothing has been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// True when the candidate's similarity to any admitted fingerprint
    /// strictly exceeds the threshold.
    pub fn is_too_similar(&self, candidate: &Fingerprint) -> bool {
        self.accepted
            .iter()
            .any(|accepted| jaccard(candidate, accepted) > self.threshold)
    }

    /// Records an accepted page's fingerprint.
    pub fn admit(&mut self, fingerprint: Fingerprint) {
        self.accepted.push(fingerprint);
    }
}
