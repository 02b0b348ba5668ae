//! Seed-driven deterministic selection into content pools.

use sha2::{Digest, Sha256};
use std::fmt;

/// Errors surfaced while selecting from a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The pool has no items to select from.
    EmptyPool,
    /// More distinct items were requested than the pool holds.
    InsufficientPool {
        /// Number of distinct items the caller asked for.
        requested: usize,
        /// Number of items actually available.
        available: usize,
    },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPool => write!(f, "cannot select from an empty pool"),
            Self::InsufficientPool {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} distinct items from a pool of {available}"
            ),
        }
    }
}

impl std::error::Error for SelectError {}

fn digest_prefix(seed: &str) -> u32 {
    let digest = Sha256::digest(seed.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Maps a seed string to an index in `[0, pool_size)`.
///
/// Pure function: the same `(seed, pool_size)` pair always yields the same
/// index. The seed is hashed with SHA-256 and the first four digest bytes are
/// reduced modulo the pool size.
pub fn select_index(seed: &str, pool_size: usize) -> Result<usize, SelectError> {
    if pool_size == 0 {
        return Err(SelectError::EmptyPool);
    }
    Ok(digest_prefix(seed) as usize % pool_size)
}

/// Selects a single pool item by seed.
pub fn select_item<'a, T>(seed: &str, pool: &'a [T]) -> Result<&'a T, SelectError> {
    let index = select_index(seed, pool.len())?;
    Ok(&pool[index])
}

/// Maps a seed to an integer in the inclusive range `[min, max]`.
///
/// Used for ROI figures, FAQ-count jitter, and slug collision suffixes.
pub fn select_in_range(seed: &str, min: u64, max: u64) -> u64 {
    debug_assert!(min <= max, "range must not be inverted");
    let span = max - min + 1;
    min + u64::from(digest_prefix(seed)) % span
}

/// Selects `n` distinct pool items without replacement.
///
/// Sub-seeds are derived by appending an index suffix; each chosen item is
/// removed from a working copy before the next draw, so the result never
/// repeats an item.
pub fn select_distinct<'a, T>(
    seed: &str,
    pool: &'a [T],
    n: usize,
) -> Result<Vec<&'a T>, SelectError> {
    if n > pool.len() {
        return Err(SelectError::InsufficientPool {
            requested: n,
            available: pool.len(),
        });
    }
    let mut remaining: Vec<&T> = pool.iter().collect();
    let mut chosen = Vec::with_capacity(n);
    for round in 0..n {
        let sub_seed = format!("{seed}#{round}");
        let index = select_index(&sub_seed, remaining.len())?;
        chosen.push(remaining.remove(index));
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_stays_in_bounds() {
        for pool_size in 1..=1000 {
            for sample in 0..10 {
                let seed = format!("seed-{pool_size}-{sample}");
                let index = select_index(&seed, pool_size).expect("non-empty pool");
                assert!(index < pool_size, "index {index} for size {pool_size}");
            }
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let first = select_index("antwerp|cargowise|sap", 97).unwrap();
        let second = select_index("antwerp|cargowise|sap", 97).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn singleton_pool_returns_zero() {
        assert_eq!(select_index("anything", 1).unwrap(), 0);
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert_eq!(select_index("seed", 0), Err(SelectError::EmptyPool));
        let empty: [u8; 0] = [];
        assert_eq!(select_item("seed", &empty), Err(SelectError::EmptyPool));
    }

    #[test]
    fn range_selection_is_inclusive() {
        let mut saw_min = false;
        let mut saw_max = false;
        for sample in 0..200 {
            let value = select_in_range(&format!("roi-{sample}"), 3, 5);
            assert!((3..=5).contains(&value));
            saw_min |= value == 3;
            saw_max |= value == 5;
        }
        assert!(saw_min && saw_max, "both endpoints should be reachable");
    }

    #[test]
    fn distinct_draw_of_full_pool_is_a_permutation() {
        let pool = ["a", "b", "c", "d", "e"];
        let chosen = select_distinct("perm-seed", &pool, pool.len()).unwrap();
        let mut sorted: Vec<&str> = chosen.iter().map(|item| **item).collect();
        sorted.sort_unstable();
        assert_eq!(sorted, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn distinct_draw_rejects_oversized_requests() {
        let pool = ["a", "b"];
        assert_eq!(
            select_distinct("seed", &pool, 3),
            Err(SelectError::InsufficientPool {
                requested: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn distinct_draw_never_repeats_an_item() {
        let pool: Vec<String> = (0..20).map(|i| format!("faq-{i}")).collect();
        for sample in 0..50 {
            let chosen = select_distinct(&format!("combo-{sample}"), &pool, 6).unwrap();
            let mut deduped: Vec<&String> = chosen.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(deduped.len(), chosen.len());
        }
    }
}
