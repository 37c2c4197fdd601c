//! Structural checks on an Equihash index tree.
//!
//! A solution is `2^k` indices forming the leaves of a binary tree of `k` joins. These
//! checks need no hashing and run before any digest verification: a solution that fails
//! them is rejected outright.
use crate::error::{ConfigError, Error, Result};
use std::collections::HashSet;

/// Check length, index distinctness and canonical tree ordering.
///
/// A wrong length is a malformed input and returns an error. Duplicate indices or an
/// out-of-order join are a valid negative answer and return `Ok(false)`.
pub fn check_structure(solution: &[u32], k: u32) -> Result<bool> {
    let expected = expected_len(k)?;
    if solution.len() != expected {
        return Err(Error::SolutionLength {
            expected,
            actual: solution.len(),
        });
    }
    Ok(has_distinct_indices(solution) && is_canonically_ordered(solution, k))
}

/// Whether no index appears twice.
pub fn has_distinct_indices(solution: &[u32]) -> bool {
    let mut seen = HashSet::with_capacity(solution.len());
    solution.iter().all(|index| seen.insert(*index))
}

/// Whether the left subtree's first index is below the right subtree's at every join.
///
/// Callers must pass a solution of exactly `2^k` indices.
pub fn is_canonically_ordered(solution: &[u32], k: u32) -> bool {
    (0..k).all(|level| {
        let stride = 1usize << level;
        solution
            .chunks_exact(2 * stride)
            .all(|block| block[0] < block[stride])
    })
}

/// Reorder `solution` into canonical form by swapping sibling subtrees, lowest level first.
///
/// Solver engines use this before returning a solution. Indices are not deduplicated.
pub fn order_solution(solution: &mut [u32], k: u32) -> Result<()> {
    let expected = expected_len(k)?;
    if solution.len() != expected {
        return Err(Error::SolutionLength {
            expected,
            actual: solution.len(),
        });
    }
    for level in 0..k {
        let stride = 1usize << level;
        for block in solution.chunks_exact_mut(2 * stride) {
            if block[0] >= block[stride] {
                let (left, right) = block.split_at_mut(stride);
                left.swap_with_slice(right);
            }
        }
    }
    Ok(())
}

fn expected_len(k: u32) -> Result<usize> {
    1usize
        .checked_shl(k)
        .ok_or_else(|| ConfigError::KOutOfRange(k).into())
}
