//! BLAKE2b digest checks compatible with the Khovratovich reference engine.
//!
//! Every index `i` of a solution is hashed as `BLAKE2b-256(personal; seed || nonce ||
//! le32(i))`. The digest is read as eight little-endian words and block `j` of the index
//! is the top `n / (k + 1)` bits of word `j`. A solution is a valid collision when the
//! XOR of every block over all of its indices is zero.
use crate::params::Params;
use crate::types::{VerifyRequest, PERSONALIZATION_BYTES};
use blake2b_simd::{Params as Blake2bParams, State as Blake2bState};

/// Output length of the per-index digest, in bytes.
pub const DIGEST_BYTES: usize = 32;
const DIGEST_WORDS: usize = DIGEST_BYTES / 4;

/// Number of high bits of the difficulty word compared against the target.
pub const DIFFICULTY_BITS: u32 = 53;

/// BLAKE2b state primed with `seed || nonce` for one puzzle instance.
#[derive(Clone)]
pub struct PuzzleHasher {
    params: Params,
    base: Blake2bState,
}

impl PuzzleHasher {
    /// Personalization beyond [`PERSONALIZATION_BYTES`] is truncated; shorter values are
    /// zero-padded by BLAKE2b itself.
    pub fn new(params: Params, personalization: &[u8], seed: &[u8], nonce: &[u8]) -> Self {
        let personal = &personalization[..personalization.len().min(PERSONALIZATION_BYTES)];
        let mut base = Blake2bParams::new()
            .hash_length(DIGEST_BYTES)
            .personal(personal)
            .to_state();
        base.update(seed);
        base.update(nonce);
        Self { params, base }
    }

    /// The `k + 1` collision blocks of index `index`.
    pub fn blocks(&self, index: u32) -> Vec<u32> {
        let words = self.index_words(index);
        let bits = self.params.collision_bit_length();
        words
            .iter()
            .take(self.params.k() as usize + 1)
            .map(|word| leading_bits(*word, bits))
            .collect()
    }

    /// Whether the blocks of every index in `solution` XOR to zero.
    ///
    /// Ordering and distinctness are not checked here.
    pub fn is_collision(&self, solution: &[u32]) -> bool {
        if solution.is_empty() {
            return false;
        }
        let mut acc = vec![0u32; self.params.k() as usize + 1];
        for index in solution {
            for (slot, block) in acc.iter_mut().zip(self.blocks(*index)) {
                *slot ^= block;
            }
        }
        acc.iter().all(|block| *block == 0)
    }

    /// Difficulty score of a solution: the top 53 bits of the first 64 digest bits over
    /// `seed || nonce || le32(s_0) || ... || le32(s_last)`.
    pub fn difficulty_score(&self, solution: &[u32]) -> u64 {
        let mut state = self.base.clone();
        for index in solution {
            state.update(&index.to_le_bytes());
        }
        let words = to_words(state.finalize().as_bytes());
        let head = u64::from(words[0]) | (u64::from(words[1]) << 32);
        head >> (64 - DIFFICULTY_BITS)
    }

    pub fn meets_difficulty(&self, solution: &[u32], difficulty: u64) -> bool {
        self.difficulty_score(solution) >= difficulty
    }

    fn index_words(&self, index: u32) -> [u32; DIGEST_WORDS] {
        let mut state = self.base.clone();
        state.update(&index.to_le_bytes());
        to_words(state.finalize().as_bytes())
    }
}

/// Digest check of a verify request. Requests with invalid `(n, k)` never verify.
pub fn verify_collision(request: &VerifyRequest) -> bool {
    match Params::new(request.n, request.k) {
        Ok(params) => PuzzleHasher::new(
            params,
            &request.personalization,
            &request.seed,
            &request.nonce,
        )
        .is_collision(&request.solution),
        Err(_) => false,
    }
}

fn to_words(bytes: &[u8]) -> [u32; DIGEST_WORDS] {
    let mut words = [0u32; DIGEST_WORDS];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

fn leading_bits(word: u32, bits: u32) -> u32 {
    if bits == 0 {
        0
    } else if bits >= 32 {
        word
    } else {
        word >> (32 - bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Brute-force a canonical `k = 1` solution by looking for two indices whose two
    /// blocks are equal.
    fn find_pair(hasher: &PuzzleHasher, limit: u32) -> Option<[u32; 2]> {
        let mut seen: HashMap<Vec<u32>, u32> = HashMap::new();
        for index in 0..limit {
            let blocks = hasher.blocks(index);
            if let Some(prev) = seen.get(&blocks) {
                return Some([*prev, index]);
            }
            seen.insert(blocks, index);
        }
        None
    }

    fn small_hasher(nonce: u32) -> PuzzleHasher {
        let params = Params::new(16, 1).unwrap();
        PuzzleHasher::new(params, b"", b"rsequihash test seed", &nonce.to_le_bytes())
    }

    #[test]
    fn blocks_have_collision_width() {
        let params = Params::new(90, 5).unwrap();
        let hasher = PuzzleHasher::new(params, &[0u8; 16], b"seed", &[1, 0, 0, 0]);
        let blocks = hasher.blocks(42);
        assert_eq!(blocks.len(), 6);
        assert!(blocks.iter().all(|b| *b < (1 << 15)));
    }

    #[test]
    fn brute_forced_pair_is_a_collision() {
        let hasher = small_hasher(1);
        let pair = find_pair(&hasher, 1 << 12).expect("a 16-bit collision among 4096 indices");
        assert!(pair[0] < pair[1]);
        assert!(hasher.is_collision(&pair));
    }

    #[test]
    fn tampered_pair_is_not_a_collision() {
        let hasher = small_hasher(1);
        let pair = find_pair(&hasher, 1 << 12).expect("collision");
        let other = (0..)
            .find(|i| *i != pair[0] && hasher.blocks(*i) != hasher.blocks(pair[1]))
            .expect("an index with different blocks");
        assert!(!hasher.is_collision(&[pair[0], other]));
        // same pair under a different nonce hashes differently
        let shifted = small_hasher(2);
        assert_ne!(
            shifted.difficulty_score(&pair),
            hasher.difficulty_score(&pair)
        );
    }

    #[test]
    fn empty_solution_is_never_a_collision() {
        assert!(!small_hasher(1).is_collision(&[]));
    }

    #[test]
    fn personalization_changes_the_digest() {
        let params = Params::new(16, 1).unwrap();
        let plain = PuzzleHasher::new(params, &[], b"seed", &[1, 0, 0, 0]);
        let zeros = PuzzleHasher::new(params, &[0u8; 16], b"seed", &[1, 0, 0, 0]);
        let personal = PuzzleHasher::new(params, b"rsequihash", b"seed", &[1, 0, 0, 0]);
        // zero padding is implicit
        assert_eq!(plain.blocks(7), zeros.blocks(7));
        assert_ne!(plain.difficulty_score(&[1, 2]), personal.difficulty_score(&[1, 2]));
    }

    #[test]
    fn difficulty_score_fits_in_53_bits() {
        let hasher = small_hasher(1);
        let score = hasher.difficulty_score(&[3, 9]);
        assert!(score < (1 << DIFFICULTY_BITS));
        assert!(hasher.meets_difficulty(&[3, 9], 0));
        assert!(hasher.meets_difficulty(&[3, 9], score));
        assert!(!hasher.meets_difficulty(&[3, 9], score + 1));
    }

    #[test]
    fn verify_collision_rejects_invalid_params() {
        let request = VerifyRequest {
            n: 90,
            k: 9,
            personalization: vec![],
            seed: vec![],
            nonce: vec![1, 0, 0, 0],
            solution: vec![1, 2],
        };
        assert!(!verify_collision(&request));
    }

    #[test]
    fn leading_bits_edges() {
        assert_eq!(leading_bits(0xffff_ffff, 0), 0);
        assert_eq!(leading_bits(0x8000_0001, 1), 1);
        assert_eq!(leading_bits(0x1234_5678, 32), 0x1234_5678);
    }
}
