use crate::error::{ConfigError, Result};

/// Smallest supported number of collision rounds.
pub const MIN_K: u32 = 1;
/// Largest supported number of collision rounds.
///
/// The reference engine reads `k + 1` blocks from a 32-byte digest of eight words.
pub const MAX_K: u32 = 7;
/// Upper bound on `n / (k + 1)`, the per-block collision width in bits.
pub const MAX_COLLISION_BITS: u32 = 32;

pub const DEFAULT_N: u32 = 90;
pub const DEFAULT_K: u32 = 5;

/// Validated Equihash puzzle parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Params {
    n: u32,
    k: u32,
}

impl Params {
    pub fn new(n: u32, k: u32) -> Result<Self> {
        if !(MIN_K..=MAX_K).contains(&k) {
            return Err(ConfigError::KOutOfRange(k).into());
        }
        // n / (k + 1) <= 32 over the reals, i.e. no remainder allowed at the bound.
        if u64::from(n) > u64::from(MAX_COLLISION_BITS) * u64::from(k + 1) {
            return Err(ConfigError::IncompatibleNk { n, k }.into());
        }
        Ok(Params { n, k })
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    /// Number of indices in a solution, `2^k`.
    pub fn solution_len(&self) -> usize {
        1usize << self.k
    }

    pub fn collision_bit_length(&self) -> u32 {
        self.n / (self.k + 1)
    }

    /// Bits needed for a single solution index, `n / (k + 1) + 1`.
    pub fn index_bit_length(&self) -> u32 {
        self.collision_bit_length() + 1
    }
}

impl Default for Params {
    fn default() -> Self {
        Params {
            n: DEFAULT_N,
            k: DEFAULT_K,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn k_bounds() {
        assert!(matches!(
            Params::new(90, 0),
            Err(Error::InvalidConfig(ConfigError::KOutOfRange(0)))
        ));
        assert!(matches!(
            Params::new(90, 8),
            Err(Error::InvalidConfig(ConfigError::KOutOfRange(8)))
        ));
        for k in 1..=7 {
            let n = 32 * (k + 1);
            assert!(Params::new(n, k).is_ok(), "n={n} k={k} should be accepted");
        }
    }

    #[test]
    fn n_k_compatibility() {
        assert!(Params::new(256, 7).is_ok());
        assert!(matches!(
            Params::new(257, 7),
            Err(Error::InvalidConfig(ConfigError::IncompatibleNk { n: 257, k: 7 }))
        ));
        assert!(matches!(
            Params::new(65, 1),
            Err(Error::InvalidConfig(ConfigError::IncompatibleNk { .. }))
        ));
    }

    #[test]
    fn derived_lengths() {
        let params = Params::default();
        assert_eq!(params.solution_len(), 32);
        assert_eq!(params.collision_bit_length(), 15);
        assert_eq!(params.index_bit_length(), 16);
    }
}
