//! Solver engine seam and the registry of named engines.
use crate::digest;
use crate::error::Result;
use crate::types::{EngineSolution, SolveRequest, VerifyRequest};
use std::fmt;
use std::sync::Arc;

pub mod registry;

pub use registry::{EngineRegistry, EngineRegistryBuilder, DEFAULT_ALGORITHM};

/// An Equihash search backend.
///
/// Requests reaching an engine have already passed parameter validation, and verify
/// requests have already passed the structural checks in [`crate::verify`].
pub trait SolverEngine: Send + Sync {
    /// Search the request's nonce window for a solution.
    ///
    /// Return an [`EngineSolution`] with an empty `solution` when the window is exhausted.
    fn solve(&self, request: &SolveRequest) -> Result<EngineSolution>;

    /// Confirm a solution cryptographically.
    ///
    /// Defaults to the BLAKE2b collision check of [`digest::verify_collision`].
    fn verify(&self, request: &VerifyRequest) -> Result<bool> {
        Ok(digest::verify_collision(request))
    }
}

/// A resolved engine together with the name it was registered under.
#[derive(Clone)]
pub struct EngineHandle {
    name: Arc<str>,
    engine: Arc<dyn SolverEngine>,
}

impl EngineHandle {
    pub(crate) fn new(name: Arc<str>, engine: Arc<dyn SolverEngine>) -> Self {
        Self { name, engine }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &Arc<dyn SolverEngine> {
        &self.engine
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::PairSearchEngine;
    use super::*;
    use crate::nonce::encode;

    fn small_request(difficulty: u64) -> SolveRequest {
        SolveRequest {
            n: 16,
            k: 1,
            personalization: vec![0u8; 16],
            seed: b"engine seam".to_vec(),
            nonce: encode(1, 4).unwrap(),
            max_nonces: 8,
            difficulty,
        }
    }

    #[test]
    fn default_verify_uses_digest_check() {
        let engine = PairSearchEngine;
        let found = engine.solve(&small_request(0)).expect("solve");
        assert_eq!(found.solution.len(), 2);
        assert_eq!(found.statistics.difficult_count, 1);

        let mut request = VerifyRequest {
            n: found.n,
            k: found.k,
            personalization: vec![0u8; 16],
            seed: b"engine seam".to_vec(),
            nonce: found.nonce.clone(),
            solution: found.solution.clone(),
        };
        assert!(engine.verify(&request).expect("verify"));
        request.seed = b"other seed".to_vec();
        assert!(!engine.verify(&request).expect("verify"));
    }

    #[test]
    fn impossible_difficulty_exhausts_the_window() {
        let found = PairSearchEngine
            .solve(&small_request(u64::MAX))
            .expect("solve");
        assert!(found.solution.is_empty());
        assert_eq!(found.statistics.nonce_count, 8);
        assert_eq!(found.statistics.difficult_count, 0);
    }

    #[test]
    fn handle_debug_shows_name() {
        let handle = EngineHandle::new(Arc::from("pairs"), Arc::new(PairSearchEngine));
        assert_eq!(handle.name(), "pairs");
        assert!(format!("{handle:?}").contains("pairs"));
    }
}
