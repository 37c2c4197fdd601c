//! Validated Equihash proof-of-work protocol layer.
//!
//! This crate owns everything around an Equihash solver except the collision search
//! itself: parameter rules, nonce canonicalization, the structural check on a solution's
//! index tree, proof assembly and dispatch to named [`SolverEngine`]s.
//!
//! - [`Equihash::solve`] validates [`SolveOptions`], hands a canonical [`SolveRequest`]
//!   to the selected engine and wraps its answer in a [`Proof`].
//! - [`Equihash::verify`] and [`Equihash::verify_sync`] validate a proof, reject
//!   duplicate or misordered indices locally, and only then ask the engine to confirm
//!   the digest collision. The default [`SolverEngine::verify`] is the BLAKE2b check in
//!   [`digest`].
//!
//! ```
//! use rsequihash::{
//!     EngineRegistry, EngineSolution, Equihash, Error, Proof, SolveOptions, SolveRequest,
//!     SolverEngine, DEFAULT_ALGORITHM,
//! };
//! use std::sync::Arc;
//!
//! /// An engine that never finds anything.
//! struct Exhausted;
//!
//! impl SolverEngine for Exhausted {
//!     fn solve(&self, request: &SolveRequest) -> rsequihash::Result<EngineSolution> {
//!         Ok(EngineSolution {
//!             n: request.n,
//!             k: request.k,
//!             nonce: request.nonce.clone(),
//!             ..EngineSolution::default()
//!         })
//!     }
//! }
//!
//! let registry = EngineRegistry::single(DEFAULT_ALGORITHM, Arc::new(Exhausted))?;
//! let equihash = Equihash::new(Arc::new(registry));
//!
//! let err = equihash.solve(b"seed", &SolveOptions::default()).wait().unwrap_err();
//! assert_eq!(err, Error::NotFound);
//!
//! // Well-formed tree, but the indices do not collide.
//! let claim = Proof::claim(90, 5, 1u32, (0..32).collect());
//! assert!(!equihash.verify_sync(b"seed", &claim)?);
//! # Ok::<(), rsequihash::Error>(())
//! ```
pub mod digest;
pub mod engine;
pub mod error;
pub mod nonce;
pub mod options;
pub mod params;
pub mod pending;
pub mod prover;
pub mod types;
pub mod validate;
pub mod verify;

pub use engine::{
    EngineHandle, EngineRegistry, EngineRegistryBuilder, SolverEngine, DEFAULT_ALGORITHM,
};
pub use error::{ConfigError, Error, Result};
pub use nonce::{Nonce, MIN_NONCE_LENGTH};
pub use options::{AlgorithmParameters, SolveOptions, SolveOptionsBuilder, DEFAULT_MAX_NONCES};
pub use params::{Params, DEFAULT_K, DEFAULT_N, MAX_K, MIN_K};
pub use pending::Pending;
pub use prover::Equihash;
pub use types::{
    EngineSolution, Proof, ProofParameters, SolveRequest, Statistics, VerifyRequest,
    MAX_DIFFICULTY, MIN_DIFFICULTY, PERSONALIZATION_BYTES,
};
pub use verify::check_structure;
