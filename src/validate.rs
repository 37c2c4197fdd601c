//! Parameter rules applied to every solve and verify call before any engine work.
//!
//! Rules are checked in a fixed order and the first violation is reported. Nothing is
//! cached: each call revalidates from the raw options or proof.
use crate::engine::{EngineHandle, EngineRegistry};
use crate::error::{ConfigError, Result};
use crate::nonce::{self, Nonce, MIN_NONCE_LENGTH};
use crate::options::SolveOptions;
use crate::params::Params;
use crate::types::{
    Proof, SolveRequest, VerifyRequest, MAX_DIFFICULTY, MIN_DIFFICULTY, PERSONALIZATION_BYTES,
};
use tracing::debug;

/// Validate solve options and produce the canonical engine request.
pub fn validate_solve(
    registry: &EngineRegistry,
    seed: &[u8],
    options: &SolveOptions,
) -> Result<(EngineHandle, SolveRequest)> {
    check_solve(registry, seed, options).inspect_err(|err| {
        debug!(%err, "solve options rejected");
    })
}

/// Validate a proof for verification and produce the canonical engine request.
///
/// The solution itself is not inspected here; see [`crate::verify::check_structure`].
pub fn validate_verify(
    registry: &EngineRegistry,
    seed: &[u8],
    proof: &Proof,
) -> Result<(EngineHandle, VerifyRequest)> {
    check_verify(registry, seed, proof).inspect_err(|err| {
        debug!(%err, "proof parameters rejected");
    })
}

fn check_solve(
    registry: &EngineRegistry,
    seed: &[u8],
    options: &SolveOptions,
) -> Result<(EngineHandle, SolveRequest)> {
    let algorithm = &options.algorithm_parameters;
    let engine = registry.select(algorithm.algorithm.as_deref())?;
    let params = Params::new(options.n, options.k)?;
    let personalization = algorithm
        .personalization
        .clone()
        .unwrap_or_else(|| vec![0u8; PERSONALIZATION_BYTES]);
    check_personalization(&personalization)?;

    let nonce = resolve_nonce(&options.nonce, options.nonce_length)?;

    if options.max_nonces == 0 {
        return Err(ConfigError::MaxNoncesZero.into());
    }
    let start = nonce::decode(&nonce)?;
    if u64::from(u32::MAX - start) < options.max_nonces - 1 {
        return Err(ConfigError::NonceRangeOverflow {
            nonce: start,
            max_nonces: options.max_nonces,
        }
        .into());
    }

    let difficulty = check_difficulty(algorithm.difficulty.unwrap_or(MIN_DIFFICULTY))?;

    Ok((
        engine,
        SolveRequest {
            n: params.n(),
            k: params.k(),
            personalization,
            seed: seed.to_vec(),
            nonce,
            max_nonces: options.max_nonces,
            difficulty,
        },
    ))
}

fn check_verify(
    registry: &EngineRegistry,
    seed: &[u8],
    proof: &Proof,
) -> Result<(EngineHandle, VerifyRequest)> {
    let engine = registry.select(proof.algorithm.as_deref())?;
    let params = Params::new(proof.n, proof.k)?;
    let personalization = &proof.algorithm_parameters.personalization;
    check_personalization(personalization)?;
    let nonce = resolve_nonce(&proof.nonce, proof.nonce_length)?;
    check_difficulty(proof.algorithm_parameters.difficulty)?;

    Ok((
        engine,
        VerifyRequest {
            n: params.n(),
            k: params.k(),
            personalization: personalization.clone(),
            seed: seed.to_vec(),
            nonce,
            solution: proof.solution.clone(),
        },
    ))
}

/// Canonical bytes for `nonce`. The width is the explicit `nonce_length`, else the
/// buffer's own length, else 4 bytes.
fn resolve_nonce(nonce: &Nonce, nonce_length: Option<usize>) -> Result<Vec<u8>> {
    let length = nonce_length
        .or(nonce.buffer_len())
        .unwrap_or(MIN_NONCE_LENGTH);
    if length < MIN_NONCE_LENGTH {
        return Err(ConfigError::NonceLengthTooSmall(length).into());
    }
    if let (Some(expected), Some(actual)) = (nonce_length, nonce.buffer_len()) {
        if expected != actual {
            return Err(ConfigError::NonceLengthMismatch {
                nonce: actual,
                nonce_length: expected,
            }
            .into());
        }
    }
    nonce.to_bytes(length)
}

fn check_personalization(personalization: &[u8]) -> Result<()> {
    if personalization.len() > PERSONALIZATION_BYTES {
        return Err(ConfigError::PersonalizationTooLong(personalization.len()).into());
    }
    Ok(())
}

fn check_difficulty(difficulty: i64) -> Result<u64> {
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(ConfigError::DifficultyOutOfRange(difficulty).into());
    }
    u64::try_from(difficulty).map_err(|_| ConfigError::DifficultyOutOfRange(difficulty).into())
}
