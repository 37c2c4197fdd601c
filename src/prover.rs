//! Solve and verify entry points tying validation, structural checks and engines together.
use crate::engine::{EngineHandle, EngineRegistry};
use crate::error::{Error, Result};
use crate::nonce::{self, Nonce};
use crate::options::SolveOptions;
use crate::pending::Pending;
use crate::types::{EngineSolution, Proof, ProofParameters, SolveRequest, VerifyRequest};
use crate::validate::{validate_solve, validate_verify};
use crate::verify::check_structure;
use std::sync::Arc;
use tracing::{debug, warn};

/// Equihash front end over a fixed set of solver engines.
///
/// Cheap to clone; every clone shares the same immutable [`EngineRegistry`].
#[derive(Clone, Debug)]
pub struct Equihash {
    registry: Arc<EngineRegistry>,
}

impl Equihash {
    pub fn new(registry: Arc<EngineRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Search for a proof over `seed`.
    ///
    /// Invalid options fulfil the handle with the validation error without starting the
    /// engine. An exhausted search window yields [`Error::NotFound`].
    pub fn solve(&self, seed: &[u8], options: &SolveOptions) -> Pending<Proof> {
        match validate_solve(&self.registry, seed, options) {
            Ok((engine, request)) => Pending::spawn(move || run_solve(&engine, &request)),
            Err(err) => Pending::ready(Err(err)),
        }
    }

    /// [`Equihash::solve`] on the calling thread.
    pub fn solve_blocking(&self, seed: &[u8], options: &SolveOptions) -> Result<Proof> {
        let (engine, request) = validate_solve(&self.registry, seed, options)?;
        run_solve(&engine, &request)
    }

    /// Check `proof` against `seed`.
    ///
    /// Parameter violations and a wrong solution length are errors. A solution with
    /// duplicate or misordered indices is `Ok(false)` and never reaches the engine.
    pub fn verify(&self, seed: &[u8], proof: &Proof) -> Pending<bool> {
        match prepare_verify(&self.registry, seed, proof) {
            Ok(Some((engine, request))) => Pending::spawn(move || run_verify(&engine, &request)),
            Ok(None) => Pending::ready(Ok(false)),
            Err(err) => Pending::ready(Err(err)),
        }
    }

    /// [`Equihash::verify`] on the calling thread.
    pub fn verify_sync(&self, seed: &[u8], proof: &Proof) -> Result<bool> {
        match prepare_verify(&self.registry, seed, proof)? {
            Some((engine, request)) => run_verify(&engine, &request),
            None => Ok(false),
        }
    }
}

/// Validation plus structural checks; `None` when the solution is structurally rejected.
fn prepare_verify(
    registry: &EngineRegistry,
    seed: &[u8],
    proof: &Proof,
) -> Result<Option<(EngineHandle, VerifyRequest)>> {
    let (engine, request) = validate_verify(registry, seed, proof)?;
    if !check_structure(&request.solution, request.k)? {
        debug!(
            n = request.n,
            k = request.k,
            "solution rejected by structural check"
        );
        return Ok(None);
    }
    Ok(Some((engine, request)))
}

fn run_verify(engine: &EngineHandle, request: &VerifyRequest) -> Result<bool> {
    debug!(algorithm = engine.name(), n = request.n, k = request.k, "verifying solution");
    engine.engine().verify(request).inspect_err(|err| {
        warn!(algorithm = engine.name(), %err, "engine verify failed");
    })
}

fn run_solve(engine: &EngineHandle, request: &SolveRequest) -> Result<Proof> {
    debug!(
        algorithm = engine.name(),
        n = request.n,
        k = request.k,
        max_nonces = request.max_nonces,
        "dispatching solve"
    );
    let found = engine.engine().solve(request).inspect_err(|err| {
        warn!(algorithm = engine.name(), %err, "engine solve failed");
    })?;
    if found.solution.is_empty() {
        debug!(
            algorithm = engine.name(),
            nonces = found.statistics.nonce_count,
            "no solution within search bound"
        );
        return Err(Error::NotFound);
    }
    assemble_proof(engine, request, found)
}

fn assemble_proof(
    engine: &EngineHandle,
    request: &SolveRequest,
    found: EngineSolution,
) -> Result<Proof> {
    if (found.n, found.k) != (request.n, request.k) {
        warn!(
            algorithm = engine.name(),
            n = found.n,
            k = found.k,
            "engine answered for different parameters"
        );
        return Err(Error::Engine(format!(
            "engine returned a solution for n={}, k={} instead of n={}, k={}",
            found.n, found.k, request.n, request.k
        )));
    }
    check_nonce_in_window(request, &found.nonce).inspect_err(|err| {
        warn!(algorithm = engine.name(), %err, "engine nonce rejected");
    })?;
    let canonical = check_structure(&found.solution, request.k).map_err(|err| {
        Error::Engine(format!("engine returned a malformed solution: {err}"))
    })?;
    if !canonical {
        warn!(algorithm = engine.name(), "engine returned a non-canonical solution");
        return Err(Error::Engine(
            "engine returned a solution with duplicate or misordered indices".into(),
        ));
    }
    let difficulty = i64::try_from(request.difficulty)
        .map_err(|_| Error::Engine(format!("difficulty {} out of range", request.difficulty)))?;
    Ok(Proof {
        n: request.n,
        k: request.k,
        seed: request.seed.clone(),
        nonce: Nonce::Bytes(found.nonce),
        nonce_length: None,
        solution: found.solution,
        algorithm: Some(engine.name().to_owned()),
        algorithm_parameters: ProofParameters {
            personalization: request.personalization.clone(),
            difficulty,
        },
        statistics: found.statistics,
    })
}

/// The winning nonce must keep the request's width and lie in
/// `[start, start + max_nonces - 1]`.
fn check_nonce_in_window(request: &SolveRequest, nonce: &[u8]) -> Result<()> {
    if nonce.len() != request.nonce.len() {
        return Err(Error::Engine(format!(
            "engine returned a {}-byte nonce for a {}-byte request",
            nonce.len(),
            request.nonce.len()
        )));
    }
    let start = u64::from(nonce::decode(&request.nonce)?);
    let value = u64::from(nonce::decode(nonce)?);
    if value < start || value - start >= request.max_nonces {
        return Err(Error::Engine(format!(
            "engine nonce {value} outside search window starting at {start} ({} nonces)",
            request.max_nonces
        )));
    }
    Ok(())
}
