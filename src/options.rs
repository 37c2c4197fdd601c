//! Caller-facing solve options with documented defaults.
use crate::error::{Error, Result};
use crate::nonce::Nonce;
use crate::params::{DEFAULT_K, DEFAULT_N};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_NONCES: u64 = 0xffff;

/// Optional algorithm selection and tuning. Unset fields take the engine defaults:
/// the registry's default algorithm, sixteen zero personalization bytes and difficulty 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlgorithmParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::types::hex_bytes_opt"
    )]
    pub personalization: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i64>,
}

/// Options for a solve call.
///
/// Defaults: `n = 90`, `k = 5`, `nonce = 1`, `nonce_length` unset (4 bytes for integer
/// nonces, the buffer length for byte nonces), `max_nonces = 65535`.
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[builder(pattern = "owned")]
#[serde(default, rename_all = "camelCase")]
pub struct SolveOptions {
    #[builder(default = "DEFAULT_N")]
    pub n: u32,
    #[builder(default = "DEFAULT_K")]
    pub k: u32,
    #[builder(setter(into), default)]
    pub nonce: Nonce,
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce_length: Option<usize>,
    #[builder(default = "DEFAULT_MAX_NONCES")]
    pub max_nonces: u64,
    #[builder(default)]
    pub algorithm_parameters: AlgorithmParameters,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            k: DEFAULT_K,
            nonce: Nonce::default(),
            nonce_length: None,
            max_nonces: DEFAULT_MAX_NONCES,
            algorithm_parameters: AlgorithmParameters::default(),
        }
    }
}

impl SolveOptions {
    pub fn builder() -> SolveOptionsBuilder {
        SolveOptionsBuilder::default()
    }
}

impl SolveOptionsBuilder {
    pub fn algorithm(mut self, name: impl Into<String>) -> Self {
        self.params_mut().algorithm = Some(name.into());
        self
    }

    pub fn personalization(mut self, personalization: impl Into<Vec<u8>>) -> Self {
        self.params_mut().personalization = Some(personalization.into());
        self
    }

    pub fn difficulty(mut self, difficulty: i64) -> Self {
        self.params_mut().difficulty = Some(difficulty);
        self
    }

    fn params_mut(&mut self) -> &mut AlgorithmParameters {
        self.algorithm_parameters
            .get_or_insert_with(AlgorithmParameters::default)
    }

    /// Build the options, mapping builder failures into the crate error type.
    ///
    /// Parameter rules are not checked here; every solve call revalidates.
    pub fn build_validated(self) -> Result<SolveOptions> {
        self.build().map_err(|e| Error::InvalidOptions(e.to_string()))
    }
}
