use crate::error::{Error, Result};
use crate::nonce::Nonce;
use crate::params::{DEFAULT_K, DEFAULT_N};
use serde::{Deserialize, Serialize};

/// BLAKE2b personalization width in bytes.
pub const PERSONALIZATION_BYTES: usize = 16;

pub const MIN_DIFFICULTY: i64 = 0;
/// Largest difficulty accepted, `2^53 - 1`.
pub const MAX_DIFFICULTY: i64 = (1 << 53) - 1;

/// Serde adapter storing byte buffers as lowercase hex strings.
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        hex::decode(raw).map_err(serde::de::Error::custom)
    }
}

/// [`hex_bytes`] for optional buffers; `None` maps to JSON `null`.
pub(crate) mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => super::hex_bytes::serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| hex::decode(raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Search-effort counters reported by a solver engine. Copied into proofs verbatim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Nonces tried.
    pub nonce_count: u64,
    /// Raw collisions that reached the final round.
    pub solution_count: u64,
    /// Of those, solutions with distinct indices.
    pub distinct_count: u64,
    /// Of those, solutions meeting the difficulty target.
    pub difficult_count: u64,
}

/// Resolved algorithm parameters recorded in a proof.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofParameters {
    #[serde(with = "hex_bytes")]
    pub personalization: Vec<u8>,
    pub difficulty: i64,
}

impl Default for ProofParameters {
    fn default() -> Self {
        Self {
            personalization: vec![0u8; PERSONALIZATION_BYTES],
            difficulty: MIN_DIFFICULTY,
        }
    }
}

/// An Equihash proof: the puzzle, the nonce that solved it and the index tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub n: u32,
    pub k: u32,
    #[serde(with = "hex_bytes")]
    pub seed: Vec<u8>,
    pub nonce: Nonce,
    /// Width of an integer nonce's encoding; unset means the buffer length, or 4 bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce_length: Option<usize>,
    pub solution: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub algorithm_parameters: ProofParameters,
    #[serde(default)]
    pub statistics: Statistics,
}

impl Default for Proof {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            k: DEFAULT_K,
            seed: Vec::new(),
            nonce: Nonce::default(),
            nonce_length: None,
            solution: Vec::new(),
            algorithm: None,
            algorithm_parameters: ProofParameters::default(),
            statistics: Statistics::default(),
        }
    }
}

impl Proof {
    /// A bare proof claim, e.g. one received from a peer that only sent the solution.
    pub fn claim(n: u32, k: u32, nonce: impl Into<Nonce>, solution: Vec<u32>) -> Self {
        Self {
            n,
            k,
            nonce: nonce.into(),
            solution,
            ..Self::default()
        }
    }

    /// Set the encoded width of the proof's nonce, as passed to the solve call.
    pub fn with_nonce_length(mut self, nonce_length: usize) -> Self {
        self.nonce_length = Some(nonce_length);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Encoding(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Encoding(e.to_string()))
    }
}

/// Canonical solve request handed to a [`SolverEngine`](crate::engine::SolverEngine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveRequest {
    pub n: u32,
    pub k: u32,
    pub personalization: Vec<u8>,
    pub seed: Vec<u8>,
    /// Starting nonce in canonical byte form.
    pub nonce: Vec<u8>,
    /// Attempts allowed; `nonce + max_nonces - 1` fits in 32 bits.
    pub max_nonces: u64,
    pub difficulty: u64,
}

/// Canonical verify request handed to a [`SolverEngine`](crate::engine::SolverEngine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyRequest {
    pub n: u32,
    pub k: u32,
    pub personalization: Vec<u8>,
    pub seed: Vec<u8>,
    pub nonce: Vec<u8>,
    pub solution: Vec<u32>,
}

/// Raw engine answer to a [`SolveRequest`]. An empty `solution` means nothing was found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineSolution {
    pub n: u32,
    pub k: u32,
    pub nonce: Vec<u8>,
    pub solution: Vec<u32>,
    pub statistics: Statistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_json_round_trip_uses_hex_and_camel_case() {
        let proof = Proof {
            seed: vec![0xab, 0xcd],
            nonce: Nonce::Bytes(vec![2, 0, 0, 0]),
            solution: vec![1, 2],
            algorithm: Some("khovratovich".into()),
            statistics: Statistics {
                nonce_count: 3,
                ..Statistics::default()
            },
            ..Proof::claim(16, 1, 2u32, vec![1, 2])
        };
        let json = proof.to_json().expect("encode");
        assert!(json.contains("\"seed\":\"abcd\""));
        assert!(json.contains("\"algorithmParameters\""));
        assert!(json.contains("\"nonceCount\":3"));
        assert!(!json.contains("nonceLength"));
        assert_eq!(Proof::from_json(&json).expect("decode"), proof);
    }

    #[test]
    fn proof_from_json_fills_defaults() {
        let proof = Proof::from_json(r#"{"n":90,"k":5,"seed":"","nonce":1,"solution":[]}"#)
            .expect("decode");
        assert_eq!(proof.algorithm, None);
        assert_eq!(proof.nonce_length, None);
        assert_eq!(proof.algorithm_parameters, ProofParameters::default());
        assert_eq!(proof.statistics, Statistics::default());
    }

    #[test]
    fn proof_from_json_rejects_bad_hex() {
        let err = Proof::from_json(r#"{"n":90,"k":5,"seed":"zz","nonce":1,"solution":[]}"#)
            .expect_err("bad hex");
        assert!(matches!(err, Error::Encoding(_)));
    }
}
