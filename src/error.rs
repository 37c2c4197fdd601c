/// A parameter rule violated by a solve or verify request.
///
/// Each variant maps to one validation rule; the first violated rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("k out of range: {0} (must be from 1 to 7)")]
    KOutOfRange(u32),
    #[error("n,k incompatible: n={n}, k={k} (must satisfy n/(k+1) <= 32)")]
    IncompatibleNk { n: u32, k: u32 },
    #[error("personalization too long: {0} bytes (max 16)")]
    PersonalizationTooLong(usize),
    #[error("nonceLength too small: {0} bytes (must be >= 4)")]
    NonceLengthTooSmall(usize),
    #[error("nonce/nonceLength mismatch: nonce is {nonce} bytes, nonceLength is {nonce_length}")]
    NonceLengthMismatch { nonce: usize, nonce_length: usize },
    #[error("maxNonces must be >= 1")]
    MaxNoncesZero,
    #[error("nonce range overflow: nonce {nonce} with {max_nonces} attempts exceeds 32 bits")]
    NonceRangeOverflow { nonce: u32, max_nonces: u64 },
    #[error("difficulty out of range: {0}")]
    DifficultyOutOfRange(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("malformed nonce: {0}")]
    MalformedNonce(String),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),
    #[error("solution is not 2^k indices: expected {expected}, got {actual}")]
    SolutionLength { expected: usize, actual: usize },
    #[error("no solution within search bound")]
    NotFound,
    #[error("solver engine failed: {0}")]
    Engine(String),
    #[error("solver channel closed")]
    ChannelClosed,
    #[error("proof encoding failed: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, Error>;
