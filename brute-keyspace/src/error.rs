use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("alphabet contains symbol {symbol:?} more than once")]
    DuplicateSymbol { symbol: char },

    #[error(
        "keyspace of {alphabet_size}^{length} candidates exceeds the materialization limit of {limit}"
    )]
    CapacityExceeded { alphabet_size: usize, length: usize, limit: u64 },

    #[error("secret {secret:?} was not found after scanning {scanned} candidates")]
    NoMatchFound { secret: String, scanned: u64 },

    // Equal digests for unequal strings. Never counted as a successful match.
    #[error("digest collision at index {index}: candidate {candidate:?} hashes like secret {secret:?}")]
    DigestCollision { secret: String, candidate: String, index: u64 },

    #[error("scan for {secret:?} timed out after {elapsed:?} ({scanned} candidates scanned)")]
    TimedOut { secret: String, elapsed: Duration, scanned: u64 },

    #[error("index {index} is outside a keyspace of {permutation_count} candidates")]
    InvalidRank { index: u64, permutation_count: u64 },

    #[error("recorded hash {recorded} of {password:?} does not match computed digest {computed}")]
    DigestMismatch { password: String, recorded: String, computed: String },
}
