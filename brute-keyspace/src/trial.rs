//! Timed linear scan for a secret.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::digest::{Digester, Sha1Digester, to_hex};
use crate::error::Error;
use crate::keyspace::PermutationSequence;

/// How many candidates are scanned between two clock reads when a timeout is set.
const TIMEOUT_CHECK_INTERVAL: u64 = 4096;

/// One completed search for one secret.
///
/// Serializes with the field names the report format uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// The secret that was searched for.
    pub password: String,
    /// Lowercase hex digest of `password`.
    pub hash: String,
    /// Seconds spent scanning, up to and including the matching candidate.
    pub runtime: f64,
    /// Zero-based rank of `password` in the scan order.
    pub index: u64,
}

impl Trial {
    /// Recomputes the SHA1 of `password` and checks it against `hash`.
    pub fn verify_digest(&self) -> Result<(), Error> {
        self.verify_digest_with(&Sha1Digester)
    }

    /// Like [`verify_digest`](Self::verify_digest), for trials scanned with
    /// another [`Digester`].
    pub fn verify_digest_with<D: Digester>(&self, digester: &D) -> Result<(), Error> {
        let computed = to_hex(digester.digest(self.password.as_bytes()).as_ref());
        if computed.eq_ignore_ascii_case(&self.hash) {
            Ok(())
        } else {
            Err(Error::DigestMismatch {
                password: self.password.clone(),
                recorded: self.hash.clone(),
                computed,
            })
        }
    }
}

/// Brute-force searcher: digests every candidate in order until one matches
/// the digest of the secret.
#[derive(Debug, Clone, Default)]
pub struct BruteForce<D = Sha1Digester> {
    digester: D,
    timeout: Option<Duration>,
}

impl BruteForce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Digester> BruteForce<D> {
    pub fn with_digester(digester: D) -> Self {
        Self { digester, timeout: None }
    }

    /// Abandons a scan that runs longer than `timeout` with [`Error::TimedOut`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Scans a materialized sequence for `secret`.
    pub fn run(&self, sequence: &PermutationSequence, secret: &str) -> Result<Trial, Error> {
        self.scan(sequence, secret)
    }

    /// Scans `candidates` in order for `secret`.
    ///
    /// The secret's digest is computed before the clock starts. The clock
    /// stops right after the first digest match, so the recorded time covers
    /// the digest and comparison of every candidate up to the match.
    ///
    /// A digest match on a string other than `secret` is reported as
    /// [`Error::DigestCollision`]. Running out of candidates is
    /// [`Error::NoMatchFound`]: the secret was not part of the keyspace.
    pub fn scan<I, S>(&self, candidates: I, secret: &str) -> Result<Trial, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let target = self.digester.digest(secret.as_bytes());
        let mut scanned = 0u64;

        let start = Instant::now();
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let index = scanned;
            scanned += 1;

            if self.digester.digest(candidate.as_bytes()) != target {
                if let Some(limit) = self.timeout {
                    if scanned % TIMEOUT_CHECK_INTERVAL == 0 {
                        let elapsed = start.elapsed();
                        if elapsed > limit {
                            return Err(Error::TimedOut {
                                secret: secret.to_owned(),
                                elapsed,
                                scanned,
                            });
                        }
                    }
                }
                continue;
            }

            let elapsed = start.elapsed();

            if candidate != secret {
                return Err(Error::DigestCollision {
                    secret: secret.to_owned(),
                    candidate: candidate.to_owned(),
                    index,
                });
            }

            return Ok(Trial {
                password: secret.to_owned(),
                hash: to_hex(target.as_ref()),
                runtime: elapsed.as_secs_f64(),
                index,
            });
        }

        Err(Error::NoMatchFound { secret: secret.to_owned(), scanned })
    }
}
