//! Measures how long an exhaustive search takes to recover a random secret.
//!
//! This crate enumerates every string of a fixed length over an alphabet,
//! scans that keyspace for a secret by comparing SHA1 digests, and times the
//! scan. Because a single random secret can land anywhere in the scan order,
//! each observed time is also rescaled to the time a match at the midpoint
//! would have taken, which estimates the mean search time over uniformly random
//! secrets.
//!
//! # Scan order
//!
//! Candidates are ranked by counting in base `|alphabet|`, leftmost character
//! most significant, digit values taken from the alphabet order:
//!
//! ```
//! use brute_keyspace::{Alphabet, enumerate};
//!
//! let alphabet = Alphabet::new("ab").unwrap();
//! let sequence = enumerate(&alphabet, 2).unwrap();
//! assert_eq!(sequence.as_slice(), &["aa", "ab", "ba", "bb"]);
//! ```
//!
//! # One trial
//!
//! ```
//! use brute_keyspace::{Alphabet, BruteForce, enumerate, expected_runtime};
//!
//! let alphabet = Alphabet::new("ab").unwrap();
//! let sequence = enumerate(&alphabet, 2).unwrap();
//! let trial = BruteForce::new().run(&sequence, "ba").unwrap();
//! assert_eq!(trial.index, 2);
//!
//! // "ba" sits at 75% of the scan, so the midpoint estimate is 2/3 of the runtime.
//! let expected = expected_runtime(trial.runtime, trial.index, 4).unwrap();
//! assert!((expected - trial.runtime * 2.0 / 3.0).abs() < 1e-12);
//! ```
//!
//! # Whole experiments
//!
//! [`Experiment`] runs a batch of trials for every length of every
//! [`TestGroup`] and returns a [`Report`] keyed by group name and length.
//! Nothing in this crate prints or writes files; progress is reported through
//! [`ProgressEvent`] callbacks.

pub mod alphabet;
pub mod digest;
pub mod error;
pub mod estimate;
pub mod experiment;
pub mod keyspace;
pub mod trial;

pub use alphabet::Alphabet;
pub use digest::{Digester, Sha1Digester, sha1_hex, to_hex};
pub use error::Error;
pub use estimate::{Estimate, expected_runtime, percent_scanned};
pub use experiment::{Experiment, ProgressEvent, Report, TestGroup, TestGroupResult};
pub use keyspace::{
    Candidates, DEFAULT_MATERIALIZE_LIMIT, Keyspace, PermutationSequence, enumerate,
};
pub use trial::{BruteForce, Trial};
