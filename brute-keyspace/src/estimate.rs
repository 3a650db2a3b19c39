//! Expected search time from single observations.
//!
//! A trial's runtime depends on where its secret happened to fall in the scan
//! order. For a uniformly random secret the expected stopping point is the
//! middle of the keyspace, so each observation is rescaled to the time the scan
//! would have taken had the match been exactly halfway:
//!
//! ```text
//! percent  = 100 * (index + 1) / permutation_count
//! expected = runtime * 50 / percent
//!          = runtime * permutation_count / (2 * (index + 1))
//! ```
//!
//! This assumes every candidate costs the same to digest and compare, which
//! holds for fixed-length candidates and a fixed digest.

use crate::error::Error;
use crate::trial::Trial;

/// Share of the keyspace scanned to reach rank `index`, in percent.
pub fn percent_scanned(index: u64, permutation_count: u64) -> Result<f64, Error> {
    check_rank(index, permutation_count)?;
    Ok(100.0 * (index as f64 + 1.0) / permutation_count as f64)
}

/// Rescales `runtime`, observed for a match at `index`, to the midpoint.
pub fn expected_runtime(runtime: f64, index: u64, permutation_count: u64) -> Result<f64, Error> {
    check_rank(index, permutation_count)?;
    // Scale first: a match at the midpoint gives exactly 1.0.
    let scale = permutation_count as f64 / (2.0 * (index as f64 + 1.0));
    Ok(runtime * scale)
}

fn check_rank(index: u64, permutation_count: u64) -> Result<(), Error> {
    if index >= permutation_count {
        return Err(Error::InvalidRank { index, permutation_count });
    }
    Ok(())
}

impl Trial {
    /// See [`expected_runtime`].
    pub fn expected_runtime(&self, permutation_count: u64) -> Result<f64, Error> {
        expected_runtime(self.runtime, self.index, permutation_count)
    }
}

/// Observed and expected mean runtimes over a set of trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Mean of the raw runtimes, biased by where each secret fell.
    pub observed_mean: f64,
    /// Mean of the midpoint-rescaled runtimes.
    pub expected_mean: f64,
    pub trials: usize,
}

impl Estimate {
    /// `None` when `trials` is empty.
    pub fn from_trials(trials: &[Trial], permutation_count: u64) -> Result<Option<Self>, Error> {
        if trials.is_empty() {
            return Ok(None);
        }

        let mut observed = 0.0;
        let mut expected = 0.0;
        for trial in trials {
            observed += trial.runtime;
            expected += trial.expected_runtime(permutation_count)?;
        }

        let n = trials.len() as f64;
        Ok(Some(Self {
            observed_mean: observed / n,
            expected_mean: expected / n,
            trials: trials.len(),
        }))
    }
}
