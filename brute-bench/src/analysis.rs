//! Reading a report back: digest verification and per-length means.

use std::fmt::Write as _;

use brute_keyspace::{Estimate, Report, Trial};

use crate::error::Error;

/// Means for one (group, length).
#[derive(Debug, Clone, PartialEq)]
pub struct LengthSummary {
    pub group: String,
    pub length: usize,
    pub permutation_count: u64,
    pub estimate: Option<Estimate>,
}

/// Outcome of analyzing a whole report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub summaries: Vec<LengthSummary>,
    /// Attempts whose recorded hash is not the digest of their password.
    pub mismatches: Vec<Mismatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub group: String,
    pub length: usize,
    pub trial: Trial,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Fails with [`Error::CorruptReport`] if any attempt's hash mismatched.
    pub fn ensure_clean(&self) -> Result<(), Error> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(Error::CorruptReport { mismatches: self.mismatches.len() })
        }
    }

    /// One `True Mean` and one `Predicted Mean` line per length, grouped under
    /// a header per group.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut current: Option<&str> = None;

        for summary in &self.summaries {
            if current != Some(summary.group.as_str()) {
                let _ = writeln!(out, "{}", summary.group);
                current = Some(summary.group.as_str());
            }
            match &summary.estimate {
                Some(estimate) => {
                    let _ = writeln!(
                        out,
                        "{} True Mean -> {:?}",
                        summary.length, estimate.observed_mean
                    );
                    let _ = writeln!(
                        out,
                        "{} Predicted Mean -> {:?}",
                        summary.length, estimate.expected_mean
                    );
                }
                None => {
                    let _ = writeln!(out, "{} (no attempts)", summary.length);
                }
            }
        }

        out
    }
}

/// Verifies every attempt and computes the means of each (group, length).
///
/// `only` restricts the analysis to one group. Attempts with an out-of-range
/// index make the estimate of their length unavailable; they do not abort the
/// analysis.
pub fn analyze(report: &Report, only: Option<&str>) -> Analysis {
    let mut analysis = Analysis::default();

    for (group, lengths) in report {
        if only.is_some_and(|name| name != group.as_str()) {
            continue;
        }

        for (&length, result) in lengths {
            for trial in &result.attempts {
                if let Err(e) = trial.verify_digest() {
                    tracing::error!(group = %group, length, error = %e, "Hash mismatch");
                    analysis.mismatches.push(Mismatch {
                        group: group.clone(),
                        length,
                        trial: trial.clone(),
                    });
                }
            }

            let estimate = match result.estimate() {
                Ok(estimate) => estimate,
                Err(e) => {
                    tracing::warn!(group = %group, length, error = %e, "Cannot estimate");
                    None
                }
            };

            analysis.summaries.push(LengthSummary {
                group: group.clone(),
                length,
                permutation_count: result.permutation_count,
                estimate,
            });
        }
    }

    analysis
}

/// Like [`analyze`], but a group named in `only` must exist in the report.
pub fn analyze_checked(report: &Report, only: Option<&str>) -> Result<Analysis, Error> {
    if let Some(name) = only {
        if !report.contains_key(name) {
            return Err(Error::UnknownGroup { name: name.to_owned() });
        }
    }
    Ok(analyze(report, only))
}
