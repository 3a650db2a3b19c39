//! Runs trials for every (alphabet, length) pair of a set of test groups.

use std::collections::BTreeMap;
use std::time::Duration;

use indexmap::IndexMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::estimate::Estimate;
use crate::keyspace::{DEFAULT_MATERIALIZE_LIMIT, Keyspace};
use crate::trial::{BruteForce, Trial};

/// All results of a run: group name in run order, then target length.
pub type Report = IndexMap<String, BTreeMap<usize, TestGroupResult>>;

/// A named alphabet tested at every length from 1 to `max_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGroup {
    pub name: String,
    pub alphabet: Alphabet,
    pub max_length: usize,
    pub trials: usize,
}

impl TestGroup {
    pub fn new(
        name: impl Into<String>,
        alphabet: Alphabet,
        max_length: usize,
        trials: usize,
    ) -> Self {
        Self { name: name.into(), alphabet, max_length, trials }
    }
}

/// The trials of one (alphabet, length) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestGroupResult {
    pub input_set: String,
    pub target_length: usize,
    pub test_count: usize,
    pub permutation_count: u64,
    pub attempts: Vec<Trial>,
}

impl TestGroupResult {
    pub fn estimate(&self) -> Result<Option<Estimate>, Error> {
        Estimate::from_trials(&self.attempts, self.permutation_count)
    }
}

/// Progress notifications emitted while an [`Experiment`] runs.
///
/// `test_id` numbers every (group, length) pair from 1 across the whole run.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    GroupStarted {
        test_id: usize,
        group: &'a str,
        alphabet: &'a Alphabet,
        length: usize,
        permutation_count: u64,
        trials: usize,
    },
    TrialFinished {
        test_id: usize,
        group: &'a str,
        length: usize,
        /// 1-based.
        trial_number: usize,
        trials: usize,
        permutation_count: u64,
        trial: &'a Trial,
    },
    GroupFinished {
        test_id: usize,
        group: &'a str,
        length: usize,
        result: &'a TestGroupResult,
    },
    GroupFailed {
        test_id: usize,
        group: &'a str,
        length: usize,
        error: &'a Error,
    },
}

/// Runs test groups in order, one trial at a time.
#[derive(Debug)]
pub struct Experiment<R = StdRng> {
    groups: Vec<TestGroup>,
    rng: R,
    materialize_limit: Option<u64>,
    timeout: Option<Duration>,
    streaming: bool,
    keep_going: bool,
}

impl Experiment<StdRng> {
    /// Secrets are drawn from OS entropy.
    pub fn new(groups: Vec<TestGroup>) -> Self {
        Self::with_rng(groups, StdRng::from_entropy())
    }

    /// Secrets are reproducible for a given seed.
    pub fn seeded(groups: Vec<TestGroup>, seed: u64) -> Self {
        Self::with_rng(groups, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Experiment<R> {
    pub fn with_rng(groups: Vec<TestGroup>, rng: R) -> Self {
        Self {
            groups,
            rng,
            materialize_limit: Some(DEFAULT_MATERIALIZE_LIMIT),
            timeout: None,
            streaming: false,
            keep_going: false,
        }
    }

    /// `None` removes the ceiling.
    pub fn materialize_limit(mut self, limit: Option<u64>) -> Self {
        self.materialize_limit = limit;
        self
    }

    pub fn trial_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scan a fresh candidate stream per trial instead of materializing each
    /// keyspace. Skips the materialization ceiling.
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Skip the rest of a group after an error instead of aborting the run.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    /// Runs every group. `on_progress` sees each [`ProgressEvent`] as it
    /// happens.
    pub fn run<F>(&mut self, mut on_progress: F) -> Result<Report, Error>
    where
        F: FnMut(ProgressEvent<'_>),
    {
        let groups = std::mem::take(&mut self.groups);
        let outcome = self.run_groups(&groups, &mut on_progress);
        self.groups = groups;
        outcome
    }

    fn run_groups(
        &mut self,
        groups: &[TestGroup],
        on_progress: &mut dyn FnMut(ProgressEvent<'_>),
    ) -> Result<Report, Error> {
        let mut report = Report::new();
        let mut test_id = 0;

        for group in groups {
            let mut lengths = BTreeMap::new();
            let mut failed = false;

            for length in 1..=group.max_length {
                test_id += 1;
                if failed {
                    continue;
                }

                match self.run_length(test_id, group, length, on_progress) {
                    Ok(result) => {
                        lengths.insert(length, result);
                    }
                    Err(error) if self.keep_going => {
                        on_progress(ProgressEvent::GroupFailed {
                            test_id,
                            group: &group.name,
                            length,
                            error: &error,
                        });
                        failed = true;
                    }
                    Err(error) => return Err(error),
                }
            }

            report.insert(group.name.clone(), lengths);
        }

        Ok(report)
    }

    fn run_length(
        &mut self,
        test_id: usize,
        group: &TestGroup,
        length: usize,
        on_progress: &mut dyn FnMut(ProgressEvent<'_>),
    ) -> Result<TestGroupResult, Error> {
        let keyspace = Keyspace::new(&group.alphabet, length)?;
        let sequence = if self.streaming {
            None
        } else {
            Some(keyspace.materialize(self.materialize_limit)?)
        };
        let permutation_count = keyspace.count();

        on_progress(ProgressEvent::GroupStarted {
            test_id,
            group: &group.name,
            alphabet: &group.alphabet,
            length,
            permutation_count,
            trials: group.trials,
        });

        let mut searcher = BruteForce::new();
        if let Some(timeout) = self.timeout {
            searcher = searcher.timeout(timeout);
        }

        let mut attempts = Vec::with_capacity(group.trials);
        for trial_number in 1..=group.trials {
            let secret = group.alphabet.random_string(&mut self.rng, length);
            let trial = match &sequence {
                Some(sequence) => searcher.run(sequence, &secret)?,
                None => searcher.scan(keyspace.candidates(), &secret)?,
            };

            on_progress(ProgressEvent::TrialFinished {
                test_id,
                group: &group.name,
                length,
                trial_number,
                trials: group.trials,
                permutation_count,
                trial: &trial,
            });
            attempts.push(trial);
        }

        // Release the sequence before the next, larger, keyspace is built.
        drop(sequence);

        let result = TestGroupResult {
            input_set: group.alphabet.to_string(),
            target_length: length,
            test_count: group.trials,
            permutation_count,
            attempts,
        };
        on_progress(ProgressEvent::GroupFinished {
            test_id,
            group: &group.name,
            length,
            result: &result,
        });

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_groups() -> Vec<TestGroup> {
        vec![
            TestGroup::new("ab", Alphabet::new("ab").unwrap(), 3, 5),
            TestGroup::new("xyz", Alphabet::new("xyz").unwrap(), 2, 4),
        ]
    }

    #[test]
    fn test_report_shape() {
        let report = Experiment::seeded(small_groups(), 1).run(|_| {}).unwrap();

        assert_eq!(report.len(), 2);
        let ab = &report["ab"];
        assert_eq!(ab.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        for (length, result) in ab {
            assert_eq!(result.input_set, "ab");
            assert_eq!(result.target_length, *length);
            assert_eq!(result.test_count, 5);
            assert_eq!(result.permutation_count, 2u64.pow(*length as u32));
            assert_eq!(result.attempts.len(), 5);
        }
        assert_eq!(report["xyz"][&2].permutation_count, 9);
    }

    #[test]
    fn test_report_keeps_run_order() {
        let groups = vec![
            TestGroup::new("zz", Alphabet::new("ab").unwrap(), 1, 1),
            TestGroup::new("aa", Alphabet::new("ab").unwrap(), 1, 1),
            TestGroup::new("mm", Alphabet::new("ab").unwrap(), 1, 1),
        ];
        let report = Experiment::seeded(groups, 10).run(|_| {}).unwrap();
        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["zz", "aa", "mm"]);
    }

    #[test]
    fn test_attempts_are_consistent() {
        let report = Experiment::seeded(small_groups(), 2).run(|_| {}).unwrap();
        let alphabet = Alphabet::new("xyz").unwrap();
        let keyspace = Keyspace::new(&alphabet, 2).unwrap();

        for trial in &report["xyz"][&2].attempts {
            assert_eq!(trial.password.chars().count(), 2);
            assert_eq!(keyspace.position(&trial.password), Some(trial.index));
            trial.verify_digest().unwrap();
        }
    }

    #[test]
    fn test_seeded_runs_pick_the_same_secrets() {
        let secrets = |seed| {
            let report = Experiment::seeded(small_groups(), seed).run(|_| {}).unwrap();
            report["ab"][&3].attempts.iter().map(|t| t.password.clone()).collect::<Vec<_>>()
        };
        assert_eq!(secrets(9), secrets(9));
    }

    #[test]
    fn test_streaming_matches_materialized() {
        let materialized = Experiment::seeded(small_groups(), 3).run(|_| {}).unwrap();
        let streamed = Experiment::seeded(small_groups(), 3).streaming(true).run(|_| {}).unwrap();

        for (name, lengths) in &materialized {
            for (length, result) in lengths {
                let other = &streamed[name][length];
                let indices =
                    |r: &TestGroupResult| r.attempts.iter().map(|t| t.index).collect::<Vec<_>>();
                assert_eq!(indices(result), indices(other));
            }
        }
    }

    #[test]
    fn test_progress_events_in_order() {
        let groups = vec![TestGroup::new("ab", Alphabet::new("ab").unwrap(), 2, 2)];
        let mut seen = Vec::new();
        Experiment::seeded(groups, 4)
            .run(|event| {
                let tag = match event {
                    ProgressEvent::GroupStarted { test_id, length, permutation_count, .. } => {
                        format!("start {test_id} {length} {permutation_count}")
                    }
                    ProgressEvent::TrialFinished { test_id, trial_number, trials, .. } => {
                        format!("trial {test_id} {trial_number}/{trials}")
                    }
                    ProgressEvent::GroupFinished { test_id, .. } => format!("done {test_id}"),
                    ProgressEvent::GroupFailed { test_id, .. } => format!("failed {test_id}"),
                };
                seen.push(tag);
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                "start 1 1 2",
                "trial 1 1/2",
                "trial 1 2/2",
                "done 1",
                "start 2 2 4",
                "trial 2 1/2",
                "trial 2 2/2",
                "done 2",
            ]
        );
    }

    #[test]
    fn test_capacity_error_aborts_by_default() {
        let groups = vec![TestGroup::new("lower", Alphabet::lowercase(), 3, 1)];
        let result = Experiment::seeded(groups, 5).materialize_limit(Some(1000)).run(|_| {});
        assert!(matches!(result, Err(Error::CapacityExceeded { length: 3, .. })));
    }

    #[test]
    fn test_keep_going_skips_rest_of_group() {
        let groups = vec![
            TestGroup::new("lower", Alphabet::lowercase(), 4, 1),
            TestGroup::new("ab", Alphabet::new("ab").unwrap(), 2, 1),
        ];
        let mut failures = Vec::new();
        let mut started = Vec::new();
        let report = Experiment::seeded(groups, 6)
            .materialize_limit(Some(1000))
            .keep_going(true)
            .run(|event| match event {
                ProgressEvent::GroupFailed { test_id, length, .. } => {
                    failures.push((test_id, length));
                }
                ProgressEvent::GroupStarted { test_id, group, .. } => {
                    started.push((test_id, group.to_owned()));
                }
                _ => {}
            })
            .unwrap();

        assert_eq!(failures, vec![(3, 3)]);
        assert_eq!(report["lower"].keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(report["ab"].len(), 2);
        // Test ids keep counting past the skipped length 4.
        assert_eq!(started[2..], [(5, "ab".to_owned()), (6, "ab".to_owned())]);
    }

    #[test]
    fn test_group_estimate() {
        let report = Experiment::seeded(small_groups(), 7).run(|_| {}).unwrap();
        let estimate = report["ab"][&3].estimate().unwrap().unwrap();
        assert_eq!(estimate.trials, 5);
        assert!(estimate.observed_mean >= 0.0);
        assert!(estimate.expected_mean >= 0.0);
    }

    #[test]
    fn test_groups_are_kept_after_run() {
        let mut experiment = Experiment::seeded(small_groups(), 8);
        experiment.run(|_| {}).unwrap();
        assert_eq!(experiment.groups().len(), 2);
    }
}
