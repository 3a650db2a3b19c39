//! Console progress for a running experiment.

use brute_keyspace::ProgressEvent;
use indicatif::{ProgressBar, ProgressStyle};

/// Turns [`ProgressEvent`]s into log lines and, optionally, a progress bar per
/// (group, length).
pub struct ConsoleProgress {
    show_bar: bool,
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new(show_bar: bool) -> Self {
        Self { show_bar, bar: None }
    }

    pub fn handle(&mut self, event: ProgressEvent<'_>) {
        match event {
            ProgressEvent::GroupStarted {
                test_id,
                group,
                alphabet,
                length,
                permutation_count,
                trials,
            } => {
                tracing::info!(
                    test_id,
                    group,
                    alphabet = %alphabet,
                    length,
                    trials,
                    "Generated {:.3e} permutations",
                    permutation_count as f64
                );
                if self.show_bar {
                    self.bar = Some(new_bar(test_id, group, length, trials));
                }
            }
            ProgressEvent::TrialFinished {
                test_id,
                length,
                trial_number,
                trials,
                permutation_count,
                trial,
                ..
            } => {
                tracing::debug!(
                    test_id,
                    length,
                    trial = trial_number,
                    of = trials,
                    password = %trial.password,
                    runtime = trial.runtime,
                    index = trial.index,
                    "Found secret at {:.2}% of the keyspace",
                    100.0 * trial.index as f64 / permutation_count as f64
                );
                if let Some(bar) = &self.bar {
                    bar.set_message(format!("[{}] {:.3}s", trial.password, trial.runtime));
                    bar.inc(1);
                }
            }
            ProgressEvent::GroupFinished { test_id, group, length, result } => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
                match result.estimate() {
                    Ok(Some(estimate)) => tracing::info!(
                        test_id,
                        group,
                        length,
                        observed_mean = estimate.observed_mean,
                        expected_mean = estimate.expected_mean,
                        "Finished {} trials",
                        estimate.trials
                    ),
                    Ok(None) => tracing::info!(test_id, group, length, "Finished without trials"),
                    Err(e) => tracing::warn!(test_id, group, length, error = %e, "Cannot estimate"),
                }
            }
            ProgressEvent::GroupFailed { test_id, group, length, error } => {
                if let Some(bar) = self.bar.take() {
                    bar.abandon_with_message("failed");
                }
                tracing::error!(
                    test_id,
                    group,
                    length,
                    error = %error,
                    "Test failed, skipping remaining lengths of this group"
                );
            }
        }
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

fn new_bar(test_id: usize, group: &str, length: usize, trials: usize) -> ProgressBar {
    let bar = ProgressBar::new(trials as u64);
    // The template is a constant; a parse failure only loses styling.
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar.set_prefix(format!("Test #{test_id} {group}@{length}"));
    bar
}
