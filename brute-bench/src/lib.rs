//! Runs brute-force timing experiments and analyzes their reports.
//!
//! The `brute-bench` binary drives [`brute_keyspace::Experiment`] from a JSON
//! [`config`], shows progress on the console, writes the results as a JSON
//! report and can read such a report back to verify its digests and print the
//! observed and predicted mean search time per length.
//!
//! # Usage
//!
//! ```sh
//! # The reference run: four alphabets, 100 trials per length.
//! brute-bench run --output output.json
//!
//! # A quick run of one group with a fixed seed.
//! brute-bench run --group ascii_lowercase --max-length 3 --trials 10 --seed 1 -o small.json
//!
//! # Verify a report and print the means.
//! brute-bench analyze output.json
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;

pub use analysis::{Analysis, LengthSummary, Mismatch, analyze, analyze_checked};
pub use config::{AlphabetSource, CONFIG_ENV, ExperimentConfig, GroupConfig, Overrides, Preset};
pub use error::Error;
pub use output::{read_report, to_json, write_report};
pub use progress::ConsoleProgress;
