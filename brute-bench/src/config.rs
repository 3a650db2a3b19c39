//! Experiment configuration.
//!
//! A config is a JSON document naming the test groups to run and the knobs of
//! the run itself. Without one, [`ExperimentConfig::reference`] reproduces the
//! reference run: four alphabets, 100 trials per length.

use std::path::{Path, PathBuf};
use std::time::Duration;

use brute_keyspace::{Alphabet, DEFAULT_MATERIALIZE_LIMIT, Experiment, TestGroup};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Environment variable naming a config file, used when `--config` is absent.
pub const CONFIG_ENV: &str = "BRUTE_BENCH_CONFIG";

/// Returns the config path from the BRUTE_BENCH_CONFIG environment variable, if set.
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Built-in alphabets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Lowercase,
    Letters,
    Alphanumeric,
    Ascii,
}

impl Preset {
    pub fn alphabet(self) -> Alphabet {
        match self {
            Preset::Lowercase => Alphabet::lowercase(),
            Preset::Letters => Alphabet::letters(),
            Preset::Alphanumeric => Alphabet::alphanumeric(),
            Preset::Ascii => Alphabet::ascii(),
        }
    }
}

/// Either `{"preset": "letters"}` or `{"symbols": "abc"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlphabetSource {
    Preset { preset: Preset },
    Symbols { symbols: String },
}

impl AlphabetSource {
    pub fn resolve(&self) -> Result<Alphabet, Error> {
        match self {
            AlphabetSource::Preset { preset } => Ok(preset.alphabet()),
            AlphabetSource::Symbols { symbols } => Ok(Alphabet::new(symbols)?),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub alphabet: AlphabetSource,
    /// Lengths 1 through `max_length` are tested.
    pub max_length: usize,
    /// Trials per length.
    pub trials: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Seed for secret generation. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Largest keyspace that is materialized. `null` disables the ceiling.
    #[serde(default = "default_materialize_limit")]
    pub materialize_limit: Option<u64>,

    /// Per-trial scan timeout in seconds.
    #[serde(default)]
    pub trial_timeout_secs: Option<f64>,

    /// Stream candidates instead of materializing each keyspace.
    #[serde(default)]
    pub streaming: bool,

    /// Skip a failing group instead of aborting the run.
    #[serde(default)]
    pub keep_going: bool,

    pub groups: Vec<GroupConfig>,
}

/// Command-line overrides layered on top of a loaded config.
///
/// `None` and `false` leave the config value alone. A `materialize_limit` of
/// 0 disables the ceiling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Keep only these groups; empty keeps all.
    pub groups: Vec<String>,
    pub trials: Option<usize>,
    /// Caps every group's `max_length`.
    pub max_length: Option<usize>,
    pub seed: Option<u64>,
    pub timeout_secs: Option<f64>,
    pub materialize_limit: Option<u64>,
    pub streaming: bool,
    pub keep_going: bool,
}

fn default_materialize_limit() -> Option<u64> {
    Some(DEFAULT_MATERIALIZE_LIMIT)
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl ExperimentConfig {
    /// The four groups of the reference run.
    pub fn reference() -> Self {
        let group = |name: &str, preset, max_length| GroupConfig {
            name: name.to_owned(),
            alphabet: AlphabetSource::Preset { preset },
            max_length,
            trials: 100,
        };

        Self {
            seed: None,
            materialize_limit: default_materialize_limit(),
            trial_timeout_secs: None,
            streaming: false,
            keep_going: false,
            groups: vec![
                group("ascii_lowercase", Preset::Lowercase, 5),
                group("ascii_letters", Preset::Letters, 5),
                group("ascii_nosymbols", Preset::Alphanumeric, 4),
                group("ascii", Preset::Ascii, 4),
            ],
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        Self::from_json_str(&contents)
    }

    /// Loads `path` if given, else the file named by [`CONFIG_ENV`], else the
    /// reference config.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path.map(Path::to_path_buf).or_else(config_path_from_env) {
            Some(path) => Self::from_json_file(&path),
            None => Ok(Self::reference()),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.groups.is_empty() {
            return Err(Error::InvalidConfig("no test groups configured".into()));
        }

        for (i, group) in self.groups.iter().enumerate() {
            if group.name.is_empty() {
                return Err(Error::InvalidConfig(format!("group #{} has an empty name", i + 1)));
            }
            if self.groups[..i].iter().any(|g| g.name == group.name) {
                return Err(Error::InvalidConfig(format!("duplicate group name '{}'", group.name)));
            }
            group.alphabet.resolve()?;
        }

        self.trial_timeout()?;
        Ok(())
    }

    /// Applies command-line overrides, then validates the result.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), Error> {
        self.select_groups(&overrides.groups)?;

        for group in &mut self.groups {
            if let Some(trials) = overrides.trials {
                group.trials = trials;
            }
            if let Some(max_length) = overrides.max_length {
                group.max_length = group.max_length.min(max_length);
            }
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.timeout_secs.is_some() {
            self.trial_timeout_secs = overrides.timeout_secs;
        }
        if let Some(limit) = overrides.materialize_limit {
            self.materialize_limit = (limit > 0).then_some(limit);
        }
        self.streaming |= overrides.streaming;
        self.keep_going |= overrides.keep_going;

        self.validate()
    }

    /// Keeps only the named groups, in config order.
    pub fn select_groups(&mut self, names: &[String]) -> Result<(), Error> {
        if names.is_empty() {
            return Ok(());
        }
        if let Some(name) = names.iter().find(|n| !self.groups.iter().any(|g| &g.name == *n)) {
            return Err(Error::UnknownGroup { name: name.clone() });
        }
        self.groups.retain(|g| names.contains(&g.name));
        Ok(())
    }

    /// The per-trial timeout, rejecting values that are not positive or do
    /// not fit a [`Duration`].
    pub fn trial_timeout(&self) -> Result<Option<Duration>, Error> {
        let Some(secs) = self.trial_timeout_secs else {
            return Ok(None);
        };
        let invalid = || {
            Error::InvalidConfig(format!(
                "trial_timeout_secs must be a positive number of seconds, got {secs}"
            ))
        };
        if secs <= 0.0 {
            return Err(invalid());
        }
        Duration::try_from_secs_f64(secs).map(Some).map_err(|_| invalid())
    }

    pub fn test_groups(&self) -> Result<Vec<TestGroup>, Error> {
        self.groups
            .iter()
            .map(|g| -> Result<TestGroup, Error> {
                Ok(TestGroup::new(&g.name, g.alphabet.resolve()?, g.max_length, g.trials))
            })
            .collect()
    }

    /// Builds the experiment this config describes.
    pub fn experiment(&self) -> Result<Experiment, Error> {
        let groups = self.test_groups()?;
        let experiment = match self.seed {
            Some(seed) => Experiment::seeded(groups, seed),
            None => Experiment::new(groups),
        };

        Ok(experiment
            .materialize_limit(self.materialize_limit)
            .trial_timeout(self.trial_timeout()?)
            .streaming(self.streaming)
            .keep_going(self.keep_going))
    }
}
