use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Keyspace(#[from] brute_keyspace::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report to '{path}': {source}")]
    SerializationFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File '{path}' exists. Use --force to overwrite.")]
    FileExists { path: PathBuf },

    #[error("Unknown test group '{name}'")]
    UnknownGroup { name: String },

    #[error("Report contains {mismatches} attempt(s) whose hash does not match the password")]
    CorruptReport { mismatches: usize },
}
