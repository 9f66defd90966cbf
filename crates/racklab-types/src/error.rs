//! Error types for the racklab engine.

use std::io;

/// Errors produced by the racklab engine crates.
#[derive(Debug, thiserror::Error)]
pub enum RacklabError {
    /// A command was registered under a name that already exists
    /// (as a name or an alias).
    #[error("duplicate command name: {0}")]
    DuplicateName(String),

    /// A command alias collides with an existing name or alias.
    #[error("duplicate command alias: {0}")]
    DuplicateAlias(String),

    /// Malformed or inconsistent catalog data.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Malformed question bank or exam session misuse.
    #[error("exam error: {0}")]
    Exam(String),

    /// Malformed scenario or validation rule data.
    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RacklabError>;
