//! Application configuration, loaded from `racklab.toml` when present.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use racklab_types::Result;

fn default_exam_size() -> usize {
    racklab_exam::DEFAULT_EXAM_SIZE
}

fn default_passing_score() -> f64 {
    racklab_exam::DEFAULT_PASSING_SCORE
}

fn default_exam_minutes() -> u64 {
    90
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// External catalog file; the built-in catalog is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// External question bank; a small demo bank is used when unset.
    #[serde(default)]
    pub questions: Option<PathBuf>,
    /// External scenario file; a demo scenario is used when unset.
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    #[serde(default = "default_exam_size")]
    pub exam_size: usize,
    #[serde(default = "default_passing_score")]
    pub passing_score: f64,
    #[serde(default = "default_exam_minutes")]
    pub exam_minutes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            questions: None,
            scenario: None,
            exam_size: default_exam_size(),
            passing_score: default_passing_score(),
            exam_minutes: default_exam_minutes(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.exam_size, 35);
        assert_eq!(config.passing_score, 70.0);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("exam_size = 20").unwrap();
        assert_eq!(config.exam_size, 20);
        assert_eq!(config.exam_minutes, 90);
    }
}
