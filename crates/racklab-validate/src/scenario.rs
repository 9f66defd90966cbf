//! Scenario definitions -- an ordered list of steps loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use racklab_types::{RacklabError, Result};

use crate::step::StepValidation;

/// One guided exercise: an ordered set of steps, each with its own
/// completion rules.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<StepValidation>,
}

/// Parse a scenario from TOML text, failing fast on malformed data.
pub fn parse_scenario(text: &str) -> Result<Scenario> {
    let scenario: Scenario = toml::from_str(text)?;
    if scenario.steps.is_empty() {
        return Err(RacklabError::Scenario(format!(
            "scenario '{}' has no steps",
            scenario.id
        )));
    }
    for step in &scenario.steps {
        if step.rules.is_empty() {
            return Err(RacklabError::Scenario(format!(
                "step '{}' has no rules",
                step.step_id
            )));
        }
        if !(0.0..=100.0).contains(&step.minimum_score) {
            return Err(RacklabError::Scenario(format!(
                "step '{}' minimum_score out of range: {}",
                step.step_id, step.minimum_score
            )));
        }
    }
    Ok(scenario)
}

/// Load a scenario from a TOML file on disk.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)?;
    let scenario = parse_scenario(&text)?;
    log::info!(
        "Loaded scenario '{}': {} steps",
        scenario.id,
        scenario.steps.len()
    );
    Ok(scenario)
}
