//! Per-step validation state machine and weighted scoring.

use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::rule::{ExecutedCommand, ValidationRule};

fn default_minimum_score() -> f64 {
    100.0
}

/// Completion criteria for one scenario step.
#[derive(Debug, Clone, Deserialize)]
pub struct StepValidation {
    pub step_id: String,
    /// What the learner is asked to do, used for contextual hints.
    #[serde(default)]
    pub objectives: Vec<String>,
    pub rules: Vec<ValidationRule>,
    /// Fraction of weighted rule mass (0-100) that must pass.
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,
    /// Whether a non-100 score can complete the step.
    #[serde(default)]
    pub partial_credit: bool,
    /// Whether completion should trigger step transition without explicit
    /// user action.
    #[serde(default)]
    pub auto_advance: bool,
}

impl StepValidation {
    pub fn new(step_id: &str, rules: Vec<ValidationRule>) -> Self {
        Self {
            step_id: step_id.to_string(),
            objectives: Vec::new(),
            rules,
            minimum_score: 100.0,
            partial_credit: false,
            auto_advance: false,
        }
    }

    pub fn with_minimum_score(mut self, minimum_score: f64) -> Self {
        self.minimum_score = minimum_score;
        self
    }

    pub fn with_partial_credit(mut self) -> Self {
        self.partial_credit = true;
        self
    }

    pub fn with_auto_advance(mut self) -> Self {
        self.auto_advance = true;
        self
    }
}

/// Lifecycle of a step. Completed and Abandoned are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPhase {
    /// Entered, zero commands executed.
    Armed,
    /// At least one command seen, criteria not yet met.
    InProgress,
    Completed,
    Abandoned,
}

/// Outcome for one rule in the latest evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct RuleResult {
    pub rule_id: String,
    pub matched: bool,
    pub weight: f64,
}

/// Derived result, recomputed on every command. Never persisted on its own;
/// the owning state's [`StepProgress`] snapshot carries it across the
/// persistence boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub matched_rules: Vec<String>,
    pub failed_rules: Vec<String>,
    /// Rules-satisfied ratio, 0-100.
    pub progress: f64,
    /// Weighted score, 0-1.
    pub score: f64,
    pub rule_results: Vec<RuleResult>,
    /// Composed from the first failed rule's error message on failure.
    pub feedback: Option<String>,
}

/// Serializable progress summary handed to the external sync layer.
#[derive(Debug, Clone, Serialize)]
pub struct StepProgress {
    pub step_id: String,
    pub phase: StepPhase,
    pub commands_executed: Vec<String>,
    pub attempts: u32,
    pub score: f64,
    pub progress: f64,
    pub passed: bool,
    pub elapsed_secs: Option<u64>,
}

/// Mutable validation state for one (scenario, step) pair.
///
/// Owned by the validator for the lifetime of the step: reset when the step
/// is (re)entered, discarded when the scenario ends. Commands are assumed to
/// arrive serialized -- each call to [`process_command`] completes before
/// the next begins.
///
/// [`process_command`]: StepValidationState::process_command
#[derive(Debug)]
pub struct StepValidationState {
    validation: StepValidation,
    phase: StepPhase,
    commands_executed: Vec<String>,
    first_command_at: Option<Instant>,
    last_command_at: Option<Instant>,
    attempts: u32,
    /// Rule ids that have matched so far. A rule stays matched once its
    /// trigger has been seen; re-executing the trigger never double-counts.
    matched: HashSet<String>,
    last_result: Option<ValidationResult>,
}

impl StepValidationState {
    pub fn new(validation: StepValidation) -> Self {
        Self {
            validation,
            phase: StepPhase::Armed,
            commands_executed: Vec::new(),
            first_command_at: None,
            last_command_at: None,
            attempts: 0,
            matched: HashSet::new(),
            last_result: None,
        }
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn validation(&self) -> &StepValidation {
        &self.validation
    }

    pub fn commands_executed(&self) -> &[String] {
        &self.commands_executed
    }

    pub fn last_result(&self) -> Option<&ValidationResult> {
        self.last_result.as_ref()
    }

    /// Whether the collaborator should transition to the next step without
    /// explicit user action.
    pub fn should_auto_advance(&self) -> bool {
        self.phase == StepPhase::Completed && self.validation.auto_advance
    }

    /// Feed one executed command through every rule and recompute the
    /// result. Terminal phases ignore further input.
    pub fn process_command(&mut self, exec: &ExecutedCommand) -> &ValidationResult {
        if self.phase == StepPhase::Completed || self.phase == StepPhase::Abandoned {
            return self
                .last_result
                .get_or_insert_with(|| Self::empty_result(&self.validation));
        }

        let now = Instant::now();
        self.first_command_at.get_or_insert(now);
        self.last_command_at = Some(now);
        self.commands_executed
            .push(exec.resolved_command.clone());
        self.phase = StepPhase::InProgress;

        for rule in &self.validation.rules {
            if self.matched.contains(&rule.id) {
                continue;
            }
            if rule.kind.evaluate(exec, &self.commands_executed) {
                log::debug!("step {}: rule {} matched", self.validation.step_id, rule.id);
                self.matched.insert(rule.id.clone());
            }
        }

        let result = self.compose_result();
        if result.passed {
            self.phase = StepPhase::Completed;
            log::info!(
                "step {} completed (score {:.2}, {} attempts)",
                self.validation.step_id,
                result.score,
                self.attempts
            );
        } else {
            self.attempts += 1;
        }
        self.last_result.insert(result)
    }

    fn compose_result(&self) -> ValidationResult {
        let rules = &self.validation.rules;
        let total_weight: f64 = rules.iter().map(|r| r.weight).sum();
        let matched_weight: f64 = rules
            .iter()
            .filter(|r| self.matched.contains(&r.id))
            .map(|r| r.weight)
            .sum();

        let mut matched_rules = Vec::new();
        let mut failed_rules = Vec::new();
        let mut rule_results = Vec::new();
        for rule in rules {
            let matched = self.matched.contains(&rule.id);
            if matched {
                matched_rules.push(rule.id.clone());
            } else {
                failed_rules.push(rule.id.clone());
            }
            rule_results.push(RuleResult {
                rule_id: rule.id.clone(),
                matched,
                weight: rule.weight,
            });
        }

        // A step with no rules is trivially satisfied.
        let score = if total_weight > 0.0 {
            matched_weight / total_weight
        } else {
            1.0
        };
        let progress = if rules.is_empty() {
            100.0
        } else {
            100.0 * matched_rules.len() as f64 / rules.len() as f64
        };

        let all_matched = failed_rules.is_empty();
        let passed = if self.validation.partial_credit {
            score * 100.0 >= self.validation.minimum_score
        } else {
            all_matched
        };

        let feedback = if passed {
            None
        } else {
            let first_failed = failed_rules
                .first()
                .and_then(|id| rules.iter().find(|r| r.id == *id));
            Some(
                first_failed
                    .and_then(|r| r.error_message.clone())
                    .unwrap_or_else(|| "Step requirements not yet met.".to_string()),
            )
        };

        ValidationResult {
            passed,
            matched_rules,
            failed_rules,
            progress,
            score,
            rule_results,
            feedback,
        }
    }

    fn empty_result(validation: &StepValidation) -> ValidationResult {
        ValidationResult {
            passed: false,
            matched_rules: Vec::new(),
            failed_rules: validation.rules.iter().map(|r| r.id.clone()).collect(),
            progress: 0.0,
            score: 0.0,
            rule_results: Vec::new(),
            feedback: None,
        }
    }

    /// Re-enter the step: all accumulated state is discarded.
    pub fn reset(&mut self) {
        self.phase = StepPhase::Armed;
        self.commands_executed.clear();
        self.first_command_at = None;
        self.last_command_at = None;
        self.attempts = 0;
        self.matched.clear();
        self.last_result = None;
    }

    /// Exit the step without completion. No effect on a completed step.
    pub fn abandon(&mut self) {
        if self.phase != StepPhase::Completed {
            self.phase = StepPhase::Abandoned;
        }
    }

    /// Serializable summary for the external sync layer.
    pub fn snapshot(&self) -> StepProgress {
        let (score, progress, passed) = match &self.last_result {
            Some(r) => (r.score, r.progress, r.passed),
            None => (0.0, 0.0, false),
        };
        StepProgress {
            step_id: self.validation.step_id.clone(),
            phase: self.phase,
            commands_executed: self.commands_executed.clone(),
            attempts: self.attempts,
            score,
            progress,
            passed,
            elapsed_secs: self
                .first_command_at
                .zip(self.last_command_at)
                .map(|(first, last)| last.duration_since(first).as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{RuleKind, StateSnapshot, ValidationRule};
    use regex::Regex;

    fn exec(raw: &str, resolved: &str) -> ExecutedCommand {
        ExecutedCommand::new(raw, resolved)
    }

    fn command_rule(id: &str, pattern: &str) -> ValidationRule {
        ValidationRule::new(
            id,
            RuleKind::Command {
                pattern: Regex::new(pattern).unwrap(),
            },
        )
    }

    fn two_command_step(partial: bool) -> StepValidation {
        let step = StepValidation::new(
            "check-gpus",
            vec![
                command_rule("query", "nvidia-smi"),
                command_rule("health", "dcgmi"),
            ],
        );
        if partial {
            step.with_minimum_score(50.0).with_partial_credit()
        } else {
            step
        }
    }

    #[test]
    fn armed_until_first_command() {
        let state = StepValidationState::new(two_command_step(false));
        assert_eq!(state.phase(), StepPhase::Armed);
    }

    #[test]
    fn partial_credit_passes_at_half_score() {
        let mut state = StepValidationState::new(two_command_step(true));
        let result = state.process_command(&exec("nvidia-smi", "nvidia-smi"));
        assert_eq!(result.score, 0.5);
        assert!(result.passed);
        assert_eq!(state.phase(), StepPhase::Completed);
    }

    #[test]
    fn strict_step_requires_every_rule() {
        let mut state = StepValidationState::new(two_command_step(false));
        let result = state.process_command(&exec("nvidia-smi", "nvidia-smi"));
        assert!(!result.passed);
        assert_eq!(result.progress, 50.0);
        assert_eq!(state.phase(), StepPhase::InProgress);
        assert_eq!(state.attempts(), 1);

        let result = state.process_command(&exec("dcgmi --health", "dcgmi"));
        assert!(result.passed);
        assert_eq!(result.score, 1.0);
        assert_eq!(state.phase(), StepPhase::Completed);
    }

    #[test]
    fn repeating_a_trigger_does_not_double_count() {
        let mut state = StepValidationState::new(two_command_step(false));
        state.process_command(&exec("nvidia-smi", "nvidia-smi"));
        let result = state.process_command(&exec("nvidia-smi", "nvidia-smi"));
        assert_eq!(result.score, 0.5);
        assert_eq!(result.matched_rules, vec!["query"]);
    }

    #[test]
    fn weighted_score() {
        let step = StepValidation::new(
            "weighted",
            vec![
                command_rule("a", "^sinfo").with_weight(3.0),
                command_rule("b", "^squeue"),
            ],
        );
        let mut state = StepValidationState::new(step);
        let result = state.process_command(&exec("sinfo", "sinfo"));
        assert_eq!(result.score, 0.75);
        assert_eq!(result.progress, 50.0);
    }

    #[test]
    fn feedback_from_first_failed_rule() {
        let step = StepValidation::new(
            "fb",
            vec![
                command_rule("a", "^sinfo").with_error_message("Run sinfo first"),
                command_rule("b", "^squeue"),
            ],
        );
        let mut state = StepValidationState::new(step);
        let result = state.process_command(&exec("squeue", "squeue"));
        assert_eq!(result.feedback.as_deref(), Some("Run sinfo first"));
    }

    #[test]
    fn generic_feedback_fallback() {
        let mut state = StepValidationState::new(two_command_step(false));
        let result = state.process_command(&exec("top", "top"));
        assert_eq!(
            result.feedback.as_deref(),
            Some("Step requirements not yet met.")
        );
    }

    #[test]
    fn sequence_rule_across_commands() {
        let step = StepValidation::new(
            "drain",
            vec![ValidationRule::new(
                "order",
                RuleKind::Sequence {
                    expected: vec!["sinfo".into(), "scontrol".into()],
                    require_all: false,
                },
            )],
        );
        let mut state = StepValidationState::new(step);
        assert!(!state.process_command(&exec("sinfo", "sinfo")).passed);
        // Interleaved command is fine.
        assert!(!state.process_command(&exec("squeue", "squeue")).passed);
        assert!(
            state
                .process_command(&exec("scontrol update", "scontrol"))
                .passed
        );
    }

    #[test]
    fn state_rule_consumes_snapshot() {
        let step = StepValidation::new(
            "power-on",
            vec![ValidationRule::new(
                "powered",
                RuleKind::State {
                    check: crate::rule::StateCheck::KeyEquals {
                        key: "node.power".into(),
                        value: "on".into(),
                    },
                },
            )],
        );
        let mut state = StepValidationState::new(step);
        let mut snap = StateSnapshot::new();
        snap.set("node.power", "off");
        assert!(
            !state
                .process_command(&exec("ipmitool chassis power status", "ipmitool").with_snapshot(snap))
                .passed
        );
        let mut snap = StateSnapshot::new();
        snap.set("node.power", "on");
        assert!(
            state
                .process_command(&exec("ipmitool chassis power on", "ipmitool").with_snapshot(snap))
                .passed
        );
    }

    #[test]
    fn auto_advance_signal() {
        let step = StepValidation::new(
            "aa",
            vec![command_rule("a", "^top")],
        )
        .with_auto_advance();
        let mut state = StepValidationState::new(step);
        assert!(!state.should_auto_advance());
        state.process_command(&exec("top", "top"));
        assert!(state.should_auto_advance());
    }

    #[test]
    fn completed_step_ignores_further_commands() {
        let step = StepValidation::new("done", vec![command_rule("a", "^top")]);
        let mut state = StepValidationState::new(step);
        state.process_command(&exec("top", "top"));
        let before = state.commands_executed().len();
        state.process_command(&exec("dmesg", "dmesg"));
        assert_eq!(state.commands_executed().len(), before);
        assert_eq!(state.phase(), StepPhase::Completed);
    }

    #[test]
    fn abandon_is_terminal_but_not_after_completion() {
        let mut state = StepValidationState::new(two_command_step(false));
        state.process_command(&exec("nvidia-smi", "nvidia-smi"));
        state.abandon();
        assert_eq!(state.phase(), StepPhase::Abandoned);

        let step = StepValidation::new("done", vec![command_rule("a", "^top")]);
        let mut state = StepValidationState::new(step);
        state.process_command(&exec("top", "top"));
        state.abandon();
        assert_eq!(state.phase(), StepPhase::Completed);
    }

    #[test]
    fn reset_discards_everything() {
        let mut state = StepValidationState::new(two_command_step(false));
        state.process_command(&exec("nvidia-smi", "nvidia-smi"));
        state.reset();
        assert_eq!(state.phase(), StepPhase::Armed);
        assert_eq!(state.attempts(), 0);
        assert!(state.commands_executed().is_empty());
        assert!(state.last_result().is_none());
    }

    #[test]
    fn snapshot_serializes() {
        let mut state = StepValidationState::new(two_command_step(true));
        state.process_command(&exec("nvidia-smi", "nvidia-smi"));
        let progress = state.snapshot();
        assert_eq!(progress.step_id, "check-gpus");
        assert!(progress.passed);
        let json = serde_json::to_string(&progress).unwrap();
        assert!(json.contains("\"phase\":\"completed\""));
    }
}
