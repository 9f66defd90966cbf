//! Validation rules and their evaluation.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Deserializer, de};

/// String-keyed view of the simulated cluster state, supplied by the
/// simulation layer alongside each executed command.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    values: HashMap<String, String>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// One executed command as delivered by the command-simulation layer.
#[derive(Debug, Clone)]
pub struct ExecutedCommand {
    /// The raw line as typed.
    pub raw_input: String,
    /// Canonical command name after registry resolution.
    pub resolved_command: String,
    /// Flags presented in the invocation.
    pub flags: Vec<String>,
    /// Text the simulator produced.
    pub output: String,
    /// Cluster state snapshot at execution time.
    pub snapshot: StateSnapshot,
}

impl ExecutedCommand {
    pub fn new(raw_input: &str, resolved_command: &str) -> Self {
        Self {
            raw_input: raw_input.to_string(),
            resolved_command: resolved_command.to_string(),
            flags: Vec::new(),
            output: String::new(),
            snapshot: StateSnapshot::new(),
        }
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }

    pub fn with_snapshot(mut self, snapshot: StateSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_flags(mut self, flags: &[&str]) -> Self {
        self.flags = flags.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Closed set of state predicates, dispatched by tag.
///
/// Rule data stays declarative: a check names what it inspects, and the
/// evaluation lives here.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum StateCheck {
    /// The snapshot key exists with exactly this value.
    KeyEquals { key: String, value: String },
    /// The snapshot key exists at all.
    KeyPresent { key: String },
    /// The snapshot key's value matches a pattern.
    KeyMatches {
        key: String,
        #[serde(deserialize_with = "de_regex")]
        pattern: Regex,
    },
}

impl StateCheck {
    fn evaluate(&self, snapshot: &StateSnapshot) -> bool {
        match self {
            StateCheck::KeyEquals { key, value } => snapshot.get(key) == Some(value.as_str()),
            StateCheck::KeyPresent { key } => snapshot.get(key).is_some(),
            StateCheck::KeyMatches { key, pattern } => {
                snapshot.get(key).is_some_and(|v| pattern.is_match(v))
            },
        }
    }
}

/// Rule variants. One evaluation function per variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleKind {
    /// Pattern match against the raw input line.
    Command {
        #[serde(deserialize_with = "de_regex")]
        pattern: Regex,
    },
    /// Pattern match against the simulator's output text.
    Output {
        #[serde(deserialize_with = "de_regex")]
        pattern: Regex,
    },
    /// Predicate over the cluster state snapshot.
    State { check: StateCheck },
    /// Expected commands over the execution history.
    ///
    /// With `require_all = false` the expected commands must appear in
    /// order as a (not necessarily contiguous) subsequence of the executed
    /// commands. With `require_all = true` every expected command must
    /// appear, in any order. The two semantics are deliberately distinct.
    Sequence {
        expected: Vec<String>,
        #[serde(default)]
        require_all: bool,
    },
}

impl RuleKind {
    /// Evaluate against the current command and the resolved-command
    /// history (which already includes the current command).
    pub fn evaluate(&self, exec: &ExecutedCommand, history: &[String]) -> bool {
        match self {
            RuleKind::Command { pattern } => pattern.is_match(&exec.raw_input),
            RuleKind::Output { pattern } => pattern.is_match(&exec.output),
            RuleKind::State { check } => check.evaluate(&exec.snapshot),
            RuleKind::Sequence {
                expected,
                require_all,
            } => {
                if *require_all {
                    expected.iter().all(|e| history.contains(e))
                } else {
                    is_subsequence(expected, history)
                }
            },
        }
    }
}

/// Whether `expected` appears in order within `history`, allowing other
/// commands in between.
fn is_subsequence(expected: &[String], history: &[String]) -> bool {
    let mut want = expected.iter();
    let mut next = want.next();
    for seen in history {
        match next {
            Some(e) if e == seen => next = want.next(),
            Some(_) => {},
            None => break,
        }
    }
    next.is_none()
}

fn default_weight() -> f64 {
    1.0
}

/// One completion rule within a step.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationRule {
    /// Identifier used in results and feedback.
    pub id: String,
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Contribution to the weighted score.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Feedback shown when this rule is the first unmet one.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ValidationRule {
    pub fn new(id: &str, kind: RuleKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            weight: 1.0,
            error_message: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }
}

fn de_regex<'de, D>(deserializer: D) -> Result<Regex, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Regex::new(&text).map_err(de::Error::custom)
}
