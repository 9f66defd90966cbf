//! Exam questions and the five fixed knowledge domains.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use racklab_types::{RacklabError, Result};

/// The five fixed knowledge domains used to stratify exam questions.
///
/// Weights are the nominal share of an exam each domain receives; they sum
/// to 1.0 and never change at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamDomain {
    PlatformArchitecture,
    PhysicalInstallation,
    SystemsConfiguration,
    Operations,
    Troubleshooting,
}

impl ExamDomain {
    /// Canonical domain order; quota arrays index into this.
    pub const ALL: [ExamDomain; 5] = [
        ExamDomain::PlatformArchitecture,
        ExamDomain::PhysicalInstallation,
        ExamDomain::SystemsConfiguration,
        ExamDomain::Operations,
        ExamDomain::Troubleshooting,
    ];

    /// Nominal exam weight for this domain.
    pub fn weight(self) -> f64 {
        match self {
            ExamDomain::PlatformArchitecture => 0.31,
            ExamDomain::PhysicalInstallation => 0.05,
            ExamDomain::SystemsConfiguration => 0.19,
            ExamDomain::Operations => 0.33,
            ExamDomain::Troubleshooting => 0.12,
        }
    }

    /// Position within [`ExamDomain::ALL`].
    pub fn index(self) -> usize {
        match self {
            ExamDomain::PlatformArchitecture => 0,
            ExamDomain::PhysicalInstallation => 1,
            ExamDomain::SystemsConfiguration => 2,
            ExamDomain::Operations => 3,
            ExamDomain::Troubleshooting => 4,
        }
    }
}

impl fmt::Display for ExamDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExamDomain::PlatformArchitecture => "Platform Architecture",
            ExamDomain::PhysicalInstallation => "Physical Installation",
            ExamDomain::SystemsConfiguration => "Systems Configuration",
            ExamDomain::Operations => "Operations",
            ExamDomain::Troubleshooting => "Troubleshooting",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    MultipleSelect,
    TrueFalse,
}

/// Correct-answer value; submitted answers reuse the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    /// True/false questions.
    Bool(bool),
    /// Index into `options` for multiple-choice.
    Single(usize),
    /// Option indices for multiple-select; order is irrelevant.
    Multiple(Vec<usize>),
}

fn default_points() -> u32 {
    1
}

/// One exam question. Belongs to exactly one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub id: String,
    pub domain: ExamDomain,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: AnswerKey,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Parse a JSON question bank, failing fast on malformed data.
pub fn parse_question_bank(text: &str) -> Result<Vec<ExamQuestion>> {
    let questions: Vec<ExamQuestion> = serde_json::from_str(text)?;
    for q in &questions {
        validate_question(q)?;
    }
    Ok(questions)
}

fn validate_question(q: &ExamQuestion) -> Result<()> {
    let fail = |msg: String| Err(RacklabError::Exam(format!("question '{}': {msg}", q.id)));
    match (q.question_type, &q.answer) {
        (QuestionType::MultipleChoice, AnswerKey::Single(idx)) => {
            if *idx >= q.options.len() {
                return fail(format!("answer index {idx} out of range"));
            }
        },
        (QuestionType::MultipleSelect, AnswerKey::Multiple(indices)) => {
            if indices.is_empty() {
                return fail("multiple-select answer is empty".into());
            }
            if let Some(bad) = indices.iter().find(|i| **i >= q.options.len()) {
                return fail(format!("answer index {bad} out of range"));
            }
        },
        (QuestionType::TrueFalse, AnswerKey::Bool(_)) => {},
        (ty, _) => return fail(format!("answer shape does not match type {ty:?}")),
    }
    if q.points == 0 {
        return fail("zero point value".into());
    }
    Ok(())
}

/// Load a question bank from a JSON file on disk.
pub fn load_question_bank(path: &Path) -> Result<Vec<ExamQuestion>> {
    let text = std::fs::read_to_string(path)?;
    let questions = parse_question_bank(&text)?;
    log::info!(
        "Loaded question bank: {} questions from {}",
        questions.len(),
        path.display()
    );
    Ok(questions)
}
