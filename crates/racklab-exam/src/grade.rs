//! Exam grading -- a pure reduction over (questions, answer map).

use std::collections::HashMap;

use serde::Serialize;

use crate::question::{AnswerKey, ExamDomain, ExamQuestion};

/// Default external pass threshold, in percent.
pub const DEFAULT_PASSING_SCORE: f64 = 70.0;

/// Per-domain slice of the breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct DomainPerformance {
    pub domain: ExamDomain,
    /// Nominal exam weight for this domain.
    pub weight: f64,
    pub total_questions: usize,
    pub correct: usize,
    pub total_points: u32,
    pub earned_points: u32,
    /// Question-count percentage for the domain; 100 for an empty domain.
    pub percentage: f64,
}

/// Outcome for one question.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub domain: ExamDomain,
    pub correct: bool,
    pub points_possible: u32,
    pub points_earned: u32,
}

/// Derived grading report. Built fresh on every grading pass and handed to
/// the persistence layer as opaque structured data; never mutated
/// incrementally.
#[derive(Debug, Clone, Serialize)]
pub struct ExamBreakdown {
    pub total_points: u32,
    pub earned_points: u32,
    pub percentage: f64,
    pub domains: Vec<DomainPerformance>,
    pub questions: Vec<QuestionResult>,
}

impl ExamBreakdown {
    /// Pass/fail is an external threshold comparison, not baked into the
    /// breakdown.
    pub fn passed(&self, passing_score: f64) -> bool {
        self.percentage >= passing_score
    }
}

/// Whether a submitted answer is correct.
///
/// Multiple-select requires equal cardinality and equal sorted contents --
/// order-independent set equality. Every other type is direct equality; a
/// shape mismatch is simply incorrect.
fn is_correct(correct: &AnswerKey, submitted: &AnswerKey) -> bool {
    match (correct, submitted) {
        (AnswerKey::Multiple(want), AnswerKey::Multiple(got)) => {
            if want.len() != got.len() {
                return false;
            }
            let mut want = want.clone();
            let mut got = got.clone();
            want.sort_unstable();
            got.sort_unstable();
            want == got
        },
        (want, got) => want == got,
    }
}

/// Grade a completed exam. Pure over its inputs: the question bank is never
/// mutated, and unanswered questions grade as incorrect.
pub fn grade_exam(
    questions: &[ExamQuestion],
    answers: &HashMap<String, AnswerKey>,
) -> ExamBreakdown {
    let mut total_points = 0u32;
    let mut earned_points = 0u32;
    let mut question_results = Vec::with_capacity(questions.len());

    let mut per_domain: HashMap<ExamDomain, (usize, usize, u32, u32)> = HashMap::new();

    for q in questions {
        let correct = answers
            .get(&q.id)
            .is_some_and(|submitted| is_correct(&q.answer, submitted));
        let earned = if correct { q.points } else { 0 };
        total_points += q.points;
        earned_points += earned;

        let entry = per_domain.entry(q.domain).or_default();
        entry.0 += 1;
        if correct {
            entry.1 += 1;
        }
        entry.2 += q.points;
        entry.3 += earned;

        question_results.push(QuestionResult {
            question_id: q.id.clone(),
            domain: q.domain,
            correct,
            points_possible: q.points,
            points_earned: earned,
        });
    }

    let domains = ExamDomain::ALL
        .iter()
        .map(|domain| {
            let (total, correct, points, earned) =
                per_domain.get(domain).copied().unwrap_or_default();
            DomainPerformance {
                domain: *domain,
                weight: domain.weight(),
                total_questions: total,
                correct,
                total_points: points,
                earned_points: earned,
                percentage: if total == 0 {
                    100.0
                } else {
                    100.0 * correct as f64 / total as f64
                },
            }
        })
        .collect();

    let percentage = if total_points == 0 {
        0.0
    } else {
        100.0 * earned_points as f64 / total_points as f64
    };

    ExamBreakdown {
        total_points,
        earned_points,
        percentage,
        domains,
        questions: question_results,
    }
}
