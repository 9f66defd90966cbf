//! Practice-exam engine for the racklab training platform.
//!
//! Selects a weighted random sample of questions per knowledge domain with
//! exact-total reconciliation, grades single/multi-select answers, and
//! produces a per-domain performance breakdown. A polled countdown timer
//! tracks exam time; it owns no scoring logic.

mod grade;
mod question;
mod select;
mod timer;

pub use grade::{
    DEFAULT_PASSING_SCORE, DomainPerformance, ExamBreakdown, QuestionResult, grade_exam,
};
pub use question::{
    AnswerKey, ExamDomain, ExamQuestion, QuestionType, load_question_bank, parse_question_bank,
};
pub use select::{DEFAULT_EXAM_SIZE, SelectionWarning, domain_quotas, select_questions};
pub use timer::{ExamTimer, TimerStatus};
