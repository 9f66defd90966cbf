//! Practice-exam runner: selection, a simulated answer pass, and the graded
//! breakdown.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use racklab_exam::{ExamQuestion, ExamTimer, grade_exam, select_questions};

use crate::config::AppConfig;

pub fn run_exam(bank: &[ExamQuestion], config: &AppConfig) {
    let mut rng = rand::thread_rng();
    let (selected, warnings) = select_questions(bank, config.exam_size, &mut rng);
    for warning in &warnings {
        println!("note: {warning}");
    }
    println!(
        "Selected {} of {} requested questions.",
        selected.len(),
        config.exam_size
    );

    let mut timer = ExamTimer::new(Duration::from_secs(config.exam_minutes * 60));
    timer.start(Instant::now());
    let status = timer.tick(Instant::now());
    println!("Time remaining: {} min.", status.remaining.as_secs() / 60);

    // Stand-in for the answering UI: answer two of every three questions
    // correctly and leave the rest blank, so the breakdown shows mixed
    // per-domain results.
    let mut answers = HashMap::new();
    for (i, q) in selected.iter().enumerate() {
        if i % 3 != 2 {
            answers.insert(q.id.clone(), q.answer.clone());
        }
    }

    let breakdown = grade_exam(&selected, &answers);
    println!(
        "\nScore: {}/{} points ({:.1}%) -- {}",
        breakdown.earned_points,
        breakdown.total_points,
        breakdown.percentage,
        if breakdown.passed(config.passing_score) {
            "PASS"
        } else {
            "FAIL"
        }
    );
    println!("Per-domain:");
    for perf in &breakdown.domains {
        println!(
            "  {:<24} {:>2}/{:<2} ({:.0}%)  weight {:.0}%",
            perf.domain.to_string(),
            perf.correct,
            perf.total_questions,
            perf.percentage,
            perf.weight * 100.0
        );
    }
    timer.stop();
}
