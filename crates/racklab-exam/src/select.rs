//! Weighted question selection with exact-total reconciliation.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::question::{ExamDomain, ExamQuestion};

/// Default number of questions in a practice exam.
pub const DEFAULT_EXAM_SIZE: usize = 35;

/// Degraded-selection conditions. These are warnings, not errors: the exam
/// proceeds with fewer questions than requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    InsufficientPool {
        domain: ExamDomain,
        requested: usize,
        available: usize,
    },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::InsufficientPool {
                domain,
                requested,
                available,
            } => write!(
                f,
                "domain '{domain}' has {available} questions, {requested} requested"
            ),
        }
    }
}

/// Per-domain question quotas for a target exam size.
///
/// Each quota is `round(target * weight)`; domain 2 (Physical Installation)
/// is floored at 1 regardless of rounding, and the signed rounding
/// remainder lands on the largest-weight domain so the quotas always sum to
/// exactly `target`.
pub fn domain_quotas(target: usize) -> [usize; 5] {
    if target == 0 {
        return [0; 5];
    }

    let mut quotas = [0usize; 5];
    for (i, domain) in ExamDomain::ALL.iter().enumerate() {
        quotas[i] = (target as f64 * domain.weight()).round() as usize;
    }
    quotas[1] = quotas[1].max(1);

    let largest = largest_weight_index();
    let sum: usize = quotas.iter().sum();
    if sum <= target {
        quotas[largest] += target - sum;
        return quotas;
    }

    // Over-allocated: pull the excess back, largest-weight domain first,
    // then whichever quota is currently largest. Domain 2 keeps its floor
    // of 1 until nothing else is left.
    let mut excess = sum - target;
    let take = excess.min(quotas[largest]);
    quotas[largest] -= take;
    excess -= take;
    while excess > 0 {
        let candidate = (0..5)
            .filter(|&i| if i == 1 { quotas[i] > 1 } else { quotas[i] > 0 })
            .max_by_key(|&i| quotas[i]);
        let Some(idx) = candidate else { break };
        quotas[idx] -= 1;
        excess -= 1;
    }
    quotas
}

fn largest_weight_index() -> usize {
    let mut best = 0;
    for (i, domain) in ExamDomain::ALL.iter().enumerate() {
        if domain.weight() > ExamDomain::ALL[best].weight() {
            best = i;
        }
    }
    best
}

/// Select a weighted random sample from the question bank.
///
/// Within each domain the available questions are shuffled (rand's slice
/// shuffle is an unbiased Fisher-Yates pass) and the first
/// `min(quota, available)` taken; a short pool is a warning, not an error.
/// The combined selection is shuffled once more so domain order is not
/// visible to the learner.
pub fn select_questions<R: Rng>(
    bank: &[ExamQuestion],
    target: usize,
    rng: &mut R,
) -> (Vec<ExamQuestion>, Vec<SelectionWarning>) {
    let quotas = domain_quotas(target);
    let mut selected = Vec::with_capacity(target);
    let mut warnings = Vec::new();

    for (i, domain) in ExamDomain::ALL.iter().enumerate() {
        let mut pool: Vec<&ExamQuestion> =
            bank.iter().filter(|q| q.domain == *domain).collect();
        pool.shuffle(rng);
        if pool.len() < quotas[i] {
            log::warn!(
                "question pool for '{domain}' has {} of {} requested",
                pool.len(),
                quotas[i]
            );
            warnings.push(SelectionWarning::InsufficientPool {
                domain: *domain,
                requested: quotas[i],
                available: pool.len(),
            });
        }
        selected.extend(pool.into_iter().take(quotas[i]).cloned());
    }

    selected.shuffle(rng);
    (selected, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{AnswerKey, QuestionType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn question(id: &str, domain: ExamDomain) -> ExamQuestion {
        ExamQuestion {
            id: id.to_string(),
            domain,
            question_type: QuestionType::TrueFalse,
            text: String::new(),
            options: Vec::new(),
            answer: AnswerKey::Bool(true),
            points: 1,
            explanation: None,
        }
    }

    fn bank(per_domain: usize) -> Vec<ExamQuestion> {
        let mut bank = Vec::new();
        for domain in ExamDomain::ALL {
            for n in 0..per_domain {
                bank.push(question(&format!("{domain}-{n}"), domain));
            }
        }
        bank
    }

    #[test]
    fn quotas_for_default_size() {
        // Rounding gives [11, 2, 7, 12, 4] = 36; the -1 remainder lands on
        // Operations (largest weight).
        assert_eq!(domain_quotas(35), [11, 2, 7, 11, 4]);
    }

    #[test]
    fn quotas_always_sum_to_target() {
        for target in 1..=120 {
            let quotas = domain_quotas(target);
            assert_eq!(
                quotas.iter().sum::<usize>(),
                target,
                "target {target}: {quotas:?}"
            );
        }
    }

    #[test]
    fn domain_two_floored_at_one() {
        for target in 1..=120 {
            assert!(domain_quotas(target)[1] >= 1, "target {target}");
        }
    }

    #[test]
    fn zero_target_yields_zero_quotas() {
        assert_eq!(domain_quotas(0), [0; 5]);
    }

    #[test]
    fn selection_has_exact_target_size() {
        let bank = bank(20);
        let mut rng = StdRng::seed_from_u64(7);
        let (selected, warnings) = select_questions(&bank, 35, &mut rng);
        assert_eq!(selected.len(), 35);
        assert!(warnings.is_empty());
    }

    #[test]
    fn selection_preserves_multiset() {
        // No question may be added, dropped, or duplicated by the
        // shuffle+take pass.
        let bank = bank(3);
        let mut rng = StdRng::seed_from_u64(11);
        let (selected, _) = select_questions(&bank, 15, &mut rng);
        let ids: BTreeSet<&str> = selected.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), selected.len(), "no duplicates");
        let bank_ids: BTreeSet<&str> = bank.iter().map(|q| q.id.as_str()).collect();
        assert!(ids.is_subset(&bank_ids));
    }

    #[test]
    fn short_pool_degrades_with_warning() {
        let mut bank = bank(20);
        // Starve Physical Installation entirely.
        bank.retain(|q| q.domain != ExamDomain::PhysicalInstallation);
        let mut rng = StdRng::seed_from_u64(3);
        let (selected, warnings) = select_questions(&bank, 35, &mut rng);
        assert_eq!(selected.len(), 33);
        assert_eq!(
            warnings,
            vec![SelectionWarning::InsufficientPool {
                domain: ExamDomain::PhysicalInstallation,
                requested: 2,
                available: 0,
            }]
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn quota_reconciliation(target in 1usize..300) {
                let quotas = domain_quotas(target);
                prop_assert_eq!(quotas.iter().sum::<usize>(), target);
                prop_assert!(quotas[1] >= 1);
            }

            #[test]
            fn selection_preserves_multiset_for_any_seed(seed in 0u64..1000) {
                let bank = bank(10);
                let mut rng = StdRng::seed_from_u64(seed);
                let (selected, _) = select_questions(&bank, 35, &mut rng);
                let ids: BTreeSet<&str> = selected.iter().map(|q| q.id.as_str()).collect();
                prop_assert_eq!(ids.len(), selected.len());
            }
        }
    }
}
