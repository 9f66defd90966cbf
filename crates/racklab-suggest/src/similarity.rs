//! Edit-distance similarity and "did you mean" recovery.

use racklab_catalog::CommandRegistry;

/// Minimum similarity for a "did you mean" candidate.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Most similar distinct canonical commands returned per lookup.
const MAX_SUGGESTIONS: usize = 3;

/// Normalized similarity: `1 - levenshtein(a, b) / max(len)`, computed
/// case-insensitively over characters. Two empty strings are identical
/// (similarity 1).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(&a, &b) as f64 / max_len as f64
}

/// Scan every catalog name and alias for near-misses of `input`.
///
/// Keeps candidates with `threshold <= similarity < 1` (exact matches
/// belong to direct resolution, not recovery), sorts descending by
/// similarity, and deduplicates to the highest-ranked distinct canonical
/// commands, truncated to three.
pub fn find_similar_commands(
    registry: &CommandRegistry,
    input: &str,
    threshold: f64,
) -> Vec<String> {
    let mut scored: Vec<(f64, &str)> = registry
        .all_names()
        .into_iter()
        .filter_map(|name| {
            let sim = similarity(input, name);
            (sim >= threshold && sim < 1.0).then_some((sim, name))
        })
        .collect();
    // Descending by similarity; ties break alphabetically so results are
    // stable across runs.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });

    let mut canonical = Vec::new();
    for (_, name) in scored {
        let Some(descriptor) = registry.resolve(name) else {
            continue;
        };
        if !canonical.contains(&descriptor.name) {
            canonical.push(descriptor.name.clone());
        }
        if canonical.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    log::debug!("fuzzy candidates for '{input}': {canonical:?}");
    canonical
}

/// Render a user-facing recovery hint, or `None` when no candidate clears
/// the threshold.
pub fn did_you_mean(registry: &CommandRegistry, input: &str) -> Option<String> {
    let candidates = find_similar_commands(registry, input, DEFAULT_SIMILARITY_THRESHOLD);
    match candidates.as_slice() {
        [] => None,
        [only] => Some(format!("Did you mean '{only}'?")),
        many => Some(format!("Did you mean one of: {}?", many.join(", "))),
    }
}
