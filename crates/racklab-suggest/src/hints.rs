//! Contextual hint ranking from step objectives.

use racklab_catalog::{CommandDescriptor, CommandRegistry};

/// Commands recommended per hint request.
const MAX_HINTS: usize = 5;

/// Keywords shorter than this carry no signal.
const MIN_KEYWORD_LEN: usize = 3;

/// Score every catalog command against a step's objective text and return
/// the top five.
///
/// A command scores +10 when its name appears verbatim in the joined,
/// lowercased objective text, and +1 for each objective keyword (length >=
/// 3) found in its descriptions. Ties break by catalog registration order;
/// zero-score commands are never suggested.
pub fn contextual_suggestions<'a>(
    registry: &'a CommandRegistry,
    objectives: &[String],
) -> Vec<&'a CommandDescriptor> {
    let joined = objectives.join(" ").to_lowercase();
    let keywords: Vec<&str> = joined
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| w.len() >= MIN_KEYWORD_LEN)
        .collect();

    let mut scored: Vec<(u32, usize, &CommandDescriptor)> = Vec::new();
    for (order, cmd) in registry.iter().enumerate() {
        let mut score = 0u32;
        if joined.contains(&cmd.name.to_lowercase()) {
            score += 10;
        }
        let descriptions = format!(
            "{} {}",
            cmd.description,
            cmd.long_description.as_deref().unwrap_or("")
        )
        .to_lowercase();
        for keyword in &keywords {
            if descriptions.contains(keyword) {
                score += 1;
            }
        }
        if score > 0 {
            scored.push((score, order, cmd));
        }
    }

    // Highest score first; ties keep catalog order.
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(MAX_HINTS)
        .map(|(_, _, cmd)| cmd)
        .collect()
}
