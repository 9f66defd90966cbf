//! Fuzzy suggestion service for the racklab training engine.
//!
//! Invoked when registry resolution fails ("did you mean") and when a step
//! needs to recommend next actions (contextual hints). Similarity is
//! normalized Levenshtein distance over the catalog's names and aliases.

mod hints;
mod similarity;

pub use hints::contextual_suggestions;
pub use similarity::{
    DEFAULT_SIMILARITY_THRESHOLD, did_you_mean, find_similar_commands, similarity,
};
