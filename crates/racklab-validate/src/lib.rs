//! Step validation for the racklab training engine.
//!
//! A scenario step carries a declarative rule set; the validator consumes
//! the learner's executed commands one at a time and produces incremental
//! progress, weighted partial credit, and pass/fail. Rules are a tagged
//! union with one evaluation function per variant -- no runtime type
//! inspection, no executable logic embedded in rule data.

mod rule;
mod scenario;
mod step;

pub use rule::{ExecutedCommand, RuleKind, StateCheck, StateSnapshot, ValidationRule};
pub use scenario::{Scenario, load_scenario, parse_scenario};
pub use step::{
    RuleResult, StepPhase, StepProgress, StepValidation, StepValidationState, ValidationResult,
};
