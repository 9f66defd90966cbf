//! Interactive training session: routes typed lines through the registry,
//! policy, and step validator, and renders the engine's structured results
//! as plain text.

use racklab_catalog::{CommandRegistry, PrivilegePolicy};
use racklab_suggest::{contextual_suggestions, did_you_mean};
use racklab_validate::{
    ExecutedCommand, Scenario, StateSnapshot, StepPhase, StepValidationState,
};

pub struct Session {
    registry: CommandRegistry,
    scenario: Scenario,
    step_index: usize,
    step_state: StepValidationState,
    /// Demo cluster state fed to `state` rules; the real simulator owns
    /// this in production.
    cluster: StateSnapshot,
}

/// What the caller should do after a handled line.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Continue,
    ScenarioComplete,
}

impl Session {
    pub fn new(registry: CommandRegistry, scenario: Scenario) -> Self {
        let first = scenario.steps[0].clone();
        let mut cluster = StateSnapshot::new();
        cluster.set("node.power", "on");
        Self {
            registry,
            scenario,
            step_index: 0,
            step_state: StepValidationState::new(first),
            cluster,
        }
    }

    pub fn banner(&self) {
        println!("=== {} ===", self.scenario.title);
        if !self.scenario.description.is_empty() {
            println!("{}", self.scenario.description);
        }
        self.print_step_header();
    }

    fn print_step_header(&self) {
        let step = self.step_state.validation();
        println!(
            "\n[step {}/{}] {}",
            self.step_index + 1,
            self.scenario.steps.len(),
            step.step_id
        );
        for objective in &step.objectives {
            println!("  * {objective}");
        }
    }

    pub fn print_hints(&self) {
        let objectives = &self.step_state.validation().objectives;
        let hints = contextual_suggestions(&self.registry, objectives);
        if hints.is_empty() {
            println!("No suggestions for this step.");
            return;
        }
        println!("Try one of:");
        for cmd in hints {
            println!("  {:<12} {}", cmd.name, cmd.description);
        }
    }

    pub fn print_progress(&self) {
        let snapshot = self.step_state.snapshot();
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("progress serialization failed: {e}"),
        }
    }

    /// Handle one typed line. Unknown commands go through fuzzy recovery;
    /// known ones run the policy check and feed the step validator.
    pub fn handle_command(&mut self, line: &str) -> SessionEvent {
        let Some((name, flags)) = split_invocation(line) else {
            return SessionEvent::Continue;
        };

        let Some(descriptor) = self.registry.resolve(name) else {
            match did_you_mean(&self.registry, name) {
                Some(hint) => println!("Unknown command '{name}'. {hint}"),
                None => println!("Unknown command '{name}'."),
            }
            return SessionEvent::Continue;
        };
        let resolved = descriptor.name.clone();

        let policy = PrivilegePolicy::new(&self.registry);
        if policy.requires_root(&resolved, &flags) {
            println!("(running with sudo: '{resolved}' requires root here)");
        }
        // Stand-in for the out-of-scope simulator: mark every declared
        // write region as touched so state rules have something to read.
        if let Some(state) = policy.state_interactions(&resolved) {
            let regions: Vec<String> =
                state.writes_to.iter().map(|w| w.region.clone()).collect();
            for region in regions {
                self.cluster.set(&region, "modified");
            }
        }

        let exec = ExecutedCommand::new(line, &resolved)
            .with_flags(&flags)
            .with_snapshot(self.cluster.clone());
        let result = self.step_state.process_command(&exec);

        println!(
            "progress: {:.0}%  score: {:.2}",
            result.progress, result.score
        );
        if let Some(feedback) = &result.feedback {
            println!("hint: {feedback}");
        }

        if self.step_state.phase() == StepPhase::Completed {
            println!("step complete.");
            if self.step_state.should_auto_advance() {
                println!("(auto-advancing)");
            }
            return self.advance();
        }
        SessionEvent::Continue
    }

    fn advance(&mut self) -> SessionEvent {
        self.step_index += 1;
        if self.step_index >= self.scenario.steps.len() {
            println!("\nScenario '{}' complete.", self.scenario.title);
            return SessionEvent::ScenarioComplete;
        }
        self.step_state =
            StepValidationState::new(self.scenario.steps[self.step_index].clone());
        self.print_step_header();
        SessionEvent::Continue
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}

/// Split a typed line into the command name and its presented flags.
///
/// Every token after the command counts as a flag: the catalog declares
/// bare-word triggers (ipmitool's `chassis`, scontrol's `update`) and the
/// privilege policy dash-strips both sides before comparing.
fn split_invocation(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}
