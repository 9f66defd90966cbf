//! Privilege & state-interaction policy.
//!
//! Pure lookups over the registry: given a command and the flags it was
//! invoked with, decide whether root is required, and expose the declared
//! state reads/writes for the step validator's `state` rules.

use crate::descriptor::{Privilege, StateInteraction};
use crate::registry::CommandRegistry;

/// Policy view over a registry. Holds no state of its own.
pub struct PrivilegePolicy<'a> {
    registry: &'a CommandRegistry,
}

/// Flag comparison ignores leading dashes on both sides, so `--force`,
/// `-force`, and `force` all name the same flag.
fn strip_dashes(flag: &str) -> &str {
    flag.trim_start_matches('-')
}

impl<'a> PrivilegePolicy<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }

    /// Whether this invocation requires root.
    ///
    /// True when any presented flag is individually root-gated in the
    /// catalog, or when a declared write carries `requires_privilege: root`
    /// and either lists no flags (unconditional) or lists at least one flag
    /// present in the invocation.
    ///
    /// Unknown commands return `false`: unknown-command handling belongs to
    /// the registry and the fuzzy layer, not the policy. This fail-open
    /// default is deliberate.
    pub fn requires_root(&self, command: &str, flags: &[&str]) -> bool {
        let Some(descriptor) = self.registry.resolve(command) else {
            return false;
        };
        let presented: Vec<&str> = flags.iter().map(|f| strip_dashes(f)).collect();

        let flag_gated = descriptor.flags.iter().any(|spec| {
            spec.requires_root && presented.contains(&strip_dashes(&spec.name))
        });
        if flag_gated {
            return true;
        }

        descriptor.state.writes_to.iter().any(|write| {
            write.requires_privilege == Some(Privilege::Root)
                && (write.requires_flags.is_empty()
                    || write
                        .requires_flags
                        .iter()
                        .any(|rf| presented.contains(&strip_dashes(rf))))
        })
    }

    /// Declared state interactions for a command, if known. Pure lookup.
    pub fn state_interactions(&self, command: &str) -> Option<&StateInteraction> {
        self.registry.resolve(command).map(|d| &d.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CommandCategory, CommandDescriptor};

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.register(
            CommandDescriptor::new(
                "poweroff",
                CommandCategory::Power,
                "Power off the node",
                "sim.power",
            )
            .with_root_write("node.power", &[]),
        )
        .unwrap();
        reg.register(
            CommandDescriptor::new(
                "reboot",
                CommandCategory::Power,
                "Reboot the node",
                "sim.power",
            )
            .with_root_write("node.power", &["--force"]),
        )
        .unwrap();
        reg.register(
            CommandDescriptor::new(
                "nvidia-smi",
                CommandCategory::Gpu,
                "Query GPU state",
                "sim.nvidia_smi",
            )
            .with_flag("--reset-gpu", "Reset a GPU", true)
            .with_read("gpu.inventory"),
        )
        .unwrap();
        reg
    }

    #[test]
    fn unconditional_root_write() {
        let reg = registry();
        let policy = PrivilegePolicy::new(&reg);
        assert!(policy.requires_root("poweroff", &[]));
        assert!(policy.requires_root("poweroff", &["now"]));
    }

    #[test]
    fn flag_narrowed_root_write() {
        let reg = registry();
        let policy = PrivilegePolicy::new(&reg);
        assert!(!policy.requires_root("reboot", &[]));
        assert!(policy.requires_root("reboot", &["force"]));
        assert!(policy.requires_root("reboot", &["--force"]));
    }

    #[test]
    fn per_flag_root_requirement() {
        let reg = registry();
        let policy = PrivilegePolicy::new(&reg);
        assert!(!policy.requires_root("nvidia-smi", &[]));
        assert!(policy.requires_root("nvidia-smi", &["reset-gpu"]));
    }

    #[test]
    fn unknown_command_fails_open() {
        let reg = registry();
        let policy = PrivilegePolicy::new(&reg);
        assert!(!policy.requires_root("frobnicate", &["--force"]));
    }

    #[test]
    fn monotonic_in_flags() {
        let reg = registry();
        let policy = PrivilegePolicy::new(&reg);
        // Already root-requiring; adding flags never flips it back.
        assert!(policy.requires_root("reboot", &["force"]));
        assert!(policy.requires_root("reboot", &["force", "verbose"]));
        assert!(policy.requires_root("poweroff", &["force", "now", "x"]));
    }

    #[test]
    fn state_interactions_lookup() {
        let reg = registry();
        let policy = PrivilegePolicy::new(&reg);
        let state = policy.state_interactions("nvidia-smi").unwrap();
        assert_eq!(state.reads_from[0].region, "gpu.inventory");
        assert!(policy.state_interactions("frobnicate").is_none());
    }
}
