//! Runtime registry over the command catalog.
//!
//! The registry is an explicitly constructed instance owned by the session
//! root (never a process-wide singleton), so tests and concurrent simulated
//! sessions each get their own.

use std::collections::HashMap;

use racklab_types::{RacklabError, Result};

use crate::descriptor::{CommandCategory, CommandDescriptor};

/// Default number of autocomplete suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Index over registered commands: by name, by alias, and by category.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandDescriptor>,
    /// alias -> canonical name
    aliases: HashMap<String, String>,
    categories: HashMap<CommandCategory, Vec<String>>,
    /// Canonical names in registration order, for stable iteration and
    /// catalog-order tie-breaking.
    order: Vec<String>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of descriptors, rejecting the whole
    /// batch on the first conflict.
    pub fn from_catalog(catalog: Vec<CommandDescriptor>) -> Result<Self> {
        let mut reg = Self::new();
        for descriptor in catalog {
            reg.register(descriptor)?;
        }
        Ok(reg)
    }

    /// Register a command.
    ///
    /// Fails with `DuplicateName` if the canonical name collides with any
    /// existing name or alias, and `DuplicateAlias` if any alias does. A
    /// failed registration leaves the registry unchanged.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<()> {
        let name = descriptor.name.clone();
        if self.commands.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(RacklabError::DuplicateName(name));
        }
        for alias in &descriptor.aliases {
            if self.commands.contains_key(alias)
                || self.aliases.contains_key(alias)
                || *alias == name
            {
                return Err(RacklabError::DuplicateAlias(alias.clone()));
            }
        }
        // Aliases within one descriptor must also be pairwise distinct.
        for (i, alias) in descriptor.aliases.iter().enumerate() {
            if descriptor.aliases[..i].contains(alias) {
                return Err(RacklabError::DuplicateAlias(alias.clone()));
            }
        }

        for alias in &descriptor.aliases {
            self.aliases.insert(alias.clone(), name.clone());
        }
        self.categories
            .entry(descriptor.category)
            .or_default()
            .push(name.clone());
        self.order.push(name.clone());
        self.commands.insert(name, descriptor);
        Ok(())
    }

    /// Resolve an input to its descriptor: exact name first, then alias.
    /// A miss is a `None`, never an error -- unknown input is the fuzzy
    /// suggestion layer's problem.
    pub fn resolve(&self, input: &str) -> Option<&CommandDescriptor> {
        if let Some(cmd) = self.commands.get(input) {
            return Some(cmd);
        }
        self.aliases
            .get(input)
            .and_then(|canonical| self.commands.get(canonical))
    }

    /// Remove a command and all its aliases and category membership.
    /// Returns whether anything was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(descriptor) = self.commands.remove(name) else {
            return false;
        };
        for alias in &descriptor.aliases {
            self.aliases.remove(alias);
        }
        if let Some(members) = self.categories.get_mut(&descriptor.category) {
            members.retain(|n| n != name);
            if members.is_empty() {
                self.categories.remove(&descriptor.category);
            }
        }
        self.order.retain(|n| n != name);
        true
    }

    /// Case-insensitive substring search over name, description, and aliases.
    pub fn search(&self, keyword: &str) -> Vec<&CommandDescriptor> {
        let needle = keyword.to_lowercase();
        self.iter()
            .filter(|cmd| {
                cmd.name.to_lowercase().contains(&needle)
                    || cmd.description.to_lowercase().contains(&needle)
                    || cmd
                        .aliases
                        .iter()
                        .any(|a| a.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Autocomplete: up to `limit` names (commands and aliases combined)
    /// whose lowercase form starts with the lowercased prefix, sorted
    /// lexicographically.
    ///
    /// This is the prefix path, not the fuzzy "did you mean" recovery path.
    pub fn suggestions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        let mut names: Vec<String> = self
            .commands
            .keys()
            .chain(self.aliases.keys())
            .filter(|n| n.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect();
        names.sort();
        names.truncate(limit);
        names
    }

    /// Commands in a category, in registration order.
    pub fn by_category(&self, category: CommandCategory) -> Vec<&CommandDescriptor> {
        self.categories
            .get(&category)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| self.commands.get(n))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.order.iter().filter_map(|n| self.commands.get(n))
    }

    /// All resolvable names: canonical names and aliases.
    pub fn all_names(&self) -> Vec<&str> {
        self.commands
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CommandCategory::{Gpu, Power};

    fn smi() -> CommandDescriptor {
        CommandDescriptor::new("nvidia-smi", Gpu, "Query GPU state", "sim.nvidia_smi")
            .with_aliases(&["smi"])
    }

    #[test]
    fn resolve_by_name_and_alias() {
        let mut reg = CommandRegistry::new();
        reg.register(smi()).unwrap();
        let by_name = reg.resolve("nvidia-smi").unwrap();
        let by_alias = reg.resolve("smi").unwrap();
        assert_eq!(by_name.name, by_alias.name);
        assert!(reg.resolve("unregistered").is_none());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut reg = CommandRegistry::new();
        reg.register(smi()).unwrap();
        let dup = CommandDescriptor::new("nvidia-smi", Gpu, "other", "sim.other");
        assert!(matches!(
            reg.register(dup),
            Err(RacklabError::DuplicateName(_))
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn name_colliding_with_alias_rejected() {
        let mut reg = CommandRegistry::new();
        reg.register(smi()).unwrap();
        let dup = CommandDescriptor::new("smi", Gpu, "other", "sim.other");
        assert!(matches!(
            reg.register(dup),
            Err(RacklabError::DuplicateName(_))
        ));
    }

    #[test]
    fn duplicate_alias_leaves_registry_unchanged() {
        let mut reg = CommandRegistry::new();
        reg.register(smi()).unwrap();
        let dup = CommandDescriptor::new("poweroff", Power, "Power off node", "sim.power")
            .with_aliases(&["halt", "smi"]);
        assert!(matches!(
            reg.register(dup),
            Err(RacklabError::DuplicateAlias(_))
        ));
        // No partial mutation: "halt" must not have been indexed.
        assert!(reg.resolve("halt").is_none());
        assert!(reg.resolve("poweroff").is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unregister_removes_aliases_and_category() {
        let mut reg = CommandRegistry::new();
        reg.register(smi()).unwrap();
        assert!(reg.unregister("nvidia-smi"));
        assert!(reg.resolve("smi").is_none());
        assert!(reg.by_category(Gpu).is_empty());
        assert!(!reg.unregister("nvidia-smi"));
    }

    #[test]
    fn search_matches_description_case_insensitive() {
        let mut reg = CommandRegistry::new();
        reg.register(smi()).unwrap();
        let hits = reg.search("GPU");
        assert_eq!(hits.len(), 1);
        assert!(reg.search("bmc").is_empty());
    }

    #[test]
    fn suggestions_prefix_sorted_limited() {
        let mut reg = CommandRegistry::new();
        reg.register(smi()).unwrap();
        reg.register(
            CommandDescriptor::new("nvsm", Gpu, "System management", "sim.nvsm")
                .with_aliases(&["nv"]),
        )
        .unwrap();
        let got = reg.suggestions("nv", 10);
        assert_eq!(got, vec!["nv", "nvidia-smi", "nvsm"]);
        let got = reg.suggestions("nv", 2);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn iteration_preserves_registration_order() {
        let mut reg = CommandRegistry::new();
        reg.register(CommandDescriptor::new("b", Gpu, "", "h")).unwrap();
        reg.register(CommandDescriptor::new("a", Gpu, "", "h")).unwrap();
        let names: Vec<&str> = reg.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
