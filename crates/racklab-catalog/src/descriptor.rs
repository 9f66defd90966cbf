//! Command descriptors -- the static metadata for one simulated command.
//!
//! Descriptors are loaded once at startup, either from a TOML catalog file
//! or from the built-in catalog, and are read-only for the life of the
//! process.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use racklab_types::{RacklabError, Result};

/// Command category for grouping in help output and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Gpu,
    Cluster,
    Network,
    Storage,
    Power,
    Diagnostics,
    General,
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandCategory::Gpu => "gpu",
            CommandCategory::Cluster => "cluster",
            CommandCategory::Network => "network",
            CommandCategory::Storage => "storage",
            CommandCategory::Power => "power",
            CommandCategory::Diagnostics => "diagnostics",
            CommandCategory::General => "general",
        };
        write!(f, "{name}")
    }
}

/// Privilege level a state access may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    Root,
}

/// One flag a command accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagSpec {
    /// Flag name as typed, e.g. `--force`.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whether presenting this flag alone requires root.
    #[serde(default)]
    pub requires_root: bool,
}

/// One declared read or write against a logical cluster state region.
#[derive(Debug, Clone, Deserialize)]
pub struct StateAccess {
    /// Logical state region, e.g. `node.power` or `gpu.clocks`.
    pub region: String,
    /// Privilege required for this access, if any.
    #[serde(default)]
    pub requires_privilege: Option<Privilege>,
    /// Flags that narrow the requirement. Empty means the access (and any
    /// privilege on it) applies unconditionally.
    #[serde(default)]
    pub requires_flags: Vec<String>,
}

/// Declared state interactions for a command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateInteraction {
    #[serde(default)]
    pub reads_from: Vec<StateAccess>,
    #[serde(default)]
    pub writes_to: Vec<StateAccess>,
}

/// Immutable metadata for one simulated command.
///
/// The `handler` field names the simulator that executes the command; the
/// engine treats it as an opaque key.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDescriptor {
    /// Canonical command name.
    pub name: String,
    /// Alternative names resolving to this command.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub category: CommandCategory,
    /// One-line description for help and search.
    pub description: String,
    /// Longer help text, if any.
    #[serde(default)]
    pub long_description: Option<String>,
    /// Opaque key of the simulator handler that executes this command.
    pub handler: String,
    /// Flags the command accepts.
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
    /// Whether the command only makes sense against a provisioned cluster.
    #[serde(default)]
    pub requires_cluster: bool,
    /// Whether the command mutates simulated cluster state.
    #[serde(default)]
    pub modifies_state: bool,
    /// Declared state reads and writes.
    #[serde(default)]
    pub state: StateInteraction,
}

impl CommandDescriptor {
    /// Create a descriptor with the required fields; optional metadata is
    /// added with the `with_*` methods.
    pub fn new(
        name: &str,
        category: CommandCategory,
        description: &str,
        handler: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            category,
            description: description.to_string(),
            long_description: None,
            handler: handler.to_string(),
            flags: Vec::new(),
            requires_cluster: false,
            modifies_state: false,
            state: StateInteraction::default(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_flag(mut self, name: &str, description: &str, requires_root: bool) -> Self {
        self.flags.push(FlagSpec {
            name: name.to_string(),
            description: description.to_string(),
            requires_root,
        });
        self
    }

    pub fn with_read(mut self, region: &str) -> Self {
        self.state.reads_from.push(StateAccess {
            region: region.to_string(),
            requires_privilege: None,
            requires_flags: Vec::new(),
        });
        self
    }

    /// Declare a root-gated write. An empty `requires_flags` slice means the
    /// command unconditionally requires root for this write.
    pub fn with_root_write(mut self, region: &str, requires_flags: &[&str]) -> Self {
        self.state.writes_to.push(StateAccess {
            region: region.to_string(),
            requires_privilege: Some(Privilege::Root),
            requires_flags: requires_flags.iter().map(|f| f.to_string()).collect(),
        });
        self.modifies_state = true;
        self
    }

    pub fn with_cluster_required(mut self) -> Self {
        self.requires_cluster = true;
        self
    }
}

/// Root of a TOML catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub commands: Vec<CommandDescriptor>,
}

/// Parse a catalog from TOML text, failing fast on malformed data.
pub fn parse_catalog(text: &str) -> Result<Vec<CommandDescriptor>> {
    let file: CatalogFile = toml::from_str(text)?;
    if file.commands.is_empty() {
        return Err(RacklabError::Catalog("catalog contains no commands".into()));
    }
    for cmd in &file.commands {
        if cmd.name.trim().is_empty() {
            return Err(RacklabError::Catalog("command with empty name".into()));
        }
        if cmd.handler.trim().is_empty() {
            return Err(RacklabError::Catalog(format!(
                "command '{}' has no handler",
                cmd.name
            )));
        }
    }
    Ok(file.commands)
}

/// Load a catalog from a TOML file on disk.
pub fn load_catalog(path: &Path) -> Result<Vec<CommandDescriptor>> {
    let text = std::fs::read_to_string(path)?;
    let commands = parse_catalog(&text)?;
    log::info!("Loaded catalog: {} commands from {}", commands.len(), path.display());
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[commands]]
        name = "nvidia-smi"
        aliases = ["smi"]
        category = "gpu"
        description = "Query GPU state"
        handler = "sim.nvidia_smi"

        [[commands.flags]]
        name = "--reset-gpu"
        description = "Reset a GPU"
        requires_root = true

        [[commands.state.reads_from]]
        region = "gpu.inventory"

        [[commands.state.writes_to]]
        region = "gpu.state"
        requires_privilege = "root"
        requires_flags = ["--reset-gpu"]
    "#;

    #[test]
    fn parse_sample_catalog() {
        let cmds = parse_catalog(SAMPLE).unwrap();
        assert_eq!(cmds.len(), 1);
        let smi = &cmds[0];
        assert_eq!(smi.name, "nvidia-smi");
        assert_eq!(smi.aliases, vec!["smi"]);
        assert_eq!(smi.category, CommandCategory::Gpu);
        assert!(smi.flags[0].requires_root);
        let write = &smi.state.writes_to[0];
        assert_eq!(write.requires_privilege, Some(Privilege::Root));
        assert_eq!(write.requires_flags, vec!["--reset-gpu"]);
    }

    #[test]
    fn empty_catalog_rejected() {
        let result = parse_catalog("commands = []");
        assert!(matches!(result, Err(RacklabError::Catalog(_))));
    }

    #[test]
    fn missing_handler_rejected() {
        let text = r#"
            [[commands]]
            name = "foo"
            category = "general"
            description = "x"
            handler = ""
        "#;
        assert!(matches!(parse_catalog(text), Err(RacklabError::Catalog(_))));
    }

    #[test]
    fn malformed_toml_fails_fast() {
        assert!(matches!(
            parse_catalog("[[commands]]\nname = 3"),
            Err(RacklabError::TomlParse(_))
        ));
    }

    #[test]
    fn category_display() {
        assert_eq!(CommandCategory::Gpu.to_string(), "gpu");
        assert_eq!(CommandCategory::Diagnostics.to_string(), "diagnostics");
    }
}
