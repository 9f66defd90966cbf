//! Command catalog and registry for the racklab training engine.
//!
//! The catalog is a static table of simulated datacenter commands and their
//! metadata. The registry is a runtime index over it: alias resolution,
//! category grouping, keyword search, and prefix autocomplete. The privilege
//! policy decides whether a command/flag combination needs root.

mod builtins;
mod descriptor;
mod policy;
mod registry;

pub use builtins::builtin_catalog;
pub use descriptor::{
    CatalogFile, CommandCategory, CommandDescriptor, FlagSpec, Privilege, StateAccess,
    StateInteraction, load_catalog, parse_catalog,
};
pub use policy::PrivilegePolicy;
pub use registry::{CommandRegistry, DEFAULT_SUGGESTION_LIMIT};
