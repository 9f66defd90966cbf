//! Built-in command catalog for the datacenter training environment.
//!
//! This is the default command set registered when no external catalog file
//! is supplied. Descriptions mirror what the simulators present; the
//! `handler` keys are resolved by the (external) simulation layer.

use crate::descriptor::{CommandCategory, CommandDescriptor};

/// The default datacenter command set.
pub fn builtin_catalog() -> Vec<CommandDescriptor> {
    use CommandCategory::*;
    vec![
        CommandDescriptor::new("nvidia-smi", Gpu, "Query and manage GPU devices", "sim.nvidia_smi")
            .with_aliases(&["smi"])
            .with_flag("--query-gpu", "Query GPU properties", false)
            .with_flag("--reset-gpu", "Reset a hung GPU", true)
            .with_read("gpu.inventory")
            .with_root_write("gpu.state", &["--reset-gpu"]),
        CommandDescriptor::new("dcgmi", Gpu, "Data Center GPU Manager interface", "sim.dcgmi")
            .with_flag("--discovery", "List discovered GPUs", false)
            .with_flag("--health", "Run health checks", false)
            .with_read("gpu.health")
            .with_cluster_required(),
        CommandDescriptor::new("nvsm", Diagnostics, "System management and diagnostics", "sim.nvsm")
            .with_flag("show", "Show subsystem state", false)
            .with_read("node.health"),
        CommandDescriptor::new("ipmitool", Power, "BMC management over IPMI", "sim.ipmitool")
            .with_aliases(&["ipmi"])
            .with_flag("chassis", "Chassis power control", false)
            .with_flag("sel", "System event log", false)
            .with_read("bmc.sensors")
            .with_root_write("node.power", &["chassis"]),
        CommandDescriptor::new("sinfo", Cluster, "View Slurm partition and node state", "sim.sinfo")
            .with_read("cluster.nodes")
            .with_cluster_required(),
        CommandDescriptor::new("squeue", Cluster, "View the Slurm job queue", "sim.squeue")
            .with_read("cluster.jobs")
            .with_cluster_required(),
        CommandDescriptor::new("scontrol", Cluster, "Administer Slurm nodes and jobs", "sim.scontrol")
            .with_flag("update", "Modify node or job state", true)
            .with_read("cluster.nodes")
            .with_root_write("cluster.nodes", &["update"])
            .with_cluster_required(),
        CommandDescriptor::new("ibstat", Network, "Show InfiniBand device status", "sim.ibstat")
            .with_read("fabric.ports"),
        CommandDescriptor::new("ethtool", Network, "Query Ethernet device settings", "sim.ethtool")
            .with_read("net.links"),
        CommandDescriptor::new("lsblk", Storage, "List block devices", "sim.lsblk")
            .with_read("storage.devices"),
        CommandDescriptor::new("mdadm", Storage, "Manage software RAID arrays", "sim.mdadm")
            .with_root_write("storage.raid", &[]),
        CommandDescriptor::new("poweroff", Power, "Power off the node", "sim.power")
            .with_aliases(&["halt"])
            .with_root_write("node.power", &[]),
        CommandDescriptor::new("reboot", Power, "Reboot the node", "sim.power")
            .with_root_write("node.power", &["--force"]),
        CommandDescriptor::new("dmesg", Diagnostics, "Print the kernel ring buffer", "sim.dmesg")
            .with_read("node.kernel_log"),
        CommandDescriptor::new("top", General, "Show running processes", "sim.top")
            .with_read("node.processes"),
    ]
}
