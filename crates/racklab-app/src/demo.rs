//! Bundled demo content: a scenario and a small question bank, used when no
//! external files are configured.

use racklab_exam::ExamQuestion;
use racklab_types::Result;
use racklab_validate::Scenario;

const DEMO_SCENARIO: &str = r#"
id = "gpu-triage"
title = "Triage a failed GPU"
description = "A compute node reports a hung GPU. Locate it and bring it back."

[[steps]]
step_id = "inspect"
objectives = [
    "Check GPU visibility with nvidia-smi",
    "Run dcgmi health checks on the node",
]
minimum_score = 50.0
partial_credit = true

[[steps.rules]]
id = "query"
kind = "command"
pattern = "nvidia-smi"
error_message = "Start by listing GPUs with nvidia-smi"

[[steps.rules]]
id = "health"
kind = "command"
pattern = "dcgmi"
error_message = "Check GPU health with dcgmi --health"

[[steps]]
step_id = "reset"
objectives = ["Reset the hung GPU with nvidia-smi --reset-gpu"]
auto_advance = true

[[steps.rules]]
id = "reset-cmd"
kind = "command"
pattern = "nvidia-smi\\s+--reset-gpu"
error_message = "Reset the GPU with nvidia-smi --reset-gpu"

[[steps]]
step_id = "verify"
objectives = ["Confirm the cluster sees all nodes with sinfo, then check the queue"]

[[steps.rules]]
id = "ordered"
kind = "sequence"
expected = ["sinfo", "squeue"]
error_message = "Check node state with sinfo before inspecting the queue"
"#;

const DEMO_QUESTIONS: &str = r#"[
    {
        "id": "pa-001",
        "domain": "platform_architecture",
        "type": "multiple-choice",
        "text": "Which interconnect carries GPU-to-GPU traffic inside a DGX node?",
        "options": ["NVLink", "PCIe only", "InfiniBand", "SATA"],
        "answer": 0,
        "explanation": "NVLink provides the intra-node GPU fabric."
    },
    {
        "id": "pi-001",
        "domain": "physical_installation",
        "type": "true-false",
        "text": "Rack PDUs should be provisioned for the system's peak draw, not its idle draw.",
        "answer": true
    },
    {
        "id": "sc-001",
        "domain": "systems_configuration",
        "type": "multiple-select",
        "text": "Which tools report InfiniBand port state?",
        "options": ["ibstat", "ethtool", "lsblk", "ibstatus"],
        "answer": [0, 3]
    },
    {
        "id": "op-001",
        "domain": "operations",
        "type": "multiple-choice",
        "text": "Which command drains a Slurm node for maintenance?",
        "options": ["scontrol update", "sinfo", "squeue", "dmesg"],
        "answer": 0,
        "points": 2
    },
    {
        "id": "op-002",
        "domain": "operations",
        "type": "true-false",
        "text": "squeue shows jobs that have already completed by default.",
        "answer": false
    },
    {
        "id": "ts-001",
        "domain": "troubleshooting",
        "type": "multiple-select",
        "text": "A GPU has fallen off the bus. Which commands help confirm it?",
        "options": ["nvidia-smi", "dmesg", "mdadm", "top"],
        "answer": [0, 1]
    }
]"#;

pub fn demo_scenario() -> Result<Scenario> {
    racklab_validate::parse_scenario(DEMO_SCENARIO)
}

pub fn demo_question_bank() -> Result<Vec<ExamQuestion>> {
    racklab_exam::parse_question_bank(DEMO_QUESTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scenario_parses() {
        let scenario = demo_scenario().unwrap();
        assert_eq!(scenario.steps.len(), 3);
    }

    #[test]
    fn demo_bank_parses() {
        let bank = demo_question_bank().unwrap();
        assert_eq!(bank.len(), 6);
    }
}
