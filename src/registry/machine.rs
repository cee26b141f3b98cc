//! Virtual Machine
//!
//! Machines hold their disk and RAM sizes as the raw spec strings they were
//! created with (`50gb`, `8gb`). Specs are parsed on demand by the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a machine
///
/// A machine starts `Inactive` and never returns to it once started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineState {
    Inactive,
    Running,
    Stopped,
}

impl MachineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineState::Inactive => "inactive",
            MachineState::Running => "running",
            MachineState::Stopped => "stopped",
        }
    }

    pub fn is_running(&self) -> bool {
        *self == MachineState::Running
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A virtual machine registered in the cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    name: String,
    os: String,
    disk_spec: String,
    ram_spec: String,
    state: MachineState,
    created_at: DateTime<Utc>,
}

impl Machine {
    pub fn new(name: &str, os: &str, disk_spec: &str, ram_spec: &str) -> Self {
        Self {
            name: name.to_string(),
            os: os.to_string(),
            disk_spec: disk_spec.to_string(),
            ram_spec: ram_spec.to_string(),
            state: MachineState::Inactive,
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn disk_spec(&self) -> &str {
        &self.disk_spec
    }

    pub fn ram_spec(&self) -> &str {
        &self.ram_spec
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn set_state(&mut self, state: MachineState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_machine_is_inactive() {
        let machine = Machine::new("machine1", "Linux", "50gb", "8gb");
        assert_eq!(machine.name(), "machine1");
        assert_eq!(machine.os(), "Linux");
        assert_eq!(machine.disk_spec(), "50gb");
        assert_eq!(machine.ram_spec(), "8gb");
        assert_eq!(machine.state(), MachineState::Inactive);
    }

    #[test]
    fn test_state_rendering() {
        assert_eq!(MachineState::Inactive.to_string(), "inactive");
        assert_eq!(MachineState::Running.to_string(), "running");
        assert_eq!(MachineState::Stopped.to_string(), "stopped");
        assert_eq!(
            serde_json::to_string(&MachineState::Running).unwrap(),
            "\"running\""
        );
    }

    #[test]
    fn test_only_running_counts_as_running() {
        assert!(MachineState::Running.is_running());
        assert!(!MachineState::Inactive.is_running());
        assert!(!MachineState::Stopped.is_running());
    }
}
