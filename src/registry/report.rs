use super::machine::MachineState;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time usage of every resource in a registry
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub generated_at: DateTime<Utc>,
    pub stores: Vec<StoreUsage>,
    pub machines: Vec<MachineUsage>,
    pub global_used_disk: f64,
    pub global_used_memory: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreUsage {
    pub name: String,
    pub files: usize,
    pub used_disk: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineUsage {
    pub name: String,
    pub os: String,
    pub state: MachineState,
    pub used_disk: f64,
    pub used_memory: i64,
    pub created_at: DateTime<Utc>,
}
