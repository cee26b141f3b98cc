//! Cloud Registry
//!
//! Owns every store and machine and answers usage queries over them.
//! Collections keep insertion order, which is the order used by listings.

use super::machine::{Machine, MachineState};
use super::report::{MachineUsage, StoreUsage, UsageReport};
use super::size::parse_size;
use super::store::Store;
use crate::error::{RegistryError, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Disk consumed by a single uploaded document, in the same unit as machine disks
pub const DOCUMENT_SIZE: f64 = 0.1;

const LIST_SEPARATOR: &str = "||";
const FILE_SEPARATOR: &str = ", ";
const EMPTY_STORE: &str = "empty";

/// In-memory registry of stores and machines
#[derive(Debug, Default)]
pub struct CloudRegistry {
    stores: Vec<Store>,
    machines: Vec<Machine>,
}

impl CloudRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Stores

    /// Create an empty store. Store names are unique.
    pub fn create_store(&mut self, name: &str) -> Result<()> {
        if self.find_store(name).is_some() {
            warn!("Rejected duplicate store: {}", name);
            return Err(RegistryError::DuplicateStore {
                store: name.to_string(),
            });
        }

        self.stores.push(Store::new(name));
        info!("Created store: {}", name);
        Ok(())
    }

    /// Append documents to a store, in the order given
    pub fn upload_document<I, S>(&mut self, store_name: &str, file_names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = self.store_mut(store_name)?;
        let before = store.file_count();
        store.append(file_names);

        info!(
            "Uploaded {} document(s) to store {}",
            store.file_count() - before,
            store_name
        );
        Ok(())
    }

    /// Remove a store. Unknown names are ignored.
    pub fn delete_store(&mut self, name: &str) {
        match self.stores.iter().position(|s| s.name() == name) {
            Some(idx) => {
                self.stores.remove(idx);
                info!("Deleted store: {}", name);
            }
            None => debug!("Delete skipped, no store named {}", name),
        }
    }

    /// Drop every document from a store, keeping the store itself
    pub fn empty_store(&mut self, name: &str) -> Result<()> {
        self.store_mut(name)?.clear();
        info!("Emptied store: {}", name);
        Ok(())
    }

    /// Render all stores as `name:file1, file2||name:empty`
    pub fn list_stores(&self) -> String {
        self.stores
            .iter()
            .map(|store| {
                let content = if store.is_empty() {
                    EMPTY_STORE.to_string()
                } else {
                    store.files().join(FILE_SEPARATOR)
                };
                format!("{}:{}", store.name(), content)
            })
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR)
    }

    pub fn store(&self, name: &str) -> Result<&Store> {
        self.find_store(name).ok_or_else(|| RegistryError::StoreNotFound {
            store: name.to_string(),
        })
    }

    pub fn stores(&self) -> impl Iterator<Item = &Store> {
        self.stores.iter()
    }

    // Machines

    /// Register a new inactive machine.
    ///
    /// Machine names are not checked for uniqueness. Lookups by name resolve
    /// to the first machine registered under that name.
    pub fn create_machine(&mut self, name: &str, os: &str, disk_spec: &str, ram_spec: &str) {
        if self.find_machine(name).is_some() {
            warn!("Machine name {} is already in use, registering anyway", name);
        }

        self.machines.push(Machine::new(name, os, disk_spec, ram_spec));
        info!(
            "Created machine: {} (os={}, disk={}, ram={})",
            name, os, disk_spec, ram_spec
        );
    }

    pub fn start_machine(&mut self, name: &str) -> Result<()> {
        let machine = self.machine_mut(name)?;

        if machine.state().is_running() {
            warn!("Machine {} is already running", name);
            return Err(RegistryError::MachineAlreadyRunning {
                machine: name.to_string(),
            });
        }

        machine.set_state(MachineState::Running);
        info!("Started machine: {}", name);
        Ok(())
    }

    /// Stop a machine regardless of its current state
    pub fn stop_machine(&mut self, name: &str) -> Result<()> {
        self.machine_mut(name)?.set_state(MachineState::Stopped);
        info!("Stopped machine: {}", name);
        Ok(())
    }

    /// Render all machines as `name:state||name:state`
    pub fn list_machines(&self) -> String {
        self.machines
            .iter()
            .map(|m| format!("{}:{}", m.name(), m.state()))
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR)
    }

    pub fn machine(&self, name: &str) -> Result<&Machine> {
        self.find_machine(name)
            .ok_or_else(|| RegistryError::MachineNotFound {
                machine: name.to_string(),
            })
    }

    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.iter()
    }

    // Usage

    /// RAM held by a machine; zero unless it is running
    pub fn used_memory(&self, machine_name: &str) -> Result<i64> {
        let used = machine_memory(self.machine(machine_name)?)?;
        debug!("Used memory for {}: {}", machine_name, used);
        Ok(used)
    }

    /// Disk held by a machine or a store.
    ///
    /// Machines are matched first. A machine's disk counts whatever its state;
    /// a store uses `DOCUMENT_SIZE` per document.
    pub fn used_disk(&self, name: &str) -> Result<f64> {
        let used = if let Some(machine) = self.find_machine(name) {
            machine_disk(machine)?
        } else if let Some(store) = self.find_store(name) {
            store_disk(store)
        } else {
            return Err(RegistryError::ResourceNotFound {
                name: name.to_string(),
            });
        };

        debug!("Used disk for {}: {}", name, used);
        Ok(used)
    }

    /// Sum of disk over every store and every machine.
    ///
    /// Each entity counts its own disk rather than re-resolving by name, so a
    /// duplicate-named machine or a store sharing a machine's name is not
    /// credited with another resource's size.
    pub fn global_used_disk(&self) -> Result<f64> {
        let stores: f64 = self.stores().map(store_disk).sum();

        let mut machines = 0.0;
        for machine in self.machines() {
            machines += machine_disk(machine)?;
        }

        Ok(stores + machines)
    }

    /// Sum of RAM over running machines
    pub fn global_used_memory(&self) -> Result<i64> {
        let mut total: i64 = 0;
        for machine in self.machines() {
            total = total
                .checked_add(machine_memory(machine)?)
                .ok_or(RegistryError::UsageOverflow { usage: "memory" })?;
        }
        Ok(total)
    }

    /// Snapshot per-resource and global usage
    pub fn usage_report(&self) -> Result<UsageReport> {
        let stores = self
            .stores()
            .map(|store| StoreUsage {
                name: store.name().to_string(),
                files: store.file_count(),
                used_disk: store_disk(store),
                created_at: store.created_at(),
            })
            .collect();

        let machines = self
            .machines()
            .map(|machine| {
                Ok(MachineUsage {
                    name: machine.name().to_string(),
                    os: machine.os().to_string(),
                    state: machine.state(),
                    used_disk: machine_disk(machine)?,
                    used_memory: machine_memory(machine)?,
                    created_at: machine.created_at(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(UsageReport {
            generated_at: Utc::now(),
            stores,
            machines,
            global_used_disk: self.global_used_disk()?,
            global_used_memory: self.global_used_memory()?,
        })
    }

    fn find_store(&self, name: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.name() == name)
    }

    fn find_machine(&self, name: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.name() == name)
    }

    fn store_mut(&mut self, name: &str) -> Result<&mut Store> {
        self.stores
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| RegistryError::StoreNotFound {
                store: name.to_string(),
            })
    }

    fn machine_mut(&mut self, name: &str) -> Result<&mut Machine> {
        self.machines
            .iter_mut()
            .find(|m| m.name() == name)
            .ok_or_else(|| RegistryError::MachineNotFound {
                machine: name.to_string(),
            })
    }
}

fn store_disk(store: &Store) -> f64 {
    store.file_count() as f64 * DOCUMENT_SIZE
}

fn machine_disk(machine: &Machine) -> Result<f64> {
    Ok(parse_size(machine.disk_spec())? as f64)
}

fn machine_memory(machine: &Machine) -> Result<i64> {
    if machine.state().is_running() {
        parse_size(machine.ram_spec())
    } else {
        Ok(0)
    }
}
