//! Cloud Registry
//!
//! Tracks document stores and virtual machines for a single caller and
//! answers disk and memory usage queries over them.
//!
//! Usage accounting:
//! ```text
//! store   used disk = DOCUMENT_SIZE × file count
//! machine used disk = disk spec, in every state
//! machine used mem  = ram spec while running, 0 otherwise
//! ```

mod cloud;
mod machine;
mod report;
mod size;
mod store;

pub use cloud::{CloudRegistry, DOCUMENT_SIZE};
pub use machine::{Machine, MachineState};
pub use report::{MachineUsage, StoreUsage, UsageReport};
pub use size::parse_size;
pub use store::Store;
