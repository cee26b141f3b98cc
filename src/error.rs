use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Store already exists: {store}")]
    DuplicateStore { store: String },

    #[error("Machine already running: {machine}")]
    MachineAlreadyRunning { machine: String },

    #[error("Store not found: {store}")]
    StoreNotFound { store: String },

    #[error("Machine not found: {machine}")]
    MachineNotFound { machine: String },

    #[error("No store or machine named {name}")]
    ResourceNotFound { name: String },

    #[error("Invalid size spec: {spec:?}")]
    InvalidSize { spec: String },

    #[error("Total {usage} usage overflows")]
    UsageOverflow { usage: &'static str },

    #[error("Invalid command on line {line}: {message}")]
    InvalidCommand { line: usize, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Stable identifier for the error kind, used in JSON output
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateStore { .. } => "duplicate_store",
            RegistryError::MachineAlreadyRunning { .. } => "machine_already_running",
            RegistryError::StoreNotFound { .. } => "store_not_found",
            RegistryError::MachineNotFound { .. } => "machine_not_found",
            RegistryError::ResourceNotFound { .. } => "resource_not_found",
            RegistryError::InvalidSize { .. } => "invalid_size",
            RegistryError::UsageOverflow { .. } => "usage_overflow",
            RegistryError::InvalidCommand { .. } => "invalid_command",
            RegistryError::Internal(_) => "internal_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::StoreNotFound { .. }
                | RegistryError::MachineNotFound { .. }
                | RegistryError::ResourceNotFound { .. }
        )
    }

    pub fn report(&self) -> ErrorReport {
        let (resource, line) = match self {
            RegistryError::DuplicateStore { store } | RegistryError::StoreNotFound { store } => {
                (Some(store.clone()), None)
            }
            RegistryError::MachineAlreadyRunning { machine }
            | RegistryError::MachineNotFound { machine } => (Some(machine.clone()), None),
            RegistryError::ResourceNotFound { name } => (Some(name.clone()), None),
            RegistryError::InvalidCommand { line, .. } => (None, Some(*line)),
            RegistryError::InvalidSize { .. }
            | RegistryError::UsageOverflow { .. }
            | RegistryError::Internal(_) => (None, None),
        };

        ErrorReport {
            error: self.code().to_string(),
            message: self.to_string(),
            resource,
            line,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Internal(format!("Serialization error: {}", err))
    }
}

impl From<anyhow::Error> for RegistryError {
    fn from(err: anyhow::Error) -> Self {
        RegistryError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_grouping() {
        assert!(RegistryError::StoreNotFound { store: "a".into() }.is_not_found());
        assert!(RegistryError::MachineNotFound { machine: "a".into() }.is_not_found());
        assert!(RegistryError::ResourceNotFound { name: "a".into() }.is_not_found());
        assert!(!RegistryError::DuplicateStore { store: "a".into() }.is_not_found());
    }

    #[test]
    fn test_report_fields() {
        let report = RegistryError::DuplicateStore {
            store: "myFiles".to_string(),
        }
        .report();
        assert_eq!(report.error, "duplicate_store");
        assert_eq!(report.message, "Store already exists: myFiles");
        assert_eq!(report.resource.as_deref(), Some("myFiles"));

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("line"));
    }

    #[test]
    fn test_report_invalid_command_line() {
        let report = RegistryError::InvalidCommand {
            line: 4,
            message: "unknown command: boot".to_string(),
        }
        .report();
        assert_eq!(report.error, "invalid_command");
        assert_eq!(report.line, Some(4));
        assert_eq!(report.resource, None);
    }
}
