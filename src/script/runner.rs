use super::{Command, ScriptLine};
use crate::config::{Config, OutputFormat};
use crate::error::{RegistryError, Result};
use crate::registry::CloudRegistry;
use serde_json::{json, Value};
use std::io::Write;
use tracing::{debug, warn};

/// Counts gathered while running a script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Executes parsed commands against a registry it owns
pub struct ScriptRunner {
    registry: CloudRegistry,
    output_format: OutputFormat,
    fail_fast: bool,
}

impl ScriptRunner {
    pub fn new(output_format: OutputFormat, fail_fast: bool) -> Self {
        Self {
            registry: CloudRegistry::new(),
            output_format,
            fail_fast,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.output_format, config.fail_fast)
    }

    pub fn registry(&self) -> &CloudRegistry {
        &self.registry
    }

    /// Run one command. Queries return their result, mutations return `None`.
    pub fn execute(&mut self, command: &Command) -> Result<Option<Value>> {
        let registry = &mut self.registry;

        let value = match command {
            Command::CreateStore { name } => {
                registry.create_store(name)?;
                None
            }
            Command::Upload { store, files } => {
                registry.upload_document(store, files.iter().cloned())?;
                None
            }
            Command::DeleteStore { name } => {
                registry.delete_store(name);
                None
            }
            Command::EmptyStore { name } => {
                registry.empty_store(name)?;
                None
            }
            Command::ListStores => Some(Value::from(registry.list_stores())),
            Command::CreateMachine { name, os, disk, ram } => {
                registry.create_machine(name, os, disk, ram);
                None
            }
            Command::Start { name } => {
                registry.start_machine(name)?;
                None
            }
            Command::Stop { name } => {
                registry.stop_machine(name)?;
                None
            }
            Command::ListMachines => Some(Value::from(registry.list_machines())),
            Command::UsedMemory { name } => Some(Value::from(registry.used_memory(name)?)),
            Command::UsedDisk { name } => Some(Value::from(round_disk(registry.used_disk(name)?))),
            Command::GlobalUsedDisk => Some(Value::from(round_disk(registry.global_used_disk()?))),
            Command::GlobalUsedMemory => Some(Value::from(registry.global_used_memory()?)),
            Command::Report => Some(serde_json::to_value(registry.usage_report()?)?),
        };

        Ok(value)
    }

    /// Run every line, writing query results and per-line errors to `out`.
    ///
    /// Registry errors are reported and skipped unless fail-fast is on, in
    /// which case the first one is returned.
    pub fn run<W: Write>(&mut self, script: &[ScriptLine], out: &mut W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for entry in script {
            summary.executed += 1;
            debug!("line {}: {}", entry.line, entry.command.keyword());

            match self.execute(&entry.command) {
                Ok(Some(value)) => self.write_result(out, &entry.command, &value)?,
                Ok(None) => {}
                Err(e) => {
                    summary.failed += 1;
                    warn!("line {}: {} failed: {}", entry.line, entry.command.keyword(), e);

                    if self.fail_fast {
                        return Err(e);
                    }
                    self.write_error(out, entry.line, &e)?;
                }
            }
        }

        Ok(summary)
    }

    fn write_result<W: Write>(&self, out: &mut W, command: &Command, value: &Value) -> Result<()> {
        match self.output_format {
            OutputFormat::Text => match value {
                Value::String(s) => writeln!(out, "{}", s)?,
                // serde_json renders 50.0 as "50.0"; plain formatting gives "50"
                Value::Number(n) if n.is_f64() => {
                    writeln!(out, "{}", n.as_f64().unwrap_or_default())?
                }
                Value::Object(_) => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
                other => writeln!(out, "{}", other)?,
            },
            OutputFormat::Json => {
                let line = json!({ "command": command.keyword(), "result": value });
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }

    fn write_error<W: Write>(&self, out: &mut W, line: usize, err: &RegistryError) -> Result<()> {
        match self.output_format {
            OutputFormat::Text => writeln!(out, "error: {} (line {})", err, line)?,
            OutputFormat::Json => {
                let mut report = err.report();
                report.line = Some(line);
                writeln!(out, "{}", serde_json::to_string(&report)?)?;
            }
        }
        Ok(())
    }
}

/// Trim float noise from document sums (3 × 0.1 prints as 0.3)
fn round_disk(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
