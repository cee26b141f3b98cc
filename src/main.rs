//! Command-script console for the cloud registry
//!
//! Usage:
//!   cloud-registry [SCRIPT]
//!
//! Reads commands from SCRIPT, or from stdin when no path (or `-`) is given.

use cloud_registry::config::Config;
use cloud_registry::logging::init_logging;
use cloud_registry::script::{read_script, ScriptRunner};
use std::io;
use tracing::{debug, info, warn};

fn main() -> anyhow::Result<()> {
    // Load environment from .env file if present
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _guard = init_logging(&config);

    if let Err(e) = dotenv {
        debug!("No .env file found or error loading it: {}", e);
    }

    let path = std::env::args().nth(1).filter(|p| p != "-");
    let script = read_script(path.as_deref(), io::stdin().lock())?;

    info!(
        "Running {} command(s) from {}",
        script.len(),
        path.as_deref().unwrap_or("stdin")
    );

    let mut runner = ScriptRunner::from_config(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = runner.run(&script, &mut out)?;

    if summary.failed > 0 {
        warn!(
            "{} of {} command(s) failed",
            summary.failed, summary.executed
        );
    } else {
        info!("Executed {} command(s)", summary.executed);
    }

    Ok(())
}
