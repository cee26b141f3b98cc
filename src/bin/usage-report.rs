//! CLI tool to print the usage report left behind by a command script
//!
//! Usage:
//!   cargo run --bin usage-report -- ./scripts/cloud.txt

use std::env;
use std::io;
use std::path::Path;

use cloud_registry::config::{Config, OutputFormat};
use cloud_registry::logging::init_logging;
use cloud_registry::script::{load_script, ScriptRunner};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-script>", args[0]);
        eprintln!();
        eprintln!("Replays the script and prints the final usage report as JSON.");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    if !path.is_file() {
        eprintln!("Error: Not a file: {}", path.display());
        std::process::exit(1);
    }

    let _ = dotenvy::dotenv();
    let config = Config::from_env().unwrap_or_default();
    let _guard = init_logging(&config);

    let script = match load_script(path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    // Failed lines are logged by the runner and skipped
    let mut runner = ScriptRunner::new(OutputFormat::Text, false);
    if let Err(e) = runner.run(&script, &mut io::sink()) {
        eprintln!("Error replaying {}: {}", path.display(), e);
        std::process::exit(1);
    }

    let report = runner
        .registry()
        .usage_report()
        .and_then(|report| Ok(serde_json::to_string_pretty(&report)?));

    match report {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error building usage report: {}", e);
            std::process::exit(1);
        }
    }
}
