use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!("Unknown output format: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            output_format: OutputFormat::Text,
            fail_fast: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build a config from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let log_level = lookup("LOG_LEVEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.log_level);

        let log_dir = lookup("LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let output_format = lookup("OUTPUT_FORMAT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.output_format);

        let fail_fast = lookup("FAIL_FAST")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.fail_fast);

        Config {
            log_level,
            log_dir,
            output_format,
            fail_fast,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
