//! Command Scripts
//!
//! A line-oriented language for driving a registry from a file or stdin:
//!
//! ```text
//! # comments and blank lines are skipped
//! create-store myImages
//! upload myImages picture.jpeg "holiday photo.png"
//! create-machine machine1 Linux 50gb 8gb
//! start machine1
//! list-stores
//! global-used-memory
//! ```

mod runner;

pub use runner::{RunSummary, ScriptRunner};

use crate::error::{RegistryError, Result};
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("token pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateStore { name: String },
    Upload { store: String, files: Vec<String> },
    DeleteStore { name: String },
    EmptyStore { name: String },
    ListStores,
    CreateMachine {
        name: String,
        os: String,
        disk: String,
        ram: String,
    },
    Start { name: String },
    Stop { name: String },
    ListMachines,
    UsedMemory { name: String },
    UsedDisk { name: String },
    GlobalUsedDisk,
    GlobalUsedMemory,
    Report,
}

impl Command {
    /// The keyword this command is written with
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::CreateStore { .. } => "create-store",
            Command::Upload { .. } => "upload",
            Command::DeleteStore { .. } => "delete-store",
            Command::EmptyStore { .. } => "empty-store",
            Command::ListStores => "list-stores",
            Command::CreateMachine { .. } => "create-machine",
            Command::Start { .. } => "start",
            Command::Stop { .. } => "stop",
            Command::ListMachines => "list-machines",
            Command::UsedMemory { .. } => "used-memory",
            Command::UsedDisk { .. } => "used-disk",
            Command::GlobalUsedDisk => "global-used-disk",
            Command::GlobalUsedMemory => "global-used-memory",
            Command::Report => "report",
        }
    }
}

/// A parsed command with its 1-based source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Split a line into tokens. Double quotes group a token containing spaces.
///
/// Returns `None` when a quote is left unterminated or appears inside a bare
/// token.
pub fn tokenize(line: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();

    for caps in TOKEN_RE.captures_iter(line) {
        if let Some(quoted) = caps.get(1) {
            tokens.push(quoted.as_str().to_string());
        } else if let Some(bare) = caps.get(2) {
            if bare.as_str().contains('"') {
                return None;
            }
            tokens.push(bare.as_str().to_string());
        }
    }

    Some(tokens)
}

/// Parse a single line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let invalid = |message: String| RegistryError::InvalidCommand {
        line: line_no,
        message,
    };

    let mut tokens = tokenize(trimmed)
        .ok_or_else(|| invalid("unterminated or misplaced quote".to_string()))?
        .into_iter();
    let keyword = match tokens.next() {
        Some(k) => k,
        None => return Ok(None),
    };
    let args: Vec<String> = tokens.collect();

    let expect = |count: usize| -> Result<()> {
        if args.len() == count {
            Ok(())
        } else {
            Err(invalid(format!(
                "{} expects {} argument(s), got {}",
                keyword,
                count,
                args.len()
            )))
        }
    };

    let command = match keyword.as_str() {
        "create-store" => {
            expect(1)?;
            Command::CreateStore { name: args[0].clone() }
        }
        "upload" => {
            if args.len() < 2 {
                return Err(invalid(
                    "upload expects a store name and at least one file".to_string(),
                ));
            }
            Command::Upload {
                store: args[0].clone(),
                files: args[1..].to_vec(),
            }
        }
        "delete-store" => {
            expect(1)?;
            Command::DeleteStore { name: args[0].clone() }
        }
        "empty-store" => {
            expect(1)?;
            Command::EmptyStore { name: args[0].clone() }
        }
        "list-stores" => {
            expect(0)?;
            Command::ListStores
        }
        "create-machine" => {
            expect(4)?;
            Command::CreateMachine {
                name: args[0].clone(),
                os: args[1].clone(),
                disk: args[2].clone(),
                ram: args[3].clone(),
            }
        }
        "start" => {
            expect(1)?;
            Command::Start { name: args[0].clone() }
        }
        "stop" => {
            expect(1)?;
            Command::Stop { name: args[0].clone() }
        }
        "list-machines" => {
            expect(0)?;
            Command::ListMachines
        }
        "used-memory" => {
            expect(1)?;
            Command::UsedMemory { name: args[0].clone() }
        }
        "used-disk" => {
            expect(1)?;
            Command::UsedDisk { name: args[0].clone() }
        }
        "global-used-disk" => {
            expect(0)?;
            Command::GlobalUsedDisk
        }
        "global-used-memory" => {
            expect(0)?;
            Command::GlobalUsedMemory
        }
        "report" => {
            expect(0)?;
            Command::Report
        }
        other => return Err(invalid(format!("unknown command: {}", other))),
    };

    Ok(Some(command))
}

/// Parse a whole script, stopping at the first malformed line
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        if let Some(command) = parse_line(line, raw)? {
            lines.push(ScriptLine { line, command });
        }
    }

    Ok(lines)
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let source = fs::read_to_string(path).map_err(|e| {
        RegistryError::Internal(format!("Failed to read script {}: {}", path.display(), e))
    })?;
    parse_script(&source)
}

/// Read a script from `path`, or from `stdin` when no path or `-` is given
pub fn read_script<R: Read>(path: Option<&str>, mut stdin: R) -> Result<Vec<ScriptLine>> {
    match path.filter(|p| *p != "-") {
        Some(path) => load_script(Path::new(path)),
        None => {
            let mut source = String::new();
            stdin.read_to_string(&mut source).map_err(|e| {
                RegistryError::Internal(format!("Failed to read script from stdin: {}", e))
            })?;
            parse_script(&source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"upload docs "annual report.pdf" notes.txt"#).unwrap(),
            vec!["upload", "docs", "annual report.pdf", "notes.txt"]
        );
        assert_eq!(tokenize("  start   machine1 ").unwrap(), vec!["start", "machine1"]);
        assert_eq!(tokenize(r#"upload docs """#).unwrap(), vec!["upload", "docs", ""]);
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        assert_eq!(tokenize(r#"upload s "a b"#), None);
        assert_eq!(tokenize(r#"upload s a"b"#), None);

        match parse_line(3, r#"upload s "a b"#) {
            Err(RegistryError::InvalidCommand { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("quote"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_skip_blank_and_comments() {
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(2, "   ").unwrap(), None);
        assert_eq!(parse_line(3, "# create-store x").unwrap(), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line(1, "create-machine machine1 Linux 50gb 8gb").unwrap(),
            Some(Command::CreateMachine {
                name: "machine1".to_string(),
                os: "Linux".to_string(),
                disk: "50gb".to_string(),
                ram: "8gb".to_string(),
            })
        );
        assert_eq!(
            parse_line(1, "upload myImages picture.jpeg profile.png").unwrap(),
            Some(Command::Upload {
                store: "myImages".to_string(),
                files: vec!["picture.jpeg".to_string(), "profile.png".to_string()],
            })
        );
        assert_eq!(parse_line(1, "list-stores").unwrap(), Some(Command::ListStores));
        assert_eq!(
            parse_line(1, "global-used-memory").unwrap(),
            Some(Command::GlobalUsedMemory)
        );
    }

    #[test]
    fn test_unknown_command() {
        match parse_line(7, "reboot machine1") {
            Err(RegistryError::InvalidCommand { line, message }) => {
                assert_eq!(line, 7);
                assert!(message.contains("reboot"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_argument_counts() {
        assert!(parse_line(1, "create-store").is_err());
        assert!(parse_line(1, "create-store a b").is_err());
        assert!(parse_line(1, "upload myImages").is_err());
        assert!(parse_line(1, "create-machine m1 Linux 50gb").is_err());
        assert!(parse_line(1, "list-machines now").is_err());
    }

    #[test]
    fn test_parse_script_line_numbers() {
        let source = "# setup\ncreate-store myFiles\n\nupload myFiles book.pdf\nlist-stores\n";
        let script = parse_script(source).unwrap();
        let lines: Vec<usize> = script.iter().map(|l| l.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
        assert_eq!(script[2].command.keyword(), "list-stores");
    }

    #[test]
    fn test_parse_script_reports_bad_line() {
        let err = parse_script("create-store a\nfly away\n").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCommand { line: 2, .. }));
    }

    #[test]
    fn test_load_script_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "create-store \"my files\"").unwrap();
        writeln!(file, "upload \"my files\" book.pdf").unwrap();
        file.flush().unwrap();

        let script = load_script(file.path()).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(
            script[1].command,
            Command::Upload {
                store: "my files".to_string(),
                files: vec!["book.pdf".to_string()],
            }
        );
    }

    #[test]
    fn test_load_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_script(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, RegistryError::Internal(_)));
    }

    #[test]
    fn test_read_script_from_stdin() {
        let stdin = "create-store myFiles\nlist-stores\n".as_bytes();
        let script = read_script(None, stdin).unwrap();
        assert_eq!(script.len(), 2);

        let dash = read_script(Some("-"), "list-machines\n".as_bytes()).unwrap();
        assert_eq!(dash[0].command, Command::ListMachines);
    }

    #[test]
    fn test_read_script_prefers_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "start machine1").unwrap();
        file.flush().unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let script = read_script(Some(path.as_str()), "list-stores\n".as_bytes()).unwrap();
        assert_eq!(
            script[0].command,
            Command::Start {
                name: "machine1".to_string()
            }
        );
    }

    #[test]
    fn test_read_script_parse_error() {
        let err = read_script(None, "create-store a\nboot a\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCommand { line: 2, .. }));
    }
}
