//! Audit log CLI commands
//!
//! Implements commands that append to and inspect a serialized log value
//! kept in a file (or piped through stdin for read-only commands).

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::audit::{detect_format, AuditTrail};
use crate::display::format_entry_list;
use crate::error::{AuditError, AuditResult};
use crate::models::{FieldChange, RelatedAction};

/// Where the existing log value comes from and where the new one goes
#[derive(Args, Debug, Clone)]
pub struct LogTarget {
    /// File holding the existing log value (a missing file starts a new log)
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Write the new value back to the log file instead of stdout
    #[arg(short, long, requires = "log")]
    pub write: bool,

    /// Identity recorded on the entry
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Append a Created entry
    Create {
        #[command(flatten)]
        target: LogTarget,
    },
    /// Append an Updated entry
    Update {
        #[command(flatten)]
        target: LogTarget,
        /// Field change, repeatable (either side may be empty)
        #[arg(short, long = "change", value_name = "NAME=BEFORE->AFTER", required = true)]
        changes: Vec<String>,
    },
    /// Append a Deleted entry
    Delete {
        #[command(flatten)]
        target: LogTarget,
    },
    /// Append an Added or Removed entry for a related entity
    Related {
        #[command(flatten)]
        target: LogTarget,
        /// added or removed
        #[arg(short, long)]
        action: RelatedAction,
        /// Related entity type name
        #[arg(short, long)]
        related: String,
        /// Related field value, repeatable
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Print the entries of a log
    Parse {
        /// Log file (reads stdin when omitted)
        log: Option<PathBuf>,
        /// Print entries as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the format of a stored log (xml or json)
    Detect {
        /// Log file (reads stdin when omitted)
        log: Option<PathBuf>,
    },
}

/// Handle a log command
pub fn handle_log_command(trail: &AuditTrail, cmd: LogCommands) -> AuditResult<()> {
    match cmd {
        LogCommands::Create { target } => {
            let existing = read_existing(target.log.as_deref())?;
            let user = trail.resolve_user(target.user.as_deref());
            let log = trail.append_create(existing.as_deref(), &user)?;
            emit(&target, &log)
        }
        LogCommands::Update { target, changes } => {
            let changes = changes
                .iter()
                .map(|spec| parse_change(spec))
                .collect::<AuditResult<Vec<_>>>()?;
            let existing = read_existing(target.log.as_deref())?;
            let user = trail.resolve_user(target.user.as_deref());
            let log = trail.append_update(existing.as_deref(), &changes, &user)?;
            emit(&target, &log)
        }
        LogCommands::Delete { target } => {
            let existing = read_existing(target.log.as_deref())?;
            let user = trail.resolve_user(target.user.as_deref());
            let log = trail.append_delete(existing.as_deref(), &user)?;
            emit(&target, &log)
        }
        LogCommands::Related {
            target,
            action,
            related,
            fields,
        } => {
            let fields = fields
                .iter()
                .map(|spec| parse_field(spec))
                .collect::<AuditResult<Vec<_>>>()?;
            let existing = read_existing(target.log.as_deref())?;
            let user = trail.resolve_user(target.user.as_deref());
            let log =
                trail.append_related(existing.as_deref(), action, &related, &fields, &user)?;
            emit(&target, &log)
        }
        LogCommands::Parse { log, json } => {
            let existing = read_input(log.as_deref())?;
            let entries = trail.parse(Some(&existing));
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", format_entry_list(&entries));
                if entries.is_empty() {
                    println!();
                }
            }
            Ok(())
        }
        LogCommands::Detect { log } => {
            let existing = read_input(log.as_deref())?;
            if existing.trim().is_empty() {
                println!("{}", trail.default_format());
            } else {
                println!("{}", detect_format(&existing));
            }
            Ok(())
        }
    }
}

/// Parse `NAME=BEFORE->AFTER`; an empty side is absent
pub fn parse_change(spec: &str) -> AuditResult<FieldChange> {
    let invalid = || {
        AuditError::InvalidArgument(format!(
            "invalid change '{}', expected NAME=BEFORE->AFTER",
            spec
        ))
    };

    let (name, values) = spec.split_once('=').ok_or_else(invalid)?;
    let (before, after) = values.split_once("->").ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }

    Ok(FieldChange::update(name, present(before), present(after)))
}

/// Parse `NAME=VALUE`; an empty value is absent
pub fn parse_field(spec: &str) -> AuditResult<FieldChange> {
    let invalid =
        || AuditError::InvalidArgument(format!("invalid field '{}', expected NAME=VALUE", spec));

    let (name, value) = spec.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }

    Ok(FieldChange::related(name, present(value)))
}

fn present(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Read the existing value of an append target; a missing file is no log
fn read_existing(path: Option<&Path>) -> AuditResult<Option<String>> {
    match path {
        Some(path) if path.exists() => std::fs::read_to_string(path)
            .map(Some)
            .map_err(|e| AuditError::Io(format!("Failed to read {}: {}", path.display(), e))),
        _ => Ok(None),
    }
}

/// Read a log for inspection from a file or stdin
fn read_input(path: Option<&Path>) -> AuditResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| AuditError::Io(format!("Failed to read {}: {}", path.display(), e))),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AuditError::Io(format!("Failed to read stdin: {}", e)))?;
            Ok(buffer)
        }
    }
}

fn emit(target: &LogTarget, log: &str) -> AuditResult<()> {
    match (&target.log, target.write) {
        (Some(path), true) => std::fs::write(path, log)
            .map_err(|e| AuditError::Io(format!("Failed to write {}: {}", path.display(), e))),
        _ => {
            println!("{}", log);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_change() {
        let change = parse_change("Price=10->20").unwrap();
        assert_eq!(change.name, "Price");
        assert_eq!(change.before.as_deref(), Some("10"));
        assert_eq!(change.after.as_deref(), Some("20"));

        let added = parse_change("Note=->hello").unwrap();
        assert_eq!(added.before, None);
        assert_eq!(added.after.as_deref(), Some("hello"));

        let with_equals = parse_change("Formula=a=b->c=d").unwrap();
        assert_eq!(with_equals.before.as_deref(), Some("a=b"));
        assert_eq!(with_equals.after.as_deref(), Some("c=d"));
    }

    #[test]
    fn test_parse_change_rejects_bad_syntax() {
        assert!(parse_change("Price").is_err());
        assert!(parse_change("Price=10").is_err());
        assert!(parse_change("=1->2").is_err());
    }

    #[test]
    fn test_parse_field() {
        let field = parse_field("Tag=Gaming").unwrap();
        assert_eq!(field.name, "Tag");
        assert_eq!(field.value.as_deref(), Some("Gaming"));
        assert_eq!(parse_field("Tag=").unwrap().value, None);
        assert!(parse_field("Tag").is_err());
    }

    #[test]
    fn test_read_existing_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("absent.log");
        assert_eq!(read_existing(Some(&missing)).unwrap(), None);
        assert_eq!(read_existing(None).unwrap(), None);
    }
}
