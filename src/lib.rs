//! audit-trail - Append-only entity audit logs stored as JSON or XML
//!
//! Each audited entity keeps its whole history in one serialized value.
//! This library appends create, update, delete and related-entity events
//! to that value and parses it back into structured entries. It performs
//! no I/O on the log itself: the caller reads the existing value, asks for
//! the appended value, and stores it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Entries, field changes, formats and canonical field values
//! - `audit`: The two log codecs, the format-preserving `AuditTrail`, and
//!   snapshot diffing
//! - `display`: Terminal formatting of parsed entries
//! - `cli`: Command handlers for the `audit-trail` binary
//!
//! # Example
//!
//! ```rust
//! use audit_trail::audit::AuditTrail;
//! use audit_trail::models::{AuditAction, LogFormat};
//!
//! let trail = AuditTrail::new(LogFormat::Xml);
//! let log = trail.append_create(None, "alice")?;
//! let log = trail.append_delete(Some(&log), "bob")?;
//!
//! let actions: Vec<AuditAction> = trail.parse(Some(&log)).iter().map(|e| e.action).collect();
//! assert_eq!(actions, vec![AuditAction::Created, AuditAction::Deleted]);
//! # Ok::<(), audit_trail::AuditError>(())
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;

pub use audit::AuditTrail;
pub use error::{AuditError, AuditResult};
