//! Audit log engine for audit-trail
//!
//! Appends create, update, delete and related-entity events to a single
//! serialized log value and parses it back into entries.
//!
//! # Architecture
//!
//! - `LogCodec`: load/render contract with the shared append logic. Every
//!   append parses the whole existing value, pushes one entry stamped with
//!   the current UTC time, and renders the whole log again.
//! - `XmlCodec` / `JsonCodec`: the two stored formats.
//! - `AuditTrail`: picks the codec. New logs use the configured default
//!   format, existing logs keep the format sniffed from their text.
//! - `collect_changes`: builds update field changes from entity snapshots.
//!
//! Unreadable stored values never fail an append or a parse. Appends start
//! a new log, parses return no entries, and both emit a `tracing` warning.
//!
//! # Example
//!
//! ```rust
//! use audit_trail::audit::AuditTrail;
//! use audit_trail::models::{FieldChange, LogFormat};
//!
//! let trail = AuditTrail::new(LogFormat::Json);
//! let log = trail.append_create(None, "alice")?;
//! let log = trail.append_update(
//!     Some(&log),
//!     &[FieldChange::update("Price", Some("10".into()), Some("20".into()))],
//!     "bob",
//! )?;
//! assert_eq!(trail.parse(Some(&log)).len(), 2);
//! # Ok::<(), audit_trail::AuditError>(())
//! ```

mod codec;
mod diff;
mod json;
mod trail;
mod xml;

pub use codec::{detect_format, LogCodec};
pub use diff::{collect_changes, collect_values, summarize_changes};
pub use json::JsonCodec;
pub use trail::{codec, AuditTrail};
pub use xml::XmlCodec;
