//! Display formatting for terminal output
//!
//! Provides utilities for formatting parsed audit logs for terminal display.

pub mod entry;

pub use entry::{format_entry_details, format_entry_field, format_entry_list, format_field_change};
