//! Utility modules.

/// Log sanitization utilities to keep contact data out of logs.
pub mod log_sanitizer;
