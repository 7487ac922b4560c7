//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Process execution and output capture
//! - `io` - File I/O with consistent error handling
//! - `normalize` - Cell value cleanup and rating conversions
//! - `shell` - Shell quoting and credential redaction
//! - `template` - `{{name}}` placeholder rendering
//! - `validation` - Input validation helpers

pub mod command;
pub mod io;
pub mod normalize;
pub mod shell;
pub mod template;
pub mod validation;
