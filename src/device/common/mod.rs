// Common utilities for device modules: command execution and fallback-safe
// value parsing.

pub mod command_executor;
pub mod parsers;

pub use command_executor::{capture_first_line, CommandLauncher, CommandSpec, DetachedLauncher};
