//! Output module for reporting run progress
//!
//! This module handles:
//! - The `OutputHandler` trait the engine reports through
//! - Console rendering with per-status emoji
//! - A silent handler for tests and library use

mod console;
mod traits;

pub use console::{outcome_message, status_summary_lines, ConsoleOutput};
pub use traits::{NullOutput, OutputHandler};
