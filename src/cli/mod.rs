//! Command-line interface: argument parsing and command execution.

mod executor;
mod parser;

pub use executor::{Roster, execute};
pub use parser::{Cli, Commands};
