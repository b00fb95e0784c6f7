//! studiodb CLI
//!
//! Developer tooling around the engine:
//! - shell: line-oriented JSON statement loop over a process-lifetime engine
//! - seed: populate the weekly schedule plus randomized students
//! - exec: one statement, then exit

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Mode};
pub use commands::run;
pub use errors::{ShellError, ShellResult};
