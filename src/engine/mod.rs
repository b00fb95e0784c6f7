//! Engine facade
//!
//! The surface the calling layer sees, shaped like the hosted database
//! driver: prepare a statement, optionally bind positional parameters, then
//! execute with `first`, `all`, or `run`. One engine instance per process
//! owns the store; every caller in the process shares it.

mod engine;
mod errors;
mod outcome;
mod statement;

pub use engine::Engine;
pub use errors::{EngineError, EngineResult};
pub use outcome::{QueryRows, WriteOutcome};
pub use statement::Statement;
