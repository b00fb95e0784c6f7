//! Structured logging for the engine
//!
//! The engine is embedded, so observability stays minimal: synchronous JSON
//! log lines with deterministic field ordering and a process-wide minimum
//! level. No metrics, no spans.

mod logger;

pub use logger::{set_min_level, Logger, Severity};
