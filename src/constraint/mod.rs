//! Relational invariant enforcement
//!
//! The hosted backend guarantees these through UNIQUE constraints, foreign
//! keys, and application triggers; the stand-in enforces them here, before
//! any mutation, with a typed rejection per violation kind.

mod engine;
mod errors;

pub use engine::ConstraintEngine;
pub use errors::{CapacityDetails, ConstraintError, ConstraintErrorCode, ConstraintResult};
