//! Top-level engine errors
//!
//! A statement fails either because its shape is outside the repertoire
//! (statement error) or because the write it asks for would violate a
//! relational invariant (constraint rejection). Both surface synchronously
//! to the immediate caller.

use std::fmt;

use crate::constraint::{CapacityDetails, ConstraintError};
use crate::statement::StatementError;

/// Error returned from statement execution.
#[derive(Debug)]
pub enum EngineError {
    /// A write was rejected by a relational invariant.
    Constraint(ConstraintError),
    /// The statement itself was refused.
    Statement(StatementError),
}

impl EngineError {
    /// Stable string code for boundary formatting.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Constraint(e) => e.code().code(),
            EngineError::Statement(e) => e.code().code(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            EngineError::Constraint(e) => e.message(),
            EngineError::Statement(e) => e.message(),
        }
    }

    /// Capacity numbers when the rejection was a full session.
    pub fn capacity(&self) -> Option<CapacityDetails> {
        match self {
            EngineError::Constraint(e) => e.capacity(),
            EngineError::Statement(_) => None,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Constraint(e) => write!(f, "{}", e),
            EngineError::Statement(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Constraint(e) => Some(e),
            EngineError::Statement(e) => Some(e),
        }
    }
}

impl From<ConstraintError> for EngineError {
    fn from(e: ConstraintError) -> Self {
        EngineError::Constraint(e)
    }
}

impl From<StatementError> for EngineError {
    fn from(e: StatementError) -> Self {
        EngineError::Statement(e)
    }
}

/// Result type for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;
