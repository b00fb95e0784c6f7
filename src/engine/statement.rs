//! Prepared statements
//!
//! A prepared statement borrows the engine mutably, which encodes the
//! execution model in the type system: exactly one statement is in flight at
//! a time and runs to completion before the next is prepared.

use serde_json::Value;

use crate::statement::params;

use super::engine::Engine;
use super::errors::EngineResult;
use super::outcome::{QueryRows, WriteOutcome};

/// A statement text with (optionally) bound parameters.
#[derive(Debug)]
pub struct Statement<'e> {
    engine: &'e mut Engine,
    sql: String,
    params: Vec<Value>,
}

impl<'e> Statement<'e> {
    pub(crate) fn new(engine: &'e mut Engine, sql: String) -> Self {
        Self {
            engine,
            sql,
            params: Vec::new(),
        }
    }

    /// Bind positional parameters. A single array argument is treated as the
    /// whole parameter list, so callers may pass either style.
    pub fn bind(mut self, args: Vec<Value>) -> Self {
        self.params = params::flatten(args);
        self
    }

    /// Execute and return the first matching row, or None for no match.
    pub fn first(self) -> EngineResult<Option<Value>> {
        self.engine.execute_first(&self.sql, &self.params)
    }

    /// Execute and return all matching rows.
    pub fn all(self) -> EngineResult<QueryRows> {
        self.engine.execute_all(&self.sql, &self.params)
    }

    /// Execute as a write and return the outcome.
    pub fn run(self) -> EngineResult<WriteOutcome> {
        self.engine.execute_run(&self.sql, &self.params)
    }
}
