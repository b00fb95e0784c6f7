//! Execution result shapes

use serde::Serialize;
use serde_json::Value;

/// Result of a write statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteOutcome {
    pub success: bool,
    /// Id assigned by an insert, when the statement generates one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_id: Option<i64>,
    /// Records affected.
    pub changes: u64,
}

impl WriteOutcome {
    pub fn inserted(generated_id: i64) -> Self {
        Self {
            success: true,
            generated_id: Some(generated_id),
            changes: 1,
        }
    }

    pub fn changed(changes: u64) -> Self {
        Self {
            success: true,
            generated_id: None,
            changes,
        }
    }

    pub fn no_op() -> Self {
        Self::changed(0)
    }
}

/// Result of a multi-row read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRows {
    pub rows: Vec<Value>,
}

impl QueryRows {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
