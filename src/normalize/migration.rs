//! One-time generation migration for loaded student rows
//!
//! Every stored row carries a `schema_gen` tag. Rows arriving through the
//! load path are settled here once, instead of re-inferring their generation
//! on every read:
//! - rows carrying the retired identifier column are dropped outright;
//! - rows tagged with a different generation have no lossless upgrade path
//!   (a phone number cannot become an email) and are dropped;
//! - untagged rows are assumed to be current-shape and tagged.

use serde_json::{json, Value};

use crate::config::ContactGeneration;
use crate::store::{FIELD_GENERATION, FIELD_LEGACY_ID};

/// Outcome of a migration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Rows inspected.
    pub scanned: usize,
    /// Rows dropped as retired or non-upgradable.
    pub dropped: usize,
}

impl MigrationReport {
    pub fn retained(&self) -> usize {
        self.scanned - self.dropped
    }
}

/// Migrate rows in place to the configured generation.
pub fn migrate_rows(rows: &mut Vec<Value>, generation: ContactGeneration) -> MigrationReport {
    let scanned = rows.len();

    rows.retain(|row| match row.as_object() {
        Some(obj) => {
            if obj.contains_key(FIELD_LEGACY_ID) {
                return false;
            }
            match obj.get(FIELD_GENERATION).and_then(Value::as_u64) {
                Some(tag) => tag == generation.tag(),
                None => true,
            }
        }
        None => false,
    });

    for row in rows.iter_mut() {
        if let Some(obj) = row.as_object_mut() {
            obj.entry(FIELD_GENERATION.to_string())
                .or_insert_with(|| json!(generation.tag()));
        }
    }

    MigrationReport {
        scanned,
        dropped: scanned - rows.len(),
    }
}
