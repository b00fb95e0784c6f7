//! Student-row repair and schema-generation migration
//!
//! The student collection may contain rows written under earlier,
//! incompatible schema shapes. Migration runs once per load and settles
//! generation questions; the normalizer runs on every store access and
//! guarantees that only well-formed current-generation records are ever
//! returned. Discards are silent toward callers (logged, never raised).

mod migration;
mod normalizer;

pub use migration::{migrate_rows, MigrationReport};
pub use normalizer::{today_utc, Normalizer};
