//! Read-side materialization
//!
//! Turns the collections into the row sets the statement shapes ask for:
//! plain scans, the joined enrollment view, equality filters, counts, and
//! the deterministic orderings. Rows referencing a missing (or normalized
//! away) parent are excluded whole, never partially populated.

mod projector;
mod rows;
mod sorter;

pub use projector::ResultProjector;
pub use rows::{count_row, JoinedRow};
pub use sorter::ViewSorter;
