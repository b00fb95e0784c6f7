//! Process-resident record store
//!
//! Owns the three collections (students, sessions, enrollments) for the life
//! of the process. Student rows are held in raw JSON form so that data
//! written under earlier schema generations stays representable until the
//! normalizer repairs it; sessions and enrollments only ever enter through
//! validated inserts and are typed.

mod records;
mod store;

pub use records::{Enrollment, Session, Student, StudentDraft, Weekday};
pub use store::StudioStore;

pub(crate) use records::{
    FIELD_ACTIVE, FIELD_FIRST_NAME, FIELD_GENERATION, FIELD_ID, FIELD_JOIN_DATE,
    FIELD_LAST_NAME, FIELD_LEGACY_ID,
};
