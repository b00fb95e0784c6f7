//! Pre-mutation constraint checks
//!
//! Every check runs against the current store state and completes before the
//! first mutation of the statement, so a rejected write leaves the
//! collections untouched.

use std::sync::OnceLock;

use regex::Regex;

use crate::store::{StudentDraft, StudioStore, Weekday};

use super::errors::{ConstraintError, ConstraintResult};

fn time_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time pattern"))
}

/// Validates writes against the relational invariants.
pub struct ConstraintEngine<'a> {
    store: &'a StudioStore,
}

impl<'a> ConstraintEngine<'a> {
    pub fn new(store: &'a StudioStore) -> Self {
        Self { store }
    }

    /// Student insert: required fields must be non-blank; under a
    /// unique-contact generation the contact value must be unused.
    pub fn check_student_insert(&self, draft: &StudentDraft) -> ConstraintResult<()> {
        self.check_student_fields(
            &draft.first_name,
            &draft.last_name,
            &draft.contact,
        )?;
        if self.store.config().generation.contact_is_unique() {
            let key = draft.contact.trim().to_lowercase();
            if self.store.students().iter().any(|s| s.contact_key() == key) {
                return Err(ConstraintError::duplicate_contact(draft.contact.trim()));
            }
        }
        Ok(())
    }

    /// Student update: same field requirements as insert; the record itself
    /// is exempt from the contact uniqueness check.
    pub fn check_student_update(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        contact: &str,
    ) -> ConstraintResult<()> {
        self.check_student_fields(first_name, last_name, contact)?;
        if self.store.config().generation.contact_is_unique() {
            let key = contact.trim().to_lowercase();
            if self
                .store
                .students()
                .iter()
                .any(|s| s.id != id && s.contact_key() == key)
            {
                return Err(ConstraintError::duplicate_contact(contact.trim()));
            }
        }
        Ok(())
    }

    /// Session insert: weekday must be one of the four studio days, time a
    /// zero-padded 24h `HH:MM`, and the (weekday, time) slot unused.
    pub fn check_session_insert(&self, weekday: &str, time: &str) -> ConstraintResult<Weekday> {
        let day = Weekday::from_code(weekday.trim())
            .ok_or_else(|| ConstraintError::validation_failed("dia"))?;
        let time = time.trim();
        if !time_pattern().is_match(time) {
            return Err(ConstraintError::validation_failed("hora"));
        }
        if self
            .store
            .sessions()
            .iter()
            .any(|s| s.weekday == day && s.time == time)
        {
            return Err(ConstraintError::duplicate_slot(day.code(), time));
        }
        Ok(day)
    }

    /// Enrollment insert, checked in order: the student must exist, must be
    /// active, the pair must be new, and the session must have room.
    pub fn check_enrollment_insert(
        &self,
        student_id: i64,
        session_id: i64,
    ) -> ConstraintResult<()> {
        let student = self
            .store
            .student_by_id(student_id)
            .ok_or_else(|| ConstraintError::reference_missing(student_id))?;

        if !student.active {
            return Err(ConstraintError::inactive_student(student_id));
        }

        if self.store.find_enrollment(student_id, session_id).is_some() {
            return Err(ConstraintError::duplicate_enrollment(student_id, session_id));
        }

        let max = self.store.config().session_capacity;
        let current = self.store.enrollment_count_for_session(session_id);
        if current >= max {
            return Err(ConstraintError::capacity_exceeded(max, current));
        }

        Ok(())
    }

    fn check_student_fields(
        &self,
        first_name: &str,
        last_name: &str,
        contact: &str,
    ) -> ConstraintResult<()> {
        if first_name.trim().is_empty() {
            return Err(ConstraintError::validation_failed("nombre"));
        }
        if last_name.trim().is_empty() {
            return Err(ConstraintError::validation_failed("apellido"));
        }
        if contact.trim().is_empty() {
            return Err(ConstraintError::validation_failed(
                self.store.config().generation.contact_column(),
            ));
        }
        Ok(())
    }
}
