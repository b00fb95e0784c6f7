//! Deterministic view ordering
//!
//! All sorts are stable total orders: the same input set always produces the
//! same output order. Weekday ordering follows the studio week (Lun, Mar,
//! Jue, Sab); times are zero-padded 24h `HH:MM`, so plain string comparison
//! orders them correctly.

use crate::store::{Session, Student};

use super::rows::JoinedRow;

/// Sorts projected views.
pub struct ViewSorter;

impl ViewSorter {
    /// Sessions by weekday, then time.
    pub fn sort_sessions(sessions: &mut [Session]) {
        sessions.sort_by(|a, b| {
            (a.weekday.ordinal(), &a.time).cmp(&(b.weekday.ordinal(), &b.time))
        });
    }

    /// Students by last name, then first name.
    pub fn sort_students(students: &mut [Student]) {
        students.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
    }

    /// Joined enrollment rows by weekday, time, then student last and first
    /// name.
    pub fn sort_joined(rows: &mut [JoinedRow]) {
        rows.sort_by(|a, b| {
            (
                a.session.weekday.ordinal(),
                &a.session.time,
                &a.student.last_name,
                &a.student.first_name,
            )
                .cmp(&(
                    b.session.weekday.ordinal(),
                    &b.session.time,
                    &b.student.last_name,
                    &b.student.first_name,
                ))
        });
    }
}
