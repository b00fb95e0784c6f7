//! Typed statement commands
//!
//! The closed repertoire the engine executes. Each variant corresponds to
//! one statement template the calling layer issues; the classifier is the
//! only producer.

use crate::store::StudentDraft;

/// Filters and ordering of the joined enrollment view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinSelection {
    /// Restrict to one student.
    pub student_id: Option<i64>,
    /// Restrict to one session.
    pub session_id: Option<i64>,
    /// `Some(true)` keeps active students only, `Some(false)` inactive only.
    pub active: Option<bool>,
    /// Apply the weekday/time/name ordering.
    pub ordered: bool,
}

/// A classified statement with its parameters bound.
#[derive(Debug, Clone)]
pub enum Command {
    InsertStudent(StudentDraft),
    InsertSession {
        weekday: String,
        time: String,
        label: Option<String>,
    },
    InsertEnrollment {
        student_id: i64,
        session_id: i64,
        created_at: Option<String>,
    },
    UpdateStudent {
        id: i64,
        first_name: String,
        last_name: String,
        contact: String,
        join_date: String,
        active: Option<bool>,
    },
    SetStudentActive {
        id: i64,
        active: bool,
    },
    DeleteStudent {
        id: i64,
    },
    DeleteSession {
        id: i64,
    },
    DeleteEnrollment {
        student_id: i64,
        session_id: i64,
    },
    FindStudent {
        id: i64,
    },
    FindSession {
        id: i64,
    },
    FindEnrollment {
        student_id: i64,
        session_id: i64,
    },
    ListStudents {
        ordered: bool,
    },
    ListSessions {
        ordered: bool,
    },
    ListEnrollments,
    ListEnrollmentsJoined(JoinSelection),
    CountStudents,
    CountSessions,
    CountEnrollments,
    CountEnrollmentsForSession {
        session_id: i64,
    },
}

impl Command {
    /// True for commands that mutate the store.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::InsertStudent(_)
                | Command::InsertSession { .. }
                | Command::InsertEnrollment { .. }
                | Command::UpdateStudent { .. }
                | Command::SetStudentActive { .. }
                | Command::DeleteStudent { .. }
                | Command::DeleteSession { .. }
                | Command::DeleteEnrollment { .. }
        )
    }
}
