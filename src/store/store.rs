//! The store proper
//!
//! One instance per process, owned by the engine and shared by every caller.
//! No isolation between logical callers and no persistence beyond process
//! lifetime: this is a local stand-in for the hosted database, and separately
//! running instances deliberately do not share state.

use serde_json::Value;

use crate::config::EngineConfig;
use crate::normalize::{migrate_rows, today_utc, Normalizer};
use crate::observability::Logger;

use super::records::{
    Enrollment, Session, Student, StudentDraft, Weekday, FIELD_ACTIVE, FIELD_FIRST_NAME, FIELD_ID,
    FIELD_JOIN_DATE, FIELD_LAST_NAME,
};

/// Mutable state behind the engine: the three collections.
#[derive(Debug)]
pub struct StudioStore {
    config: EngineConfig,
    /// Raw student rows; repaired on every touch.
    students: Vec<Value>,
    sessions: Vec<Session>,
    enrollments: Vec<Enrollment>,
}

impl StudioStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            students: Vec::new(),
            sessions: Vec::new(),
            enrollments: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.config.generation)
    }

    /// Clean-on-touch: repair the student collection before any read or
    /// write is served. Cleaning on reads too means rows written by a stale
    /// code path are repaired the next time anything looks.
    pub fn touch(&mut self) -> usize {
        let dropped = self.normalizer().clean(&mut self.students);
        if dropped > 0 {
            let count = dropped.to_string();
            Logger::warn(
                "ROWS_DROPPED",
                &[("collection", "usuario"), ("dropped", count.as_str())],
            );
        }
        dropped
    }

    /// Load raw student rows (seed path). Rows from retired schema
    /// generations are migrated out before they enter the collection.
    pub fn load_student_rows(&mut self, mut rows: Vec<Value>) {
        let report = migrate_rows(&mut rows, self.config.generation);
        if report.dropped > 0 {
            let count = report.dropped.to_string();
            Logger::warn(
                "ROWS_DROPPED",
                &[
                    ("collection", "usuario"),
                    ("dropped", count.as_str()),
                    ("phase", "migration"),
                ],
            );
        }
        self.students.extend(rows);
    }

    // ------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------

    /// Normalized view of the student collection.
    pub fn students(&self) -> Vec<Student> {
        self.normalizer().normalize_all(&self.students)
    }

    pub fn student_by_id(&self, id: i64) -> Option<Student> {
        self.students().into_iter().find(|s| s.id == id)
    }

    pub fn student_count(&self) -> usize {
        self.students().len()
    }

    /// Append a student, assigning `max(existing ids) + 1`.
    pub fn insert_student(&mut self, draft: &StudentDraft) -> i64 {
        let next_id = self
            .students()
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            + 1;

        let student = Student {
            id: next_id,
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            contact: draft.contact.trim().to_string(),
            join_date: draft
                .join_date
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(today_utc),
            active: draft.active.unwrap_or(true),
        };

        self.students.push(student.stored_row(self.config.generation));
        next_id
    }

    /// Replace a student's mutable fields in place. Reports zero changes
    /// when no record matches.
    pub fn update_student(
        &mut self,
        id: i64,
        first_name: &str,
        last_name: &str,
        contact: &str,
        join_date: &str,
        active: Option<bool>,
    ) -> u64 {
        let contact_column = self.config.generation.contact_column();
        for row in self.students.iter_mut() {
            let Some(obj) = row.as_object_mut() else {
                continue;
            };
            if obj.get(FIELD_ID).and_then(Value::as_i64) != Some(id) {
                continue;
            }
            obj.insert(FIELD_FIRST_NAME.into(), Value::from(first_name.trim()));
            obj.insert(FIELD_LAST_NAME.into(), Value::from(last_name.trim()));
            obj.insert(contact_column.into(), Value::from(contact.trim()));
            obj.insert(FIELD_JOIN_DATE.into(), Value::from(join_date.trim()));
            if let Some(active) = active {
                obj.insert(FIELD_ACTIVE.into(), Value::from(active));
            }
            return 1;
        }
        0
    }

    pub fn set_student_active(&mut self, id: i64, active: bool) -> u64 {
        for row in self.students.iter_mut() {
            let Some(obj) = row.as_object_mut() else {
                continue;
            };
            if obj.get(FIELD_ID).and_then(Value::as_i64) == Some(id) {
                obj.insert(FIELD_ACTIVE.into(), Value::from(active));
                return 1;
            }
        }
        0
    }

    pub fn delete_students(&mut self, id: i64) -> u64 {
        let before = self.students.len();
        self.students.retain(|row| {
            row.get(FIELD_ID).and_then(Value::as_i64) != Some(id)
        });
        (before - self.students.len()) as u64
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn session_by_id(&self, id: i64) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn insert_session(&mut self, weekday: Weekday, time: String, label: String) -> i64 {
        let next_id = self.sessions.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        self.sessions.push(Session {
            id: next_id,
            weekday,
            time,
            label,
        });
        next_id
    }

    pub fn delete_sessions(&mut self, id: i64) -> u64 {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        (before - self.sessions.len()) as u64
    }

    // ------------------------------------------------------------------
    // Enrollments
    // ------------------------------------------------------------------

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn find_enrollment(&self, student_id: i64, session_id: i64) -> Option<&Enrollment> {
        self.enrollments
            .iter()
            .find(|e| e.student_id == student_id && e.session_id == session_id)
    }

    pub fn enrollment_count(&self) -> usize {
        self.enrollments.len()
    }

    pub fn enrollment_count_for_session(&self, session_id: i64) -> usize {
        self.enrollments
            .iter()
            .filter(|e| e.session_id == session_id)
            .count()
    }

    pub fn insert_enrollment(&mut self, enrollment: Enrollment) {
        self.enrollments.push(enrollment);
    }

    pub fn delete_enrollment(&mut self, student_id: i64, session_id: i64) -> u64 {
        let before = self.enrollments.len();
        self.enrollments
            .retain(|e| !(e.student_id == student_id && e.session_id == session_id));
        (before - self.enrollments.len()) as u64
    }
}
