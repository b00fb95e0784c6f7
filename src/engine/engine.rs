//! Engine core
//!
//! Dispatch path: clean the store on touch, classify the statement text into
//! a typed command, then either validate-and-mutate (writes) or project
//! (reads). Validation completes before the first mutation, so a rejected
//! statement leaves the collections exactly as they were.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::constraint::ConstraintEngine;
use crate::observability::Logger;
use crate::project::ResultProjector;
use crate::statement::{Command, StatementClassifier};
use crate::store::{Enrollment, StudioStore};

use super::errors::EngineResult;
use super::outcome::{QueryRows, WriteOutcome};
use super::statement::Statement;

fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The statement engine. One instance per process stands in for the hosted
/// database; all callers share it and see the same collections.
#[derive(Debug)]
pub struct Engine {
    store: StudioStore,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            store: StudioStore::new(config),
        }
    }

    /// Prepare a statement for later execution.
    pub fn prepare(&mut self, sql: impl Into<String>) -> Statement<'_> {
        Statement::new(self, sql.into())
    }

    /// Prepare with parameters supplied up front. Equivalent to
    /// `prepare(sql).bind(params)`.
    pub fn prepare_bound(&mut self, sql: impl Into<String>, params: Vec<Value>) -> Statement<'_> {
        self.prepare(sql).bind(params)
    }

    pub fn store(&self) -> &StudioStore {
        &self.store
    }

    /// Seed raw student rows (tests, imports). Migration and normalization
    /// apply as they would to any loaded data.
    pub fn load_student_rows(&mut self, rows: Vec<Value>) {
        self.store.load_student_rows(rows);
    }

    pub(crate) fn execute_first(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> EngineResult<Option<Value>> {
        let command = self.classify(sql, params)?;
        Ok(self.read_first(&command))
    }

    pub(crate) fn execute_all(&mut self, sql: &str, params: &[Value]) -> EngineResult<QueryRows> {
        let command = self.classify(sql, params)?;
        Ok(QueryRows::new(self.read_rows(&command)))
    }

    pub(crate) fn execute_run(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> EngineResult<WriteOutcome> {
        let command = self.classify(sql, params)?;
        if !command.is_write() {
            // A read executed as a write is an execution-style mismatch, not
            // an unknown statement; it affects nothing.
            return Ok(WriteOutcome::no_op());
        }
        match self.apply_write(command) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                Logger::warn("WRITE_REJECTED", &[("code", err.code())]);
                Err(err)
            }
        }
    }

    fn classify(&mut self, sql: &str, params: &[Value]) -> EngineResult<Command> {
        self.store.touch();
        let command = StatementClassifier::classify(sql, params).map_err(|err| {
            Logger::warn("STATEMENT_REJECTED", &[("code", err.code().code())]);
            err
        })?;
        Logger::trace("STATEMENT_DISPATCHED", &[("statement", sql.trim())]);
        Ok(command)
    }

    fn apply_write(&mut self, command: Command) -> EngineResult<WriteOutcome> {
        match command {
            Command::InsertStudent(draft) => {
                ConstraintEngine::new(&self.store).check_student_insert(&draft)?;
                let id = self.store.insert_student(&draft);
                Ok(WriteOutcome::inserted(id))
            }
            Command::InsertSession {
                weekday,
                time,
                label,
            } => {
                let day = ConstraintEngine::new(&self.store)
                    .check_session_insert(&weekday, &time)?;
                let label = label
                    .unwrap_or_else(|| self.store.config().default_session_label.clone());
                let id = self
                    .store
                    .insert_session(day, time.trim().to_string(), label);
                Ok(WriteOutcome::inserted(id))
            }
            Command::InsertEnrollment {
                student_id,
                session_id,
                created_at,
            } => {
                ConstraintEngine::new(&self.store)
                    .check_enrollment_insert(student_id, session_id)?;
                self.store.insert_enrollment(Enrollment {
                    student_id,
                    session_id,
                    created_at: created_at.unwrap_or_else(now_utc),
                });
                Ok(WriteOutcome::changed(1))
            }
            Command::UpdateStudent {
                id,
                first_name,
                last_name,
                contact,
                join_date,
                active,
            } => {
                ConstraintEngine::new(&self.store)
                    .check_student_update(id, &first_name, &last_name, &contact)?;
                let changes = self.store.update_student(
                    id,
                    &first_name,
                    &last_name,
                    &contact,
                    &join_date,
                    active,
                );
                Ok(WriteOutcome::changed(changes))
            }
            Command::SetStudentActive { id, active } => {
                Ok(WriteOutcome::changed(self.store.set_student_active(id, active)))
            }
            Command::DeleteStudent { id } => {
                Ok(WriteOutcome::changed(self.store.delete_students(id)))
            }
            Command::DeleteSession { id } => {
                Ok(WriteOutcome::changed(self.store.delete_sessions(id)))
            }
            Command::DeleteEnrollment {
                student_id,
                session_id,
            } => Ok(WriteOutcome::changed(
                self.store.delete_enrollment(student_id, session_id),
            )),
            // Reads never reach here; execute_run filters them first.
            _ => Ok(WriteOutcome::no_op()),
        }
    }

    fn read_first(&self, command: &Command) -> Option<Value> {
        let projector = ResultProjector::new(&self.store);
        match command {
            Command::FindStudent { id } => projector.student_by_id(*id),
            Command::FindSession { id } => projector.session_by_id(*id),
            Command::FindEnrollment {
                student_id,
                session_id,
            } => projector.enrollment_by_key(*student_id, *session_id),
            Command::CountStudents => Some(projector.count_students()),
            Command::CountSessions => Some(projector.count_sessions()),
            Command::CountEnrollments => Some(projector.count_enrollments()),
            Command::CountEnrollmentsForSession { session_id } => {
                Some(projector.count_enrollments_for_session(*session_id))
            }
            _ if command.is_write() => None,
            _ => self.read_rows(command).into_iter().next(),
        }
    }

    fn read_rows(&self, command: &Command) -> Vec<Value> {
        let projector = ResultProjector::new(&self.store);
        match command {
            Command::ListStudents { ordered } => projector.students(*ordered),
            Command::ListSessions { ordered } => projector.sessions(*ordered),
            Command::ListEnrollments => projector.enrollments(),
            Command::ListEnrollmentsJoined(selection) => projector.enrollments_joined(selection),
            Command::FindStudent { .. }
            | Command::FindSession { .. }
            | Command::FindEnrollment { .. }
            | Command::CountStudents
            | Command::CountSessions
            | Command::CountEnrollments
            | Command::CountEnrollmentsForSession { .. } => {
                self.read_first(command).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
