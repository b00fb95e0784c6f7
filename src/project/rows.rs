//! Row construction for projected views

use serde_json::{json, Value};

use crate::config::ContactGeneration;
use crate::store::{Enrollment, Session, Student};

/// An enrollment joined to its parents, pre-serialization.
#[derive(Debug, Clone)]
pub struct JoinedRow {
    pub enrollment: Enrollment,
    pub student: Student,
    pub session: Session,
}

impl JoinedRow {
    /// The joined row shape: the enrollment's own columns plus the student's
    /// name fields and contact, and the session's slot and label. Built key
    /// by key because the contact column name depends on the generation.
    pub fn row(&self, generation: ContactGeneration) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("usuario_id".to_string(), json!(self.enrollment.student_id));
        obj.insert("clase_id".to_string(), json!(self.enrollment.session_id));
        obj.insert("created_at".to_string(), json!(self.enrollment.created_at));
        obj.insert("nombre".to_string(), json!(self.student.first_name));
        obj.insert("apellido".to_string(), json!(self.student.last_name));
        obj.insert(
            generation.contact_column().to_string(),
            json!(self.student.contact),
        );
        obj.insert("dia".to_string(), json!(self.session.weekday.code()));
        obj.insert("hora".to_string(), json!(self.session.time));
        obj.insert("clase_nombre".to_string(), json!(self.session.label));
        Value::Object(obj)
    }
}

/// A `COUNT(*)` result row.
pub fn count_row(count: usize) -> Value {
    json!({ "count": count })
}
