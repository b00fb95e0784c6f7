//! Student-row normalizer
//!
//! Validation and repair pass applied to the student collection on every
//! store access, in order:
//! 1. drop rows carrying the retired identifier column;
//! 2. trim name and contact fields, drop rows where any ends up empty;
//! 3. drop rows whose contact value is date-shaped, or (email generation)
//!    fails the email pattern;
//! 4. email generation only: deduplicate on the normalized contact key,
//!    keeping the first-seen row;
//! 5. coerce the active flag: explicit `0`/`false` means false, anything
//!    else (including absent) means true.
//!
//! The pass is idempotent: cleaning its own output drops nothing further.

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use serde_json::Value;

use crate::config::ContactGeneration;
use crate::store::{
    Student, FIELD_ACTIVE, FIELD_FIRST_NAME, FIELD_ID, FIELD_JOIN_DATE, FIELD_LAST_NAME,
    FIELD_LEGACY_ID,
};

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

/// Today's calendar date, `YYYY-MM-DD`.
pub fn today_utc() -> String {
    Utc::now().date_naive().to_string()
}

/// Validates and repairs raw student rows into current-generation records.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    generation: ContactGeneration,
}

impl Normalizer {
    pub fn new(generation: ContactGeneration) -> Self {
        Self { generation }
    }

    /// Validate a single raw row. `None` means the row is not a member of the
    /// collection under the current schema.
    pub fn normalize_row(&self, row: &Value) -> Option<Student> {
        let obj = row.as_object()?;

        if obj.contains_key(FIELD_LEGACY_ID) {
            return None;
        }

        let id = obj.get(FIELD_ID)?.as_i64().filter(|id| *id > 0)?;

        let first_name = trimmed_string(obj.get(FIELD_FIRST_NAME))?;
        let last_name = trimmed_string(obj.get(FIELD_LAST_NAME))?;
        let contact = trimmed_string(obj.get(self.generation.contact_column()))?;

        // A date where a contact value belongs is a sign of column drift in
        // the writing code path, not a repairable value.
        if date_pattern().is_match(&contact) {
            return None;
        }
        if self.generation == ContactGeneration::Email && !email_pattern().is_match(&contact) {
            return None;
        }

        let join_date = match obj.get(FIELD_JOIN_DATE).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => today_utc(),
        };

        Some(Student {
            id,
            first_name,
            last_name,
            contact,
            join_date,
            active: coerce_active(obj.get(FIELD_ACTIVE)),
        })
    }

    /// Normalized view of the whole collection, deduplicated when the
    /// contact column is a uniqueness key.
    pub fn normalize_all(&self, rows: &[Value]) -> Vec<Student> {
        let mut seen: HashSet<String> = HashSet::new();
        rows.iter()
            .filter_map(|row| self.normalize_row(row))
            .filter(|student| {
                if self.generation.contact_is_unique() {
                    seen.insert(student.contact_key())
                } else {
                    true
                }
            })
            .collect()
    }

    /// Clean the collection in place, rewriting surviving rows in canonical
    /// form. Returns how many rows were discarded.
    pub fn clean(&self, rows: &mut Vec<Value>) -> usize {
        let students = self.normalize_all(rows);
        let dropped = rows.len() - students.len();
        *rows = students
            .iter()
            .map(|s| s.stored_row(self.generation))
            .collect();
        dropped
    }
}

/// The active flag as written by assorted code paths: SQL integers, JSON
/// booleans, or nothing at all.
pub(crate) fn coerce_active(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        _ => true,
    }
}

fn trimmed_string(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn email_row(id: i64, email: &str) -> Value {
        json!({
            "id": id,
            "nombre": "Ana",
            "apellido": "García",
            "email": email,
            "fecha_alta": "2024-05-01",
            "activo": true,
        })
    }

    #[test]
    fn test_valid_row_passes() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        let student = normalizer.normalize_row(&email_row(1, "ana@example.com")).unwrap();
        assert_eq!(student.id, 1);
        assert_eq!(student.contact, "ana@example.com");
        assert!(student.active);
    }

    #[test]
    fn test_legacy_identifier_row_is_dropped() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        let mut row = email_row(1, "ana@example.com");
        row["dni"] = json!("12345678");
        assert!(normalizer.normalize_row(&row).is_none());
    }

    #[test]
    fn test_blank_fields_are_dropped() {
        let normalizer = Normalizer::new(ContactGeneration::Email);

        let mut row = email_row(1, "ana@example.com");
        row["nombre"] = json!("   ");
        assert!(normalizer.normalize_row(&row).is_none());

        let mut row = email_row(1, "ana@example.com");
        row["apellido"] = json!("");
        assert!(normalizer.normalize_row(&row).is_none());

        let mut row = email_row(1, "   ");
        row["email"] = json!("   ");
        assert!(normalizer.normalize_row(&row).is_none());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        let mut row = email_row(1, " ana@example.com ");
        row["nombre"] = json!("  Ana ");
        let student = normalizer.normalize_row(&row).unwrap();
        assert_eq!(student.first_name, "Ana");
        assert_eq!(student.contact, "ana@example.com");
    }

    #[test]
    fn test_date_shaped_contact_is_dropped() {
        let normalizer = Normalizer::new(ContactGeneration::Phone);
        let row = json!({
            "id": 1,
            "nombre": "Ana",
            "apellido": "García",
            "telefono": "2024-05-01",
        });
        assert!(normalizer.normalize_row(&row).is_none());
    }

    #[test]
    fn test_email_generation_requires_email_shape() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        assert!(normalizer.normalize_row(&email_row(1, "not-an-email")).is_none());
        assert!(normalizer.normalize_row(&email_row(1, "a@b")).is_none());
        assert!(normalizer.normalize_row(&email_row(1, "a@b.com")).is_some());
    }

    #[test]
    fn test_phone_generation_accepts_free_form() {
        let normalizer = Normalizer::new(ContactGeneration::Phone);
        let row = json!({
            "id": 1,
            "nombre": "Ana",
            "apellido": "García",
            "telefono": "+54 11 1234-5678",
        });
        assert!(normalizer.normalize_row(&row).is_some());
    }

    #[test]
    fn test_missing_id_is_dropped() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        let row = json!({"nombre": "Ana", "apellido": "García", "email": "a@b.com"});
        assert!(normalizer.normalize_row(&row).is_none());

        let mut row = email_row(0, "a@b.com");
        row["id"] = json!(0);
        assert!(normalizer.normalize_row(&row).is_none());
    }

    #[test]
    fn test_active_coercion() {
        assert!(coerce_active(None));
        assert!(coerce_active(Some(&json!(null))));
        assert!(coerce_active(Some(&json!(true))));
        assert!(coerce_active(Some(&json!(1))));
        assert!(coerce_active(Some(&json!(7))));
        assert!(!coerce_active(Some(&json!(false))));
        assert!(!coerce_active(Some(&json!(0))));
    }

    #[test]
    fn test_missing_join_date_defaults_to_today() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        let mut row = email_row(1, "a@b.com");
        row.as_object_mut().unwrap().remove("fecha_alta");
        let student = normalizer.normalize_row(&row).unwrap();
        assert_eq!(student.join_date, today_utc());
    }

    #[test]
    fn test_dedupe_keeps_first_seen() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        let rows = vec![
            email_row(1, "ana@example.com"),
            email_row(2, "ANA@example.com "),
            email_row(3, "other@example.com"),
        ];
        let students = normalizer.normalize_all(&rows);
        let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_phone_generation_does_not_dedupe() {
        let normalizer = Normalizer::new(ContactGeneration::Phone);
        let row = |id: i64| {
            json!({
                "id": id,
                "nombre": "Ana",
                "apellido": "García",
                "telefono": "+54 11 1234-5678",
            })
        };
        let students = normalizer.normalize_all(&[row(1), row(2)]);
        assert_eq!(students.len(), 2);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let normalizer = Normalizer::new(ContactGeneration::Email);
        let mut rows = vec![
            email_row(1, "ana@example.com"),
            email_row(2, "ana@example.com"),
            json!({"id": 3, "dni": "123", "nombre": "X", "apellido": "Y"}),
            json!({"id": 4, "nombre": "", "apellido": "Z", "email": "z@b.com"}),
        ];

        let first = normalizer.clean(&mut rows);
        assert_eq!(first, 3);
        let snapshot = rows.clone();

        let second = normalizer.clean(&mut rows);
        assert_eq!(second, 0);
        assert_eq!(rows, snapshot);
    }
}
