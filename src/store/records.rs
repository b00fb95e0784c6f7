//! Record types for the three collections
//!
//! Wire-level names (column keys, weekday codes) are the ones the calling
//! layer puts in its statements; Rust-side names are the domain ones. Student
//! rows carry their contact value under a generation-dependent column, so row
//! construction for students is explicit rather than derived.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ContactGeneration;

/// Student column keys.
pub(crate) const FIELD_ID: &str = "id";
pub(crate) const FIELD_FIRST_NAME: &str = "nombre";
pub(crate) const FIELD_LAST_NAME: &str = "apellido";
pub(crate) const FIELD_JOIN_DATE: &str = "fecha_alta";
pub(crate) const FIELD_ACTIVE: &str = "activo";
/// Identifier column of the retired schema generation. Any row still carrying
/// it predates the contact-column change and is not repairable.
pub(crate) const FIELD_LEGACY_ID: &str = "dni";
/// Generation tag recorded on stored student rows.
pub(crate) const FIELD_GENERATION: &str = "schema_gen";

/// Weekday of a recurring session. The studio only runs on four days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Lun")]
    Monday,
    #[serde(rename = "Mar")]
    Tuesday,
    #[serde(rename = "Jue")]
    Thursday,
    #[serde(rename = "Sab")]
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 4] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Thursday,
        Weekday::Saturday,
    ];

    /// Parse a three-letter wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Lun" => Some(Weekday::Monday),
            "Mar" => Some(Weekday::Tuesday),
            "Jue" => Some(Weekday::Thursday),
            "Sab" => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Three-letter wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lun",
            Weekday::Tuesday => "Mar",
            Weekday::Thursday => "Jue",
            Weekday::Saturday => "Sab",
        }
    }

    /// Position in the weekly schedule, used for ordering.
    pub fn ordinal(&self) -> u8 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Thursday => 3,
            Weekday::Saturday => 4,
        }
    }
}

/// A student record in its current-generation shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Phone or email, depending on the configured generation.
    pub contact: String,
    /// Calendar date `YYYY-MM-DD`.
    pub join_date: String,
    pub active: bool,
}

impl Student {
    /// Row as the calling layer sees it. Built key by key because the
    /// contact column name depends on the generation.
    pub fn row(&self, generation: ContactGeneration) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert(FIELD_ID.to_string(), json!(self.id));
        obj.insert(FIELD_FIRST_NAME.to_string(), json!(self.first_name));
        obj.insert(FIELD_LAST_NAME.to_string(), json!(self.last_name));
        obj.insert(generation.contact_column().to_string(), json!(self.contact));
        obj.insert(FIELD_JOIN_DATE.to_string(), json!(self.join_date));
        obj.insert(FIELD_ACTIVE.to_string(), json!(self.active));
        Value::Object(obj)
    }

    /// Row as the store keeps it: the caller-visible row plus the
    /// generation tag consulted by load-time migration.
    pub(crate) fn stored_row(&self, generation: ContactGeneration) -> Value {
        let mut row = self.row(generation);
        if let Some(obj) = row.as_object_mut() {
            obj.insert(FIELD_GENERATION.to_string(), json!(generation.tag()));
        }
        row
    }

    /// Contact value normalized for uniqueness comparison.
    pub fn contact_key(&self) -> String {
        self.contact.trim().to_lowercase()
    }
}

/// Field values for a student insert, before defaults are applied.
#[derive(Debug, Clone)]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub contact: String,
    /// Defaults to today when absent.
    pub join_date: Option<String>,
    /// Defaults to true when absent.
    pub active: Option<bool>,
}

/// A recurring weekly class slot. The (`weekday`, `time`) pair is unique
/// across the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    #[serde(rename = "dia")]
    pub weekday: Weekday,
    /// Zero-padded 24h `HH:MM`.
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "nombre")]
    pub label: String,
}

impl Session {
    pub fn row(&self) -> Value {
        serde_json::to_value(self).expect("session row serialization cannot fail")
    }
}

/// A student's registration for a session. Keyed by the
/// (`student_id`, `session_id`) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(rename = "usuario_id")]
    pub student_id: i64,
    #[serde(rename = "clase_id")]
    pub session_id: i64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl Enrollment {
    pub fn row(&self) -> Value {
        serde_json::to_value(self).expect("enrollment row serialization cannot fail")
    }
}
