//! Constraint violation errors
//!
//! Every rejection is a routine business outcome for the caller to phrase,
//! not an engine failure; all carry enough structure (kind, ids, counts) to
//! build a precise user-facing message.
//!
//! Error codes:
//! - STUDIO_VALIDATION_FAILED
//! - STUDIO_DUPLICATE_SLOT
//! - STUDIO_DUPLICATE_ENROLLMENT
//! - STUDIO_DUPLICATE_CONTACT
//! - STUDIO_REFERENCE_MISSING
//! - STUDIO_INACTIVE_STUDENT
//! - STUDIO_CAPACITY_EXCEEDED

use std::fmt;

/// Constraint violation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintErrorCode {
    /// Required field missing or blank.
    ValidationFailed,
    /// A session with the same (weekday, time) already exists.
    DuplicateSlot,
    /// The (student, session) pair is already enrolled.
    DuplicateEnrollment,
    /// Another student already uses this contact value.
    DuplicateContact,
    /// The referenced student does not exist.
    ReferenceMissing,
    /// The referenced student exists but is deactivated.
    InactiveStudent,
    /// The session already holds the maximum number of enrollments.
    CapacityExceeded,
}

impl ConstraintErrorCode {
    /// Stable string code for boundary formatting.
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintErrorCode::ValidationFailed => "STUDIO_VALIDATION_FAILED",
            ConstraintErrorCode::DuplicateSlot => "STUDIO_DUPLICATE_SLOT",
            ConstraintErrorCode::DuplicateEnrollment => "STUDIO_DUPLICATE_ENROLLMENT",
            ConstraintErrorCode::DuplicateContact => "STUDIO_DUPLICATE_CONTACT",
            ConstraintErrorCode::ReferenceMissing => "STUDIO_REFERENCE_MISSING",
            ConstraintErrorCode::InactiveStudent => "STUDIO_INACTIVE_STUDENT",
            ConstraintErrorCode::CapacityExceeded => "STUDIO_CAPACITY_EXCEEDED",
        }
    }
}

impl fmt::Display for ConstraintErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Capacity numbers carried on a `CapacityExceeded` rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityDetails {
    /// Configured per-session maximum.
    pub max: usize,
    /// Enrollments currently held by the session.
    pub current: usize,
}

/// A rejected write.
#[derive(Debug, Clone)]
pub struct ConstraintError {
    code: ConstraintErrorCode,
    message: String,
    capacity: Option<CapacityDetails>,
}

impl ConstraintError {
    pub fn validation_failed(field: &str) -> Self {
        Self {
            code: ConstraintErrorCode::ValidationFailed,
            message: format!("required field '{}' is missing or invalid", field),
            capacity: None,
        }
    }

    pub fn duplicate_slot(weekday: &str, time: &str) -> Self {
        Self {
            code: ConstraintErrorCode::DuplicateSlot,
            message: format!("a session already exists at {} {}", weekday, time),
            capacity: None,
        }
    }

    pub fn duplicate_enrollment(student_id: i64, session_id: i64) -> Self {
        Self {
            code: ConstraintErrorCode::DuplicateEnrollment,
            message: format!(
                "student {} is already enrolled in session {}",
                student_id, session_id
            ),
            capacity: None,
        }
    }

    pub fn duplicate_contact(contact: &str) -> Self {
        Self {
            code: ConstraintErrorCode::DuplicateContact,
            message: format!("contact '{}' is already in use", contact),
            capacity: None,
        }
    }

    pub fn reference_missing(student_id: i64) -> Self {
        Self {
            code: ConstraintErrorCode::ReferenceMissing,
            message: format!("student {} does not exist", student_id),
            capacity: None,
        }
    }

    pub fn inactive_student(student_id: i64) -> Self {
        Self {
            code: ConstraintErrorCode::InactiveStudent,
            message: format!("student {} is deactivated and cannot be enrolled", student_id),
            capacity: None,
        }
    }

    pub fn capacity_exceeded(max: usize, current: usize) -> Self {
        Self {
            code: ConstraintErrorCode::CapacityExceeded,
            message: format!(
                "session is full ({} of {} enrollments)",
                current, max
            ),
            capacity: Some(CapacityDetails { max, current }),
        }
    }

    pub fn code(&self) -> ConstraintErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Capacity numbers, present on `CapacityExceeded` only.
    pub fn capacity(&self) -> Option<CapacityDetails> {
        self.capacity
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ConstraintError {}

/// Result type for constraint checks.
pub type ConstraintResult<T> = Result<T, ConstraintError>;
