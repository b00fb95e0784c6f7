//! Engine configuration
//!
//! Plain construction-time settings for an embedded engine instance. There is
//! no file or environment loading here: the engine is linked into the calling
//! process and configured explicitly.

/// Schema generation of the student contact column.
///
/// The collection changed contact shape once: records written by the earlier
/// generation carry a phone number under `telefono`, the current generation
/// carries a unique `email`. The engine enforces format and uniqueness rules
/// only for the generation it is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactGeneration {
    /// Earlier generation: free-form phone number, no uniqueness.
    Phone,
    /// Current generation: email address, unique per student.
    Email,
}

impl ContactGeneration {
    /// Column name the contact value is stored under.
    pub fn contact_column(&self) -> &'static str {
        match self {
            ContactGeneration::Phone => "telefono",
            ContactGeneration::Email => "email",
        }
    }

    /// Numeric tag recorded on stored rows for load-time migration.
    pub fn tag(&self) -> u64 {
        match self {
            ContactGeneration::Phone => 1,
            ContactGeneration::Email => 2,
        }
    }

    /// Whether the contact column is a uniqueness key.
    pub fn contact_is_unique(&self) -> bool {
        matches!(self, ContactGeneration::Email)
    }
}

/// Configuration for a studiodb engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Active contact schema generation.
    pub generation: ContactGeneration,
    /// Maximum concurrent enrollments per session.
    pub session_capacity: usize,
    /// Label assigned to sessions created without one.
    pub default_session_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation: ContactGeneration::Email,
            session_capacity: 35,
            default_session_label: "Yoga".to_string(),
        }
    }
}

impl EngineConfig {
    /// Config for data written by the earlier phone-contact generation.
    pub fn phone_generation() -> Self {
        Self {
            generation: ContactGeneration::Phone,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.generation, ContactGeneration::Email);
        assert_eq!(config.session_capacity, 35);
        assert_eq!(config.default_session_label, "Yoga");
    }

    #[test]
    fn test_contact_columns() {
        assert_eq!(ContactGeneration::Phone.contact_column(), "telefono");
        assert_eq!(ContactGeneration::Email.contact_column(), "email");
    }

    #[test]
    fn test_uniqueness_is_generation_bound() {
        assert!(ContactGeneration::Email.contact_is_unique());
        assert!(!ContactGeneration::Phone.contact_is_unique());
    }

    #[test]
    fn test_generation_tags_are_distinct() {
        assert_ne!(
            ContactGeneration::Phone.tag(),
            ContactGeneration::Email.tag()
        );
    }
}
