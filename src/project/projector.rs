//! View materialization over the store

use serde_json::Value;

use crate::statement::JoinSelection;
use crate::store::StudioStore;

use super::rows::{count_row, JoinedRow};
use super::sorter::ViewSorter;

/// Materializes the row sets the read statements ask for.
pub struct ResultProjector<'a> {
    store: &'a StudioStore,
}

impl<'a> ResultProjector<'a> {
    pub fn new(store: &'a StudioStore) -> Self {
        Self { store }
    }

    pub fn students(&self, ordered: bool) -> Vec<Value> {
        let mut students = self.store.students();
        if ordered {
            ViewSorter::sort_students(&mut students);
        }
        let generation = self.store.config().generation;
        students.iter().map(|s| s.row(generation)).collect()
    }

    pub fn student_by_id(&self, id: i64) -> Option<Value> {
        let generation = self.store.config().generation;
        self.store.student_by_id(id).map(|s| s.row(generation))
    }

    pub fn sessions(&self, ordered: bool) -> Vec<Value> {
        let mut sessions = self.store.sessions().to_vec();
        if ordered {
            ViewSorter::sort_sessions(&mut sessions);
        }
        sessions.iter().map(|s| s.row()).collect()
    }

    pub fn session_by_id(&self, id: i64) -> Option<Value> {
        self.store.session_by_id(id).map(|s| s.row())
    }

    pub fn enrollments(&self) -> Vec<Value> {
        self.store.enrollments().iter().map(|e| e.row()).collect()
    }

    pub fn enrollment_by_key(&self, student_id: i64, session_id: i64) -> Option<Value> {
        self.store
            .find_enrollment(student_id, session_id)
            .map(|e| e.row())
    }

    /// The joined enrollment view. A row whose student or session no longer
    /// exists (including students excluded by normalization) is dropped, not
    /// partially populated.
    pub fn enrollments_joined(&self, selection: &JoinSelection) -> Vec<Value> {
        let students = self.store.students();
        let generation = self.store.config().generation;

        let mut rows: Vec<JoinedRow> = self
            .store
            .enrollments()
            .iter()
            .filter_map(|enrollment| {
                let student = students
                    .iter()
                    .find(|s| s.id == enrollment.student_id)?
                    .clone();
                let session = self.store.session_by_id(enrollment.session_id)?.clone();
                Some(JoinedRow {
                    enrollment: enrollment.clone(),
                    student,
                    session,
                })
            })
            .filter(|row| match selection.active {
                Some(true) => row.student.active,
                Some(false) => !row.student.active,
                None => true,
            })
            .filter(|row| {
                selection
                    .student_id
                    .map_or(true, |id| row.enrollment.student_id == id)
            })
            .filter(|row| {
                selection
                    .session_id
                    .map_or(true, |id| row.enrollment.session_id == id)
            })
            .collect();

        if selection.ordered {
            ViewSorter::sort_joined(&mut rows);
        }

        rows.iter().map(|r| r.row(generation)).collect()
    }

    pub fn count_students(&self) -> Value {
        count_row(self.store.student_count())
    }

    pub fn count_sessions(&self) -> Value {
        count_row(self.store.session_count())
    }

    pub fn count_enrollments(&self) -> Value {
        count_row(self.store.enrollment_count())
    }

    pub fn count_enrollments_for_session(&self, session_id: i64) -> Value {
        count_row(self.store.enrollment_count_for_session(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::{Enrollment, StudentDraft, Weekday};

    fn draft(first: &str, last: &str, contact: &str) -> StudentDraft {
        StudentDraft {
            first_name: first.into(),
            last_name: last.into(),
            contact: contact.into(),
            join_date: Some("2024-05-01".into()),
            active: None,
        }
    }

    fn enrollment(student_id: i64, session_id: i64) -> Enrollment {
        Enrollment {
            student_id,
            session_id,
            created_at: "2024-05-01T10:00:00Z".into(),
        }
    }

    fn seeded_store() -> (StudioStore, i64, i64, i64, i64) {
        let mut store = StudioStore::new(EngineConfig::default());
        let ana = store.insert_student(&draft("Ana", "García", "ana@example.com"));
        let juan = store.insert_student(&draft("Juan", "Pérez", "juan@example.com"));
        let monday = store.insert_session(Weekday::Monday, "19:00".into(), "Yoga".into());
        let saturday = store.insert_session(Weekday::Saturday, "09:30".into(), "Yoga".into());
        store.insert_enrollment(enrollment(ana, saturday));
        store.insert_enrollment(enrollment(juan, monday));
        store.insert_enrollment(enrollment(ana, monday));
        (store, ana, juan, monday, saturday)
    }

    #[test]
    fn test_joined_rows_carry_both_parents() {
        let (store, ana, _, _, saturday) = seeded_store();
        let projector = ResultProjector::new(&store);
        let rows = projector.enrollments_joined(&JoinSelection {
            student_id: Some(ana),
            session_id: Some(saturday),
            ..JoinSelection::default()
        });
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nombre"], "Ana");
        assert_eq!(rows[0]["dia"], "Sab");
        assert_eq!(rows[0]["clase_nombre"], "Yoga");
    }

    #[test]
    fn test_joined_rows_drop_missing_parents() {
        let (mut store, _, juan, monday, _) = seeded_store();
        store.delete_sessions(monday);
        let projector = ResultProjector::new(&store);
        let rows = projector.enrollments_joined(&JoinSelection::default());
        // Monday enrollments lost their session; only the Saturday row stays.
        assert_eq!(rows.len(), 1);
        assert_ne!(rows[0]["usuario_id"], juan);
    }

    #[test]
    fn test_active_filter_both_ways() {
        let (mut store, ana, juan, ..) = seeded_store();
        store.set_student_active(ana, false);
        let projector = ResultProjector::new(&store);

        let active = projector.enrollments_joined(&JoinSelection {
            active: Some(true),
            ..JoinSelection::default()
        });
        assert!(active.iter().all(|r| r["usuario_id"] == juan));

        let inactive = projector.enrollments_joined(&JoinSelection {
            active: Some(false),
            ..JoinSelection::default()
        });
        assert_eq!(inactive.len(), 2);
        assert!(inactive.iter().all(|r| r["usuario_id"] == ana));
    }

    #[test]
    fn test_joined_ordering() {
        let (store, ..) = seeded_store();
        let projector = ResultProjector::new(&store);
        let rows = projector.enrollments_joined(&JoinSelection {
            ordered: true,
            ..JoinSelection::default()
        });
        let days: Vec<&str> = rows.iter().map(|r| r["dia"].as_str().unwrap()).collect();
        assert_eq!(days, vec!["Lun", "Lun", "Sab"]);
        // Monday tie broken by last name: García before Pérez.
        assert_eq!(rows[0]["apellido"], "García");
        assert_eq!(rows[1]["apellido"], "Pérez");
    }

    #[test]
    fn test_session_ordering_matches_week() {
        let mut store = StudioStore::new(EngineConfig::default());
        store.insert_session(Weekday::Saturday, "09:30".into(), "Yoga".into());
        store.insert_session(Weekday::Monday, "19:00".into(), "Yoga".into());
        store.insert_session(Weekday::Tuesday, "10:00".into(), "Yoga".into());

        let projector = ResultProjector::new(&store);
        let rows = projector.sessions(true);
        let slots: Vec<(String, String)> = rows
            .iter()
            .map(|r| {
                (
                    r["dia"].as_str().unwrap().to_string(),
                    r["hora"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            slots,
            vec![
                ("Lun".to_string(), "19:00".to_string()),
                ("Mar".to_string(), "10:00".to_string()),
                ("Sab".to_string(), "09:30".to_string()),
            ]
        );
    }

    #[test]
    fn test_student_list_ordering() {
        let (store, ..) = seeded_store();
        let projector = ResultProjector::new(&store);
        let rows = projector.students(true);
        assert_eq!(rows[0]["apellido"], "García");
        assert_eq!(rows[1]["apellido"], "Pérez");
    }

    #[test]
    fn test_counts() {
        let (store, _, _, monday, _) = seeded_store();
        let projector = ResultProjector::new(&store);
        assert_eq!(projector.count_students()["count"], 2);
        assert_eq!(projector.count_sessions()["count"], 2);
        assert_eq!(projector.count_enrollments()["count"], 3);
        assert_eq!(projector.count_enrollments_for_session(monday)["count"], 2);
    }

    #[test]
    fn test_missing_lookups_are_none() {
        let (store, ..) = seeded_store();
        let projector = ResultProjector::new(&store);
        assert!(projector.student_by_id(999).is_none());
        assert!(projector.session_by_id(999).is_none());
        assert!(projector.enrollment_by_key(999, 999).is_none());
    }
}
