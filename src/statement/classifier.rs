//! Statement shape classifier
//!
//! Recognizes which template a statement text is by testing for the
//! keywords, table names, and clause markers that distinguish the shapes in
//! the repertoire, then binds parameters by position. Matching is on
//! substrings, not grammar: the repertoire is closed and the templates are
//! mutually distinguishable by these markers.

use serde_json::Value;

use crate::store::StudentDraft;

use super::command::{Command, JoinSelection};
use super::errors::{StatementError, StatementResult};
use super::params;

/// Classifies statement texts into typed commands.
pub struct StatementClassifier;

impl StatementClassifier {
    /// Classify a statement and bind its parameters.
    pub fn classify(sql: &str, params: &[Value]) -> StatementResult<Command> {
        if sql.contains("INSERT INTO") {
            Self::classify_insert(sql, params)
        } else if sql.contains("UPDATE") {
            Self::classify_update(sql, params)
        } else if sql.contains("DELETE FROM") {
            Self::classify_delete(sql, params)
        } else if sql.contains("SELECT") {
            Self::classify_select(sql, params)
        } else {
            Err(StatementError::unsupported(sql))
        }
    }

    fn classify_insert(sql: &str, p: &[Value]) -> StatementResult<Command> {
        if sql.contains("INSERT INTO usuario") {
            // (nombre, apellido, contact, fecha_alta[, activo])
            return Ok(Command::InsertStudent(StudentDraft {
                first_name: params::text_at(p, 0)?,
                last_name: params::text_at(p, 1)?,
                contact: params::text_at(p, 2)?,
                join_date: params::opt_text_at(p, 3),
                active: params::opt_bool_at(p, 4),
            }));
        }
        if sql.contains("INSERT INTO clase") {
            return Ok(Command::InsertSession {
                weekday: params::text_at(p, 0)?,
                time: params::text_at(p, 1)?,
                label: params::opt_text_at(p, 2),
            });
        }
        if sql.contains("INSERT INTO reserva") {
            return Ok(Command::InsertEnrollment {
                student_id: params::int_at(p, 0)?,
                session_id: params::int_at(p, 1)?,
                created_at: params::opt_text_at(p, 2),
            });
        }
        Err(StatementError::unsupported(sql))
    }

    fn classify_update(sql: &str, p: &[Value]) -> StatementResult<Command> {
        if !sql.contains("UPDATE usuario") || !sql.contains("WHERE id = ?") {
            return Err(StatementError::unsupported(sql));
        }
        if sql.contains("SET activo = ?") {
            return Ok(Command::SetStudentActive {
                active: params::bool_at(p, 0)?,
                id: params::int_at(p, 1)?,
            });
        }
        // Full update: nombre, apellido, contact, fecha_alta[, activo], id.
        // The id is always the last parameter.
        let (active, id_index) = if p.len() >= 6 {
            (params::opt_bool_at(p, 4), 5)
        } else {
            (None, 4)
        };
        Ok(Command::UpdateStudent {
            first_name: params::text_at(p, 0)?,
            last_name: params::text_at(p, 1)?,
            contact: params::text_at(p, 2)?,
            join_date: params::text_at(p, 3)?,
            active,
            id: params::int_at(p, id_index)?,
        })
    }

    fn classify_delete(sql: &str, p: &[Value]) -> StatementResult<Command> {
        if sql.contains("DELETE FROM usuario") && sql.contains("id = ?") {
            return Ok(Command::DeleteStudent {
                id: params::int_at(p, 0)?,
            });
        }
        if sql.contains("DELETE FROM clase") && sql.contains("id = ?") {
            return Ok(Command::DeleteSession {
                id: params::int_at(p, 0)?,
            });
        }
        if sql.contains("DELETE FROM reserva")
            && sql.contains("usuario_id = ?")
            && sql.contains("clase_id = ?")
        {
            return Ok(Command::DeleteEnrollment {
                student_id: params::int_at(p, 0)?,
                session_id: params::int_at(p, 1)?,
            });
        }
        Err(StatementError::unsupported(sql))
    }

    fn classify_select(sql: &str, p: &[Value]) -> StatementResult<Command> {
        if sql.contains("COUNT(*)") {
            return Self::classify_count(sql, p);
        }
        if sql.contains("FROM reserva") {
            return Self::classify_enrollment_select(sql, p);
        }
        if sql.contains("FROM usuario") {
            if sql.contains("WHERE") && sql.contains("id = ?") {
                return Ok(Command::FindStudent {
                    id: params::int_at(p, 0)?,
                });
            }
            return Ok(Command::ListStudents {
                ordered: sql.contains("ORDER BY apellido, nombre"),
            });
        }
        if sql.contains("FROM clase") {
            if sql.contains("WHERE") && sql.contains("id = ?") {
                return Ok(Command::FindSession {
                    id: params::int_at(p, 0)?,
                });
            }
            return Ok(Command::ListSessions {
                ordered: sql.contains("ORDER BY dia, hora"),
            });
        }
        Err(StatementError::unsupported(sql))
    }

    fn classify_count(sql: &str, p: &[Value]) -> StatementResult<Command> {
        if sql.contains("FROM reserva") {
            if sql.contains("WHERE") && sql.contains("clase_id = ?") {
                return Ok(Command::CountEnrollmentsForSession {
                    session_id: params::int_at(p, 0)?,
                });
            }
            return Ok(Command::CountEnrollments);
        }
        if sql.contains("FROM clase") {
            return Ok(Command::CountSessions);
        }
        if sql.contains("FROM usuario") {
            return Ok(Command::CountStudents);
        }
        Err(StatementError::unsupported(sql))
    }

    fn classify_enrollment_select(sql: &str, p: &[Value]) -> StatementResult<Command> {
        let joined = sql.contains("JOIN usuario") || sql.contains("JOIN clase");

        if !joined {
            if sql.contains("WHERE")
                && sql.contains("usuario_id = ?")
                && sql.contains("clase_id = ?")
                && sql.contains("AND")
            {
                return Ok(Command::FindEnrollment {
                    student_id: params::int_at(p, 0)?,
                    session_id: params::int_at(p, 1)?,
                });
            }
            return Ok(Command::ListEnrollments);
        }

        let mut selection = JoinSelection {
            ordered: sql.contains("ORDER BY c.dia, c.hora"),
            ..JoinSelection::default()
        };

        if sql.contains("WHERE") {
            if sql.contains("activo = 1") {
                selection.active = Some(true);
            } else if sql.contains("activo = 0") {
                selection.active = Some(false);
            }
        }

        // Optional equality filters share the parameter list; which `?` feeds
        // which filter follows from how many placeholders precede it in the
        // statement text.
        if let Some(idx) = bound_param_index(sql, "usuario_id = ?") {
            selection.student_id = Some(params::int_at(p, idx)?);
        }
        if let Some(idx) = bound_param_index(sql, "clase_id = ?") {
            selection.session_id = Some(params::int_at(p, idx)?);
        }

        Ok(Command::ListEnrollmentsJoined(selection))
    }
}

/// Position of the `?` inside `needle` within the statement's overall
/// placeholder sequence, or None when the marker does not occur.
fn bound_param_index(sql: &str, needle: &str) -> Option<usize> {
    let at = sql.find(needle)?;
    Some(sql[..at].matches('?').count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_student_shape() {
        let cmd = StatementClassifier::classify(
            "INSERT INTO usuario (nombre, apellido, email, fecha_alta) VALUES (?, ?, ?, ?)",
            &[json!("Ana"), json!("García"), json!("a@b.com"), json!("2024-05-01")],
        )
        .unwrap();
        match cmd {
            Command::InsertStudent(draft) => {
                assert_eq!(draft.first_name, "Ana");
                assert_eq!(draft.join_date.as_deref(), Some("2024-05-01"));
                assert_eq!(draft.active, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_insert_session_default_label() {
        let cmd = StatementClassifier::classify(
            "INSERT INTO clase (dia, hora, nombre) VALUES (?, ?, ?)",
            &[json!("Mar"), json!("10:00")],
        )
        .unwrap();
        match cmd {
            Command::InsertSession { weekday, time, label } => {
                assert_eq!(weekday, "Mar");
                assert_eq!(time, "10:00");
                assert_eq!(label, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_set_active_shape() {
        let cmd = StatementClassifier::classify(
            "UPDATE usuario SET activo = ? WHERE id = ?",
            &[json!(0), json!(7)],
        )
        .unwrap();
        match cmd {
            Command::SetStudentActive { id, active } => {
                assert_eq!(id, 7);
                assert!(!active);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_full_update_with_and_without_active() {
        let sql = "UPDATE usuario SET nombre = ?, apellido = ?, email = ?, fecha_alta = ? WHERE id = ?";
        let cmd = StatementClassifier::classify(
            sql,
            &[json!("Ana"), json!("García"), json!("a@b.com"), json!("2024-05-01"), json!(3)],
        )
        .unwrap();
        match cmd {
            Command::UpdateStudent { id, active, .. } => {
                assert_eq!(id, 3);
                assert_eq!(active, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let sql = "UPDATE usuario SET nombre = ?, apellido = ?, email = ?, fecha_alta = ?, activo = ? WHERE id = ?";
        let cmd = StatementClassifier::classify(
            sql,
            &[json!("Ana"), json!("García"), json!("a@b.com"), json!("2024-05-01"), json!(1), json!(3)],
        )
        .unwrap();
        match cmd {
            Command::UpdateStudent { id, active, .. } => {
                assert_eq!(id, 3);
                assert_eq!(active, Some(true));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_delete_shapes() {
        assert!(matches!(
            StatementClassifier::classify("DELETE FROM usuario WHERE id = ?", &[json!(1)]).unwrap(),
            Command::DeleteStudent { id: 1 }
        ));
        assert!(matches!(
            StatementClassifier::classify("DELETE FROM clase WHERE id = ?", &[json!(2)]).unwrap(),
            Command::DeleteSession { id: 2 }
        ));
        assert!(matches!(
            StatementClassifier::classify(
                "DELETE FROM reserva WHERE usuario_id = ? AND clase_id = ?",
                &[json!(1), json!(2)],
            )
            .unwrap(),
            Command::DeleteEnrollment { student_id: 1, session_id: 2 }
        ));
    }

    #[test]
    fn test_select_shapes() {
        assert!(matches!(
            StatementClassifier::classify("SELECT * FROM usuario WHERE id = ?", &[json!("5")])
                .unwrap(),
            Command::FindStudent { id: 5 }
        ));
        assert!(matches!(
            StatementClassifier::classify("SELECT * FROM usuario ORDER BY apellido, nombre", &[])
                .unwrap(),
            Command::ListStudents { ordered: true }
        ));
        assert!(matches!(
            StatementClassifier::classify("SELECT * FROM usuario", &[]).unwrap(),
            Command::ListStudents { ordered: false }
        ));
        assert!(matches!(
            StatementClassifier::classify("SELECT * FROM clase ORDER BY dia, hora", &[]).unwrap(),
            Command::ListSessions { ordered: true }
        ));
        assert!(matches!(
            StatementClassifier::classify(
                "SELECT * FROM reserva WHERE usuario_id = ? AND clase_id = ?",
                &[json!(1), json!(2)],
            )
            .unwrap(),
            Command::FindEnrollment { student_id: 1, session_id: 2 }
        ));
    }

    #[test]
    fn test_count_shapes() {
        assert!(matches!(
            StatementClassifier::classify("SELECT COUNT(*) as count FROM clase", &[]).unwrap(),
            Command::CountSessions
        ));
        assert!(matches!(
            StatementClassifier::classify("SELECT COUNT(*) FROM usuario", &[]).unwrap(),
            Command::CountStudents
        ));
        assert!(matches!(
            StatementClassifier::classify("SELECT COUNT(*) FROM reserva", &[]).unwrap(),
            Command::CountEnrollments
        ));
        assert!(matches!(
            StatementClassifier::classify(
                "SELECT COUNT(*) FROM reserva WHERE clase_id = ?",
                &[json!(9)],
            )
            .unwrap(),
            Command::CountEnrollmentsForSession { session_id: 9 }
        ));
    }

    #[test]
    fn test_joined_select_filters_by_placeholder_position() {
        let sql = "SELECT r.*, u.nombre, u.apellido, u.email, c.dia, c.hora, c.nombre as clase_nombre \
                   FROM reserva r JOIN usuario u ON r.usuario_id = u.id JOIN clase c ON r.clase_id = c.id \
                   WHERE r.usuario_id = ? AND r.clase_id = ? ORDER BY c.dia, c.hora, u.apellido, u.nombre";
        let cmd = StatementClassifier::classify(sql, &[json!(4), json!(8)]).unwrap();
        match cmd {
            Command::ListEnrollmentsJoined(sel) => {
                assert_eq!(sel.student_id, Some(4));
                assert_eq!(sel.session_id, Some(8));
                assert_eq!(sel.active, None);
                assert!(sel.ordered);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_joined_select_session_filter_only() {
        let sql = "SELECT r.* FROM reserva r JOIN usuario u ON r.usuario_id = u.id \
                   JOIN clase c ON r.clase_id = c.id WHERE r.clase_id = ?";
        let cmd = StatementClassifier::classify(sql, &[json!(8)]).unwrap();
        match cmd {
            Command::ListEnrollmentsJoined(sel) => {
                assert_eq!(sel.student_id, None);
                assert_eq!(sel.session_id, Some(8));
                assert!(!sel.ordered);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_joined_select_active_variants() {
        let active = "SELECT r.* FROM reserva r JOIN usuario u ON r.usuario_id = u.id WHERE u.activo = 1";
        match StatementClassifier::classify(active, &[]).unwrap() {
            Command::ListEnrollmentsJoined(sel) => assert_eq!(sel.active, Some(true)),
            other => panic!("unexpected command: {:?}", other),
        }

        let inactive = "SELECT r.usuario_id, r.clase_id FROM reserva r \
                        JOIN usuario u ON r.usuario_id = u.id \
                        WHERE u.activo = 0 OR u.activo IS NULL";
        match StatementClassifier::classify(inactive, &[]).unwrap() {
            Command::ListEnrollmentsJoined(sel) => assert_eq!(sel.active, Some(false)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_statements_are_hard_errors() {
        for sql in [
            "DROP TABLE usuario",
            "SELECT * FROM profesores",
            "INSERT INTO pagos (monto) VALUES (?)",
            "UPDATE clase SET hora = ? WHERE id = ?",
            "",
        ] {
            let err = StatementClassifier::classify(sql, &[]).unwrap_err();
            assert_eq!(
                err.code(),
                crate::statement::StatementErrorCode::UnsupportedStatement,
                "expected unsupported for {:?}",
                sql
            );
        }
    }

    #[test]
    fn test_missing_parameters_are_mismatches() {
        let err = StatementClassifier::classify(
            "INSERT INTO usuario (nombre, apellido, email, fecha_alta) VALUES (?, ?, ?, ?)",
            &[json!("Ana")],
        )
        .unwrap_err();
        assert_eq!(
            err.code(),
            crate::statement::StatementErrorCode::ParameterMismatch
        );
    }
}
