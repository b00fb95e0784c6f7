//! CLI command implementations

use std::io::{self, BufRead};

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

use crate::engine::Engine;
use crate::observability::{self, Logger, Severity};

use super::args::{Cli, Command, Mode};
use super::errors::{ShellError, ShellResult};
use super::io::{write_error, write_ok, ShellRequest};

/// The studio's weekly timetable, used by the seed command.
const WEEKLY_SCHEDULE: &[(&str, &[&str])] = &[
    ("Lun", &["17:30", "19:00"]),
    ("Mar", &["10:00", "17:30", "19:00"]),
    ("Jue", &["10:00", "16:00", "17:30", "19:00"]),
    ("Sab", &["09:30", "11:00"]),
];

const FIRST_NAMES: &[&str] = &[
    "María", "Juan", "Ana", "Carlos", "Laura", "Pedro", "Carmen", "Luis", "Sofía", "Miguel",
    "Elena", "Diego", "Patricia", "Fernando", "Isabel", "Roberto",
];

const LAST_NAMES: &[&str] = &[
    "García", "Rodríguez", "González", "Fernández", "López", "Martínez", "Sánchez", "Pérez",
    "Gómez", "Martín", "Jiménez", "Ruiz", "Hernández", "Díaz", "Moreno", "Muñoz",
];

/// Parse arguments and dispatch to the selected command.
pub fn run() -> ShellResult<()> {
    let cli = Cli::parse_args();
    observability::set_min_level(Severity::Info);
    match cli.command {
        Command::Shell => shell(),
        Command::Seed { students } => seed(students),
        Command::Exec { sql, params, mode } => exec(&sql, &params, mode),
    }
}

/// Statement loop: one JSON request per line until stdin closes.
fn shell() -> ShellResult<()> {
    let mut engine = Engine::new();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ShellRequest>(&line) {
            Ok(request) => execute_request(&mut engine, &request)?,
            Err(e) => write_error("STUDIO_BAD_REQUEST", &format!("invalid request: {}", e))?,
        }
    }
    Ok(())
}

fn execute_request(engine: &mut Engine, request: &ShellRequest) -> ShellResult<()> {
    let mode = match request.mode.as_str() {
        "first" => Mode::First,
        "run" => Mode::Run,
        _ => Mode::All,
    };
    execute_statement(engine, &request.sql, request.params.clone(), mode)
}

fn execute_statement(
    engine: &mut Engine,
    sql: &str,
    params: Vec<Value>,
    mode: Mode,
) -> ShellResult<()> {
    let statement = engine.prepare(sql).bind(params);
    let result = match mode {
        Mode::First => statement.first().map(|row| row.unwrap_or(Value::Null)),
        Mode::All => statement
            .all()
            .map(|rows| serde_json::to_value(rows).expect("rows serialization cannot fail")),
        Mode::Run => statement
            .run()
            .map(|o| serde_json::to_value(o).expect("outcome serialization cannot fail")),
    };
    match result {
        Ok(data) => write_ok(data),
        Err(err) => write_error(err.code(), err.message()),
    }
}

/// One-shot statement against a fresh engine. Useful for checking whether a
/// statement shape is in the repertoire.
fn exec(sql: &str, raw_params: &[String], mode: Mode) -> ShellResult<()> {
    let params: Vec<Value> = raw_params
        .iter()
        .map(|raw| serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone())))
        .collect();
    let mut engine = Engine::new();
    execute_statement(&mut engine, sql, params, mode)
}

/// Seed the weekly schedule and `students` randomized students, each with a
/// few random enrollments. Per-statement failures are counted, not rolled
/// back; the summary reports what actually landed.
fn seed(students: usize) -> ShellResult<()> {
    let mut engine = Engine::new();
    let mut rng = rand::thread_rng();

    let mut session_ids = Vec::new();
    for (day, times) in WEEKLY_SCHEDULE {
        for time in *times {
            let outcome = engine
                .prepare("INSERT INTO clase (dia, hora, nombre) VALUES (?, ?, ?)")
                .bind(vec![json!(day), json!(time)])
                .run()
                .map_err(|e| ShellError::Seed(e.to_string()))?;
            if let Some(id) = outcome.generated_id {
                session_ids.push(id);
            }
        }
    }

    let mut student_ids = Vec::new();
    for i in 0..students {
        let first = FIRST_NAMES.choose(&mut rng).unwrap_or(&"Ana");
        let last = LAST_NAMES.choose(&mut rng).unwrap_or(&"García");
        let email = format!(
            "{}.{}{}@example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            i + 1
        );
        let outcome = engine
            .prepare("INSERT INTO usuario (nombre, apellido, email, fecha_alta) VALUES (?, ?, ?, ?)")
            .bind(vec![json!(first), json!(last), json!(email)])
            .run()
            .map_err(|e| ShellError::Seed(e.to_string()))?;
        if let Some(id) = outcome.generated_id {
            student_ids.push(id);
        }
    }

    let mut enrolled = 0usize;
    for student_id in &student_ids {
        let max_picks = session_ids.len().min(3).max(1);
        let count = rng.gen_range(1..=max_picks);
        for session_id in session_ids.choose_multiple(&mut rng, count) {
            let result = engine
                .prepare("INSERT INTO reserva (usuario_id, clase_id) VALUES (?, ?)")
                .bind(vec![json!(student_id), json!(session_id)])
                .run();
            if result.is_ok() {
                enrolled += 1;
            }
        }
    }

    let sessions = session_ids.len().to_string();
    let students = student_ids.len().to_string();
    let enrollments = enrolled.to_string();
    Logger::info(
        "STORE_SEEDED",
        &[
            ("sessions", sessions.as_str()),
            ("students", students.as_str()),
            ("enrollments", enrollments.as_str()),
        ],
    );
    write_ok(json!({
        "clases": session_ids.len(),
        "usuarios": student_ids.len(),
        "reservas": enrolled,
    }))
}
