//! Line-oriented JSON I/O for the shell
//!
//! Input: one JSON request object per stdin line. Output: one JSON response
//! object per stdout line, flushed immediately.

use std::io::{self, Write};

use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::ShellResult;

/// A statement request from the shell protocol.
#[derive(Debug, Deserialize)]
pub struct ShellRequest {
    pub sql: String,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "all".to_string()
}

/// Write a success response.
pub fn write_ok(data: Value) -> ShellResult<()> {
    write_line(json!({ "status": "ok", "data": data }))
}

/// Write an error response.
pub fn write_error(code: &str, message: &str) -> ShellResult<()> {
    write_line(json!({ "status": "error", "code": code, "message": message }))
}

fn write_line(value: Value) -> ShellResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
