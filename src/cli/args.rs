//! CLI argument definitions using clap
//!
//! Commands:
//! - studiodb shell
//! - studiodb seed [--students N]
//! - studiodb exec --sql <text> [--param <value>]... [--mode first|all|run]

use clap::{Parser, Subcommand, ValueEnum};

/// studiodb - deterministic in-process stand-in for the studio database
#[derive(Parser, Debug)]
#[command(name = "studiodb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read JSON statement requests from stdin, one per line
    Shell,

    /// Seed the weekly schedule plus randomized students and enrollments
    Seed {
        /// Number of students to generate
        #[arg(long, default_value_t = 12)]
        students: usize,
    },

    /// Execute a single statement against a fresh engine and exit
    Exec {
        /// Statement text
        #[arg(long)]
        sql: String,

        /// Positional parameters, in order (JSON scalars; bare words are
        /// treated as strings)
        #[arg(long = "param")]
        params: Vec<String>,

        /// Execution mode
        #[arg(long, value_enum, default_value = "all")]
        mode: Mode,
    },
}

/// How a statement is executed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// First matching row or null.
    First,
    /// All matching rows.
    All,
    /// Execute as a write.
    Run,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
