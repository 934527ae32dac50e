//! CLI command implementations for rv32step.

pub(crate) mod run;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

use rv32step::hex::parse_hex_word;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Hex word argument parser for clap.
///
/// Machine parameters are given the way the debugger conventions expect
/// them: bare hex, at most eight digits.
pub(crate) fn hex_word(input: &str) -> Result<u32, String> {
    parse_hex_word(input).map_err(|e| e.to_string())
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<rv32step::EmuError> for CliError {
    fn from(e: rv32step::EmuError) -> Self {
        Self::new(e.to_string())
    }
}
