use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Source, ValueType};

#[derive(Debug, Error)]
pub enum BindError {
    #[error("Option '--{name}' is already declared")]
    DuplicateOption { name: String },

    #[error("Shorthand '-{short}' for '--{name}' is already used by '--{existing}'")]
    DuplicateShorthand {
        short: char,
        name: String,
        existing: String,
    },

    #[error("Invalid option name '{0}' — use ASCII letters, digits, '-' and '_'")]
    InvalidName(String),

    #[error("Invalid shorthand '{short}' for '--{name}' — must be a single ASCII letter or digit")]
    InvalidShorthand { name: String, short: char },

    #[error("Unknown option '--{0}'")]
    UnknownOption(String),

    #[error("Failed to parse {path} as {format}: {reason}")]
    ConfigParse {
        path: PathBuf,
        format: &'static str,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value {value} for '--{name}' from {origin}: expected {expected}")]
    TypeMismatch {
        name: String,
        value: String,
        expected: ValueType,
        origin: Source,
    },

    #[error("Failed to apply values to {} options:\n{}", .0.len(), format_list(.0))]
    FlagApply(Vec<BindError>),

    #[error("App name is required — call .app_name() on the builder")]
    AppNameRequired,
}

impl BindError {
    /// Collapse an accumulator of per-option failures into one error.
    ///
    /// Returns `None` for an empty list, the error itself for a single
    /// failure, and [`BindError::FlagApply`] otherwise.
    pub fn from_failures(mut errors: Vec<BindError>) -> Option<BindError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(BindError::FlagApply(errors)),
        }
    }
}

fn format_list(errors: &[BindError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
