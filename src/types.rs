use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Where to search for config files.
///
/// Search paths are checked in list order and the first directory holding a
/// matching file wins.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit path.
    Path(PathBuf),
}

/// The declared type of an option. Every [`Value`](crate::Value) carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Str,
    Int,
    Bool,
    Float,
    Duration,
    List,
}

impl ValueType {
    /// Short name used in help output and error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Str => "string",
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::Float => "float",
            ValueType::Duration => "duration",
            ValueType::List => "list",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an option's current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The compiled default given at declaration.
    Default,
    /// The command line.
    Flag,
    /// The config file snapshot.
    ConfigFile,
    /// An environment variable.
    Environment,
    /// Host code calling [`Registry::set`](crate::Registry::set).
    Program,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Default => "default",
            Source::Flag => "flag",
            Source::ConfigFile => "config file",
            Source::Environment => "environment",
            Source::Program => "program",
        })
    }
}
