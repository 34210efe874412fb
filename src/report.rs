//! The outcome of a resolution pass: every option's final value and the
//! source it came from.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::registry::Registry;
use crate::types::Source;
use crate::value::Value;

/// One option's resolved value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntry {
    pub name: String,
    pub value: Value,
    pub source: Source,
}

/// What [`resolve`](crate::resolve) produced. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// The config file that was read, if one was found.
    pub config_file: Option<PathBuf>,
    /// One entry per option, in declaration order.
    pub entries: Vec<ResolvedEntry>,
}

impl Resolution {
    pub(crate) fn capture(registry: &Registry, config_file: Option<&Path>) -> Self {
        Self {
            config_file: config_file.map(Path::to_path_buf),
            entries: registry
                .visit_all()
                .map(|option| ResolvedEntry {
                    name: option.name().to_string(),
                    value: option.current().clone(),
                    source: option.source(),
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entries whose value came from `source`.
    pub fn from_source(&self, source: Source) -> impl Iterator<Item = &ResolvedEntry> + '_ {
        self.entries.iter().filter(move |e| e.source == source)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.config_file {
            write!(f, "# config file: {}", path.display())?;
            if !self.entries.is_empty() {
                writeln!(f)?;
            }
        }
        let width = self.entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:<width$} = {}  ({})",
                entry.name, entry.value, entry.source
            )?;
        }
        Ok(())
    }
}
