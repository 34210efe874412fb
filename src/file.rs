//! Config file discovery and loading.
//!
//! Each [`SearchPath`] resolves to one concrete directory. Directories are
//! checked in list order, and inside each directory every supported extension
//! is tried in [`EXTENSIONS`] order (`json`, `toml`, `yaml`, `yml`). The first
//! file that exists wins; later directories are never read.
//!
//! A missing file is not an error, and neither is a search path that is not a
//! directory. A file that exists but cannot be read or decoded is, and the
//! search stops there.

use std::path::PathBuf;

use crate::error::BindError;
use crate::snapshot::{ConfigFormat, EXTENSIONS, Snapshot};
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Resolve every search path, dropping the ones that can't be resolved.
pub fn expand_search_paths(search_paths: &[SearchPath], app_name: &str) -> Vec<PathBuf> {
    search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
        .collect()
}

/// Find and decode the first `{dir}/{base_name}.{ext}` across `dirs`.
///
/// Returns an empty snapshot when nothing matches.
pub fn load_snapshot(dirs: &[PathBuf], base_name: &str) -> Result<Snapshot, BindError> {
    match read_first_match(dirs, base_name)? {
        Some((path, format, content)) => {
            tracing::debug!(path = %path.display(), %format, "using config file");
            Snapshot::decode(&content, format, &path)
        }
        None => {
            tracing::debug!(base_name, searched = dirs.len(), "no config file found");
            Ok(Snapshot::empty())
        }
    }
}

fn read_first_match(
    dirs: &[PathBuf],
    base_name: &str,
) -> Result<Option<(PathBuf, ConfigFormat, Vec<u8>)>, BindError> {
    for dir in dirs {
        if !dir.is_dir() {
            tracing::trace!(dir = %dir.display(), "not a directory, skipped");
            continue;
        }
        for ext in EXTENSIONS {
            let Some(format) = ConfigFormat::from_extension(ext) else {
                continue;
            };
            let file_path = dir.join(format!("{base_name}.{ext}"));
            match std::fs::read(&file_path) {
                Ok(content) => return Ok(Some((file_path, format, content))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(BindError::Io {
                        path: file_path,
                        source: e,
                    });
                }
            }
        }
    }
    Ok(None)
}
