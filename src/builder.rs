use crate::env::{Environment, MapEnv, ProcessEnv};
use crate::error::BindError;
use crate::file;
use crate::registry::Registry;
use crate::report::Resolution;
use crate::resolve::{self, ResolveContext};
use crate::types::SearchPath;

/// Builder for a [`ResolveContext`] with defaults derived from an app name.
///
/// ```ignore
/// let report = Binder::new()
///     .app_name("sting")
///     .search_paths(vec![SearchPath::Cwd, SearchPath::Platform])
///     .resolve(&mut registry)?;
/// ```
pub struct Binder {
    app_name: Option<String>,
    config_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    env_prefix: Option<String>,
    env_enabled: bool,
    camel_fold: bool,
    environment: Option<Box<dyn Environment>>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    pub fn new() -> Self {
        Self {
            app_name: None,
            config_name: None,
            search_paths: None,
            env_prefix: None,
            env_enabled: true,
            camel_fold: false,
            environment: None,
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - `config_name` → `"{app_name}"` (any supported extension)
    /// - `env_prefix` → `"{APP_NAME}"` (uppercased, `-` → `_`)
    /// - `search_paths` → `[SearchPath::Cwd]`
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file base name (no extension).
    pub fn config_name(mut self, name: &str) -> Self {
        self.config_name = Some(name.to_string());
        self
    }

    /// Replace the search paths. Checked in order; the first file found wins.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append one search path after the current list.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(Vec::new)
            .push(path);
        self
    }

    /// Override the env var prefix.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable environment variable lookup.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Match config keys with hyphens removed.
    pub fn camel_fold(mut self, camel_fold: bool) -> Self {
        self.camel_fold = camel_fold;
        self
    }

    /// Read environment variables from `env` instead of the process.
    pub fn environment(mut self, env: impl Environment + 'static) -> Self {
        self.environment = Some(Box::new(env));
        self
    }

    fn effective_config_name(&self) -> Result<String, BindError> {
        self.config_name
            .clone()
            .or_else(|| self.app_name.clone())
            .ok_or(BindError::AppNameRequired)
    }

    fn effective_env_prefix(&self) -> Result<String, BindError> {
        if let Some(prefix) = &self.env_prefix {
            return Ok(prefix.clone());
        }
        match &self.app_name {
            Some(app) => Ok(app.to_uppercase().replace('-', "_")),
            None if !self.env_enabled => Ok(String::new()),
            None => Err(BindError::AppNameRequired),
        }
    }

    /// Build the context a resolution pass will use. Search paths are resolved
    /// to concrete directories here.
    pub fn context(&self) -> Result<ResolveContext, BindError> {
        let config_base_name = self.effective_config_name()?;
        let env_prefix = self.effective_env_prefix()?;
        let platform_name = self.app_name.as_deref().unwrap_or(&config_base_name);

        let default_paths = [SearchPath::Cwd];
        let search_paths = self.search_paths.as_deref().unwrap_or(&default_paths);

        Ok(ResolveContext {
            env_prefix,
            config_search_paths: file::expand_search_paths(search_paths, platform_name),
            config_base_name,
            camel_fold: self.camel_fold,
        })
    }

    /// Resolve every option in `registry` not set on the command line.
    pub fn resolve(&self, registry: &mut Registry) -> Result<Resolution, BindError> {
        let ctx = self.context()?;
        if !self.env_enabled {
            return resolve::resolve(registry, &ctx, &MapEnv::new());
        }
        match &self.environment {
            Some(env) => resolve::resolve(registry, &ctx, &**env),
            None => resolve::resolve(registry, &ctx, &ProcessEnv),
        }
    }
}
