//! Core resolution: fill every option the user didn't set on the command line
//! from the config file or the environment.
//!
//! Precedence is fixed, highest first:
//!
//! ```text
//! Flag               set on the command line (explicit)
//! Config file        first match across the search directories
//! Environment var    {PREFIX}_{NAME}
//! Default            the value given at declaration
//! ```
//!
//! The config file sits above the environment.
//!
//! A pass is all-or-nothing. Candidate values for every option are coerced
//! first and failures are collected; only when all of them succeed are the
//! values written into the registry. One bad value yields a
//! [`BindError::TypeMismatch`], several yield a [`BindError::FlagApply`]
//! listing each.

use std::path::PathBuf;

use crate::env::{self, Environment};
use crate::error::BindError;
use crate::file;
use crate::naming;
use crate::registry::{FlagOption, Registry};
use crate::report::Resolution;
use crate::snapshot::Snapshot;
use crate::types::Source;
use crate::value::Value;

/// Everything a resolution pass needs besides the registry and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    /// Prefix for environment variable names, e.g. `"STING"` → `STING_NUMBER`.
    pub env_prefix: String,
    /// Directories searched in order for the config file.
    pub config_search_paths: Vec<PathBuf>,
    /// Config file name without extension.
    pub config_base_name: String,
    /// Match config keys with hyphens removed (`favorite-color` ↔ `favoriteColor`).
    pub camel_fold: bool,
}

impl ResolveContext {
    pub fn new(env_prefix: impl Into<String>, config_base_name: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into(),
            config_search_paths: Vec::new(),
            config_base_name: config_base_name.into(),
            camel_fold: false,
        }
    }

    pub fn search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_search_paths.push(dir.into());
        self
    }

    pub fn camel_fold(mut self, camel_fold: bool) -> Self {
        self.camel_fold = camel_fold;
        self
    }
}

/// Load the config file named by `ctx` and resolve every option in `registry`.
///
/// A missing config file is fine. A malformed one fails before any option is
/// touched.
pub fn resolve(
    registry: &mut Registry,
    ctx: &ResolveContext,
    env: &dyn Environment,
) -> Result<Resolution, BindError> {
    let snapshot = file::load_snapshot(&ctx.config_search_paths, &ctx.config_base_name)?;
    resolve_snapshot(registry, &snapshot, ctx, env)
}

/// Resolve against an already-loaded snapshot. No I/O happens here.
pub fn resolve_snapshot(
    registry: &mut Registry,
    snapshot: &Snapshot,
    ctx: &ResolveContext,
    env: &dyn Environment,
) -> Result<Resolution, BindError> {
    let mut assignments: Vec<(usize, Value, Source)> = Vec::new();
    let mut failures: Vec<BindError> = Vec::new();

    for (index, option) in registry.visit_all().enumerate() {
        match candidate(option, snapshot, ctx, env) {
            Ok(Some((value, source))) => assignments.push((index, value, source)),
            Ok(None) => {}
            Err(e) => failures.push(e),
        }
    }

    if let Some(err) = BindError::from_failures(failures) {
        return Err(err);
    }

    let assigned = assignments.len();
    let options = registry.options_mut();
    for (index, value, source) in assignments {
        options[index].assign(value, source);
    }

    tracing::debug!(
        options = registry.len(),
        assigned,
        config_file = ?snapshot.path(),
        "resolved options"
    );
    Ok(Resolution::capture(registry, snapshot.path()))
}

/// The value `option` should take, or `None` to leave it alone.
fn candidate(
    option: &FlagOption,
    snapshot: &Snapshot,
    ctx: &ResolveContext,
    env: &dyn Environment,
) -> Result<Option<(Value, Source)>, BindError> {
    if option.is_explicit() {
        tracing::trace!(option = option.name(), "set by flag");
        return Ok(None);
    }

    let config_key = naming::config_key(option.name(), ctx.camel_fold);
    if let Some(raw) = snapshot.get(&config_key) {
        tracing::trace!(option = option.name(), key = %config_key, "found in config file");
        return Value::from_config(option.value_type(), raw)
            .map(|v| Some((v, Source::ConfigFile)))
            .ok_or_else(|| mismatch(option, raw.to_string(), Source::ConfigFile));
    }

    let env_key = naming::env_key(&ctx.env_prefix, option.name());
    if let Some(raw) = env::lookup(env, &env_key) {
        tracing::trace!(option = option.name(), key = %env_key, "found in environment");
        return Value::parse(option.value_type(), &raw)
            .map(|v| Some((v, Source::Environment)))
            .ok_or_else(|| mismatch(option, format!("{raw:?}"), Source::Environment));
    }

    Ok(None)
}

fn mismatch(option: &FlagOption, value: String, origin: Source) -> BindError {
    BindError::TypeMismatch {
        name: option.name().to_string(),
        value,
        expected: option.value_type(),
        origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use crate::fixtures::test::sting_registry;
    use crate::registry::OptionSpec;
    use serde_json::json;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn ctx() -> ResolveContext {
        ResolveContext::new("TEST", "test")
    }

    fn snapshot(pairs: &[(&str, serde_json::Value)]) -> Snapshot {
        Snapshot::from_entries(pairs.iter().cloned())
    }

    #[test]
    fn defaults_only() {
        let mut registry = sting_registry();
        let report = resolve_snapshot(&mut registry, &Snapshot::empty(), &ctx(), &MapEnv::new())
            .unwrap();
        assert_eq!(registry.get_int("number"), Some(7));
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
        assert!(report.entries.iter().all(|e| e.source == Source::Default));
    }

    #[test]
    fn config_file_sets_color() {
        let mut registry = sting_registry();
        let snap = snapshot(&[("favorite-color", json!("blue"))]);
        resolve_snapshot(&mut registry, &snap, &ctx(), &MapEnv::new()).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("blue"));
        assert_eq!(registry.get_int("number"), Some(7));
    }

    #[test]
    fn env_sets_color() {
        let mut registry = sting_registry();
        let env = MapEnv::new().with("TEST_FAVORITE_COLOR", "purple");
        let report = resolve_snapshot(&mut registry, &Snapshot::empty(), &ctx(), &env).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("purple"));
        assert_eq!(registry.get_int("number"), Some(7));
        assert_eq!(
            report.get("favorite-color").unwrap().source,
            Source::Environment
        );
    }

    #[test]
    fn env_value_is_coerced() {
        let mut registry = sting_registry();
        let env = MapEnv::new().with("TEST_NUMBER", "42");
        resolve_snapshot(&mut registry, &Snapshot::empty(), &ctx(), &env).unwrap();
        assert_eq!(registry.get_int("number"), Some(42));
    }

    #[test]
    fn flag_wins_over_everything() {
        let mut registry = sting_registry();
        registry.set_from_flag("number", "2").unwrap();
        let snap = snapshot(&[("number", json!(3))]);
        let env = MapEnv::new().with("TEST_NUMBER", "4");
        let report = resolve_snapshot(&mut registry, &snap, &ctx(), &env).unwrap();
        assert_eq!(registry.get_int("number"), Some(2));
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
        assert_eq!(report.get("number").unwrap().source, Source::Flag);
    }

    #[test]
    fn explicit_flag_at_default_value_still_wins() {
        let mut registry = sting_registry();
        registry.set_from_flag("number", "7").unwrap();
        let snap = snapshot(&[("number", json!(3))]);
        resolve_snapshot(&mut registry, &snap, &ctx(), &MapEnv::new()).unwrap();
        assert_eq!(registry.get_int("number"), Some(7));
    }

    #[test]
    fn config_beats_environment() {
        let mut registry = sting_registry();
        let snap = snapshot(&[("favorite-color", json!("blue"))]);
        let env = MapEnv::new().with("TEST_FAVORITE_COLOR", "purple");
        let report = resolve_snapshot(&mut registry, &snap, &ctx(), &env).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("blue"));
        assert_eq!(
            report.get("favorite-color").unwrap().source,
            Source::ConfigFile
        );
    }

    #[test]
    fn empty_env_value_ignored() {
        let mut registry = sting_registry();
        let env = MapEnv::new().with("TEST_FAVORITE_COLOR", "");
        resolve_snapshot(&mut registry, &Snapshot::empty(), &ctx(), &env).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
    }

    #[test]
    fn env_prefix_is_required_match() {
        let mut registry = sting_registry();
        let env = MapEnv::new().with("FAVORITE_COLOR", "purple");
        resolve_snapshot(&mut registry, &Snapshot::empty(), &ctx(), &env).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
    }

    #[test]
    fn camel_fold_matches_folded_key() {
        let snap = snapshot(&[("favoriteColor", json!("blue"))]);

        let mut folded = sting_registry();
        resolve_snapshot(&mut folded, &snap, &ctx().camel_fold(true), &MapEnv::new()).unwrap();
        assert_eq!(folded.get_str("favorite-color"), Some("blue"));

        let mut plain = sting_registry();
        resolve_snapshot(&mut plain, &snap, &ctx(), &MapEnv::new()).unwrap();
        assert_eq!(plain.get_str("favorite-color"), Some("red"));
    }

    #[test]
    fn hyphenated_key_is_case_insensitive_without_fold() {
        let mut registry = sting_registry();
        let snap = snapshot(&[("Favorite-Color", json!("blue"))]);
        resolve_snapshot(&mut registry, &snap, &ctx(), &MapEnv::new()).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("blue"));
    }

    #[test]
    fn hyphenated_key_ignored_with_fold() {
        let mut registry = sting_registry();
        let snap = snapshot(&[("favorite-color", json!("blue"))]);
        resolve_snapshot(&mut registry, &snap, &ctx().camel_fold(true), &MapEnv::new()).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
    }

    #[test]
    fn type_mismatch_from_config_mutates_nothing() {
        let mut registry = sting_registry();
        let snap = snapshot(&[
            ("number", json!("seven")),
            ("favorite-color", json!("blue")),
        ]);
        let err = resolve_snapshot(&mut registry, &snap, &ctx(), &MapEnv::new()).unwrap_err();
        match err {
            BindError::TypeMismatch {
                name,
                origin,
                expected,
                ..
            } => {
                assert_eq!(name, "number");
                assert_eq!(origin, Source::ConfigFile);
                assert_eq!(expected, crate::types::ValueType::Int);
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
        // favorite-color was valid, but the pass is all-or-nothing.
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
    }

    #[test]
    fn multiple_failures_aggregate() {
        let mut registry = sting_registry();
        registry
            .declare(OptionSpec::new("timeout", Duration::from_secs(5)))
            .unwrap();
        let snap = snapshot(&[("number", json!({"nested": true}))]);
        let env = MapEnv::new().with("TEST_TIMEOUT", "soon");
        let err = resolve_snapshot(&mut registry, &snap, &ctx(), &env).unwrap_err();
        match err {
            BindError::FlagApply(list) => {
                assert_eq!(list.len(), 2);
                let msg = BindError::FlagApply(list).to_string();
                assert!(msg.contains("--number"));
                assert!(msg.contains("--timeout"));
            }
            other => panic!("Expected FlagApply, got {other:?}"),
        }
        assert_eq!(registry.get_duration("timeout"), Some(Duration::from_secs(5)));
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let mut registry = sting_registry();
        let snap = snapshot(&[("favorite-color", json!("blue"))]);
        let env = MapEnv::new().with("TEST_NUMBER", "11");
        let first = resolve_snapshot(&mut registry, &snap, &ctx(), &env).unwrap();
        let second = resolve_snapshot(&mut registry, &snap, &ctx(), &env).unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.get_int("number"), Some(11));
        assert_eq!(registry.get_str("favorite-color"), Some("blue"));
    }

    #[test]
    fn every_value_type_from_config() {
        let mut registry = Registry::new();
        registry.declare(OptionSpec::new("name", "x")).unwrap();
        registry.declare(OptionSpec::new("count", 0)).unwrap();
        registry.declare(OptionSpec::new("verbose", false)).unwrap();
        registry.declare(OptionSpec::new("ratio", 0.5)).unwrap();
        registry
            .declare(OptionSpec::new("timeout", Duration::ZERO))
            .unwrap();
        registry
            .declare(OptionSpec::new("tags", Vec::<String>::new()))
            .unwrap();

        let snap = snapshot(&[
            ("name", json!("y")),
            ("count", json!(3)),
            ("verbose", json!(true)),
            ("ratio", json!(0.25)),
            ("timeout", json!("1m")),
            ("tags", json!(["a", "b"])),
        ]);
        resolve_snapshot(&mut registry, &snap, &ctx(), &MapEnv::new()).unwrap();

        assert_eq!(registry.get_str("name"), Some("y"));
        assert_eq!(registry.get_int("count"), Some(3));
        assert_eq!(registry.get_bool("verbose"), Some(true));
        assert_eq!(registry.get_float("ratio"), Some(0.25));
        assert_eq!(registry.get_duration("timeout"), Some(Duration::from_secs(60)));
        assert_eq!(
            registry.get_list("tags"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
    }

    // --- resolve() with real files ---

    fn file_ctx(dir: &TempDir) -> ResolveContext {
        ctx().search_path(dir.path())
    }

    #[test]
    fn config_file_hyphen_convention() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.toml"), "favorite-color = \"blue\"\n").unwrap();

        let mut registry = sting_registry();
        let report = resolve(&mut registry, &file_ctx(&dir), &MapEnv::new()).unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("blue"));
        assert_eq!(registry.get_int("number"), Some(7));
        assert_eq!(
            report.config_file.as_deref(),
            Some(dir.path().join("test.toml").as_path())
        );
    }

    #[test]
    fn config_file_camel_convention() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.toml"), "favoriteColor = \"blue\"\n").unwrap();

        let mut registry = sting_registry();
        resolve(
            &mut registry,
            &file_ctx(&dir).camel_fold(true),
            &MapEnv::new(),
        )
        .unwrap();
        assert_eq!(registry.get_str("favorite-color"), Some("blue"));
        assert_eq!(registry.get_int("number"), Some(7));
    }

    #[test]
    fn missing_config_file_falls_through() {
        let dir = TempDir::new().unwrap();
        let mut registry = sting_registry();
        let env = MapEnv::new().with("TEST_NUMBER", "9");
        let report = resolve(&mut registry, &file_ctx(&dir), &env).unwrap();
        assert_eq!(registry.get_int("number"), Some(9));
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
        assert!(report.config_file.is_none());
    }

    #[test]
    fn malformed_config_file_aborts_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.toml"), "favorite-color = \n").unwrap();

        let mut registry = sting_registry();
        let before = registry.clone();
        let env = MapEnv::new().with("TEST_NUMBER", "9");
        let err = resolve(&mut registry, &file_ctx(&dir), &env).unwrap_err();
        assert!(matches!(err, BindError::ConfigParse { .. }));
        assert_eq!(
            registry.visit_all().collect::<Vec<_>>(),
            before.visit_all().collect::<Vec<_>>()
        );
    }

    #[test]
    fn non_utf8_config_file_aborts_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.toml"), b"\xff\xfe").unwrap();

        let mut registry = sting_registry();
        let before = registry.clone();
        let err = resolve(&mut registry, &file_ctx(&dir), &MapEnv::new()).unwrap_err();
        assert!(matches!(err, BindError::ConfigParse { .. }));
        assert_eq!(
            registry.visit_all().collect::<Vec<_>>(),
            before.visit_all().collect::<Vec<_>>()
        );
    }

    #[test]
    fn toml_datetime_fills_string_option() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.toml"), "started = 1979-05-27T07:32:00Z\n").unwrap();

        let mut registry = Registry::new();
        registry.declare(OptionSpec::new("started", "")).unwrap();
        let report = resolve(&mut registry, &file_ctx(&dir), &MapEnv::new()).unwrap();
        assert_eq!(registry.get_str("started"), Some("1979-05-27T07:32:00Z"));
        assert_eq!(report.get("started").unwrap().source, Source::ConfigFile);
    }

    #[test]
    fn no_search_paths_means_no_file() {
        let mut registry = sting_registry();
        resolve(&mut registry, &ctx(), &MapEnv::new()).unwrap();
        assert_eq!(registry.get_int("number"), Some(7));
    }
}
