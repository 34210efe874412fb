//! Bind config files and environment variables to command-line flags.
//!
//! A CLI tool declares its options once: name, optional shorthand, default.
//! After the command line is parsed, flagbind fills in every option the user
//! did *not* pass from the config file or the environment, and leaves the rest
//! at their defaults. The program then reads plain typed values from the
//! [`Registry`].
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry.declare(OptionSpec::new("number", 7).short('n'))?;
//! registry.declare(OptionSpec::new("favorite-color", "red").short('c'))?;
//!
//! let matches = flagbind::augment(Command::new("sting"), &registry).get_matches();
//! flagbind::apply_matches(&mut registry, &matches)?;
//!
//! Binder::new().app_name("sting").resolve(&mut registry)?;
//! println!("{}", registry.get_str("favorite-color").unwrap_or_default());
//! ```
//!
//! # Precedence
//!
//! ```text
//! Defaults              OptionSpec::new(name, default)
//!        ↑ overridden by
//! Environment vars      PREFIX_FAVORITE_COLOR
//!        ↑ overridden by
//! Config file           favorite-color = "blue"
//!        ↑ overridden by
//! Flags                 --favorite-color blue
//! ```
//!
//! The config file outranks the environment. That order is fixed.
//!
//! # Naming
//!
//! Option names are kebab-case. The environment variable for an option is the
//! prefix and the name joined by `_`, uppercased, with hyphens turned into
//! underscores: `favorite-color` with prefix `STING` reads `STING_FAVORITE_COLOR`.
//!
//! Config keys are matched case-insensitively. By default the key is the
//! option name itself (`favorite-color`). With
//! [`camel_fold`](Binder::camel_fold) on, hyphens are removed first, so a
//! camelCase file (`favoriteColor`) or a flat one (`favoritecolor`) matches.
//!
//! # Config files
//!
//! Each search directory is tried in order for `{name}.json`, `{name}.toml`,
//! `{name}.yaml` and `{name}.yml`. The first file found is the only one read.
//! Missing files are fine; a file that fails to decode aborts resolution.
//! Only top-level keys are used.
//!
//! # Values
//!
//! Options are typed by their default: string, int, bool, float, duration or
//! string list (see [`Value`]). Strings from the environment and values from
//! config files are coerced to that type; anything that doesn't fit is a
//! [`BindError::TypeMismatch`]. Resolution is all-or-nothing: when any value
//! is bad, no option is changed and every failure is reported together.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) turns the
//! registry into clap arguments and copies parsed matches back. Without it,
//! any parser works: call [`Registry::set_from_flag`] for each flag the user
//! passed.
//!
//! # Logging
//!
//! Resolution emits `tracing` events at `debug` and `trace` level (which file
//! was used, which source each option came from). Install a subscriber to see
//! them.

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod file;
mod naming;
mod registry;
mod report;
mod resolve;
mod snapshot;
mod template;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::Binder;
#[cfg(feature = "clap")]
pub use cli::{apply_matches, augment, clap_args};
pub use env::{Environment, MapEnv, ProcessEnv};
pub use error::BindError;
pub use file::{expand_search_paths, load_snapshot};
pub use naming::{camel_key, config_key, env_key};
pub use registry::{FlagOption, OptionSpec, Registry};
pub use report::{Resolution, ResolvedEntry};
pub use resolve::{ResolveContext, resolve, resolve_snapshot};
pub use snapshot::{ConfigFormat, Snapshot};
pub use template::generate_template;
pub use types::{SearchPath, Source, ValueType};
pub use value::{Value, format_duration, parse_duration};
