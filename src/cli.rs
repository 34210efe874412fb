//! Clap adapter for flagbind.
//!
//! This module is the **optional integration layer** between flagbind's
//! parser-agnostic core and the [clap](https://docs.rs/clap) CLI parser. It is
//! compiled only when the `clap` Cargo feature is enabled (on by default).
//!
//! [`augment`] adds one `--long` flag per declared option to a clap
//! [`Command`]. After parsing, [`apply_matches`] copies every value the user
//! actually typed back into the [`Registry`] and marks those options explicit,
//! so the resolver leaves them alone. Values clap did not see on the command
//! line are ignored.
//!
//! If you use a different parser, skip this module and call
//! [`Registry::set_from_flag`] yourself.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::BindError;
use crate::registry::{FlagOption, Registry};
use crate::types::ValueType;

/// One clap argument per option, in declaration order.
pub fn clap_args(registry: &Registry) -> Vec<Arg> {
    registry.visit_all().map(to_arg).collect()
}

/// Add every option in `registry` to `cmd`.
pub fn augment(cmd: Command, registry: &Registry) -> Command {
    cmd.args(clap_args(registry))
}

fn to_arg(option: &FlagOption) -> Arg {
    let help = if option.help().is_empty() {
        format!("[default: {}]", option.default_value())
    } else {
        format!("{} [default: {}]", option.help(), option.default_value())
    };

    let mut arg = Arg::new(option.name().to_string())
        .long(option.name().to_string())
        .value_name(option.value_type().name().to_uppercase())
        .help(help);
    if let Some(short) = option.short() {
        arg = arg.short(short);
    }

    match option.value_type() {
        // `--verbose` means true; `--verbose=false` turns it off.
        ValueType::Bool => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        ValueType::List => arg.action(ArgAction::Append),
        _ => arg.action(ArgAction::Set),
    }
}

/// Apply the command-line values in `matches` to `registry`.
///
/// All values are coerced before any is stored: if one fails, the registry is
/// left untouched. One bad value is returned as itself, several as
/// [`BindError::FlagApply`].
pub fn apply_matches(registry: &mut Registry, matches: &ArgMatches) -> Result<(), BindError> {
    let mut parsed = Vec::new();
    let mut failures = Vec::new();

    for (index, option) in registry.visit_all().enumerate() {
        let name = option.name();
        let values = match matches.try_get_many::<String>(name) {
            Ok(Some(values)) => values,
            _ => continue,
        };
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        let raw = values.map(String::as_str).collect::<Vec<_>>().join(",");
        match option.parse_flag(&raw) {
            Ok(value) => parsed.push((index, value)),
            Err(e) => failures.push(e),
        }
    }

    if let Some(err) = BindError::from_failures(failures) {
        return Err(err);
    }

    let options = registry.options_mut();
    for (index, value) in parsed {
        options[index].set_explicit(value);
    }
    Ok(())
}
