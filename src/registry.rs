//! The option registry: declared options, their current values, and which of
//! them the user set on the command line.
//!
//! Options are kept in declaration order. Names and shorthands are indexed so
//! duplicate declarations fail at startup rather than at lookup time.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::BindError;
use crate::types::{Source, ValueType};
use crate::value::Value;

/// Declaration of one option, handed to [`Registry::declare`].
///
/// The declared type is the type of the default value.
///
/// ```ignore
/// registry.declare(OptionSpec::new("favorite-color", "red").short('c'))?;
/// ```
#[derive(Debug, Clone)]
pub struct OptionSpec {
    name: String,
    short: Option<char>,
    default: Value,
    help: String,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            short: None,
            default: default.into(),
            help: String::new(),
        }
    }

    /// Single-character alias, e.g. `-n` for `--number`.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// One-line description used in `--help` and generated templates.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }
}

/// A declared option and its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagOption {
    name: String,
    short: Option<char>,
    help: String,
    default: Value,
    current: Value,
    explicitly_set: bool,
    source: Source,
}

impl FlagOption {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn value_type(&self) -> ValueType {
        self.default.value_type()
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn current(&self) -> &Value {
        &self.current
    }

    /// True once the command line supplied this option.
    pub fn is_explicit(&self) -> bool {
        self.explicitly_set
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub(crate) fn assign(&mut self, value: Value, source: Source) {
        debug_assert_eq!(value.value_type(), self.value_type());
        self.current = value;
        self.source = source;
    }

    /// Coerce a raw command-line string to this option's type.
    pub(crate) fn parse_flag(&self, raw: &str) -> Result<Value, BindError> {
        let expected = self.value_type();
        Value::parse(expected, raw).ok_or_else(|| BindError::TypeMismatch {
            name: self.name.clone(),
            value: format!("{raw:?}"),
            expected,
            origin: Source::Flag,
        })
    }

    pub(crate) fn set_explicit(&mut self, value: Value) {
        self.assign(value, Source::Flag);
        self.explicitly_set = true;
    }
}

/// The set of options a program recognizes.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    options: Vec<FlagOption>,
    by_name: HashMap<String, usize>,
    by_short: HashMap<char, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option. Its current value starts at the default.
    pub fn declare(&mut self, spec: OptionSpec) -> Result<&FlagOption, BindError> {
        validate_name(&spec.name)?;
        if self.by_name.contains_key(&spec.name) {
            return Err(BindError::DuplicateOption { name: spec.name });
        }
        if let Some(short) = spec.short {
            if !short.is_ascii_alphanumeric() {
                return Err(BindError::InvalidShorthand {
                    name: spec.name,
                    short,
                });
            }
            if let Some(&existing) = self.by_short.get(&short) {
                return Err(BindError::DuplicateShorthand {
                    short,
                    name: spec.name,
                    existing: self.options[existing].name.clone(),
                });
            }
        }

        let index = self.options.len();
        self.by_name.insert(spec.name.clone(), index);
        if let Some(short) = spec.short {
            self.by_short.insert(short, index);
        }
        self.options.push(FlagOption {
            name: spec.name,
            short: spec.short,
            help: spec.help,
            current: spec.default.clone(),
            default: spec.default,
            explicitly_set: false,
            source: Source::Default,
        });
        Ok(&self.options[index])
    }

    /// Record that the command line supplied `name`. Idempotent.
    pub fn mark_explicit(&mut self, name: &str) -> Result<(), BindError> {
        let option = self.option_mut(name)?;
        option.explicitly_set = true;
        option.source = Source::Flag;
        Ok(())
    }

    /// Apply a raw command-line value: coerce, store, and mark explicit.
    pub fn set_from_flag(&mut self, name: &str, raw: &str) -> Result<(), BindError> {
        let option = self.option_mut(name)?;
        let value = option.parse_flag(raw)?;
        option.set_explicit(value);
        Ok(())
    }

    /// Iterate over every option in declaration order.
    ///
    /// The iterator borrows the registry, so it can be restarted by calling
    /// this again.
    pub fn visit_all(&self) -> impl Iterator<Item = &FlagOption> + '_ {
        self.options.iter()
    }

    pub(crate) fn options_mut(&mut self) -> &mut [FlagOption] {
        &mut self.options
    }

    pub fn option(&self, name: &str) -> Option<&FlagOption> {
        self.by_name.get(name).map(|&i| &self.options[i])
    }

    pub fn find_short(&self, short: char) -> Option<&FlagOption> {
        self.by_short.get(&short).map(|&i| &self.options[i])
    }

    /// The current value of `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.option(name).map(FlagOption::current)
    }

    /// Overwrite the current value of `name`.
    ///
    /// The value is coerced to the declared type (strings are parsed, ints
    /// widen to floats). This does not mark the option as explicitly set.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), BindError> {
        let option = self.option_mut(name)?;
        let expected = option.value_type();
        let value = value
            .into()
            .coerce(expected)
            .map_err(|rejected| BindError::TypeMismatch {
                name: name.to_string(),
                value: format!("{rejected:?}"),
                expected,
                origin: Source::Program,
            })?;
        option.assign(value, Source::Program);
        Ok(())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn get_duration(&self, name: &str) -> Option<Duration> {
        self.get(name).and_then(Value::as_duration)
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    fn option_mut(&mut self, name: &str) -> Result<&mut FlagOption, BindError> {
        match self.by_name.get(name) {
            Some(&i) => Ok(&mut self.options[i]),
            None => Err(BindError::UnknownOption(name.to_string())),
        }
    }
}

fn validate_name(name: &str) -> Result<(), BindError> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BindError::InvalidName(name.to_string()))
    }
}
