//! Typed option values and the coercion rules that fill them.
//!
//! Every option cell holds a [`Value`], a closed tagged variant. Incoming data
//! arrives in one of three shapes and each has one entry point:
//!
//! - raw strings (command line, environment) → [`Value::parse`]
//! - decoded config file values → [`Value::from_config`]
//! - values handed in by host code → [`Value::coerce`]
//!
//! Each returns `None`/`Err` instead of guessing when the data doesn't fit the
//! declared [`ValueType`]. Callers turn that into
//! [`BindError::TypeMismatch`](crate::BindError::TypeMismatch).

use std::fmt;
use std::time::Duration;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::types::ValueType;

/// A typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Float(f64),
    Duration(Duration),
    List(Vec<String>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Str(_) => ValueType::Str,
            Value::Int(_) => ValueType::Int,
            Value::Bool(_) => ValueType::Bool,
            Value::Float(_) => ValueType::Float,
            Value::Duration(_) => ValueType::Duration,
            Value::List(_) => ValueType::List,
        }
    }

    /// Parse a raw string (flag or environment variable) as `ty`.
    pub fn parse(ty: ValueType, raw: &str) -> Option<Value> {
        match ty {
            ValueType::Str => Some(Value::Str(raw.to_string())),
            ValueType::Int => raw.trim().parse().ok().map(Value::Int),
            ValueType::Bool => parse_bool(raw.trim()).map(Value::Bool),
            ValueType::Float => raw.trim().parse().ok().map(Value::Float),
            ValueType::Duration => parse_duration(raw).map(Value::Duration),
            ValueType::List => Some(Value::List(split_list(raw))),
        }
    }

    /// Coerce a decoded config file value to `ty`.
    ///
    /// Scalars go through the same rules as [`parse`](Self::parse), so a
    /// config `port = "8080"` and `port = 8080` both fill an `Int` option.
    /// Integral floats (`3.0`) are accepted for `Int`. Arrays of scalars fill
    /// `List`. Tables and nulls never coerce.
    pub fn from_config(ty: ValueType, raw: &serde_json::Value) -> Option<Value> {
        use serde_json::Value as Json;

        match (ty, raw) {
            (_, Json::Null | Json::Object(_)) => None,
            (ValueType::List, Json::Array(items)) => items
                .iter()
                .map(scalar_text)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            (_, Json::Array(_)) => None,
            (ValueType::Int, Json::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(integral_float))
                .map(Value::Int),
            (ValueType::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
            (ty, other) => Value::parse(ty, &scalar_text(other)?),
        }
    }

    /// Coerce a host-supplied value to `ty`.
    ///
    /// Same type passes through, strings are parsed, `Int` widens to `Float`.
    /// Anything else is handed back unchanged as the error.
    pub fn coerce(self, ty: ValueType) -> Result<Value, Value> {
        match (self, ty) {
            (v, ty) if v.value_type() == ty => Ok(v),
            (Value::Str(s), ty) => Value::parse(ty, &s).ok_or(Value::Str(s)),
            (Value::Int(i), ValueType::Float) => Ok(Value::Float(i as f64)),
            (v, _) => Err(v),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Duration(d) => f.write_str(&format_duration(*d)),
            Value::List(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Duration(d) => serializer.serialize_str(&format_duration(*d)),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// Accepts exactly `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn integral_float(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse a duration such as `300ms`, `1.5s` or `1h30m`.
///
/// Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is allowed.
/// Negative durations are rejected.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let s = raw.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s == "0" {
        return Some(Duration::ZERO);
    }
    if s.is_empty() {
        return None;
    }

    let mut rest = s;
    let mut nanos = 0f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..num_len];
        if number.is_empty() || number == "." {
            return None;
        }
        let amount: f64 = number.parse().ok()?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        nanos += amount * scale;
    }

    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos.round() as u64))
}

/// Render a duration the way [`parse_duration`] reads it, e.g. `1h30m0s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_nanos();
    if total == 0 {
        return "0s".into();
    }
    if total < 1_000 {
        return format!("{total}ns");
    }
    if total < 1_000_000 {
        return format!("{}µs", decimal(total, 1_000));
    }
    if total < 1_000_000_000 {
        return format!("{}ms", decimal(total, 1_000_000));
    }

    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let seconds = decimal(
        u128::from(s) * 1_000_000_000 + u128::from(d.subsec_nanos()),
        1_000_000_000,
    );
    if h > 0 {
        format!("{h}h{m}m{seconds}s")
    } else if m > 0 {
        format!("{m}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// `value / unit` as a decimal string with trailing zeros trimmed.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{rem:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
