//! Sample config file generation.
//!
//! Produces a TOML document with one entry per declared option, set to its
//! default and preceded by its help text and env var name as comments. With
//! camel folding on, keys are written in camelCase with only the hyphens
//! folded; the resolver drops hyphens and ignores case, so `favoriteColor`
//! reads back as `favorite-color` and `pool_size` stays `pool_size`.

use crate::naming;
use crate::registry::Registry;
use crate::value::Value;

/// Generate a commented TOML template for every option in `registry`.
pub fn generate_template(registry: &Registry, env_prefix: &str, camel_fold: bool) -> String {
    let mut out = String::new();
    for (i, option) in registry.visit_all().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !option.help().is_empty() {
            for line in option.help().lines() {
                out.push_str(&format!("# {line}\n"));
            }
        }
        out.push_str(&format!(
            "# type: {}, env: {}\n",
            option.value_type(),
            naming::env_key(env_prefix, option.name())
        ));
        out.push_str(&format!(
            "{} = {}\n",
            template_key(option.name(), camel_fold),
            toml_value(option.default_value())
        ));
    }
    out
}

fn template_key(name: &str, camel_fold: bool) -> String {
    if camel_fold {
        naming::camel_key(name)
    } else {
        name.to_string()
    }
}

fn toml_value(value: &Value) -> toml_edit::Value {
    match value {
        Value::Str(s) => s.as_str().into(),
        Value::Int(i) => (*i).into(),
        Value::Bool(b) => (*b).into(),
        Value::Float(x) => (*x).into(),
        Value::Duration(_) => value.to_string().into(),
        Value::List(items) => items.iter().map(String::as_str).collect::<toml_edit::Array>().into(),
    }
}
