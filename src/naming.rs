//! Map a canonical kebab-case option name onto the key conventions of the
//! other sources.
//!
//! | Option name      | Env key (prefix `STING`) | Config key | Config key (camel fold) |
//! |------------------|--------------------------|------------|-------------------------|
//! | `number`         | `STING_NUMBER`           | `number`   | `number`                |
//! | `favorite-color` | `STING_FAVORITE_COLOR`   | `favorite-color` | `favoritecolor`   |
//!
//! Config keys are compared case-insensitively, so the folded form also
//! matches `favoriteColor` in a camelCase config file.

/// Environment variable name for `name`: `{PREFIX}_{NAME}` uppercased, with
/// hyphens turned into underscores. An empty prefix yields just `{NAME}`.
pub fn env_key(prefix: &str, name: &str) -> String {
    let name = name.replace('-', "_");
    if prefix.is_empty() {
        name.to_uppercase()
    } else {
        format!("{prefix}_{name}").to_uppercase()
    }
}

/// Config file key for `name`, lowercased for case-insensitive lookup.
///
/// With `camel_fold`, hyphens are dropped.
pub fn config_key(name: &str, camel_fold: bool) -> String {
    if camel_fold {
        name.replace('-', "").to_lowercase()
    } else {
        name.to_lowercase()
    }
}

/// The camelCase spelling of `name` that folds back to it: hyphens are
/// removed and the letter after each one is capitalized. Underscores stay.
pub fn camel_key(name: &str) -> String {
    let mut segments = name.split('-').filter(|s| !s.is_empty());
    let mut key = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            key.extend(first.to_uppercase());
            key.push_str(chars.as_str());
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_replaces_hyphens() {
        assert_eq!(env_key("STING", "favorite-color"), "STING_FAVORITE_COLOR");
    }

    #[test]
    fn env_key_uppercases_prefix() {
        assert_eq!(env_key("sting", "number"), "STING_NUMBER");
    }

    #[test]
    fn env_key_without_prefix() {
        assert_eq!(env_key("", "favorite-color"), "FAVORITE_COLOR");
    }

    #[test]
    fn env_key_keeps_underscores() {
        assert_eq!(env_key("APP", "pool_size"), "APP_POOL_SIZE");
    }

    #[test]
    fn config_key_plain() {
        assert_eq!(config_key("favorite-color", false), "favorite-color");
    }

    #[test]
    fn config_key_camel_fold() {
        assert_eq!(config_key("favorite-color", true), "favoritecolor");
    }

    #[test]
    fn config_key_lowercases() {
        assert_eq!(config_key("Max-Retries", false), "max-retries");
        assert_eq!(config_key("Max-Retries", true), "maxretries");
    }

    #[test]
    fn camel_key_capitalizes_after_hyphens() {
        assert_eq!(camel_key("favorite-color"), "favoriteColor");
        assert_eq!(camel_key("number"), "number");
        assert_eq!(camel_key("max-retry-count"), "maxRetryCount");
    }

    #[test]
    fn camel_key_keeps_underscores() {
        assert_eq!(camel_key("pool_size"), "pool_size");
        assert_eq!(camel_key("pool_size-max"), "pool_sizeMax");
    }

    #[test]
    fn camel_key_folds_back() {
        for name in ["favorite-color", "pool_size", "pool_size-max", "a-b-c"] {
            assert_eq!(
                camel_key(name).to_lowercase(),
                config_key(name, true),
                "{name}"
            );
        }
    }
}
