#[cfg(test)]
pub mod test {
    use crate::registry::{OptionSpec, Registry};

    /// The two options of the sting demo: `--number/-n` and `--favorite-color/-c`.
    pub fn sting_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .declare(
                OptionSpec::new("number", 7)
                    .short('n')
                    .help("What is the magic number?"),
            )
            .unwrap();
        registry
            .declare(
                OptionSpec::new("favorite-color", "red")
                    .short('c')
                    .help("Should come from flag first, then the config file, then the env var"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn sting_registry_declares_both() {
        let registry = sting_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_int("number"), Some(7));
        assert_eq!(registry.get_str("favorite-color"), Some("red"));
    }
}
