//! # sting
//!
//! A two-option CLI that shows how flagbind settles each value. Every option
//! comes from the first of these that has it: command-line flag, config file
//! (`stingoftheviper.{json,toml,yaml,yml}` in the working directory), an
//! environment variable prefixed with `STING_`, or the compiled default.
//!
//! ```sh
//! cargo run --example sting
//! cargo run --example sting -- --number 2 -c green
//! STING_FAVORITE_COLOR=purple cargo run --example sting
//! echo 'favorite-color = "blue"' > stingoftheviper.toml
//! cargo run --example sting -- --sources
//! cargo run --example sting -- --print-template > stingoftheviper.toml
//! RUST_LOG=flagbind=debug cargo run --example sting
//! ```

use std::process;

use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use flagbind::{BindError, Binder, OptionSpec, Registry, SearchPath};

/// Prints a magic number and a favorite color.
#[derive(Parser, Debug)]
#[command(name = "sting")]
struct Cli {
    /// Match config keys with hyphens removed (favoriteColor, favoritecolor).
    #[arg(long)]
    camel_fold: bool,

    /// Print a sample config file and exit.
    #[arg(long)]
    print_template: bool,

    /// Show where each value came from.
    #[arg(long)]
    sources: bool,

    /// Log resolution details to stderr.
    #[arg(long)]
    verbose: bool,
}

fn declare() -> Result<Registry, BindError> {
    let mut registry = Registry::new();
    registry.declare(
        OptionSpec::new("number", 7)
            .short('n')
            .help("What is the magic number?"),
    )?;
    registry.declare(
        OptionSpec::new("favorite-color", "red")
            .short('c')
            .help("Should come from flag first, then the config file, then the env var"),
    )?;
    Ok(registry)
}

fn run() -> Result<(), BindError> {
    let mut registry = declare()?;

    let matches = flagbind::augment(Cli::command(), &registry).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if cli.print_template {
        print!(
            "{}",
            flagbind::generate_template(&registry, "STING", cli.camel_fold)
        );
        return Ok(());
    }

    flagbind::apply_matches(&mut registry, &matches)?;

    let report = Binder::new()
        .app_name("sting")
        .config_name("stingoftheviper")
        .env_prefix("STING")
        .search_paths(vec![SearchPath::Cwd])
        .camel_fold(cli.camel_fold)
        .resolve(&mut registry)?;

    if cli.sources {
        println!("{report}");
        println!();
    }

    println!(
        "Your favorite color is: {}",
        registry.get_str("favorite-color").unwrap_or_default()
    );
    println!(
        "The magic number is: {}",
        registry.get_int("number").unwrap_or_default()
    );
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
