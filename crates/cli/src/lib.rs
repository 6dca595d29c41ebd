//! Command line front end for `apigen`.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod config;
pub mod error;
pub mod generate;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use error::CliError;

const LOG_ENV: &str = "APIGEN_LOG";
const LOG_TARGET: &str = "apigen";

#[derive(Parser, Debug)]
#[command(
    name = "apigen",
    version,
    about = "Typed client generator for OpenAPI documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate client code from an API document
    Generate(generate::GenerateArgs),
}

/// Parse `args` (program name first) and run the selected command.
pub fn run_cli(args: Vec<String>) -> i32 {
    init_tracing();

    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // APIGEN_LOG takes a plain level ("debug") or a full filter spec
    // like "apigen_core=trace,apigen_cli=info"
    let filter = log_filter(std::env::var(LOG_ENV).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn log_filter(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => format!("{LOG_TARGET}={level}"),
        Some(spec) => spec.to_string(),
        None => format!("{LOG_TARGET}=info"),
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
