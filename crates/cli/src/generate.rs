use std::io::Write;
use std::path::{Path, PathBuf};

use apigen_core::{
    CustomPreamble, Flavor, OpenApiDocument, RenderMode, Renderer, render, synthesize_document,
};
use clap::Args;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::CliError;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// API document (`.json`, `.yaml` or `.yml`)
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Output file; stdout when omitted
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Client flavor: `fetch` or `react-query`
    #[arg(long, value_name = "FLAVOR")]
    pub flavor: Option<Flavor>,
    /// Render all operations as one block
    #[arg(long)]
    pub aggregate: bool,
    /// Config file (default: ./apigen.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Flags layered over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub flavor: Flavor,
    pub mode: RenderMode,
    pub preamble: Option<String>,
}

impl Settings {
    pub fn resolve(args: &GenerateArgs, config: GeneratorConfig) -> Result<Self, CliError> {
        let mode = if args.aggregate {
            RenderMode::Aggregate
        } else {
            config.mode.unwrap_or_default()
        };
        Ok(Self {
            input: args.input.clone().or(config.input).ok_or(CliError::MissingInput)?,
            output: args.output.clone().or(config.output),
            flavor: args.flavor.or(config.flavor).unwrap_or_default(),
            mode,
            preamble: config.preamble,
        })
    }
}

pub fn run(args: GenerateArgs) -> i32 {
    match execute(&args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

pub fn execute(args: &GenerateArgs) -> Result<(), CliError> {
    let config = GeneratorConfig::discover(args.config.as_deref())?;
    let settings = Settings::resolve(args, config)?;
    debug!(?settings, "resolved generator settings");

    let doc = load_document(&settings.input)?;
    let renderer: Box<dyn Renderer> = match &settings.preamble {
        Some(preamble) => Box::new(CustomPreamble::new(settings.flavor.renderer(), preamble.clone())),
        None => settings.flavor.renderer(),
    };

    // Collisions are already logged by the registry as they happen.
    let generation = synthesize_document(&doc, renderer.as_ref())?;
    let output = render(&generation, renderer.as_ref(), settings.mode);

    match &settings.output {
        Some(path) => {
            write_output(path, &output)?;
            info!(
                path = %path.display(),
                types = generation.types.len(),
                operations = generation.components.len(),
                collisions = generation.diagnostics().len(),
                flavor = %settings.flavor,
                "client generated"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .map_err(|source| CliError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }
    Ok(())
}

/// Load a document, as YAML for `.yaml`/`.yml` and JSON otherwise.
pub fn load_document(path: &Path) -> Result<OpenApiDocument, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let doc = if is_yaml {
        OpenApiDocument::from_yaml(&raw)?
    } else {
        OpenApiDocument::from_json(&raw)?
    };
    Ok(doc)
}

fn write_output(path: &Path, output: &str) -> Result<(), CliError> {
    let to_write_error = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    std::fs::write(path, output).map_err(to_write_error)
}
