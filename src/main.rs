use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use layout_builder::compiler::compile_with;
use layout_builder::config::{ConfigError, EditorConfig};
use layout_builder::doc::LoadError;
use layout_builder::script::{Design, Script, ScriptError, Session};
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("invalid design: {0}")]
    Design(#[from] LoadError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "layout-builder", about = "Replay layout editor input and print the compiled stylesheet")]
struct Cli {
    #[command(flatten)]
    editor: EditorArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct EditorArgs {
    /// Minimum element width and height during resize.
    #[arg(long, env = "LAYOUT_MIN_SIZE", global = true)]
    min_size: Option<String>,

    /// Prefix of the content given to new elements.
    #[arg(long, env = "LAYOUT_ELEMENT_LABEL", global = true)]
    element_label: Option<String>,

    /// Container height in pixels.
    #[arg(long, env = "LAYOUT_CONTAINER_HEIGHT", global = true)]
    container_height: Option<String>,

    /// `size-only` or `pin-edge`.
    #[arg(long, env = "LAYOUT_RESIZE_CLAMP", global = true)]
    resize_clamp: Option<String>,
}

impl EditorArgs {
    fn config(&self) -> Result<EditorConfig, ConfigError> {
        EditorConfig::from_lookup(|var| {
            let value = match var {
                "LAYOUT_MIN_SIZE" => &self.min_size,
                "LAYOUT_ELEMENT_LABEL" => &self.element_label,
                "LAYOUT_CONTAINER_HEIGHT" => &self.container_height,
                "LAYOUT_RESIZE_CLAMP" => &self.resize_clamp,
                _ => return None,
            };
            value.clone()
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play an input script and print the resulting stylesheet.
    Replay {
        script: PathBuf,
        /// Print the final element collection as JSON after the stylesheet.
        #[arg(long)]
        dump_elements: bool,
    },
    /// Compile a `{ layout, elements }` design file.
    Compile { design: PathBuf },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = cli.editor.config()?;

    match cli.command {
        Command::Replay { script, dump_elements } => run_replay(config, &script, dump_elements),
        Command::Compile { design } => run_compile(&config, &design),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn run_replay(config: EditorConfig, path: &Path, dump_elements: bool) -> Result<(), CliError> {
    let script = Script::from_json(&read(path)?)?;
    let mut session = Session::new(config);
    let report = session.run(&script)?;
    info!(steps = report.steps, actions = report.actions, output_changes = report.output_changes, "replay finished");

    let core = session.engine();
    let mut out = io::stdout().lock();
    write!(out, "{}", core.output())?;
    if dump_elements {
        writeln!(out, "{}", serde_json::to_string_pretty(core.elements())?)?;
    }
    Ok(())
}

fn run_compile(config: &EditorConfig, path: &Path) -> Result<(), CliError> {
    let design: Design = serde_json::from_str(&read(path)?)?;
    design.validate()?;
    info!(elements = design.elements.len(), mode = %design.layout.mode, "compiling design");
    let css = compile_with(&config.compile_options(), &design.layout, &design.elements);
    write!(io::stdout().lock(), "{css}")?;
    Ok(())
}
