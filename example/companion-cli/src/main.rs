use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use companion::expand::{ExpansionConfig, Host};
use companion::pretty::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "companion", about = "Expand @AutoDependency and @EnumCodable declarations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a source file with every registered attribute expanded
    Expand {
        /// Path to the source file
        file: PathBuf,
        /// YAML file overriding generated names
        #[arg(long)]
        config: Option<PathBuf>,
        /// Spaces per indentation level in generated code
        #[arg(long, default_value_t = 4)]
        tab_spaces: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Expand {
            file,
            config,
            tab_spaces,
        } => expand(file, config, tab_spaces),
    }
}

fn expand(file: PathBuf, config: Option<PathBuf>, tab_spaces: usize) -> Result<ExitCode> {
    tracing::debug!(
        file = %file.display(),
        config = ?config.as_ref().map(|path| path.display().to_string()),
        tab_spaces,
        "expanding file"
    );
    let config = match config {
        Some(path) => ExpansionConfig::from_path(&path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => ExpansionConfig::default(),
    };
    let source = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;

    let host = Host::builder()
        .config(config)
        .printer(Config::default().with_tab_spaces(tab_spaces))
        .build();
    let output = host
        .expand_source(&source)
        .with_context(|| format!("failed to expand '{}'", file.display()))?;

    tracing::debug!(diagnostics = output.diagnostics.len(), "expansion finished");
    print!("{}", output.source);
    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic.render(&source));
    }
    Ok(if output.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
