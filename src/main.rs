//! jpeg-exif - Inspect and rewrite EXIF metadata in JPEG files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jpeg_exif::{
    config::{Cli, Command, CopyConfig, DumpConfig, DumpFormat, SetConfig, StripConfig},
    io::write_atomically,
    Error, ExifEditor,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Dump(config) => run_dump(config),
        Command::Set(config) => run_set(config),
        Command::Strip(config) => run_strip(config),
        Command::Copy(config) => run_copy(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "jpeg_exif=debug"
    } else {
        "jpeg_exif=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Errors surfaced to the user: invalid arguments or a library failure.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Exif(#[from] Error),
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Exif(e.into())
    }
}

// =============================================================================
// Dump Command
// =============================================================================

fn run_dump(config: DumpConfig) -> Result<(), CliError> {
    config.validate().map_err(CliError::Config)?;

    let editor = ExifEditor::new(config.codec.options());
    let table = editor.read_file(&config.file)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match config.format {
        DumpFormat::Text => {
            write!(out, "{}", table)?;
            let thumbnails = table.thumbnails();
            if !thumbnails.is_empty() {
                writeln!(
                    out,
                    "Thumbnails: {}",
                    thumbnails
                        .iter()
                        .map(|t| format!("{} bytes", t.len()))
                        .collect::<Vec<_>>()
                        .join(", ")
                )?;
            }
        }
        DumpFormat::Json => {
            let json = serde_json::json!({
                "file": config.file.display().to_string(),
                "tags": table.records(),
                "thumbnails": table.thumbnails().iter().map(|t| t.len()).collect::<Vec<_>>(),
            });
            let text = serde_json::to_string_pretty(&json)
                .map_err(|e| CliError::Config(format!("Cannot render JSON: {}", e)))?;
            writeln!(out, "{}", text)?;
        }
    }
    Ok(())
}

// =============================================================================
// Set Command
// =============================================================================

fn run_set(config: SetConfig) -> Result<(), CliError> {
    config.validate().map_err(CliError::Config)?;
    let assignments = config
        .assignments()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let editor = ExifEditor::new(config.codec.options());
    let mutator = |table: jpeg_exif::TagTable| -> Result<_, Error> {
        for assignment in assignments {
            info!(tag = %assignment.tag, values = assignment.values.len(), "Setting tag");
            table.set_all(assignment.tag, assignment.values)?;
        }
        Ok(table)
    };

    match config.output {
        Some(output) => {
            write_to(&config.file, &output, |input, out| {
                editor.update_stream(input, out, mutator)
            })?;
        }
        None => editor.update_file(&config.file, mutator)?,
    }
    Ok(())
}

// =============================================================================
// Strip / Copy Commands
// =============================================================================

fn run_strip(config: StripConfig) -> Result<(), CliError> {
    config.validate().map_err(CliError::Config)?;

    let editor = ExifEditor::default();
    match config.output {
        Some(output) => {
            write_to(&config.file, &output, |input, out| {
                editor.strip_stream(input, out)
            })?;
        }
        None => editor.strip_file(&config.file)?,
    }
    Ok(())
}

fn run_copy(config: CopyConfig) -> Result<(), CliError> {
    config.validate().map_err(CliError::Config)?;

    let editor = ExifEditor::default();
    write_to(&config.file, &config.output, |input, out| {
        editor.copy(input, out)
    })?;
    Ok(())
}

/// Run `f` from `input` into `output`, which only appears once complete.
fn write_to<F>(input: &Path, output: &Path, f: F) -> Result<(), Error>
where
    F: FnOnce(&mut BufReader<File>, &mut BufWriter<&mut File>) -> Result<(), Error>,
{
    write_atomically(input, output, f)?;
    info!(input = %input.display(), output = %output.display(), "Wrote output");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
