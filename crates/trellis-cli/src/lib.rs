//! CLI logic for the Trellis architecture tool.
//!
//! This module contains the core CLI logic: each [`Command`] reads one
//! document, runs it through [`ModelBuilder`] and writes the result to
//! standard output or a file.

pub mod error_adapter;

mod args;
mod config;
mod grammar;

pub use args::{Args, Command, Target};

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::{info, warn};

use trellis::{ModelBuilder, TrellisError};
use trellis_parser::{FileSystemSource, Syntax, error::Diagnostic};

use error_adapter::{diagnostic_reportables, render};

/// Run the Trellis CLI application, writing results to standard output
///
/// # Errors
///
/// Returns `TrellisError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid models (`check`)
/// - Entities that cannot be rendered (`convert`, `toggle`)
pub fn run(args: &Args) -> Result<(), TrellisError> {
    let stdout = io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the Trellis CLI application, writing results to `out`
///
/// # Errors
///
/// As [`run`].
pub fn run_with_output(args: &Args, out: &mut dyn Write) -> Result<(), TrellisError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = ModelBuilder::new(app_config);

    match &args.command {
        Command::Check { input } => check(&builder, input, out),
        Command::Convert { input, to, output } => {
            let source = read(input)?;
            let text = render_document(&builder, &source, Syntax::from(*to))?;
            emit(out, output.as_deref(), &text)
        }
        Command::Toggle { input, output } => {
            let source = read(input)?;
            let target = builder.detect(&source).dominant().opposite();
            info!(syntax:% = target; "Toggling syntax");
            let text = render_document(&builder, &source, target)?;
            emit(out, output.as_deref(), &text)
        }
        Command::Detect { input } => {
            let source = read(input)?;
            let detection = builder.detect(&source);
            writeln!(
                out,
                "{} (confidence {:.2}; {} shortform, {} longform declarations)",
                detection.syntax(),
                detection.confidence(),
                detection.shortform_declarations(),
                detection.longform_declarations()
            )?;
            Ok(())
        }
        Command::Grammar => {
            out.write_all(grammar::table().as_bytes())?;
            Ok(())
        }
    }
}

fn read(input: &str) -> Result<String, TrellisError> {
    info!(input_path = input; "Reading document");
    Ok(fs::read_to_string(input)?)
}

fn check(builder: &ModelBuilder, input: &str, out: &mut dyn Write) -> Result<(), TrellisError> {
    let source = read(input)?;
    let model = builder.check(&source, Some(Path::new(input)), &FileSystemSource)?;
    report_warnings(model.report().diagnostics(), &source);

    writeln!(
        out,
        "{input}: valid ({} entities, {} warnings)",
        model.graph().len(),
        model.report().len()
    )?;
    Ok(())
}

fn render_document(
    builder: &ModelBuilder,
    source: &str,
    syntax: Syntax,
) -> Result<String, TrellisError> {
    let document = builder.parse(source);
    if !document.diagnostics.is_empty() {
        warn!(count = document.diagnostics.len(); "Lines were skipped while parsing");
        report_warnings(&document.diagnostics, source);
    }
    builder.convert(&document, syntax)
}

fn report_warnings(diagnostics: &[Diagnostic], source: &str) {
    for reportable in diagnostic_reportables(diagnostics, source) {
        warn!("{}", render(&reportable));
    }
}

fn emit(out: &mut dyn Write, output: Option<&str>, text: &str) -> Result<(), TrellisError> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!(output_file = path; "Document written");
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}
