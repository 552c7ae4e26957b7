//! cvforge – command-line CV renderer.
//!
//! Usage:
//!   cvforge <input.json> [--output-folder DIR] [--format typst|markdown|html]... [--stdout FORMAT]
//!
//! Templates placed next to the input file (e.g. `typst/Header.j2.typ` or
//! `sidebar/Preamble.j2.typ`) override the built-in ones.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use cv_forge::pipeline::{write_outputs, OutputPlan, Renderer};
use cv_forge::{OutputFormat, RenderModel};

#[derive(Debug, Parser)]
#[command(name = "cvforge", version, about = "Render a CV model to Typst, Markdown and HTML")]
struct Cli {
    /// CV model as JSON.
    input: PathBuf,

    /// Output directory (default: the model's `settings.render_command.output_folder`,
    /// relative to the input file).
    #[arg(long, short = 'o')]
    output_folder: Option<PathBuf>,

    /// Only produce these formats; repeatable.
    #[arg(long = "format", short = 'f')]
    formats: Vec<OutputFormat>,

    /// Print one format to stdout instead of writing files.
    #[arg(long)]
    stdout: Option<OutputFormat>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let model = match RenderModel::from_file(&cli.input) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", cli.input.display());
            process::exit(1);
        }
    };
    let renderer = Renderer::new();

    if let Some(format) = cli.stdout {
        match renderer.render(&model, format) {
            Ok(document) => print!("{document}"),
            Err(e) => {
                eprintln!("Error rendering {format}: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let mut plan = OutputPlan::from_settings(&model.settings, cli.input.parent());
    if let Some(folder) = cli.output_folder {
        plan.output_folder = folder;
    }
    if !cli.formats.is_empty() {
        plan.formats = cli.formats;
    }

    match write_outputs(&renderer, &model, &plan) {
        Ok(paths) => {
            for path in &paths {
                eprintln!("Wrote '{}'", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error generating CV: {e}");
            process::exit(1);
        }
    }
}
