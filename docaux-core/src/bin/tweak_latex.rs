//! tweak-latex - add break markers to a generated LaTeX manual in place
//!
//! Removes the stale rendered PDF next to the file first.

use clap::Parser;
use docaux_core::cli::{init_logging, parse_args};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use docaux_core::{config::ToolConfig, latex};

#[derive(Parser)]
#[command(name = "tweak-latex", version)]
#[command(about = "Rewrite slashes and hyphen idioms of a generated LaTeX file")]
struct Cli {
    /// LaTeX file to rewrite
    latex_file: PathBuf,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Don't fail when the rendered artifact is missing
    #[arg(long)]
    keep_missing_artifact: bool,

    /// More log output on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli: Cli = match parse_args() {
        Ok(c) => c,
        Err(code) => return code,
    };
    init_logging(cli.verbose);

    let mut config = match ToolConfig::load_or_default(cli.config.as_deref()) {
        Ok(c) => c.sanitizer,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if cli.keep_missing_artifact {
        config.require_artifact = false;
    }

    match latex::run(&cli.latex_file, &config, &mut io::stderr()) {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
