//! genhashcheck - hash2unicode self-check generator
//!
//! Writes a C++ program to stdout that verifies the table found in the
//! given source file. With `--verify`, runs the checks here instead and
//! prints a JSON report.
//! Exits 1 without output when no source file is given; arguments after
//! the source file are ignored.

use clap::Parser;
use docaux_core::cli::{init_logging, parse_args};
use log::warn;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use docaux_core::{
    codegen::{CheckProgram, Provenance},
    config::ToolConfig,
    table::extract_from_path,
    validation::Validator,
};

#[derive(Parser)]
#[command(name = "genhashcheck", version)]
#[command(about = "Generate a self-check program for the hash2unicode table")]
struct Cli {
    /// Source file containing the hash2unicode initializer list
    source: Option<PathBuf>,

    /// Check the table here and print a JSON report instead of the program
    #[arg(long)]
    verify: bool,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Header declaring XXH32 (overrides the config file)
    #[arg(long)]
    hash_header: Option<String>,

    /// Omit the provenance comment
    #[arg(long)]
    no_provenance: bool,

    /// More log output on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(trailing_var_arg = true, hide = true)]
    _rest: Vec<String>,
}

fn main() -> ExitCode {
    let cli: Cli = match parse_args() {
        Ok(c) => c,
        Err(code) => return code,
    };
    let Some(source) = cli.source else {
        return ExitCode::FAILURE;
    };
    init_logging(cli.verbose);

    let mut config = match ToolConfig::load_or_default(cli.config.as_deref()) {
        Ok(c) => c.generator,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(header) = cli.hash_header {
        config.hash_header = header;
    }
    if cli.no_provenance {
        config.provenance = false;
    }

    let table = match extract_from_path(&source) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.verify {
        let result = Validator::new().validate(&table.entries);
        let report = match serde_json::to_string_pretty(&result) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        if writeln!(out, "{}", report).is_err() {
            return ExitCode::FAILURE;
        }
        return if result.valid { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    let provenance = if config.provenance {
        match Provenance::of_file(&source) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("no provenance for {}: {}", source.display(), e);
                None
            }
        }
    } else {
        None
    };

    let program = CheckProgram::new(&table, &config).with_provenance(provenance);
    match program.render(&mut out).and_then(|_| out.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to write program: {}", e);
            ExitCode::FAILURE
        }
    }
}
