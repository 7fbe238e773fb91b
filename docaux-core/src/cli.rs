//! Shared plumbing for the two binaries

use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::process::ExitCode;

/// `-v` raises the default level from warn to info, `-vv` to debug
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

/// Parse the process arguments; usage errors exit 1, `--help` and `--version` exit 0
pub fn parse_args<P: Parser>() -> Result<P, ExitCode> {
    parse_args_from(std::env::args_os())
}

pub fn parse_args_from<P, I, T>(args: I) -> Result<P, ExitCode>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    P::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    })
}
