use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use lintel::args::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    match lintel::run(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{}: {err:#}", "Error".red().bold());
            lintel::status::ExitStatus::Error.into()
        }
    }
}
