//! sprpal - Command-line tool for generating palette variations

use std::process::ExitCode;

use sprpal::cli;

fn main() -> ExitCode {
    cli::run()
}
