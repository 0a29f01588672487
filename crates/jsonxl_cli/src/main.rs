use std::process::ExitCode;

use clap::Parser;
use jsonxl_cli::{CliArgs, main_with_args};

fn main() -> ExitCode {
    main_with_args(CliArgs::parse())
}
