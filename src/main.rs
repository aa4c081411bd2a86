use clap::Parser;
use paperstock::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
