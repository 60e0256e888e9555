use clap::Parser;
use stockbrief::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
