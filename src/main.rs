use clap::Parser;
use panelfetch::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
