//! # basicd
//!
//! Interactive terminal for the resident BASIC.
//!

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod term;

#[derive(Parser, Debug)]
#[command(name = "basicd", version, about = "Resident BASIC interpreter")]
pub struct Cli {
    /// Program to load at start-up
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
    /// Run the program once it is loaded
    #[arg(short, long, requires = "file")]
    run: bool,
    /// Program lines executed between checks of the terminal
    #[arg(short, long, default_value_t = 1000)]
    cycles: usize,
}

fn main() {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    term::main(cli);
}
