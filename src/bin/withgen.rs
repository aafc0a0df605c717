#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;

use withgen::cli::args::CliArgs;
use withgen::cli::driver;

fn main() -> Result<()> {
    // Initialize tracing if WITHGEN_LOG or RUST_LOG is set (zero cost otherwise).
    // Supports WITHGEN_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    withgen::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let code = driver::run(&args)?;
    std::process::exit(code);
}
