// vcompress-cli/src/main.rs
//
// Entry point for the `vcompress` binary: parses arguments, sets up logging,
// runs the compression pass and maps failures to exit status 1.

use clap::Parser;
use std::process;

use vcompress_cli::error::suggestion_for;
use vcompress_cli::logging::init_logging;
use vcompress_cli::{Cli, run_compress};
use vcompress_core::terminal;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run_compress(&cli) {
        log::debug!("Run failed: {:?}", e);
        terminal::print_error("Error", &e.to_string(), suggestion_for(&e));
        process::exit(1);
    }
}
