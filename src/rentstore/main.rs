//! # Rentstore CLI
//!
//! The binary is thin: the CLI lives in `cli/`, and this file only invokes
//! `cli::run()` and handles process termination.
//!
//! - `cli::setup`: clap argument definitions
//! - `cli::commands`: context wiring, logging and dispatch to the API
//! - `cli::render`: terminal output for `CmdResult` values
//!
//! Exit status is 1 when `run` fails or when a command reports an
//! error-level message.

mod cli;

fn main() {
    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
