//! # CLI Layer
//!
//! One possible UI client for rentstore. This is the only place that knows
//! about terminal output, the clock, logging setup and exit codes.
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap derive definitions in `setup`
//! 2. **Context Setup**: data directory, `StoreConfig`, file-backed `RentalApi`
//! 3. **Dispatch**: one `handle_*` per subcommand in `commands`
//! 4. **Rendering**: `CmdResult` to colored text in `render`
//!
//! ## Dates
//!
//! `rent`, `return` and `report` default to the local date. Each takes
//! `--on YYYY-MM-DD` so past events can be recorded and reports reproduced.

mod commands;
mod render;
pub mod setup;

pub use commands::run;
