//! # Rentstore Architecture
//!
//! Rentstore keeps a small game rental store's records in two plain-text
//! tables and answers one question on top of them: which copies are not
//! pulling their weight. It is a library that happens to have a CLI client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders results, owns exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: trims ids, dispatches to commands           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - rent, return, prune, search, show, feedback, report      │
//! │  - Business-rule failures become messages in a CmdResult    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Domain (lifecycle.rs, stats.rs, scoring.rs)                │
//! │  - Rental state machine over the ledger                     │
//! │  - Per-copy aggregates, store averages, unpopularity score  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/) and collaborators (collab/)               │
//! │  - Catalog and Ledger tables behind TableBackend            │
//! │  - Subscriptions and feedback behind their own traits       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Ledger Is the Source of Truth
//!
//! A copy's status is never stored. It is derived from its rental history in
//! append order: the copy is out exactly when its latest ledger row has no
//! return date. At most one row per copy may be open, and only the latest.
//! [`lifecycle::RentalHistory::check_invariant`] enforces this wherever the
//! ledger is read for a decision.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward nothing prints, exits or reads the clock. "Today" is a
//! parameter, which keeps scoring deterministic under test.
//!
//! ## Testing Strategy
//!
//! - Store, lifecycle, stats and scoring: unit tests against
//!   [`store::mem_backend::MemBackend`].
//! - Commands: unit tests per command module.
//! - `tests/`: the file backend in temp directories, and the binary end to end.

pub mod api;
pub mod collab;
pub mod commands;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod scoring;
pub mod stats;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
