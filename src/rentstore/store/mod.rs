//! # Storage Layer
//!
//! Two logical tables, Catalog and Ledger, stored as comma-separated lines.
//!
//! ## Split
//!
//! - [`backend::TableBackend`]: raw line I/O (`read_lines`, `append_line`, `rewrite`).
//!   - [`fs_backend::FsBackend`]: one text file per table in a data directory.
//!   - [`mem_backend::MemBackend`]: in-memory tables for tests.
//! - [`record_store::RecordStore`]: typed operations on top of any backend: the
//!   row codec, key lookup, delete-by-key and return-date completion.
//!
//! ## Consistency
//!
//! Nothing is cached. Every operation re-reads the table it touches, so two
//! `RecordStore`s over the same directory always agree after a write.
//!
//! Deletes and return-date completion read the whole table and write it back.
//! `RecordStore` holds one guard per table across that cycle, which serialises
//! writers inside a process. There is no cross-process locking.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── Game_Info.txt        # Catalog: copy_id,platform,genre,title,condition,acquired_on
//! ├── Rental.txt           # Ledger:  copy_id,rented_on,returned_on,renter_id
//! ├── feedback.json        # Feedback collaborator
//! ├── subscriptions.json   # Subscription collaborator
//! └── rentstore.toml       # Optional configuration
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use backend::TableBackend;
pub use record_store::{KeyLookup, LockedTables, RecordStore};

use fs_backend::FsBackend;
use mem_backend::MemBackend;

/// Production store.
pub type FileStore = RecordStore<FsBackend>;

/// Test store.
pub type InMemoryStore = RecordStore<MemBackend>;
