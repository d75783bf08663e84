//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for
//! every store operation, whichever UI drives it.
//!
//! The facade owns the store and the two collaborators, normalises user
//! input (trimmed, non-empty ids) and dispatches to
//! `commands::*::run`. It does no I/O of its own and returns structured
//! [`CmdResult`] values.
//!
//! ## Generic Over the Backend
//!
//! `RentalApi<B: TableBackend>`:
//! - Production: `RentalApi<FsBackend>`, see [`RentalApi::open`]
//! - Testing: `RentalApi<MemBackend>` with in-memory collaborators
//!
//! Collaborators are trait objects so the CLI and tests can swap them freely.

use crate::collab::{FeedbackSource, JsonFeedback, JsonSubscriptions, SubscriptionService};
use crate::commands::{self, search::SearchField, CmdResult};
use crate::config::StoreConfig;
use crate::error::{RentError, Result};
use crate::store::fs_backend::FsBackend;
use crate::store::{RecordStore, TableBackend};
use chrono::NaiveDate;
use std::path::Path;

pub struct RentalApi<B: TableBackend> {
    store: RecordStore<B>,
    subscriptions: Box<dyn SubscriptionService>,
    feedback: Box<dyn FeedbackSource>,
}

impl RentalApi<FsBackend> {
    /// File-backed API over `data_dir`, laid out according to `config`.
    pub fn open(data_dir: &Path, config: &StoreConfig) -> Self {
        let backend = FsBackend::new(data_dir.to_path_buf())
            .with_file_names(&config.catalog_file, &config.ledger_file);
        Self::new(
            RecordStore::with_backend(backend),
            Box::new(JsonSubscriptions::new(
                config.subscriptions_path(data_dir),
                config.tier_limits(),
            )),
            Box::new(JsonFeedback::new(config.feedback_path(data_dir))),
        )
    }
}

impl<B: TableBackend> RentalApi<B> {
    pub fn new(
        store: RecordStore<B>,
        subscriptions: Box<dyn SubscriptionService>,
        feedback: Box<dyn FeedbackSource>,
    ) -> Self {
        Self {
            store,
            subscriptions,
            feedback,
        }
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn rent(&self, copy_id: &str, renter_id: &str, on: NaiveDate) -> Result<CmdResult> {
        commands::rent::run(
            &self.store,
            self.subscriptions.as_ref(),
            require(copy_id, "game ID")?,
            require(renter_id, "member ID")?,
            on,
        )
    }

    pub fn return_copy(&self, copy_id: &str, on: NaiveDate) -> Result<CmdResult> {
        commands::return_copy::run(&self.store, require(copy_id, "game ID")?, on)
    }

    pub fn prune(&self, copy_id: &str, also_delete_history: bool) -> Result<CmdResult> {
        commands::prune::run(&self.store, require(copy_id, "game ID")?, also_delete_history)
    }

    pub fn search(&self, field: SearchField, term: &str) -> Result<CmdResult> {
        commands::search::run(&self.store, field, term.trim())
    }

    pub fn show(&self, copy_id: &str) -> Result<CmdResult> {
        commands::show::run(&self.store, require(copy_id, "game ID")?)
    }

    pub fn add_feedback(&self, copy_id: &str, rating: u8, comment: &str) -> Result<CmdResult> {
        commands::feedback::run(
            &self.store,
            self.feedback.as_ref(),
            require(copy_id, "game ID")?,
            rating,
            comment.trim(),
        )
    }

    pub fn report(&self, today: NaiveDate) -> Result<CmdResult> {
        commands::report::run(&self.store, self.feedback.as_ref(), today)
    }
}

fn require<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RentError::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}
