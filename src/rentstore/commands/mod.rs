//! # Command Layer
//!
//! Each store operation a user can trigger lives in its own submodule as a
//! `run` function over a [`RecordStore`](crate::store::RecordStore) and the
//! collaborators it needs.
//!
//! Commands return a [`CmdResult`] instead of printing: the copies to list,
//! a rental history, an unpopularity report, and leveled messages. The UI
//! decides how to render them.
//!
//! ## Errors
//!
//! Business-rule failures (renting a copy that is out, pruning an unknown copy,
//! a rating outside 1-5) are not errors at this layer: they come back as
//! [`MessageLevel::Error`] messages so a UI can show them as-is. Storage
//! failures and broken ledger invariants are returned as `Err`.
//!
//! ## Command Modules
//!
//! - [`rent`]: Rent a copy to a subscriber
//! - [`return_copy`]: Close a copy's open rental
//! - [`prune`]: Remove a copy, optionally with its rental history
//! - [`search`]: Find copies by platform, genre or title
//! - [`show`]: A copy's catalog entry and rental history
//! - [`feedback`]: Record a customer rating
//! - [`report`]: Store averages, flagged copies and removal advice

use crate::lifecycle::RentalStatus;
use crate::model::{CatalogEntry, RentalRecord};
use crate::scoring::ScoredStats;
use crate::stats::StoreAverages;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod feedback;
pub mod prune;
pub mod rent;
pub mod report;
pub mod return_copy;
pub mod search;
pub mod show;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A catalog entry together with whether it is on the shelf.
#[derive(Debug, Clone, Serialize)]
pub struct CopyView {
    pub entry: CatalogEntry,
    pub status: RentalStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnpopularReport {
    pub averages: StoreAverages,
    pub flagged: BTreeMap<String, ScoredStats>,
    pub advice: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub listed_copies: Vec<CopyView>,
    pub history: Vec<RentalRecord>,
    pub report: Option<UnpopularReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_listed_copies(mut self, copies: Vec<CopyView>) -> Self {
        self.listed_copies = copies;
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
