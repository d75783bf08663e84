//! # Rental Lifecycle
//!
//! Each copy is either `Available` or `Rented`. The ledger is the only state:
//! a copy is rented when the latest ledger row for it (in append order) has no
//! return date.
//!
//! ```text
//!             rent(copy, renter, date)
//!  Available ───────────────────────────▶ Rented
//!      ▲                                    │
//!      └────────────────────────────────────┘
//!             return_copy(copy, date)
//! ```
//!
//! At most one ledger row per copy may be open. Histories that break this are
//! reported as [`StoreError::InvariantViolation`] and left as they are.

use crate::collab::SubscriptionService;
use crate::error::{LifecycleError, StoreError};
use crate::model::RentalRecord;
use crate::store::{LockedTables, RecordStore, TableBackend};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Available,
    Rented,
}

/// The ledger rows of one copy, ordered as they were appended.
///
/// Append order is chronological order; [`RentalHistory::latest`] is always
/// the most recently appended row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RentalHistory {
    records: Vec<RentalRecord>,
}

impl RentalHistory {
    /// `records` must already be in append order.
    pub fn from_append_order(records: Vec<RentalRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RentalRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&RentalRecord> {
        self.records.last()
    }

    pub fn open_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_open()).count()
    }

    pub fn status(&self) -> RentalStatus {
        match self.latest() {
            Some(rec) if rec.is_open() => RentalStatus::Rented,
            _ => RentalStatus::Available,
        }
    }

    /// Return date of the latest row, `None` if never rented or currently out.
    pub fn last_return(&self) -> Option<NaiveDate> {
        self.latest().and_then(|r| r.returned_on)
    }

    /// At most one open row, and only as the latest row.
    pub fn check_invariant(&self, copy_id: &str) -> Result<(), StoreError> {
        let open = self.open_count();
        let latest_open = self.status() == RentalStatus::Rented;
        if open > 1 || (open == 1 && !latest_open) {
            warn!(copy_id, open, "ledger invariant violated");
            return Err(StoreError::InvariantViolation {
                copy_id: copy_id.to_string(),
                detail: format!(
                    "{} open rentals, latest row {}",
                    open,
                    if latest_open { "open" } else { "closed" }
                ),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RentalHistory {
    type Item = &'a RentalRecord;
    type IntoIter = std::slice::Iter<'a, RentalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Looks up a copy that must be in the catalog and returns its history.
fn catalogued_history<B: TableBackend>(
    tables: &LockedTables<'_, B>,
    copy_id: &str,
) -> Result<RentalHistory, LifecycleError> {
    match tables.lookup_by_key(copy_id) {
        Ok(found) if found.catalog.is_some() => {
            found.rentals.check_invariant(copy_id)?;
            Ok(found.rentals)
        }
        Ok(_) | Err(StoreError::NotFound(_)) => {
            Err(LifecycleError::UnknownCopy(copy_id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn open_rentals_of(ledger: &[RentalRecord], renter_id: &str) -> usize {
    ledger
        .iter()
        .filter(|r| r.renter_id == renter_id && r.is_open())
        .count()
}

/// Whether `copy_id` is out right now.
pub fn status<B: TableBackend>(
    store: &RecordStore<B>,
    copy_id: &str,
) -> Result<RentalStatus, LifecycleError> {
    let tables = store.lock_tables()?;
    Ok(catalogued_history(&tables, copy_id)?.status())
}

/// Number of open rentals held by `renter_id` across all copies.
pub fn active_rentals<B: TableBackend>(
    store: &RecordStore<B>,
    renter_id: &str,
) -> Result<usize, StoreError> {
    Ok(open_rentals_of(&store.ledger()?, renter_id))
}

/// Available → Rented. Appends an open rental row on success.
///
/// Both tables stay locked from the first read to the append, so two
/// callers can never both see the copy as available.
pub fn rent<B: TableBackend, S: SubscriptionService + ?Sized>(
    store: &RecordStore<B>,
    subscriptions: &S,
    copy_id: &str,
    renter_id: &str,
    on: NaiveDate,
) -> Result<RentalRecord, LifecycleError> {
    let tables = store.lock_tables()?;
    let history = catalogued_history(&tables, copy_id)?;

    let tier = subscriptions
        .subscriber(renter_id)?
        .ok_or_else(|| LifecycleError::InvalidSubscriber(renter_id.to_string()))?;

    if history.status() == RentalStatus::Rented {
        return Err(LifecycleError::AlreadyRented(copy_id.to_string()));
    }

    let limit = subscriptions.limit_for(tier);
    let active = open_rentals_of(&tables.ledger()?, renter_id);
    if active >= limit as usize {
        return Err(LifecycleError::LimitExceeded {
            renter_id: renter_id.to_string(),
            limit,
            active,
        });
    }

    let record = RentalRecord::open(copy_id, renter_id, on);
    tables.append(&record)?;
    info!(copy_id, renter_id, %on, "rented");
    Ok(record)
}

/// Rented → Available. Closes the open rental row.
pub fn return_copy<B: TableBackend>(
    store: &RecordStore<B>,
    copy_id: &str,
    on: NaiveDate,
) -> Result<(), LifecycleError> {
    let tables = store.lock_tables()?;
    let history = catalogued_history(&tables, copy_id)?;
    if history.status() != RentalStatus::Rented {
        return Err(LifecycleError::NotRented(copy_id.to_string()));
    }
    tables.set_return_date(copy_id, on)?;
    info!(copy_id, %on, "returned");
    Ok(())
}
