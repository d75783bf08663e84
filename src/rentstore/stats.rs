//! # Statistics
//!
//! Per-copy aggregates joined from the catalog, the ledger and customer
//! feedback, and the store-wide means the scorer compares them against.
//!
//! `avg_rating` is `0.0` for a copy without reviews. That zero is a sentinel,
//! not a score: branch on `review_count` (or use [`Aggregate::rating`]) first.
//!
//! The store-wide rating mean divides by the number of *reviewed* copies,
//! while the rental and review means divide by the whole catalog.

use crate::collab::FeedbackSource;
use crate::error::{Measure, StatsError, StoreError};
use crate::lifecycle::{RentalHistory, RentalStatus};
use crate::model::RentalRecord;
use crate::store::{RecordStore, TableBackend};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Where the latest rental interval of a copy stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LastRental {
    Never,
    Out,
    ReturnedOn(NaiveDate),
}

impl LastRental {
    fn of(history: &RentalHistory) -> Self {
        match (history.status(), history.last_return()) {
            (RentalStatus::Rented, _) => LastRental::Out,
            (RentalStatus::Available, Some(date)) => LastRental::ReturnedOn(date),
            (RentalStatus::Available, None) => LastRental::Never,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub times_rented: usize,
    pub review_count: usize,
    pub avg_rating: f64,
    pub acquired_on: NaiveDate,
    pub last_rental: LastRental,
}

impl Aggregate {
    /// Mean rating, `None` without reviews.
    pub fn rating(&self) -> Option<f64> {
        (self.review_count > 0).then_some(self.avg_rating)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreAverages {
    pub times_rented: f64,
    pub review_count: f64,
    /// `None` when no copy in the store has a review.
    pub rating: Option<f64>,
}

impl StoreAverages {
    pub fn rating(&self) -> Result<f64, StatsError> {
        self.rating.ok_or(StatsError::DivisionUndefined {
            measure: Measure::Rating,
        })
    }
}

/// One aggregate per catalog entry, keyed by copy id.
///
/// Ledger rows and feedback for copies missing from the catalog are ignored.
pub fn compute_aggregates<B: TableBackend, F: FeedbackSource + ?Sized>(
    store: &RecordStore<B>,
    feedback: &F,
) -> Result<BTreeMap<String, Aggregate>, StoreError> {
    let (catalog, rows) = {
        let tables = store.lock_tables()?;
        (tables.catalog()?, tables.ledger()?)
    };

    let mut ledger: HashMap<String, Vec<RentalRecord>> = HashMap::new();
    for record in rows {
        ledger.entry(record.copy_id.clone()).or_default().push(record);
    }

    let mut ratings: HashMap<String, (usize, u32)> = HashMap::new();
    for entry in feedback.load_all()? {
        let slot = ratings.entry(entry.copy_id).or_default();
        slot.0 += 1;
        slot.1 += u32::from(entry.rating);
    }

    let mut aggregates = BTreeMap::new();
    for entry in catalog {
        let history =
            RentalHistory::from_append_order(ledger.remove(&entry.copy_id).unwrap_or_default());
        history.check_invariant(&entry.copy_id)?;

        let (review_count, rating_sum) = ratings.get(&entry.copy_id).copied().unwrap_or((0, 0));
        let avg_rating = if review_count == 0 {
            0.0
        } else {
            f64::from(rating_sum) / review_count as f64
        };

        aggregates.insert(
            entry.copy_id,
            Aggregate {
                times_rented: history.len(),
                review_count,
                avg_rating,
                acquired_on: entry.acquired_on,
                last_rental: LastRental::of(&history),
            },
        );
    }

    debug!(copies = aggregates.len(), "computed aggregates");
    Ok(aggregates)
}

/// Store-wide means.
///
/// Fails only for an empty catalog. A catalog without any review still
/// succeeds, with `rating: None`.
pub fn compute_store_averages(
    aggregates: &BTreeMap<String, Aggregate>,
) -> Result<StoreAverages, StatsError> {
    if aggregates.is_empty() {
        return Err(StatsError::DivisionUndefined {
            measure: Measure::TimesRented,
        });
    }

    let total = aggregates.len() as f64;
    let rented: usize = aggregates.values().map(|a| a.times_rented).sum();
    let reviews: usize = aggregates.values().map(|a| a.review_count).sum();

    let reviewed: Vec<f64> = aggregates.values().filter_map(Aggregate::rating).collect();
    let rating = if reviewed.is_empty() {
        None
    } else {
        Some(reviewed.iter().sum::<f64>() / reviewed.len() as f64)
    };

    Ok(StoreAverages {
        times_rented: rented as f64 / total,
        review_count: reviews as f64 / total,
        rating,
    })
}
