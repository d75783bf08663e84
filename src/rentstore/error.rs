use crate::model::Table;
use thiserror::Error;

/// Failures of the storage layer and of the collaborator files it shares a
/// format family with.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed {table} row at line {line}: {reason}")]
    Malformed {
        table: Table,
        line: usize,
        reason: String,
    },

    #[error("Cannot store {field} value {value:?}: commas and newlines are not representable")]
    Unencodable { field: &'static str, value: String },

    #[error("No record found for {0}")]
    NotFound(String),

    #[error("Ledger invariant violated for {copy_id}: {detail}")]
    InvariantViolation { copy_id: String, detail: String },

    #[error("Table guard poisoned for {0}")]
    Poisoned(Table),

    #[error("Lock poisoned for {0}")]
    CollaboratorPoisoned(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Business-rule violations raised by rent and return.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("{0} is not in the catalog")]
    UnknownCopy(String),

    #[error("{0} does not have a valid subscription")]
    InvalidSubscriber(String),

    #[error("{0} is already being rented")]
    AlreadyRented(String),

    #[error("{0} is not currently being rented")]
    NotRented(String),

    #[error("{renter_id} is renting the maximum number of games ({active} of {limit})")]
    LimitExceeded {
        renter_id: String,
        limit: u32,
        active: usize,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which store-wide mean could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    TimesRented,
    ReviewCount,
    Rating,
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Measure::TimesRented => "times rented",
            Measure::ReviewCount => "review count",
            Measure::Rating => "rating",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Average {measure} is undefined: no data to average")]
    DivisionUndefined { measure: Measure },
}

#[derive(Error, Debug)]
pub enum PruneError {
    #[error("{0} not found in database")]
    UnknownCopy(String),

    #[error("{0} is currently being rented")]
    CurrentlyRented(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Crate-level error returned by the API facade.
#[derive(Error, Debug)]
pub enum RentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Prune(#[from] PruneError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for RentError {
    fn from(err: std::io::Error) -> Self {
        RentError::Store(StoreError::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, RentError>;
