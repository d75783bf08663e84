//! Seeded in-memory environment for tests of this crate and its dependents.

use crate::api::RentalApi;
use crate::collab::{MemFeedback, StaticSubscriptions, SubscriptionTier};
use crate::model::Table;
use crate::store::mem_backend::MemBackend;
use crate::store::RecordStore;

/// Catalog rows shared by the seeded environment.
pub const SAMPLE_CATALOG: [&str; 4] = [
    "cod01,PS4,Shooter,Call of Duty,Good,2023-09-01",
    "fifa07,PS5,Sports,FIFA,New,2024-01-10",
    "gt01,PS4,Racing,Gran Turismo,Worn,2023-06-15",
    "drg01,PC,RPG,Dragon Age,Good,2023-11-01",
];

pub struct TestEnv {
    pub api: RentalApi<MemBackend>,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// Sample catalog, an empty ledger and three subscribers: `anna` (basic),
    /// `bigi` (standard) and `cora` (premium).
    pub fn new() -> Self {
        Self::with_ledger(std::iter::empty::<&str>())
    }

    pub fn with_ledger<I, S>(ledger: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = MemBackend::new()
            .with_lines(Table::Catalog, SAMPLE_CATALOG)
            .with_lines(Table::Ledger, ledger);
        let subscriptions = StaticSubscriptions::new()
            .with_subscriber("anna", SubscriptionTier::Basic)
            .with_subscriber("bigi", SubscriptionTier::Standard)
            .with_subscriber("cora", SubscriptionTier::Premium);
        Self {
            api: RentalApi::new(
                RecordStore::with_backend(backend),
                Box::new(subscriptions),
                Box::new(MemFeedback::new()),
            ),
        }
    }

    pub fn store(&self) -> &RecordStore<MemBackend> {
        self.api.store()
    }
}
