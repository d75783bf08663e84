use crate::commands::{CmdMessage, CmdResult, CopyView};
use crate::error::{RentError, Result};
use crate::lifecycle::{RentalHistory, RentalStatus};
use crate::model::{CatalogEntry, RentalRecord};
use crate::store::{RecordStore, TableBackend};
use std::collections::HashMap;
use std::str::FromStr;

/// Catalog column a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Platform,
    Genre,
    Title,
}

impl SearchField {
    fn value<'a>(&self, entry: &'a CatalogEntry) -> &'a str {
        match self {
            SearchField::Platform => &entry.platform,
            SearchField::Genre => &entry.genre,
            SearchField::Title => &entry.title,
        }
    }
}

impl FromStr for SearchField {
    type Err = RentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "platform" => Ok(SearchField::Platform),
            "genre" => Ok(SearchField::Genre),
            "title" | "name" => Ok(SearchField::Title),
            other => Err(RentError::InvalidInput(format!(
                "unknown search field '{}' (expected platform, genre or title)",
                other
            ))),
        }
    }
}

/// Case-insensitive substring search over one catalog column.
pub fn run<B: TableBackend>(
    store: &RecordStore<B>,
    field: SearchField,
    term: &str,
) -> Result<CmdResult> {
    let needle = term.to_lowercase();

    let mut ledger: HashMap<String, Vec<RentalRecord>> = HashMap::new();
    for record in store.ledger()? {
        ledger.entry(record.copy_id.clone()).or_default().push(record);
    }

    let hits: Vec<CopyView> = store
        .catalog()?
        .into_iter()
        .filter(|entry| field.value(entry).to_lowercase().contains(&needle))
        .map(|entry| {
            let status = ledger
                .remove(&entry.copy_id)
                .map(|rows| RentalHistory::from_append_order(rows).status())
                .unwrap_or(RentalStatus::Available);
            CopyView { entry, status }
        })
        .collect();

    let mut result = CmdResult::default();
    if hits.is_empty() {
        result.add_message(CmdMessage::info(format!("No games match \"{}\"", term)));
    }
    Ok(result.with_listed_copies(hits))
}
