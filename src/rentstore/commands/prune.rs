use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PruneError, Result, StoreError};
use crate::lifecycle::RentalStatus;
use crate::model::Table;
use crate::store::{RecordStore, TableBackend};
use tracing::info;

/// What a successful prune removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneOutcome {
    pub catalog_rows: usize,
    pub ledger_rows: usize,
}

/// Remove a copy from the catalog, and its rental history if asked to.
///
/// Refuses while the copy is out. Both tables stay locked from the status
/// check to the last removal.
pub fn prune<B: TableBackend>(
    store: &RecordStore<B>,
    copy_id: &str,
    also_delete_history: bool,
) -> std::result::Result<PruneOutcome, PruneError> {
    let tables = store.lock_tables()?;
    let found = match tables.lookup_by_key(copy_id) {
        Ok(found) if found.catalog.is_some() => found,
        Ok(_) | Err(StoreError::NotFound(_)) => {
            return Err(PruneError::UnknownCopy(copy_id.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    found.rentals.check_invariant(copy_id)?;
    if found.rentals.status() == RentalStatus::Rented {
        return Err(PruneError::CurrentlyRented(copy_id.to_string()));
    }

    let catalog_rows = tables.remove_by_key(Table::Catalog, copy_id)?;
    let ledger_rows = if also_delete_history {
        tables.remove_by_key(Table::Ledger, copy_id)?
    } else {
        0
    };
    info!(copy_id, catalog_rows, ledger_rows, "pruned");
    Ok(PruneOutcome {
        catalog_rows,
        ledger_rows,
    })
}

pub fn run<B: TableBackend>(
    store: &RecordStore<B>,
    copy_id: &str,
    also_delete_history: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match prune(store, copy_id, also_delete_history) {
        Ok(outcome) => {
            result.add_message(CmdMessage::success(format!(
                "Removed {} from game list",
                copy_id
            )));
            if also_delete_history {
                let noun = if outcome.ledger_rows == 1 {
                    "rental"
                } else {
                    "rentals"
                };
                result.add_message(CmdMessage::success(format!(
                    "Removed rental history of {} ({} {})",
                    copy_id, outcome.ledger_rows, noun
                )));
            }
        }
        Err(PruneError::Store(e)) => return Err(e.into()),
        Err(rule) => result.add_message(CmdMessage::error(rule.to_string())),
    }
    Ok(result)
}
