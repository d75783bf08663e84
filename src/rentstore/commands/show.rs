use crate::commands::{CmdMessage, CmdResult, CopyView};
use crate::error::{Result, StoreError};
use crate::store::{RecordStore, TableBackend};

pub fn run<B: TableBackend>(store: &RecordStore<B>, copy_id: &str) -> Result<CmdResult> {
    let found = match store.lookup_by_key(copy_id) {
        Ok(found) => found,
        Err(StoreError::NotFound(_)) => {
            return Ok(CmdResult::default()
                .with_message(CmdMessage::error(format!("{} not found in database", copy_id))))
        }
        Err(e) => return Err(e.into()),
    };

    let mut result = CmdResult::default();
    let status = found.rentals.status();
    match found.catalog {
        Some(entry) => result.listed_copies.push(CopyView { entry, status }),
        None => result.add_message(CmdMessage::warning(format!(
            "{} is no longer in the catalog; showing rental history only",
            copy_id
        ))),
    }
    if found.rentals.is_empty() {
        result.add_message(CmdMessage::info(format!("{} has never been rented", copy_id)));
    }
    result.history = found.rentals.iter().cloned().collect();
    Ok(result)
}
