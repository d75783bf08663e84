use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LifecycleError, Result};
use crate::lifecycle;
use crate::store::{RecordStore, TableBackend};
use chrono::NaiveDate;

pub fn run<B: TableBackend>(
    store: &RecordStore<B>,
    copy_id: &str,
    on: NaiveDate,
) -> Result<CmdResult> {
    match lifecycle::return_copy(store, copy_id, on) {
        Ok(()) => Ok(CmdResult::default()
            .with_message(CmdMessage::success(format!("Returned {} successfully", copy_id)))),
        Err(LifecycleError::Store(e)) => Err(e.into()),
        Err(rule) => Ok(CmdResult::default().with_message(CmdMessage::error(rule.to_string()))),
    }
}
