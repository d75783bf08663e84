use crate::collab::SubscriptionService;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{LifecycleError, Result};
use crate::lifecycle;
use crate::store::{RecordStore, TableBackend};
use chrono::NaiveDate;

pub fn run<B: TableBackend, S: SubscriptionService + ?Sized>(
    store: &RecordStore<B>,
    subscriptions: &S,
    copy_id: &str,
    renter_id: &str,
    on: NaiveDate,
) -> Result<CmdResult> {
    match lifecycle::rent(store, subscriptions, copy_id, renter_id, on) {
        Ok(_) => Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Rented {} to {} successfully",
            copy_id, renter_id
        )))),
        Err(LifecycleError::Store(e)) => Err(e.into()),
        Err(rule) => Ok(CmdResult::default().with_message(CmdMessage::error(rule.to_string()))),
    }
}
