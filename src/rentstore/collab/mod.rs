//! # Collaborators
//!
//! Services the core consumes but does not own: who may rent and how many
//! copies at once, and what customers thought of a copy.
//!
//! Each is a trait with a JSON-file implementation for the binary and an
//! in-memory one for tests. Like the tables, the files are re-read on every
//! call.

pub mod feedback;
pub mod subscriptions;

pub use feedback::{FeedbackEntry, FeedbackSource, JsonFeedback, MemFeedback};
pub use subscriptions::{
    JsonSubscriptions, StaticSubscriptions, SubscriptionService, SubscriptionTier, TierLimits,
};

use crate::error::StoreError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Write `value` as pretty JSON through a temp file in the same directory.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    let tmp = dir.join(format!(".collab-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp, content)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn failed_json_write_cleans_up_its_tmp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("feedback.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();

        assert!(write_json_atomic(&target, &["x"]).is_err());

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["feedback.json"]);
    }
}
