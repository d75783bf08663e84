use crate::collab::feedback::{MAX_RATING, MIN_RATING};
use crate::collab::{FeedbackEntry, FeedbackSource};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{RecordStore, TableBackend};

/// Record a rating for a catalogued copy.
pub fn run<B: TableBackend, F: FeedbackSource + ?Sized>(
    store: &RecordStore<B>,
    feedback: &F,
    copy_id: &str,
    rating: u8,
    comment: &str,
) -> Result<CmdResult> {
    let known = store.catalog()?.iter().any(|e| e.copy_id == copy_id);
    if !known {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::error(format!("{} is not in the catalog", copy_id))));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Ok(CmdResult::default().with_message(CmdMessage::error(format!(
            "Rating must be a number from {} to {}",
            MIN_RATING, MAX_RATING
        ))));
    }

    feedback.add(FeedbackEntry::new(copy_id, rating, comment))?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Added feedback for {}", copy_id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::MemFeedback;
    use crate::model::Table;
    use crate::store::mem_backend::MemBackend;

    fn store() -> RecordStore<MemBackend> {
        RecordStore::with_backend(
            MemBackend::new().with_lines(Table::Catalog, ["fifa07,PS5,Sports,FIFA,New,2024-01-01"]),
        )
    }

    #[test]
    fn stores_valid_feedback() {
        let feedback = MemFeedback::new();
        let result = run(&store(), &feedback, "fifa07", 4, "Great!").unwrap();
        assert!(!result.has_errors());
        assert_eq!(
            feedback.load_all().unwrap(),
            vec![FeedbackEntry::new("fifa07", 4, "Great!")]
        );
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let feedback = MemFeedback::new();
        for rating in [0, 6] {
            let result = run(&store(), &feedback, "fifa07", rating, "").unwrap();
            assert!(result.has_errors());
        }
        assert!(feedback.load_all().unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_copy() {
        let feedback = MemFeedback::new();
        let result = run(&store(), &feedback, "nope", 3, "").unwrap();
        assert!(result.has_errors());
    }
}
