use crate::collab::FeedbackSource;
use crate::commands::{CmdMessage, CmdResult, UnpopularReport};
use crate::error::{Result, StatsError};
use crate::scoring::{explain, flag_unpopular};
use crate::stats::{compute_aggregates, compute_store_averages};
use crate::store::{RecordStore, TableBackend};
use chrono::NaiveDate;

/// Store averages, the copies flagged as unpopular, and advice for each.
pub fn run<B: TableBackend, F: FeedbackSource + ?Sized>(
    store: &RecordStore<B>,
    feedback: &F,
    today: NaiveDate,
) -> Result<CmdResult> {
    let aggregates = compute_aggregates(store, feedback)?;
    let averages = match compute_store_averages(&aggregates) {
        Ok(averages) => averages,
        Err(StatsError::DivisionUndefined { .. }) => {
            return Ok(CmdResult::default()
                .with_message(CmdMessage::info("The catalog is empty: nothing to analyse.")))
        }
    };

    let mut result = CmdResult::default();
    if averages.rating.is_none() {
        result.add_message(CmdMessage::info(
            "No reviews yet: copies are scored on rentals only.",
        ));
    }

    let flagged = flag_unpopular(&aggregates, &averages, today);
    if flagged.is_empty() {
        result.add_message(CmdMessage::success("No unpopular games found."));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "{} of {} games flagged as unpopular",
            flagged.len(),
            aggregates.len()
        )));
    }

    let advice = explain(&flagged, &averages);
    result.report = Some(UnpopularReport {
        averages,
        flagged,
        advice,
    });
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{FeedbackEntry, MemFeedback};
    use crate::model::Table;
    use crate::store::mem_backend::MemBackend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn store() -> RecordStore<MemBackend> {
        RecordStore::with_backend(
            MemBackend::new()
                .with_lines(
                    Table::Catalog,
                    [
                        "hot01,PS5,Sports,FIFA,New,2024-05-01",
                        "old01,PS4,Racing,Gran Turismo,Worn,2024-01-01",
                        "new01,PS5,Puzzle,Tetris,New,2024-05-30",
                    ],
                )
                .with_lines(
                    Table::Ledger,
                    [
                        "hot01,2024-05-02,2024-05-05,a",
                        "hot01,2024-05-06,2024-05-10,b",
                        "hot01,2024-05-11,2024-05-20,c",
                        "hot01,2024-05-21,2024-05-30,d",
                        "old01,2024-01-05,2024-01-20,a",
                    ],
                ),
        )
    }

    #[test]
    fn flags_stale_copy_and_explains_it() {
        let feedback = MemFeedback::with_entries(vec![
            FeedbackEntry::new("hot01", 5, ""),
            FeedbackEntry::new("old01", 2, ""),
        ]);
        let result = run(&store(), &feedback, today()).unwrap();
        let report = result.report.unwrap();

        assert_eq!(report.flagged.keys().collect::<Vec<_>>(), vec!["old01"]);
        let old = &report.flagged["old01"];
        // below store rating, rented less than average, returned > 30 days ago
        assert_eq!((old.signals.rating, old.signals.frequency, old.signals.recency), (1, 1, 2));
        assert!(report.advice["old01"].contains("demand is low"));
    }

    #[test]
    fn store_without_reviews_still_reports() {
        let result = run(&store(), &MemFeedback::new(), today()).unwrap();
        assert!(result.messages[0].content.starts_with("No reviews yet"));
        assert!(result.report.unwrap().flagged.contains_key("old01"));
    }

    #[test]
    fn empty_catalog() {
        let store = RecordStore::with_backend(MemBackend::new());
        let result = run(&store, &MemFeedback::new(), today()).unwrap();
        assert!(result.report.is_none());
        assert!(!result.has_errors());
    }
}
