//! # Unpopularity Scoring
//!
//! Three independent signals add up to a score; a copy scoring
//! [`FLAG_THRESHOLD`] or more is flagged for possible removal.
//!
//! | Signal | Applies when | Points |
//! |--------|--------------|--------|
//! | rating | copy has reviews | 2 if `avg <= store - 2`, else 1 if `avg < store` |
//! | frequency | copy was rented | 1 if rented less than the store mean |
//! | recency | copy was rented and is back on the shelf | 2 if last return `> 30` days ago, else 1 if `> 14` |
//!
//! A copy that was never rented is presumed too new to judge: the frequency
//! and recency signals skip it. A copy that is out right now has no recency.

use crate::stats::{Aggregate, LastRental, StoreAverages};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const FLAG_THRESHOLD: u8 = 2;

/// Days since the latest return, as reported for flagged copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinceReturn {
    NeverRented,
    Out,
    Days(i64),
}

impl fmt::Display for SinceReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinceReturn::NeverRented => f.write_str("N/A"),
            SinceReturn::Out => f.write_str("out"),
            SinceReturn::Days(days) => write!(f, "{}", days),
        }
    }
}

/// Points contributed by each signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub rating: u8,
    pub frequency: u8,
    pub recency: u8,
}

impl Signals {
    pub fn total(&self) -> u8 {
        self.rating + self.frequency + self.recency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredStats {
    pub signals: Signals,
    pub review_count: usize,
    pub avg_rating: f64,
    pub times_rented: usize,
    pub since_return: SinceReturn,
    pub days_owned: i64,
}

impl ScoredStats {
    pub fn score(&self) -> u8 {
        self.signals.total()
    }
}

fn since_return(agg: &Aggregate, today: NaiveDate) -> SinceReturn {
    match agg.last_rental {
        LastRental::Never => SinceReturn::NeverRented,
        LastRental::Out => SinceReturn::Out,
        LastRental::ReturnedOn(date) => SinceReturn::Days((today - date).num_days()),
    }
}

fn rating_signal(agg: &Aggregate, averages: &StoreAverages) -> u8 {
    let (Some(rating), Ok(store)) = (agg.rating(), averages.rating()) else {
        return 0;
    };
    if rating <= store - 2.0 {
        2
    } else if rating < store {
        1
    } else {
        0
    }
}

fn frequency_signal(agg: &Aggregate, averages: &StoreAverages) -> u8 {
    if agg.times_rented > 0 && (agg.times_rented as f64) < averages.times_rented {
        1
    } else {
        0
    }
}

fn recency_signal(since: SinceReturn) -> u8 {
    match since {
        SinceReturn::Days(days) if days > 30 => 2,
        SinceReturn::Days(days) if days > 14 => 1,
        _ => 0,
    }
}

/// Score one copy against the store averages.
pub fn score_copy(agg: &Aggregate, averages: &StoreAverages, today: NaiveDate) -> Signals {
    Signals {
        rating: rating_signal(agg, averages),
        frequency: frequency_signal(agg, averages),
        recency: recency_signal(since_return(agg, today)),
    }
}

/// Copies whose score reaches [`FLAG_THRESHOLD`].
pub fn flag_unpopular(
    aggregates: &BTreeMap<String, Aggregate>,
    averages: &StoreAverages,
    today: NaiveDate,
) -> BTreeMap<String, ScoredStats> {
    aggregates
        .iter()
        .filter_map(|(copy_id, agg)| {
            let signals = score_copy(agg, averages, today);
            (signals.total() >= FLAG_THRESHOLD).then(|| {
                (
                    copy_id.clone(),
                    ScoredStats {
                        signals,
                        review_count: agg.review_count,
                        avg_rating: agg.avg_rating,
                        times_rented: agg.times_rented,
                        since_return: since_return(agg, today),
                        days_owned: (today - agg.acquired_on).num_days(),
                    },
                )
            })
        })
        .collect()
}

fn demand_note(stats: &ScoredStats) -> Option<String> {
    if stats.times_rented == 0 {
        return Some("Game has never been rented: no demand data yet.".to_string());
    }
    let interval = stats.days_owned as f64 / stats.times_rented as f64;
    if interval <= 14.0 {
        Some(format!(
            "Game is rented often, on average every {:.1} days: demand is high, removal not advised.",
            interval
        ))
    } else if interval > 30.0 {
        Some(format!(
            "Game is not rented often, on average every {:.1} days: demand is low.",
            interval
        ))
    } else {
        None
    }
}

fn review_note(stats: &ScoredStats, averages: &StoreAverages) -> Option<String> {
    if stats.review_count == 0 || (stats.review_count as f64) < averages.review_count - 1.0 {
        return Some(
            "Game has few reviews: its average score may be an inaccurate representation."
                .to_string(),
        );
    }
    let store = averages.rating().ok()?;
    if stats.avg_rating >= store + 1.0 {
        Some("Game has a good average score: removal not advised.".to_string())
    } else if stats.avg_rating <= store - 1.0 {
        Some("Game has a below average score: removal advised.".to_string())
    } else {
        None
    }
}

fn tenure_note(stats: &ScoredStats) -> String {
    if stats.days_owned < 30 {
        "Store has owned game for less than 30 days: allow more time for rentals.".to_string()
    } else {
        "Store has owned game for 30 days or more: if demand is low, consider removal."
            .to_string()
    }
}

/// Plain-language advice for each flagged copy, one sentence per line.
pub fn explain(
    flagged: &BTreeMap<String, ScoredStats>,
    averages: &StoreAverages,
) -> BTreeMap<String, String> {
    flagged
        .iter()
        .map(|(copy_id, stats)| {
            let lines: Vec<String> = [
                demand_note(stats),
                review_note(stats, averages),
                Some(tenure_note(stats)),
            ]
            .into_iter()
            .flatten()
            .collect();
            (copy_id.clone(), lines.join("\n"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today() - Days::new(n)
    }

    fn agg(times_rented: usize, review_count: usize, avg_rating: f64, last: LastRental) -> Aggregate {
        Aggregate {
            times_rented,
            review_count,
            avg_rating,
            acquired_on: days_ago(40),
            last_rental: last,
        }
    }

    fn averages(times_rented: f64, review_count: f64, rating: Option<f64>) -> StoreAverages {
        StoreAverages {
            times_rented,
            review_count,
            rating,
        }
    }

    #[test]
    fn recent_return_adds_no_recency() {
        let a = agg(1, 0, 0.0, LastRental::ReturnedOn(days_ago(10)));
        let signals = score_copy(&a, &averages(1.0, 0.0, None), today());
        assert_eq!(signals.recency, 0);
    }

    #[test]
    fn stale_and_rarely_rented_copy_is_flagged() {
        let a = agg(1, 0, 0.0, LastRental::ReturnedOn(days_ago(40)));
        let avgs = averages(5.0, 0.0, None);
        let signals = score_copy(&a, &avgs, today());
        assert_eq!(signals.recency, 2);
        assert_eq!(signals.frequency, 1);

        let aggs = BTreeMap::from([("g1".to_string(), a)]);
        let flagged = flag_unpopular(&aggs, &avgs, today());
        let g1 = &flagged["g1"];
        assert_eq!(g1.score(), 3);
        assert_eq!(g1.since_return, SinceReturn::Days(40));
        assert_eq!(g1.days_owned, 40);
    }

    #[test]
    fn recency_boundaries() {
        let avgs = averages(0.0, 0.0, None);
        let at = |n| score_copy(&agg(1, 0, 0.0, LastRental::ReturnedOn(days_ago(n))), &avgs, today()).recency;
        assert_eq!(at(14), 0);
        assert_eq!(at(15), 1);
        assert_eq!(at(30), 1);
        assert_eq!(at(31), 2);
    }

    #[test]
    fn never_rented_copy_is_exempt_from_rental_signals() {
        let a = agg(0, 0, 0.0, LastRental::Never);
        let signals = score_copy(&a, &averages(5.0, 1.0, Some(3.0)), today());
        assert_eq!(signals, Signals::default());
    }

    #[test]
    fn copy_that_is_out_has_no_recency() {
        let a = agg(1, 0, 0.0, LastRental::Out);
        let signals = score_copy(&a, &averages(5.0, 0.0, None), today());
        assert_eq!(signals.recency, 0);
        assert_eq!(signals.frequency, 1);
    }

    #[test]
    fn rating_signal_thresholds() {
        let avgs = averages(0.0, 1.0, Some(4.0));
        let rate = |r| score_copy(&agg(0, 3, r, LastRental::Never), &avgs, today()).rating;
        assert_eq!(rate(2.0), 2);
        assert_eq!(rate(2.5), 1);
        assert_eq!(rate(4.0), 0);
        assert_eq!(rate(4.5), 0);
    }

    #[test]
    fn unreviewed_copy_gets_no_rating_points() {
        let a = agg(0, 0, 0.0, LastRental::Never);
        assert_eq!(score_copy(&a, &averages(0.0, 1.0, Some(4.0)), today()).rating, 0);
    }

    #[test]
    fn single_point_is_not_flagged() {
        let aggs = BTreeMap::from([(
            "g1".to_string(),
            agg(1, 0, 0.0, LastRental::ReturnedOn(days_ago(20))),
        )]);
        assert!(flag_unpopular(&aggs, &averages(1.0, 0.0, None), today()).is_empty());
    }

    fn stats(times_rented: usize, review_count: usize, avg_rating: f64, days_owned: i64) -> ScoredStats {
        ScoredStats {
            signals: Signals::default(),
            review_count,
            avg_rating,
            times_rented,
            since_return: SinceReturn::Days(40),
            days_owned,
        }
    }

    fn explain_one(s: ScoredStats, avgs: &StoreAverages) -> String {
        let flagged = BTreeMap::from([("g1".to_string(), s)]);
        explain(&flagged, avgs).remove("g1").unwrap()
    }

    #[test]
    fn explains_low_demand_and_below_average_score() {
        let avgs = averages(3.0, 2.0, Some(4.0));
        let text = explain_one(stats(2, 3, 2.5, 100), &avgs);
        assert_eq!(
            text,
            "Game is not rented often, on average every 50.0 days: demand is low.\n\
             Game has a below average score: removal advised.\n\
             Store has owned game for 30 days or more: if demand is low, consider removal."
        );
    }

    #[test]
    fn explains_high_demand_and_good_score() {
        let avgs = averages(3.0, 2.0, Some(3.0));
        let text = explain_one(stats(2, 2, 4.0, 20), &avgs);
        assert!(text.contains("every 10.0 days: demand is high"));
        assert!(text.contains("good average score"));
        assert!(text.ends_with("allow more time for rentals."));
    }

    #[test]
    fn explains_insufficient_reviews() {
        let avgs = averages(3.0, 4.0, Some(3.0));
        let text = explain_one(stats(2, 2, 1.0, 45), &avgs);
        assert!(text.contains("few reviews"));
        assert!(!text.contains("average score:"));
        // 22.5 days between rentals is neither high nor low demand.
        assert!(!text.contains("days: demand"));
    }

    #[test]
    fn explains_never_rented_without_dividing_by_zero() {
        let avgs = averages(3.0, 0.5, Some(4.0));
        let text = explain_one(stats(0, 1, 1.0, 45), &avgs);
        assert!(text.starts_with("Game has never been rented"));
        assert!(text.contains("below average score"));
    }

    #[test]
    fn demand_note_boundaries() {
        let avgs = averages(3.0, 2.0, Some(3.0));
        // (times rented, days owned) -> demand wording, if any.
        let cases: [(usize, i64, Option<&str>); 5] = [
            (2, 28, Some("every 14.0 days: demand is high")),
            (2, 29, None),
            (2, 60, None),
            (2, 61, Some("every 30.5 days: demand is low")),
            (1, 30, None),
        ];
        for (times, owned, expected) in cases {
            let text = explain_one(stats(times, 2, 3.0, owned), &avgs);
            match expected {
                Some(note) => assert!(text.contains(note), "{times}/{owned}: {text}"),
                None => assert!(!text.contains("days: demand"), "{times}/{owned}: {text}"),
            }
        }
    }

    #[test]
    fn review_note_boundaries() {
        let avgs = averages(3.0, 4.0, Some(3.0));
        // (review count, copy rating) -> review wording, if any.
        let cases: [(usize, f64, Option<&str>); 6] = [
            (2, 3.0, Some("few reviews")),
            (3, 4.0, Some("good average score")),
            (3, 2.0, Some("below average score")),
            (4, 3.9, None),
            (4, 2.1, None),
            (0, 5.0, Some("few reviews")),
        ];
        for (reviews, rating, expected) in cases {
            let text = explain_one(stats(2, reviews, rating, 40), &avgs);
            for note in ["few reviews", "good average score", "below average score"] {
                assert_eq!(
                    text.contains(note),
                    expected == Some(note),
                    "{reviews} reviews at {rating}: {text}"
                );
            }
        }
    }

    #[test]
    fn mid_range_copy_gets_only_the_tenure_line() {
        let avgs = averages(3.0, 4.0, Some(3.0));
        let text = explain_one(stats(2, 4, 3.5, 40), &avgs);
        assert_eq!(
            text,
            "Store has owned game for 30 days or more: if demand is low, consider removal."
        );
    }
}
