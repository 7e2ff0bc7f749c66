//! Sentiment trends over calendar months and years.
//!
//! Both series read the whole history of one entity and ignore any date
//! range chosen for the other views. Buckets between the first and last
//! populated key are zero-filled.

use std::collections::BTreeMap;

use chrono::Months;
use review_core::models::{Aggregate, ReviewRecord, SentimentCounts, YearMonth};
use serde::Serialize;
use tracing::debug;

use crate::normalizer::NormalizedTable;

/// Length of the monthly trend window, counted back from the latest review.
pub const TRAILING_MONTHS: u32 = 12;

/// Sentiment counts for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint<K> {
    pub key: K,
    pub counts: SentimentCounts,
}

/// Buckets in ascending key order, or `Empty` when nothing qualified.
pub type OrderedSeries<K> = Aggregate<Vec<TrendPoint<K>>>;

// ── Bucket keys ───────────────────────────────────────────────────────────────

/// A bucket key that can enumerate its successors for zero-filling.
pub trait BucketKey: Ord + Copy {
    fn next(self) -> Self;
}

impl BucketKey for YearMonth {
    fn next(self) -> Self {
        self.succ()
    }
}

impl BucketKey for i32 {
    fn next(self) -> Self {
        self + 1
    }
}

// ── TemporalAggregator ────────────────────────────────────────────────────────

/// Monthly sentiment counts for `entity` over the trailing twelve months.
///
/// The window runs from twelve calendar months before the entity's latest
/// review up to that review, inclusive. Day-of-month overflow clamps to the
/// last day of the target month.
pub fn monthly_trend(table: &NormalizedTable, entity: &str) -> OrderedSeries<YearMonth> {
    let Some(latest) = table.entity_records(entity).filter_map(|r| r.timestamp).max() else {
        debug!("No dated reviews for {:?}; monthly trend is empty", entity);
        return Aggregate::Empty;
    };
    let cutoff = latest
        .checked_sub_months(Months::new(TRAILING_MONTHS))
        .unwrap_or(latest);

    let window = table
        .entity_records(entity)
        .filter(|r| r.timestamp.is_some_and(|ts| ts >= cutoff));
    bucket_series(window, |r| r.year_month)
}

/// Yearly sentiment counts over the full history of `entity`.
pub fn yearly_trend(table: &NormalizedTable, entity: &str) -> OrderedSeries<i32> {
    bucket_series(table.entity_records(entity), |r| r.year)
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Generic group-by-then-count driver.
///
/// `key_fn` yields the bucket of a record; records without a bucket or
/// without a sentiment are skipped.
fn bucket_series<'a, K: BucketKey>(
    records: impl Iterator<Item = &'a ReviewRecord>,
    key_fn: impl Fn(&ReviewRecord) -> Option<K>,
) -> OrderedSeries<K> {
    // BTreeMap keeps the keys sorted.
    let mut map: BTreeMap<K, SentimentCounts> = BTreeMap::new();

    for record in records {
        let (Some(key), Some(sentiment)) = (key_fn(record), record.sentiment) else {
            continue;
        };
        map.entry(key).or_default().record(sentiment);
    }

    let (Some(&first), Some(&last)) = (map.keys().next(), map.keys().next_back()) else {
        return Aggregate::Empty;
    };

    let mut series = Vec::with_capacity(map.len());
    let mut key = first;
    loop {
        series.push(TrendPoint {
            key,
            counts: map.get(&key).copied().unwrap_or_default(),
        });
        if key >= last {
            break;
        }
        key = key.next();
    }
    Aggregate::Populated(series)
}

/// Total per sentiment across a series.
pub fn series_totals<K>(series: &OrderedSeries<K>) -> SentimentCounts {
    let mut totals = SentimentCounts::default();
    if let Some(points) = series.populated() {
        for point in points {
            totals.merge(&point.counts);
        }
    }
    totals
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use review_core::models::Sentiment;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn rec(entity: &str, ts: Option<NaiveDateTime>, sentiment: Option<Sentiment>) -> ReviewRecord {
        ReviewRecord::new(entity, ts, "", sentiment, None, None)
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn keys<K: Copy>(series: &OrderedSeries<K>) -> Vec<K> {
        series
            .populated()
            .map(|pts| pts.iter().map(|p| p.key).collect())
            .unwrap_or_default()
    }

    // ── monthly_trend ─────────────────────────────────────────────────────────

    #[test]
    fn test_monthly_groups_and_sorts() {
        let table: NormalizedTable = vec![
            rec("A", Some(at(2024, 3, 2)), Some(Sentiment::Negative)),
            rec("A", Some(at(2024, 1, 5)), Some(Sentiment::Positive)),
            rec("A", Some(at(2024, 1, 20)), Some(Sentiment::Positive)),
            rec("A", Some(at(2024, 1, 21)), Some(Sentiment::Neutral)),
        ]
        .into_iter()
        .collect();

        let series = monthly_trend(&table, "A");
        let points = series.populated().unwrap();
        assert_eq!(keys(&series), vec![ym(2024, 1), ym(2024, 2), ym(2024, 3)]);
        assert_eq!(points[0].counts.positive, 2);
        assert_eq!(points[0].counts.neutral, 1);
        assert_eq!(points[0].counts.negative, 0);
        assert_eq!(points[2].counts.negative, 1);
    }

    #[test]
    fn test_monthly_zero_fills_gap_months() {
        let table: NormalizedTable = vec![
            rec("A", Some(at(2023, 11, 1)), Some(Sentiment::Positive)),
            rec("A", Some(at(2024, 2, 1)), Some(Sentiment::Positive)),
        ]
        .into_iter()
        .collect();

        let series = monthly_trend(&table, "A");
        let points = series.populated().unwrap();
        assert_eq!(
            keys(&series),
            vec![ym(2023, 11), ym(2023, 12), ym(2024, 1), ym(2024, 2)]
        );
        assert_eq!(points[1].counts, SentimentCounts::default());
        assert_eq!(points[2].counts.total, 0);
    }

    #[test]
    fn test_monthly_window_is_trailing_twelve_months() {
        let table: NormalizedTable = vec![
            rec("A", Some(at(2022, 6, 1)), Some(Sentiment::Negative)),
            rec("A", Some(at(2023, 3, 14)), Some(Sentiment::Negative)),
            rec("A", Some(at(2023, 3, 15)), Some(Sentiment::Neutral)),
            rec("A", Some(at(2024, 3, 15)), Some(Sentiment::Positive)),
        ]
        .into_iter()
        .collect();

        let series = monthly_trend(&table, "A");
        let points = series.populated().unwrap();
        assert_eq!(points.first().unwrap().key, ym(2023, 3));
        assert_eq!(points.last().unwrap().key, ym(2024, 3));
        // 2023-03-14 falls before the cutoff; 2023-03-15 10:00 is exactly on it.
        assert_eq!(points[0].counts.negative, 0);
        assert_eq!(points[0].counts.neutral, 1);
        assert_eq!(points.len(), 13);
    }

    #[test]
    fn test_monthly_window_clamps_day_of_month() {
        let start_of_day = |y: i32, m: u32, d: u32| {
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let table: NormalizedTable = vec![
            rec("A", Some(start_of_day(2023, 2, 27)), Some(Sentiment::Negative)),
            rec("A", Some(start_of_day(2023, 2, 28)), Some(Sentiment::Neutral)),
            rec("A", Some(start_of_day(2024, 2, 29)), Some(Sentiment::Positive)),
        ]
        .into_iter()
        .collect();

        // 2024-02-29 minus twelve months clamps to 2023-02-28.
        let series = monthly_trend(&table, "A");
        let points = series.populated().unwrap();
        assert_eq!(points.len(), 13);
        assert_eq!(points[0].key, ym(2023, 2));
        assert_eq!(points[0].counts.neutral, 1);
        assert_eq!(points[0].counts.negative, 0);
        assert_eq!(points[12].key, ym(2024, 2));
    }

    #[test]
    fn test_monthly_ignores_other_entities_and_unknown_sentiment() {
        let table: NormalizedTable = vec![
            rec("A", Some(at(2024, 1, 1)), Some(Sentiment::Positive)),
            rec("A", Some(at(2024, 1, 2)), None),
            rec("B", Some(at(2024, 1, 3)), Some(Sentiment::Negative)),
        ]
        .into_iter()
        .collect();

        let series = monthly_trend(&table, "A");
        let points = series.populated().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].counts.total, 1);
    }

    #[test]
    fn test_monthly_empty_when_no_dated_reviews() {
        let table: NormalizedTable = vec![rec("A", None, Some(Sentiment::Positive))]
            .into_iter()
            .collect();
        assert!(monthly_trend(&table, "A").is_empty());
        assert!(monthly_trend(&table, "missing").is_empty());
    }

    #[test]
    fn test_monthly_empty_when_window_has_only_unknown_sentiment() {
        let table: NormalizedTable = vec![rec("A", Some(at(2024, 1, 1)), None)]
            .into_iter()
            .collect();
        assert!(monthly_trend(&table, "A").is_empty());
    }

    // ── yearly_trend ──────────────────────────────────────────────────────────

    #[test]
    fn test_yearly_covers_full_history_with_zero_fill() {
        let table: NormalizedTable = vec![
            rec("A", Some(at(2019, 8, 1)), Some(Sentiment::Positive)),
            rec("A", Some(at(2021, 8, 1)), Some(Sentiment::Negative)),
            rec("A", Some(at(2021, 9, 1)), Some(Sentiment::Negative)),
            rec("A", None, Some(Sentiment::Negative)),
        ]
        .into_iter()
        .collect();

        let series = yearly_trend(&table, "A");
        let points = series.populated().unwrap();
        assert_eq!(keys(&series), vec![2019, 2020, 2021]);
        assert_eq!(points[1].counts.total, 0);
        assert_eq!(points[2].counts.negative, 2);
    }

    #[test]
    fn test_yearly_empty_for_unknown_entity() {
        let table: NormalizedTable = vec![rec("A", Some(at(2024, 1, 1)), Some(Sentiment::Neutral))]
            .into_iter()
            .collect();
        assert!(yearly_trend(&table, "B").is_empty());
    }

    // ── series_totals ─────────────────────────────────────────────────────────

    #[test]
    fn test_series_totals() {
        let table: NormalizedTable = vec![
            rec("A", Some(at(2022, 1, 1)), Some(Sentiment::Positive)),
            rec("A", Some(at(2023, 1, 1)), Some(Sentiment::Negative)),
            rec("A", Some(at(2023, 2, 1)), Some(Sentiment::Positive)),
        ]
        .into_iter()
        .collect();

        let totals = series_totals(&yearly_trend(&table, "A"));
        assert_eq!(totals.positive, 2);
        assert_eq!(totals.negative, 1);
        assert_eq!(totals.total, 3);
        assert_eq!(series_totals::<i32>(&Aggregate::Empty).total, 0);
    }
}
