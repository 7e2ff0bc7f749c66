//! CSV export of a filtered subset.

use std::cmp::Ordering;

use csv::Writer;
use review_core::error::{InsightsError, Result};
use review_core::models::ReviewRecord;
use tracing::debug;

use crate::filter::FilteredSubset;

/// Export header, in column order.
pub const EXPORT_HEADER: [&str; 5] = ["timestamp", "text", "sentiment", "rating", "indicators"];

/// Timestamps are written with second precision; fractional seconds are
/// dropped.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize `subset` as UTF-8 CSV, newest review first.
///
/// Rows without a timestamp come last, in source order. Missing values are
/// written as empty fields. Reading the output back with
/// [`crate::reader::ColumnMapping::export_layout`] and normalizing it
/// reproduces every sentiment, rating and indicator list exactly.
pub fn export(subset: &FilteredSubset<'_>) -> Result<Vec<u8>> {
    let mut rows: Vec<&ReviewRecord> = subset.records().to_vec();
    rows.sort_by(|a, b| newest_first(a, b));

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for record in &rows {
        writer.write_record([
            record
                .timestamp
                .map(|ts| ts.format(EXPORT_TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
            record.text.clone(),
            record
                .sentiment
                .map(|s| s.label().to_string())
                .unwrap_or_default(),
            record.rating.map(|r| r.to_string()).unwrap_or_default(),
            record.indicators.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| InsightsError::Io(std::io::Error::other(e.to_string())))?;
    debug!("Exported {} rows ({} bytes)", rows.len(), bytes.len());
    Ok(bytes)
}

/// Descending by timestamp with nulls last.
fn newest_first(a: &ReviewRecord, b: &ReviewRecord) -> Ordering {
    match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DateRange;
    use crate::normalizer::normalize;
    use crate::reader::{read_rows, ColumnMapping};
    use chrono::{NaiveDate, NaiveDateTime, Timelike};
    use review_core::models::Sentiment;
    use review_core::time_utils::TimestampParser;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 15, 30)
            .unwrap()
    }

    fn subset_of(records: &[ReviewRecord]) -> FilteredSubset<'_> {
        let any = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        FilteredSubset::from_records("A", DateRange::new(any, any), records.iter().collect())
    }

    fn sample() -> Vec<ReviewRecord> {
        vec![
            ReviewRecord::new(
                "A",
                Some(at(2024, 1, 10, 9)),
                "arena fina",
                Some(Sentiment::Positive),
                Some(4.5),
                Some("Beach Comfort, Water Quality".to_string()),
            ),
            ReviewRecord::new("A", None, "sin fecha", Some(Sentiment::Neutral), None, None),
            ReviewRecord::new(
                "A",
                Some(at(2024, 3, 2, 18)),
                "mucha gente, \"caro\"",
                Some(Sentiment::Negative),
                Some(1.0),
                Some("Crowding Level Mentions".to_string()),
            ),
            ReviewRecord::new("A", Some(at(2023, 7, 1, 12)), "", None, Some(0.1), None),
        ]
    }

    #[test]
    fn test_export_header_and_order() {
        let records = sample();
        let bytes = export(&subset_of(&records)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "timestamp,text,sentiment,rating,indicators");
        assert!(lines[1].starts_with("2024-03-02 18:15:30,"));
        assert!(lines[2].starts_with("2024-01-10 09:15:30,arena fina,positive,4.5,"));
        assert!(lines[3].starts_with("2023-07-01 12:15:30,,,0.1,"));
        assert_eq!(lines[4], ",sin fecha,neutral,,");
    }

    #[test]
    fn test_export_empty_subset_is_header_only() {
        let bytes = export(&subset_of(&[])).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "timestamp,text,sentiment,rating,indicators\n"
        );
    }

    #[test]
    fn test_export_round_trip_preserves_values() {
        let records = sample();
        let subset = subset_of(&records);
        let bytes = export(&subset).unwrap();

        let rows = read_rows(bytes.as_slice(), &ColumnMapping::export_layout()).unwrap();
        let table = normalize(rows, &TimestampParser::default());

        let mut expected: Vec<&ReviewRecord> = subset.records().to_vec();
        expected.sort_by(|a, b| newest_first(a, b));

        assert_eq!(table.len(), expected.len());
        for (got, want) in table.records().iter().zip(expected) {
            assert_eq!(got.sentiment, want.sentiment);
            assert_eq!(got.rating, want.rating);
            assert_eq!(got.indicators, want.indicators);
            assert_eq!(got.text, want.text);
            assert_eq!(got.timestamp, want.timestamp);
        }
    }

    #[test]
    fn test_export_drops_sub_second_precision() {
        let precise = NaiveDate::from_ymd_opt(2024, 5, 5)
            .unwrap()
            .and_hms_milli_opt(8, 0, 0, 750)
            .unwrap();
        let records = vec![ReviewRecord::new(
            "A",
            Some(precise),
            "x",
            Some(Sentiment::Positive),
            None,
            None,
        )];
        let bytes = export(&subset_of(&records)).unwrap();
        let rows = read_rows(bytes.as_slice(), &ColumnMapping::export_layout()).unwrap();
        let table = normalize(rows, &TimestampParser::default());
        let restored = table.records()[0].timestamp.unwrap();
        assert_eq!(restored, precise.with_nanosecond(0).unwrap());
    }

    #[test]
    fn test_newest_first_nulls_last() {
        let records = sample();
        let mut refs: Vec<&ReviewRecord> = records.iter().collect();
        refs.sort_by(|a, b| newest_first(a, b));
        assert!(refs.last().unwrap().timestamp.is_none());
    }
}
