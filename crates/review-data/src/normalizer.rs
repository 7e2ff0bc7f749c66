//! Typed, date-normalized review table.
//!
//! [`normalize`] is total: every raw row becomes exactly one
//! [`ReviewRecord`]. Values that fail to parse become `None` and are tallied
//! in the [`NormalizationReport`] instead of aborting the load.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use review_core::models::{ReviewRecord, Sentiment};
use review_core::time_utils::TimestampParser;
use serde::Serialize;
use tracing::{debug, info};

use crate::reader::RawRow;

/// Diagnostics gathered while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub rows: usize,
    /// Rows whose date field was blank or failed to parse.
    pub null_timestamps: usize,
    /// Rows whose sentiment label is outside the sentiment domain.
    pub invalid_sentiments: usize,
    /// Rows with a non-blank rating that is not a finite number.
    pub invalid_ratings: usize,
}

/// The immutable review table every aggregation reads from.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    records: Vec<ReviewRecord>,
    report: NormalizationReport,
}

impl NormalizedTable {
    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn report(&self) -> &NormalizationReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose timestamp is null after normalization.
    pub fn null_timestamp_count(&self) -> usize {
        self.report.null_timestamps
    }

    /// Distinct non-empty entity names, sorted.
    pub fn entities(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.entity.is_empty())
            .map(|r| r.entity.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest timestamps in the table, `None` when no row has one.
    pub fn date_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut stamps = self.records.iter().filter_map(|r| r.timestamp);
        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts))))
    }

    /// All records of `entity`, regardless of date.
    pub fn entity_records<'a, 'e>(
        &'a self,
        entity: &'e str,
    ) -> impl Iterator<Item = &'a ReviewRecord> + 'e
    where
        'a: 'e,
    {
        self.records.iter().filter(move |r| r.entity == entity)
    }
}

impl FromIterator<ReviewRecord> for NormalizedTable {
    /// Wrap already-typed records; only the timestamp and sentiment tallies
    /// can be recovered from them.
    fn from_iter<I: IntoIterator<Item = ReviewRecord>>(iter: I) -> Self {
        let records: Vec<ReviewRecord> = iter.into_iter().collect();
        let report = NormalizationReport {
            rows: records.len(),
            null_timestamps: records.iter().filter(|r| r.timestamp.is_none()).count(),
            invalid_sentiments: records.iter().filter(|r| r.sentiment.is_none()).count(),
            invalid_ratings: 0,
        };
        Self { records, report }
    }
}

// ── normalize ─────────────────────────────────────────────────────────────────

/// Convert raw rows into a [`NormalizedTable`].
pub fn normalize(rows: Vec<RawRow>, parser: &TimestampParser) -> NormalizedTable {
    let mut report = NormalizationReport {
        rows: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (line, row) in rows.into_iter().enumerate() {
        let timestamp = parser.parse(&row.timestamp);
        if timestamp.is_none() {
            report.null_timestamps += 1;
            debug!("Row {}: unparsable date {:?}", line + 1, row.timestamp);
        }

        let sentiment = row.sentiment.parse::<Sentiment>().ok();
        if sentiment.is_none() {
            report.invalid_sentiments += 1;
            debug!("Row {}: unknown sentiment {:?}", line + 1, row.sentiment);
        }

        let rating = match row.rating.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    report.invalid_ratings += 1;
                    debug!("Row {}: invalid rating {:?}", line + 1, raw);
                    None
                }
            },
        };

        let indicators = row.indicators.filter(|s| !s.trim().is_empty());

        records.push(ReviewRecord::new(
            row.entity.unwrap_or_default(),
            timestamp,
            row.text,
            sentiment,
            rating,
            indicators,
        ));
    }

    info!(
        "Normalized {} rows: {} null dates, {} unknown sentiments, {} invalid ratings",
        report.rows, report.null_timestamps, report.invalid_sentiments, report.invalid_ratings
    );

    NormalizedTable { records, report }
}
