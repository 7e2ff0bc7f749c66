//! Entity and date-range selection over a [`NormalizedTable`].

use chrono::{NaiveDate, NaiveDateTime};
use review_core::models::ReviewRecord;
use serde::Serialize;

use crate::normalizer::NormalizedTable;

/// Closed interval of calendar days, both ends inclusive.
///
/// An interval with `start > end` is valid and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether the day of `ts` lies within the interval.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let day = ts.date();
        self.start <= day && day <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// The rows of one entity within one date range, borrowed from the table in
/// source order.
#[derive(Debug, Clone)]
pub struct FilteredSubset<'a> {
    entity: String,
    range: DateRange,
    records: Vec<&'a ReviewRecord>,
}

impl<'a> FilteredSubset<'a> {
    /// Build a subset directly from borrowed records.
    pub fn from_records(
        entity: impl Into<String>,
        range: DateRange,
        records: Vec<&'a ReviewRecord>,
    ) -> Self {
        Self {
            entity: entity.into(),
            range,
            records,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn records(&self) -> &[&'a ReviewRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ReviewRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest timestamp in the subset.
    pub fn earliest(&self) -> Option<NaiveDateTime> {
        self.iter().filter_map(|r| r.timestamp).min()
    }
}

/// Select the rows of `entity` whose timestamp falls within `range`.
///
/// Rows without a timestamp never match. An unknown entity or an inverted
/// range yields an empty subset.
pub fn filter<'a>(table: &'a NormalizedTable, entity: &str, range: DateRange) -> FilteredSubset<'a> {
    let records = table
        .entity_records(entity)
        .filter(|r| r.timestamp.as_ref().is_some_and(|ts| range.contains(ts)))
        .collect();
    FilteredSubset::from_records(entity, range, records)
}
