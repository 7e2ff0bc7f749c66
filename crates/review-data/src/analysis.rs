//! Dashboard pipeline.
//!
//! Recomputes every derived view for one selection from the immutable
//! [`NormalizedTable`], returning a [`DashboardSnapshot`] ready for the
//! presentation layer.

use std::path::Path;

use chrono::NaiveDateTime;
use review_core::error::Result;
use review_core::models::YearMonth;
use review_core::time_utils::TimestampParser;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::{monthly_trend, yearly_trend, OrderedSeries};
use crate::crosstab::{cross_tab, CrossTabResult};
use crate::filter::{filter, DateRange, FilteredSubset};
use crate::normalizer::{normalize, NormalizationReport, NormalizedTable};
use crate::reader::{load_rows, ColumnMapping};
use crate::vocabulary::{diff_vocabulary, WordFrequencyResult};

// ── Public types ──────────────────────────────────────────────────────────────

/// What the user is inspecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub entity: String,
    pub range: DateRange,
}

impl Selection {
    /// Default selection for `table`: the first entity alphabetically and the
    /// full span of dated reviews. `None` when the table has no entity or no
    /// parseable date.
    pub fn default_for(table: &NormalizedTable) -> Option<Self> {
        let entity = table.entities().into_iter().next()?;
        let (lo, hi) = table.date_bounds()?;
        Some(Self {
            entity,
            range: DateRange::new(lo.date(), hi.date()),
        })
    }
}

/// Diagnostics shown above every view.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub normalization: NormalizationReport,
    /// Earliest review in the whole dataset.
    pub dataset_start: Option<NaiveDateTime>,
    /// Earliest review in the filtered subset.
    pub filtered_start: Option<NaiveDateTime>,
    pub filtered_count: usize,
    /// Mean rating over rated reviews in the filtered subset.
    pub mean_rating: Option<f64>,
}

/// Every derived view for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub selection: Selection,
    pub diagnostics: Diagnostics,
    pub vocabulary: WordFrequencyResult,
    pub monthly: OrderedSeries<YearMonth>,
    pub yearly: OrderedSeries<i32>,
    pub indicators: CrossTabResult,
}

impl DashboardSnapshot {
    /// Pretty-printed JSON document of the whole snapshot.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Immutable dataset plus the operations the presentation layer needs.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: NormalizedTable,
}

impl Dashboard {
    pub fn new(table: NormalizedTable) -> Self {
        Self { table }
    }

    /// Load and normalize a CSV dataset.
    pub fn load(path: &Path, mapping: &ColumnMapping, parser: &TimestampParser) -> Result<Self> {
        let rows = load_rows(path, mapping)?;
        let table = normalize(rows, parser);
        info!(
            "Dataset ready: {} reviews, {} beaches",
            table.len(),
            table.entities().len()
        );
        Ok(Self::new(table))
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    /// Entity names offered for selection.
    pub fn entities(&self) -> Vec<String> {
        self.table.entities()
    }

    /// Bounds for the default date-range selection.
    pub fn date_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.table.date_bounds()
    }

    /// The working subset for `selection`.
    pub fn subset(&self, selection: &Selection) -> FilteredSubset<'_> {
        filter(&self.table, &selection.entity, selection.range)
    }

    /// Run the full pipeline for `selection`.
    ///
    /// 1. Filter by entity and date range.
    /// 2. Vocabulary differencing and indicator cross-tab on the subset.
    /// 3. Monthly and yearly trends on the entity's whole history.
    pub fn analyze(&self, selection: &Selection) -> DashboardSnapshot {
        let subset = self.subset(selection);
        debug!(
            "Selection {:?} {}..={}: {} reviews",
            selection.entity,
            selection.range.start,
            selection.range.end,
            subset.len()
        );

        let diagnostics = Diagnostics {
            normalization: *self.table.report(),
            dataset_start: self.table.date_bounds().map(|(lo, _)| lo),
            filtered_start: subset.earliest(),
            filtered_count: subset.len(),
            mean_rating: mean_rating(&subset),
        };

        DashboardSnapshot {
            selection: selection.clone(),
            diagnostics,
            vocabulary: diff_vocabulary(&subset),
            monthly: monthly_trend(&self.table, &selection.entity),
            yearly: yearly_trend(&self.table, &selection.entity),
            indicators: cross_tab(&subset),
        }
    }

    /// CSV bytes of the subset for `selection`.
    pub fn export(&self, selection: &Selection) -> Result<Vec<u8>> {
        crate::exporter::export(&self.subset(selection))
    }
}

fn mean_rating(subset: &FilteredSubset<'_>) -> Option<f64> {
    let ratings: Vec<f64> = subset.iter().filter_map(|r| r.rating).collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use review_core::models::Sentiment;
    use std::io::Write;
    use tempfile::TempDir;

    const DATASET: &str = "\
place_name,published_at_date,review_text,texto_limpio,sentimiento,rating,kpis_detectados
A,2024-01-15 10:00:00,x,agua limpia playa,positivo,5,\"clean,safe\"
A,2024-03-20 18:30:00,x,playa sucia,negativo,2,
A,not a date,x,playa,neutro,3,clean
A,2024-03-02 09:00:00,x,playa tranquila,neutro,4,clean
B,2023-08-01 12:00:00,x,chiringuito caro,negativo,1,Price & Cost Perception
";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard() -> (TempDir, Dashboard) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentimientos_kpis.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();
        let dashboard =
            Dashboard::load(&path, &ColumnMapping::default(), &TimestampParser::default())
                .unwrap();
        (dir, dashboard)
    }

    #[test]
    fn test_load_exposes_presentation_boundary() {
        let (_dir, dashboard) = dashboard();
        assert_eq!(dashboard.entities(), vec!["A", "B"]);
        let (lo, hi) = dashboard.date_bounds().unwrap();
        assert_eq!(lo.date(), day(2023, 8, 1));
        assert_eq!(hi.date(), day(2024, 3, 20));
        assert_eq!(dashboard.table().null_timestamp_count(), 1);
    }

    #[test]
    fn test_default_selection() {
        let (_dir, dashboard) = dashboard();
        let selection = Selection::default_for(dashboard.table()).unwrap();
        assert_eq!(selection.entity, "A");
        assert_eq!(selection.range, DateRange::new(day(2023, 8, 1), day(2024, 3, 20)));
    }

    #[test]
    fn test_default_selection_none_without_dates() {
        let table: NormalizedTable = vec![review_core::models::ReviewRecord::new(
            "A",
            None,
            "",
            Some(Sentiment::Positive),
            None,
            None,
        )]
        .into_iter()
        .collect();
        assert!(Selection::default_for(&table).is_none());
    }

    #[test]
    fn test_analyze_full_range() {
        let (_dir, dashboard) = dashboard();
        let selection = Selection {
            entity: "A".to_string(),
            range: DateRange::new(day(2024, 1, 1), day(2024, 12, 31)),
        };
        let snapshot = dashboard.analyze(&selection);

        assert_eq!(snapshot.diagnostics.filtered_count, 3);
        assert_eq!(snapshot.diagnostics.normalization.null_timestamps, 1);
        assert_eq!(
            snapshot.diagnostics.filtered_start.unwrap().date(),
            day(2024, 1, 15)
        );
        // (5 + 2 + 4) / 3
        let mean = snapshot.diagnostics.mean_rating.unwrap();
        assert!((mean - 11.0 / 3.0).abs() < 1e-9);

        // "playa" appears under all three sentiments.
        assert!(snapshot.vocabulary.common.contains("playa"));
        assert!(!snapshot.vocabulary.common.contains("limpia"));

        let crosstab = snapshot.indicators.populated().unwrap();
        assert_eq!(crosstab.get("clean").unwrap().positive, 1);
        assert_eq!(crosstab.get("clean").unwrap().neutral, 1);
        assert_eq!(crosstab.get("safe").unwrap().total, 1);
        // The undated "clean" review is outside every date range.
        assert_eq!(crosstab.get("clean").unwrap().total, 2);
    }

    #[test]
    fn test_analyze_trends_ignore_date_range() {
        let (_dir, dashboard) = dashboard();
        let narrow = Selection {
            entity: "A".to_string(),
            range: DateRange::new(day(2024, 2, 1), day(2024, 2, 29)),
        };
        let snapshot = dashboard.analyze(&narrow);

        assert_eq!(snapshot.diagnostics.filtered_count, 0);
        assert!(snapshot.diagnostics.filtered_start.is_none());
        assert!(snapshot.diagnostics.mean_rating.is_none());
        for sentiment in Sentiment::ALL {
            assert!(snapshot.vocabulary.get(sentiment).distinctive.is_empty());
        }
        assert!(snapshot.indicators.is_empty());

        let monthly = snapshot.monthly.populated().unwrap();
        let keys: Vec<String> = monthly.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(monthly[1].counts.total, 0);

        let yearly = snapshot.yearly.populated().unwrap();
        assert_eq!(yearly.len(), 1);
        assert_eq!(yearly[0].key, 2024);
        assert_eq!(yearly[0].counts.total, 3);
    }

    #[test]
    fn test_analyze_inverted_range_is_empty_but_total() {
        let (_dir, dashboard) = dashboard();
        let inverted = Selection {
            entity: "A".to_string(),
            range: DateRange::new(day(2024, 12, 31), day(2024, 1, 1)),
        };
        let snapshot = dashboard.analyze(&inverted);
        assert_eq!(snapshot.diagnostics.filtered_count, 0);
        assert!(!snapshot.yearly.is_empty());
    }

    #[test]
    fn test_export_selection() {
        let (_dir, dashboard) = dashboard();
        let selection = Selection {
            entity: "B".to_string(),
            range: DateRange::new(day(2023, 1, 1), day(2023, 12, 31)),
        };
        let text = String::from_utf8(dashboard.export(&selection).unwrap()).unwrap();
        assert_eq!(
            text,
            "timestamp,text,sentiment,rating,indicators\n\
             2023-08-01 12:00:00,chiringuito caro,negative,1,Price & Cost Perception\n"
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let (_dir, dashboard) = dashboard();
        let selection = Selection::default_for(dashboard.table()).unwrap();
        let text = dashboard.analyze(&selection).to_json_pretty().unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["selection"]["entity"], "A");
        assert_eq!(json["indicators"]["state"], "populated");
        assert_eq!(json["monthly"]["data"][0]["key"], "2024-01");
    }
}
