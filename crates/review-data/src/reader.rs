//! CSV loading for annotated review datasets.
//!
//! Maps named columns onto [`RawRow`]s without interpreting any value;
//! typing and validation happen in [`crate::normalizer`].

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use review_core::error::{InsightsError, Result};
use tracing::{debug, info};

// ── ColumnMapping ─────────────────────────────────────────────────────────────

/// Names of the input columns feeding each [`RawRow`] field.
///
/// `timestamp`, `text` and `sentiment` must be present in the header.
/// `entity` is required when set. Missing `rating` or `indicators` columns
/// yield `None` for every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub entity: Option<String>,
    pub timestamp: String,
    pub text: String,
    pub sentiment: String,
    pub rating: String,
    pub indicators: String,
}

impl Default for ColumnMapping {
    /// Layout of the annotated Google Maps review export.
    fn default() -> Self {
        Self {
            entity: Some("place_name".to_string()),
            timestamp: "published_at_date".to_string(),
            text: "texto_limpio".to_string(),
            sentiment: "sentimiento".to_string(),
            rating: "rating".to_string(),
            indicators: "kpis_detectados".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Layout written by [`crate::exporter::export`], which carries no entity.
    pub fn export_layout() -> Self {
        Self {
            entity: None,
            timestamp: "timestamp".to_string(),
            text: "text".to_string(),
            sentiment: "sentiment".to_string(),
            rating: "rating".to_string(),
            indicators: "indicators".to_string(),
        }
    }
}

// ── RawRow ────────────────────────────────────────────────────────────────────

/// One input row as untyped strings.
///
/// Optional fields are `None` when their column is not part of the input;
/// present-but-blank cells are kept as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub entity: Option<String>,
    pub timestamp: String,
    pub text: String,
    pub sentiment: String,
    pub rating: Option<String>,
    pub indicators: Option<String>,
}

/// Header positions resolved from a [`ColumnMapping`].
struct ColumnIndex {
    entity: Option<usize>,
    timestamp: usize,
    text: usize,
    sentiment: usize,
    rating: Option<usize>,
    indicators: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, mapping: &ColumnMapping) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let require =
            |name: &str| find(name).ok_or_else(|| InsightsError::MissingColumn(name.to_string()));

        Ok(Self {
            entity: mapping.entity.as_deref().map(require).transpose()?,
            timestamp: require(&mapping.timestamp)?,
            text: require(&mapping.text)?,
            sentiment: require(&mapping.sentiment)?,
            rating: find(&mapping.rating),
            indicators: find(&mapping.indicators),
        })
    }

    fn extract(&self, record: &StringRecord) -> RawRow {
        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();
        RawRow {
            entity: self.entity.map(cell),
            timestamp: cell(self.timestamp),
            text: cell(self.text),
            sentiment: cell(self.sentiment),
            rating: self.rating.map(cell),
            indicators: self.indicators.map(cell),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read every data row from CSV `input` using `mapping`.
///
/// Fails only when the input is not valid CSV or a required column is
/// absent from the header; short rows are tolerated and padded with blanks.
pub fn read_rows<R: Read>(input: R, mapping: &ColumnMapping) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, mapping)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(index.extract(&record));
    }

    debug!("Read {} rows across {} columns", rows.len(), headers.len());
    Ok(rows)
}

/// Open `path` and read it with [`read_rows`].
pub fn load_rows(path: &Path, mapping: &ColumnMapping) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).map_err(|source| InsightsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(std::io::BufReader::new(file), mapping)?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
