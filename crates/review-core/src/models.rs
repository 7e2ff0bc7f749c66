use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::InsightsError;

/// The three-valued sentiment domain attached to every review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All sentiments in presentation order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Canonical lowercase label, as written by the exporter.
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sentiment {
    type Err = InsightsError;

    /// Accepts the English labels, the Spanish labels used by the annotated
    /// source dataset, and three-letter abbreviations, ignoring case and
    /// surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "positivo" | "pos" => Ok(Sentiment::Positive),
            "neutral" | "neutro" | "neu" => Ok(Sentiment::Neutral),
            "negative" | "negativo" | "neg" => Ok(Sentiment::Negative),
            _ => Err(InsightsError::InvalidSentiment(s.to_string())),
        }
    }
}

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// Calendar-month bucket key, displayed as `"YYYY-MM"`.
///
/// Ordering is chronological, which for four-digit years coincides with the
/// lexicographic order of the display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Build a key, returning `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month a timestamp falls in.
    pub fn from_datetime(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── ReviewRecord ──────────────────────────────────────────────────────────────

/// One normalized review row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    /// Beach identifier; empty when the source row carried none.
    pub entity: String,
    /// Publication time as local wall-clock time, `None` when unparsable.
    pub timestamp: Option<NaiveDateTime>,
    /// Pre-cleaned review text (may be empty).
    pub text: String,
    /// `None` when the source label is outside the sentiment domain.
    pub sentiment: Option<Sentiment>,
    pub rating: Option<f64>,
    /// Raw comma-separated indicator list, `None` when absent or blank.
    pub indicators: Option<String>,
    /// Derived month bucket; `None` exactly when `timestamp` is `None`.
    pub year_month: Option<YearMonth>,
    /// Derived year bucket; `None` exactly when `timestamp` is `None`.
    pub year: Option<i32>,
}

impl ReviewRecord {
    /// Build a record and derive its bucket keys from `timestamp`.
    pub fn new(
        entity: impl Into<String>,
        timestamp: Option<NaiveDateTime>,
        text: impl Into<String>,
        sentiment: Option<Sentiment>,
        rating: Option<f64>,
        indicators: Option<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            timestamp,
            text: text.into(),
            sentiment,
            rating,
            indicators,
            year_month: timestamp.as_ref().map(YearMonth::from_datetime),
            year: timestamp.as_ref().map(|ts| ts.year()),
        }
    }
}

// ── SentimentCounts ───────────────────────────────────────────────────────────

/// Per-sentiment tallies together with their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    /// Always `positive + neutral + negative`.
    pub total: u64,
}

impl SentimentCounts {
    /// Count one occurrence of `sentiment`.
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
        self.total += 1;
    }

    /// Add another tally into this one.
    pub fn merge(&mut self, other: &SentimentCounts) {
        self.positive += other.positive;
        self.neutral += other.neutral;
        self.negative += other.negative;
        self.total += other.total;
    }

    pub fn get(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    /// Fraction of positive mentions, `0.0` for an all-zero row.
    pub fn positive_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.positive as f64 / self.total as f64
        }
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// Result of an aggregation that may have had no qualifying input.
///
/// `Empty` is distinct from a populated result whose values happen to be
/// zero; presentation layers show a "no data" state for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Aggregate<T> {
    Empty,
    Populated(T),
}

impl<T> Aggregate<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Aggregate::Empty)
    }

    /// Borrow the populated value, if any.
    pub fn populated(&self) -> Option<&T> {
        match self {
            Aggregate::Empty => None,
            Aggregate::Populated(value) => Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Aggregate<U> {
        match self {
            Aggregate::Empty => Aggregate::Empty,
            Aggregate::Populated(value) => Aggregate::Populated(f(value)),
        }
    }
}
