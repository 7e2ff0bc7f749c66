//! Sentiment counts per detected indicator.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use review_core::models::{Aggregate, ReviewRecord, Sentiment, SentimentCounts};
use serde::Serialize;

use crate::filter::FilteredSubset;

/// One (review, indicator) pair produced by splitting an indicator list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorAssociation<'a> {
    pub record: &'a ReviewRecord,
    pub indicator: String,
    pub sentiment: Sentiment,
}

/// Sentiment counts keyed by indicator name, in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrossTab {
    rows: BTreeMap<String, SentimentCounts>,
}

impl CrossTab {
    pub fn get(&self, indicator: &str) -> Option<&SentimentCounts> {
        self.rows.get(indicator)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SentimentCounts)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub type CrossTabResult = Aggregate<CrossTab>;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r",\s*").expect("regex is valid"))
}

/// Split every qualifying record's indicator list into associations.
///
/// Records without indicators or without a sentiment contribute nothing.
/// Names are trimmed. Blank names (`"clean, ,"`) are dropped instead of
/// being counted under an indicator called `""`.
pub fn explode_indicators<'a>(subset: &FilteredSubset<'a>) -> Vec<IndicatorAssociation<'a>> {
    let mut out = Vec::new();
    for record in subset.iter() {
        let (Some(list), Some(sentiment)) = (record.indicators.as_deref(), record.sentiment) else {
            continue;
        };
        for name in separator().split(list) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            out.push(IndicatorAssociation {
                record,
                indicator: name.to_string(),
                sentiment,
            });
        }
    }
    out
}

/// Cross-tabulate indicators against sentiment for `subset`.
pub fn cross_tab(subset: &FilteredSubset<'_>) -> CrossTabResult {
    let associations = explode_indicators(subset);
    if associations.is_empty() {
        return Aggregate::Empty;
    }

    let mut rows: BTreeMap<String, SentimentCounts> = BTreeMap::new();
    for assoc in associations {
        rows.entry(assoc.indicator)
            .or_default()
            .record(assoc.sentiment);
    }
    Aggregate::Populated(CrossTab { rows })
}

// ── Indicator catalogue ───────────────────────────────────────────────────────

/// Indicators the annotation step is known to emit, with display icons.
pub const KNOWN_INDICATORS: &[(&str, &str)] = &[
    ("Sentiment Score", "🧠"),
    ("Cleanliness Perception", "🧼"),
    ("Safety Perception", "🛡️"),
    ("Crowding Level Mentions", "👥"),
    ("Nearby Services Mentions", "🚿"),
    ("Public Transport Accessibility", "🚌"),
    ("Availability of Bars/Restaurants", "🍽️"),
    ("Dog Access Mentions", "🐶"),
    ("Price & Cost Perception", "💰"),
    ("Water Quality", "🌊"),
    ("Beach Comfort", "⛱️"),
    ("Customer Service", "🙋"),
    ("Safety Facilities", "🚑"),
    ("Available Activities", "🏄"),
    ("General Atmosphere", "🎉"),
];

/// Icon shown next to an indicator name; unknown names get a magnifier.
pub fn indicator_icon(name: &str) -> &'static str {
    KNOWN_INDICATORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, icon)| *icon)
        .unwrap_or("🔍")
}
