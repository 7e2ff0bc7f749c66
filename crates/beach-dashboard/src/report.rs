//! Plain-text rendering of a [`DashboardSnapshot`].

use std::fmt::{self, Write};

use review_core::formatting::{format_count, format_rating, format_share, share_bar};
use review_core::models::{Sentiment, SentimentCounts};
use review_data::aggregator::{series_totals, OrderedSeries, TrendPoint};
use review_data::analysis::DashboardSnapshot;
use review_data::crosstab::{indicator_icon, CrossTab};
use review_data::vocabulary::WordFrequencyResult;

const BAR_WIDTH: usize = 20;
const RULE: &str = "────────────────────────────────────────────────────────────";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which sections to render.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub sentiment: bool,
    pub indicators: bool,
    pub top_words: usize,
}

/// Render `snapshot` as a text report.
pub fn render(out: &mut impl Write, snapshot: &DashboardSnapshot, opts: ReportOptions) -> fmt::Result {
    render_diagnostics(out, snapshot)?;
    if opts.sentiment {
        render_vocabulary(out, &snapshot.vocabulary, opts.top_words)?;
        render_series(out, "Monthly sentiment (last 12 months)", "Month", &snapshot.monthly)?;
        render_series(out, "Yearly sentiment", "Year", &snapshot.yearly)?;
    }
    if opts.indicators {
        match snapshot.indicators.populated() {
            Some(table) => render_crosstab(out, table)?,
            None => {
                heading(out, "Indicators by sentiment")?;
                writeln!(out, "No indicator data for the selected filters.")?;
            }
        }
    }
    Ok(())
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_diagnostics(out: &mut impl Write, snapshot: &DashboardSnapshot) -> fmt::Result {
    let diag = &snapshot.diagnostics;
    let range = snapshot.selection.range;

    writeln!(out, "Beach: {}", snapshot.selection.entity)?;
    writeln!(out, "Selected range: {} to {}", range.start, range.end)?;
    if range.is_inverted() {
        writeln!(out, "Warning: the start date is after the end date.")?;
    }
    writeln!(
        out,
        "Reviews with unparseable date: {}",
        format_count(diag.normalization.null_timestamps as u64)
    )?;
    if diag.normalization.invalid_sentiments > 0 {
        writeln!(
            out,
            "Reviews with unknown sentiment: {}",
            format_count(diag.normalization.invalid_sentiments as u64)
        )?;
    }
    writeln!(out, "Dataset starts: {}", timestamp_or_dash(diag.dataset_start))?;
    writeln!(out, "Filtered reviews start: {}", timestamp_or_dash(diag.filtered_start))?;
    writeln!(out, "Reviews in selection: {}", format_count(diag.filtered_count as u64))?;
    writeln!(out, "Mean rating: {}", format_rating(diag.mean_rating))
}

fn render_vocabulary(out: &mut impl Write, vocab: &WordFrequencyResult, top: usize) -> fmt::Result {
    heading(out, "Distinctive words")?;
    for sentiment in Sentiment::ALL {
        let words = vocab.get(sentiment).top(top);
        if words.is_empty() {
            writeln!(out, "{}: without data", title(sentiment))?;
            continue;
        }
        let listed: Vec<String> = words
            .iter()
            .map(|w| format!("{} ({})", w.word, format_count(w.count)))
            .collect();
        writeln!(out, "{}: {}", title(sentiment), listed.join(", "))?;
    }
    Ok(())
}

fn render_series<K: fmt::Display>(
    out: &mut impl Write,
    name: &str,
    key_header: &str,
    series: &OrderedSeries<K>,
) -> fmt::Result {
    heading(out, name)?;
    let Some(points) = series.populated() else {
        return writeln!(out, "Warning: no data for this period.");
    };
    counts_header(out, key_header)?;
    for TrendPoint { key, counts } in points {
        counts_row(out, &key.to_string(), counts)?;
    }
    counts_row(out, "Total", &series_totals(series))
}

fn render_crosstab(out: &mut impl Write, table: &CrossTab) -> fmt::Result {
    heading(out, "Indicators by sentiment")?;
    writeln!(
        out,
        "   {:<34} {:>8} {:>8} {:>8}  Positive share",
        "Indicator", "Positive", "Neutral", "Negative"
    )?;
    for (name, counts) in table.iter() {
        writeln!(
            out,
            "{} {:<34} {:>8} {:>8} {:>8}  {} {}",
            indicator_icon(name),
            name,
            format_count(counts.positive),
            format_count(counts.neutral),
            format_count(counts.negative),
            share_bar(counts.positive_share(), BAR_WIDTH),
            format_share(counts.positive_share()),
        )?;
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn heading(out: &mut impl Write, name: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", name)?;
    writeln!(out, "{}", RULE)
}

fn counts_header(out: &mut impl Write, key_header: &str) -> fmt::Result {
    writeln!(
        out,
        "{:<8} {:>8} {:>8} {:>8} {:>8}",
        key_header, "Positive", "Neutral", "Negative", "Total"
    )
}

fn counts_row(out: &mut impl Write, key: &str, counts: &SentimentCounts) -> fmt::Result {
    writeln!(
        out,
        "{:<8} {:>8} {:>8} {:>8} {:>8}",
        key,
        format_count(counts.positive),
        format_count(counts.neutral),
        format_count(counts.negative),
        format_count(counts.total)
    )
}

fn title(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Positive",
        Sentiment::Neutral => "Neutral",
        Sentiment::Negative => "Negative",
    }
}

fn timestamp_or_dash(ts: Option<chrono::NaiveDateTime>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
