use review_core::settings::Settings;
use review_data::reader::ColumnMapping;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto a tracing filter directive.
///
/// Unrecognised names are passed through unchanged so that full
/// `EnvFilter` directives (e.g. `review_data=debug`) keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber, writing to stderr so that
/// report output on stdout stays clean.
///
/// Falls back to `"warn"` if the directive cannot be parsed.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).try_init()?;

    Ok(())
}

// ── Column mapping ─────────────────────────────────────────────────────────────

/// Column names from the command line.
pub fn column_mapping(settings: &Settings) -> ColumnMapping {
    ColumnMapping {
        entity: Some(settings.entity_column.clone()),
        timestamp: settings.date_column.clone(),
        text: settings.text_column.clone(),
        sentiment: settings.sentiment_column.clone(),
        rating: settings.rating_column.clone(),
        indicators: settings.indicators_column.clone(),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
