mod bootstrap;
mod report;

use anyhow::{bail, Context, Result};
use review_core::settings::Settings;
use review_core::time_utils::TimestampParser;
use review_data::analysis::{Dashboard, Selection};
use review_data::filter::DateRange;

use crate::report::ReportOptions;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Beach dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, View: {}, Format: {}, Timezone: {}",
        settings.input.display(),
        settings.view,
        settings.format,
        settings.timezone
    );

    print!("{}", run(&settings)?);

    Ok(())
}

/// Load the dataset, render the report and write the export file if asked.
fn run(settings: &Settings) -> Result<String> {
    let parser = TimestampParser::from_name(&settings.timezone)?;
    let mapping = bootstrap::column_mapping(settings);
    let dashboard = Dashboard::load(&settings.input, &mapping, &parser)
        .with_context(|| format!("Failed to load dataset {}", settings.input.display()))?;

    let selection = resolve_selection(&dashboard, settings)?;
    let snapshot = dashboard.analyze(&selection);

    let output = match settings.format.as_str() {
        "json" => snapshot.to_json_pretty()? + "\n",
        _ => {
            let mut out = String::new();
            report::render(
                &mut out,
                &snapshot,
                ReportOptions {
                    sentiment: settings.wants_sentiment_view(),
                    indicators: settings.wants_indicator_view(),
                    top_words: settings.top_words,
                },
            )?;
            out
        }
    };

    if let Some(path) = &settings.export {
        let bytes = dashboard.export(&selection)?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write export {}", path.display()))?;
        tracing::info!(
            "Exported {} reviews to {}",
            snapshot.diagnostics.filtered_count,
            path.display()
        );
    }

    Ok(output)
}

/// Fill the selection from the command line, defaulting to the first beach
/// and the dataset's date bounds.
fn resolve_selection(dashboard: &Dashboard, settings: &Settings) -> Result<Selection> {
    let entities = dashboard.entities();
    let entity = match &settings.beach {
        Some(beach) if entities.contains(beach) => beach.clone(),
        Some(beach) => bail!(
            "Unknown beach {:?}; available: {}",
            beach,
            entities.join(", ")
        ),
        None => match entities.into_iter().next() {
            Some(first) => first,
            None => bail!("Dataset contains no beaches"),
        },
    };

    let bounds = dashboard.date_bounds();
    let start = settings
        .from
        .or_else(|| bounds.map(|(lo, _)| lo.date()))
        .context("Dataset has no parseable dates; pass --from and --to")?;
    let end = settings
        .to
        .or_else(|| bounds.map(|(_, hi)| hi.date()))
        .context("Dataset has no parseable dates; pass --from and --to")?;

    Ok(Selection {
        entity,
        range: DateRange::new(start, end),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
