use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Sentiment and indicator insights from annotated beach reviews
#[derive(Parser, Debug, Clone)]
#[command(
    name = "beach-dashboard",
    about = "Sentiment and indicator insights from annotated beach reviews",
    version
)]
pub struct Settings {
    /// Annotated review dataset (CSV)
    #[arg(long, env = "BEACH_DATASET")]
    pub input: PathBuf,

    /// Beach to inspect (defaults to the first one alphabetically)
    #[arg(long)]
    pub beach: Option<String>,

    /// First day of the inspection window (defaults to the earliest review)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the inspection window, inclusive (defaults to the latest review)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Which view to render
    #[arg(long, default_value = "all", value_parser = ["sentiment", "indicators", "all"])]
    pub view: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Write the filtered reviews to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Number of distinctive words listed per sentiment
    #[arg(long, default_value = "15")]
    pub top_words: usize,

    /// Dataset timezone ("auto" uses the system timezone)
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Column holding the beach name
    #[arg(long, default_value = "place_name")]
    pub entity_column: String,

    /// Column holding the publication date
    #[arg(long, default_value = "published_at_date")]
    pub date_column: String,

    /// Column holding the cleaned review text
    #[arg(long, default_value = "texto_limpio")]
    pub text_column: String,

    /// Column holding the sentiment label
    #[arg(long, default_value = "sentimiento")]
    pub sentiment_column: String,

    /// Column holding the numeric rating
    #[arg(long, default_value = "rating")]
    pub rating_column: String,

    /// Column holding the comma-separated indicator list
    #[arg(long, default_value = "kpis_detectados")]
    pub indicators_column: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply derived overrides.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn wants_sentiment_view(&self) -> bool {
        self.view == "sentiment" || self.view == "all"
    }

    pub fn wants_indicator_view(&self) -> bool {
        self.view == "indicators" || self.view == "all"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
