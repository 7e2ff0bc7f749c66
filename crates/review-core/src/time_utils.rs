use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::error::{InsightsError, Result};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Naive date-time patterns tried in order after the offset-bearing forms.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only patterns; the result is midnight of that day.
///
/// Slash dates are month-first, falling back to day-first when the first
/// field cannot be a month (`13/03/2024`).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parses the free-form publication dates found in review datasets.
///
/// Timestamps are kept as local wall-clock time in the dataset timezone:
/// naive inputs are taken as-is and offset-bearing inputs are converted into
/// the dataset timezone before their offset is dropped. Slash-separated dates
/// are read month-first, then day-first.
#[derive(Debug, Clone, Copy)]
pub struct TimestampParser {
    tz: Tz,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl TimestampParser {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a parser from an IANA name; `"auto"` resolves the system zone.
    pub fn from_name(tz_name: &str) -> Result<Self> {
        let resolved = if tz_name.eq_ignore_ascii_case("auto") {
            get_system_timezone()
        } else {
            tz_name.to_string()
        };
        match resolved.parse::<Tz>() {
            Ok(tz) => Ok(Self::new(tz)),
            Err(_) if tz_name.eq_ignore_ascii_case("auto") => {
                warn!(
                    "TimestampParser: system timezone \"{}\" not recognised, falling back to UTC",
                    resolved
                );
                Ok(Self::default())
            }
            Err(_) => Err(InsightsError::InvalidTimezone(resolved)),
        }
    }

    /// The dataset timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Parse `raw` into a local timestamp.
    ///
    /// Returns `None` for empty strings and unrecognised formats.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&self.tz).naive_local());
        }
        if let Ok(dt) = DateTime::parse_from_str(&normalised, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(dt.with_timezone(&self.tz).naive_local());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&self.tz).naive_local());
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        debug!("TimestampParser: could not parse timestamp \"{}\"", s);
        None
    }
}
