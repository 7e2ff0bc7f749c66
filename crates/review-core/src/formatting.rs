/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use review_core::formatting::format_count;
///
/// assert_eq!(format_count(7), "7");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a `0.0..=1.0` share as a percentage with one decimal place.
///
/// Values outside the unit interval are clamped.
///
/// # Examples
///
/// ```
/// use review_core::formatting::format_share;
///
/// assert_eq!(format_share(0.625), "62.5%");
/// assert_eq!(format_share(0.0), "0.0%");
/// assert_eq!(format_share(1.0), "100.0%");
/// ```
pub fn format_share(share: f64) -> String {
    format!("{:.1}%", clamp_share(share) * 100.0)
}

/// Render a share as a fixed-width text progress bar.
///
/// # Examples
///
/// ```
/// use review_core::formatting::share_bar;
///
/// assert_eq!(share_bar(0.5, 10), "[█████░░░░░]");
/// assert_eq!(share_bar(0.0, 4), "[░░░░]");
/// ```
pub fn share_bar(share: f64, width: usize) -> String {
    let filled = (clamp_share(share) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format an optional rating, rendering a missing one as `"-"`.
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("{:.1}", r),
        None => "-".to_string(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn clamp_share(share: f64) -> f64 {
    if share.is_nan() {
        0.0
    } else {
        share.clamp(0.0, 1.0)
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
