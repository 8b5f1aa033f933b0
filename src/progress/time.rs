/// `position / duration`, with NaN and infinities (zero or unknown
/// duration) mapped to 0.
pub fn relative_progress(position: f64, duration: f64) -> f64 {
    let progress = position / duration;
    if progress.is_finite() { progress } else { 0.0 }
}

/// Fraction of a bar at `left..left + width` under pointer column `x`,
/// clamped to `[0, 1]`.
pub fn pointer_fraction(x: f64, left: f64, width: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    ((x - left).min(width) / width).max(0.0)
}

/// `M:SS` of the rounded number of seconds.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
