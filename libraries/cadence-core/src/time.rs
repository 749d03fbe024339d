//! Time formatting helpers for the player surface

/// Format seconds as `m:ss`
///
/// Minutes are not padded and keep counting past 59 (`61:05`).
/// Negative, NaN and infinite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Playback progress as a fraction in `[0, 1]`
///
/// Returns 0 while the duration is unknown (zero or negative).
pub fn progress_fraction(current: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current.is_finite() {
        return 0.0;
    }

    (current / duration).clamp(0.0, 1.0)
}
