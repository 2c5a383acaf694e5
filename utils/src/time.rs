//! Time formatting helpers.

use duck_types::{Restriction, Timestamp};

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// One-line description of an account restriction as seen at `now`.
pub fn describe_restriction(restriction: &Restriction, now: Timestamp) -> String {
    match restriction {
        Restriction::None => "none".to_string(),
        Restriction::Banned => "banned".to_string(),
        Restriction::Timed { until } if restriction.is_active(now) => {
            format!("restricted, {} remaining", format_duration(now.elapsed_since(*until)))
        }
        Restriction::Timed { .. } => "expired".to_string(),
    }
}
