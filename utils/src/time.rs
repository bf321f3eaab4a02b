//! Time formatting helpers.

use vetting_types::Timestamp;

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

/// Time left until `deadline`, or `"closed"` once it has passed.
pub fn format_remaining(now: Timestamp, deadline: Timestamp) -> String {
    if now >= deadline {
        return "closed".to_string();
    }
    format_duration(now.until(deadline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3_900), "1h 5m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn remaining() {
        assert_eq!(format_remaining(Timestamp::new(10), Timestamp::new(70)), "1m 0s");
        assert_eq!(format_remaining(Timestamp::new(70), Timestamp::new(70)), "closed");
    }
}
