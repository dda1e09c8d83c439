//! Time formatting and parsing helpers shared by the timer runtime and the CLI.

/// Clock rendering style for [`format_clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockFormat {
    /// `mm:ss`, with hours folded into the minute field (`75:00` for 4500s).
    #[default]
    MmSs,
    /// `hh:mm:ss`, always three zero-padded fields.
    HhMmSs,
}

/// Format a second count as a zero-padded clock string.
pub fn format_clock(seconds: u64, format: ClockFormat) -> String {
    let secs = seconds % 60;
    match format {
        ClockFormat::MmSs => {
            let minutes = seconds / 60;
            format!("{minutes:02}:{secs:02}")
        }
        ClockFormat::HhMmSs => {
            let hours = seconds / 3600;
            let minutes = (seconds % 3600) / 60;
            format!("{hours:02}:{minutes:02}:{secs:02}")
        }
    }
}

/// Parse user clock input into seconds.
///
/// Accepts a bare second count (`"90"`), `mm:ss` (`"1:30"`), or `hh:mm:ss`
/// (`"1:30:00"`). Minute and second fields past the first must be below 60.
pub fn parse_clock(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if !trimmed.contains(':') {
        return trimmed.parse().ok();
    }

    let parts: Vec<u64> = trimmed
        .split(':')
        .map(|part| part.parse().ok())
        .collect::<Option<_>>()?;

    match parts[..] {
        [minutes, seconds] if seconds < 60 => Some(minutes * 60 + seconds),
        [hours, minutes, seconds] if minutes < 60 && seconds < 60 => {
            Some(hours * 3600 + minutes * 60 + seconds)
        }
        _ => None,
    }
}

/// Completion percentage, 0.0 to 100.0. A zero total reads as 0%.
pub fn progress_pct(elapsed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (elapsed as f64 / total as f64 * 100.0).min(100.0)
}

/// Seconds left given elapsed and total, floored at zero.
pub fn remaining_secs(elapsed: u64, total: u64) -> u64 {
    total.saturating_sub(elapsed)
}

/// Human-readable duration: "5 minutes", "1 hour 30 minutes".
///
/// Seconds are only spelled out below one hour.
pub fn human_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds} second{}", plural(seconds));
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours} hour{}", plural(hours)));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} minute{}", plural(minutes)));
    }
    if secs > 0 && hours == 0 {
        parts.push(format!("{secs} second{}", plural(secs)));
    }
    parts.join(" ")
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_mm_ss_folds_hours_into_minutes() {
        assert_eq!(format_clock(0, ClockFormat::MmSs), "00:00");
        assert_eq!(format_clock(90, ClockFormat::MmSs), "01:30");
        assert_eq!(format_clock(4500, ClockFormat::MmSs), "75:00");
    }

    #[test]
    fn format_hh_mm_ss() {
        assert_eq!(format_clock(3661, ClockFormat::HhMmSs), "01:01:01");
        assert_eq!(format_clock(59, ClockFormat::HhMmSs), "00:00:59");
    }

    #[test]
    fn parse_accepts_three_shapes() {
        assert_eq!(parse_clock("90"), Some(90));
        assert_eq!(parse_clock("1:30"), Some(90));
        assert_eq!(parse_clock("1:30:00"), Some(5400));
        assert_eq!(parse_clock(" 25 "), Some(25));
    }

    #[test]
    fn parse_rejects_out_of_range_fields() {
        assert_eq!(parse_clock("1:60"), None);
        assert_eq!(parse_clock("1:60:00"), None);
        assert_eq!(parse_clock("1:00:60"), None);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("abc"), None);
        assert_eq!(parse_clock("1:2:3:4"), None);
        assert_eq!(parse_clock("-5"), None);
    }

    #[test]
    fn progress_caps_and_handles_zero_total() {
        assert_eq!(progress_pct(0, 0), 0.0);
        assert_eq!(progress_pct(30, 60), 50.0);
        assert_eq!(progress_pct(90, 60), 100.0);
    }

    #[test]
    fn remaining_floors_at_zero() {
        assert_eq!(remaining_secs(10, 60), 50);
        assert_eq!(remaining_secs(90, 60), 0);
    }

    #[test]
    fn human_durations() {
        assert_eq!(human_duration(1), "1 second");
        assert_eq!(human_duration(45), "45 seconds");
        assert_eq!(human_duration(60), "1 minute");
        assert_eq!(human_duration(90), "1 minute 30 seconds");
        assert_eq!(human_duration(5400), "1 hour 30 minutes");
        assert_eq!(human_duration(3600), "1 hour");
        assert_eq!(human_duration(3661), "1 hour 1 minute");
    }
}
