// Formatting utilities

use crate::utils::time_calc::{TimeBreakdown, TimeUnit};

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration in minutes to human readable (e.g., "2h 30m")
pub fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        let hours = minutes / 60;
        let mins = minutes % 60;
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    }
}

/// Render a breakdown as "1 year, 2 weeks, 30 minutes"
pub fn format_breakdown(breakdown: &TimeBreakdown) -> String {
    breakdown
        .entries()
        .iter()
        .map(|(unit, count)| format_unit(*unit, *count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_unit(unit: TimeUnit, count: u64) -> String {
    format!(
        "{} {}{}",
        count,
        unit.label(),
        if count == 1 { "" } else { "s" }
    )
}

/// Format an optional hour count; absent means no recorded playtime
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{:.1} h", h),
        None => "n/a".to_string(),
    }
}

/// Truncate string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_calc::mins_to_breakdown;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1000000), "1,000,000");
        assert_eq!(format_number(123), "123");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30m");
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(120), "2h");
    }

    #[test]
    fn test_format_breakdown() {
        assert_eq!(format_breakdown(&mins_to_breakdown(90)), "1 hour, 30 minutes");
        assert_eq!(format_breakdown(&mins_to_breakdown(0)), "0 minutes");
        assert_eq!(
            format_breakdown(&mins_to_breakdown(524_160)),
            "1 year, 0 minutes"
        );
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(Some(2.5)), "2.5 h");
        assert_eq!(format_hours(None), "n/a");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }
}
