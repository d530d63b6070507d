//! Due-date input parsing and display formatting.
//!
//! The due-date prompt accepts a small natural-language vocabulary on top
//! of plain ISO dates, and the task table shows due dates relative to
//! today.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow"
/// - bare weekday names ("friday", "fri") for this week's occurrence
/// - "next monday" etc. for next week's occurrence
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    parse_due_from(s, Local::now().date_naive())
}

/// Same as `parse_due_input` with an explicit reference day.
pub fn parse_due_from(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    // "in X" patterns
    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    // Weekday patterns
    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];

    for (day_name, target_day) in weekdays {
        let current_day = today.weekday().num_days_from_monday() as i32;
        let days_ahead = (target_day + 7 - current_day) % 7;

        if s == day_name {
            // This week's occurrence; a bare weekday matching today means today.
            return Some(today + Duration::days(days_ahead as i64));
        }

        if s == format!("next {}", day_name) {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Some(today + Duration::days(days_to_add as i64));
        }
    }

    // Try ISO format
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = d - today;
            if delta.num_days() == 0 {
                "today".into()
            } else if delta.num_days() == 1 {
                "tomorrow".into()
            } else if delta.num_days() > 1 {
                format!("in {}d", delta.num_days())
            } else {
                format!("{}d late", -delta.num_days())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_simple_words() {
        // 2025-03-03 is a Monday.
        let today = day(2025, 3, 3);
        assert_eq!(parse_due_from("today", today), Some(today));
        assert_eq!(parse_due_from(" Tomorrow ", today), Some(day(2025, 3, 4)));
    }

    #[test]
    fn parses_in_patterns() {
        let today = day(2025, 3, 3);
        assert_eq!(parse_due_from("in 3d", today), Some(day(2025, 3, 6)));
        assert_eq!(parse_due_from("in 2w", today), Some(day(2025, 3, 17)));
    }

    #[test]
    fn parses_weekdays() {
        let today = day(2025, 3, 3); // Monday
        assert_eq!(parse_due_from("friday", today), Some(day(2025, 3, 7)));
        assert_eq!(parse_due_from("mon", today), Some(today));
        assert_eq!(parse_due_from("next monday", today), Some(day(2025, 3, 10)));
        assert_eq!(parse_due_from("next fri", today), Some(day(2025, 3, 14)));
    }

    #[test]
    fn parses_iso_and_rejects_garbage() {
        let today = day(2025, 3, 3);
        assert_eq!(parse_due_from("2025-12-31", today), Some(day(2025, 12, 31)));
        assert_eq!(parse_due_from("someday", today), None);
        assert_eq!(parse_due_from("2025-13-01", today), None);
    }

    #[test]
    fn formats_relative() {
        let today = day(2025, 3, 3);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(day(2025, 3, 4)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(day(2025, 3, 8)), today), "in 5d");
        assert_eq!(format_due_relative(Some(day(2025, 3, 1)), today), "2d late");
    }
}
