//! Due date parsing, formatting and classification.
//!
//! Functions take `today` explicitly where the result depends on it, so the
//! callers decide which clock to use and tests can pin the date.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// How close a task is to its due date, used for row highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Completed,
    Overdue,
    /// Due today or within the next two days.
    DueSoon,
    Upcoming,
}

/// Number of days ahead that still counts as "due soon".
pub const DUE_SOON_DAYS: i64 = 2;

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "in 3d", "in 2w"
/// - "friday", "this friday", "next friday" (and three-letter forms)
/// - "YYYY-MM-DD" format
pub fn parse_due_input_from(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return shift_days(today, 1),
        "yesterday" => return shift_days(today, -1),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return shift_days(today, days);
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Duration::try_weeks(weeks).and_then(|delta| today.checked_add_signed(delta));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];

    let current_day = today.weekday().num_days_from_monday() as i64;
    for (day_name, target_day) in weekdays {
        let days_ahead = (target_day + 7 - current_day) % 7;

        if s == day_name || s == format!("this {}", day_name) {
            return shift_days(today, days_ahead);
        }

        if s == format!("next {}", day_name) {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return shift_days(today, days_to_add);
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// `today` moved by `days`, `None` when the result leaves chrono's date range.
fn shift_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| today.checked_add_signed(delta))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {}d", d),
        d => format!("{}d late", -d),
    }
}

/// Classify a task's due date for highlighting.
pub fn due_state(due: NaiveDate, completed: bool, today: NaiveDate) -> DueState {
    if completed {
        DueState::Completed
    } else if due < today {
        DueState::Overdue
    } else if due <= today + Duration::days(DUE_SOON_DAYS) {
        DueState::DueSoon
    } else {
        DueState::Upcoming
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_due_keywords() {
        // 2024-01-10 is a Wednesday.
        let today = d(2024, 1, 10);
        assert_eq!(parse_due_input_from("today", today), Some(today));
        assert_eq!(parse_due_input_from(" Tomorrow ", today), Some(d(2024, 1, 11)));
        assert_eq!(parse_due_input_from("yesterday", today), Some(d(2024, 1, 9)));
        assert_eq!(parse_due_input_from("in 3d", today), Some(d(2024, 1, 13)));
        assert_eq!(parse_due_input_from("in 2w", today), Some(d(2024, 1, 24)));
    }

    #[test]
    fn test_parse_due_weekdays() {
        let today = d(2024, 1, 10);
        assert_eq!(parse_due_input_from("friday", today), Some(d(2024, 1, 12)));
        assert_eq!(parse_due_input_from("this fri", today), Some(d(2024, 1, 12)));
        assert_eq!(parse_due_input_from("wed", today), Some(today));
        assert_eq!(parse_due_input_from("next wednesday", today), Some(d(2024, 1, 17)));
        assert_eq!(parse_due_input_from("next monday", today), Some(d(2024, 1, 22)));
    }

    #[test]
    fn test_parse_due_iso_and_garbage() {
        let today = d(2024, 1, 10);
        assert_eq!(parse_due_input_from("2024-02-29", today), Some(d(2024, 2, 29)));
        assert_eq!(parse_due_input_from("2023-02-29", today), None);
        assert_eq!(parse_due_input_from("", today), None);
        assert_eq!(parse_due_input_from("someday", today), None);
    }

    #[test]
    fn test_parse_due_out_of_range_offsets() {
        let today = d(2024, 1, 10);
        assert_eq!(parse_due_input_from("in 100000000d", today), None);
        assert_eq!(parse_due_input_from("in 999999999999999w", today), None);
        assert_eq!(parse_due_input_from("in -100000000d", today), None);
        assert_eq!(parse_due_input_from("in 0d", today), Some(today));
    }

    #[test]
    fn test_format_due_relative() {
        let today = d(2024, 1, 10);
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(format_due_relative(d(2024, 1, 11), today), "tomorrow");
        assert_eq!(format_due_relative(d(2024, 1, 15), today), "in 5d");
        assert_eq!(format_due_relative(d(2024, 1, 8), today), "2d late");
    }

    #[test]
    fn test_due_state_boundaries() {
        let today = d(2024, 1, 10);
        assert_eq!(due_state(d(2024, 1, 1), true, today), DueState::Completed);
        assert_eq!(due_state(d(2024, 1, 9), false, today), DueState::Overdue);
        assert_eq!(due_state(today, false, today), DueState::DueSoon);
        assert_eq!(due_state(d(2024, 1, 12), false, today), DueState::DueSoon);
        assert_eq!(due_state(d(2024, 1, 13), false, today), DueState::Upcoming);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer line", 6), "a lon…");
    }
}
