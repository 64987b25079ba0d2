//! Free-text date normalization.
//!
//! Bank exports mix `2024-01-15`, `01/15/2024`, `15.01.2024`, and
//! timestamped variants in the same ecosystem. Parsing tries, in order:
//! direct unambiguous layouts, separator-normalized 3-part orderings
//! (`MM/DD/YYYY`, then `DD/MM/YYYY`, then `YYYY/MM/DD`), then a single
//! retry with any time component stripped.
//!
//! Known limitation: a 3-part date whose day is <= 12 is inherently
//! ambiguous and resolves US-style (`MM/DD`) because that ordering is
//! tried first. No locale hint is consulted.

use chrono::NaiveDate;

/// Direct layouts tried before any separator games: ISO and the English
/// month-name forms banks occasionally emit.
const DIRECT_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%b %d %Y", "%B %d %Y"];

/// Parse a raw date string into a calendar date. Pure calendar semantics:
/// no timezone is applied, and time-of-day is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_inner(raw.trim(), true)
}

fn parse_inner(s: &str, allow_time_strip: bool) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    for fmt in DIRECT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // Normalize every separator variant to '/' and try the three field
    // orderings in fixed priority.
    let normalized: String = s
        .chars()
        .map(|c| if matches!(c, '.' | '/' | '-' | '\\') { '/' } else { c })
        .collect();
    let parts: Vec<&str> = normalized.split('/').map(str::trim).collect();
    if parts.len() == 3 {
        if let Some(date) = try_orderings(&parts) {
            return Some(date);
        }
    }

    // An embedded time component ("2024-01-15 10:30", "...T00:00")
    // hides the date token; strip it and retry once.
    if allow_time_strip && (s.contains(' ') || s.contains('T')) {
        if let Some(head) = s.split([' ', 'T']).next() {
            return parse_inner(head, false);
        }
    }

    None
}

fn try_orderings(parts: &[&str]) -> Option<NaiveDate> {
    // (year, month, day) index triples: MM/DD/YYYY, DD/MM/YYYY, YYYY/MM/DD.
    const ORDERINGS: [(usize, usize, usize); 3] = [(2, 0, 1), (2, 1, 0), (0, 1, 2)];

    for (yi, mi, di) in ORDERINGS {
        // Require a 4-digit year; 2-digit years are rejected, not guessed.
        if parts[yi].len() != 4 {
            continue;
        }
        let (Ok(year), Ok(month), Ok(day)) = (
            parts[yi].parse::<i32>(),
            parts[mi].parse::<u32>(),
            parts[di].parse::<u32>(),
        ) else {
            continue;
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_date("2024-01-15"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_us_slash_date() {
        assert_eq!(parse_date("01/15/2024"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_eu_slash_date_falls_through_to_day_first() {
        // 15 cannot be a month, so DD/MM/YYYY is the first valid ordering.
        assert_eq!(parse_date("15/01/2024"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_ambiguous_day_resolves_us_style() {
        // 03/04 could be Mar 4 or Apr 3; MM/DD wins by priority.
        assert_eq!(parse_date("03/04/2024"), Some(d(2024, 3, 4)));
    }

    #[test]
    fn test_alternate_separators() {
        assert_eq!(parse_date("15.01.2024"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date("01-15-2024"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date(r"2024\01\15"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_month_name_forms() {
        assert_eq!(parse_date("Jan 15, 2024"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date("January 15 2024"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_embedded_time_stripped() {
        assert_eq!(parse_date("2024-01-15 10:30:00"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15T00:00:00Z"), Some(d(2024, 1, 15)));
        assert_eq!(parse_date("15/01/2024 08:00"), Some(d(2024, 1, 15)));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("13/13/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_two_digit_year_rejected() {
        assert_eq!(parse_date("01/15/24"), None);
    }
}
