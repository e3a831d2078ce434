/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Numeric variables: number forms, page ranges and label plurality.

use std::sync::OnceLock;

use cslm_core::Locale;
use cslm_style::{NumberForm, PageRangeFormat};
use regex::Regex;

fn digits() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").ok()).as_ref()
}

/// A value made only of numbers joined by range or list separators.
fn numeric_list() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+(\s*(?:[-–,&]|and)\s*\d+)*\s*$").ok())
        .as_ref()
}

fn multiple() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w\s*(?:[-–,&;]|\band\b)\s*\w").ok())
        .as_ref()
}

fn page_range() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z]*)(\d+)\s*(?:-+|–)\s*([A-Za-z]*)(\d+)\s*$").ok()
    })
    .as_ref()
}

/// True when the value's first character is a digit.
pub fn is_numeric(value: &str) -> bool {
    value.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// True when the value holds a range or a list ("1-3", "2, 5", "3 & 4").
pub fn is_multiple(value: &str) -> bool {
    multiple().is_some_and(|re| re.is_match(value))
}

/// Lowercase roman numeral; numbers outside 1–3999 stay arabic.
pub fn to_roman(number: u32) -> String {
    if !(1..4000).contains(&number) {
        return number.to_string();
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut n = number;
    let mut out = String::new();
    for (value, numeral) in TABLE {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Render a numeric value in a `<number>` form.
///
/// Each number inside a range or list is formatted on its own and hyphens
/// between numbers become en dashes. Values that are not purely numeric
/// come back unchanged.
pub fn format_number(value: &str, form: NumberForm, locale: &Locale) -> String {
    let (Some(digits), true) = (
        digits(),
        numeric_list().is_some_and(|re| re.is_match(value)),
    ) else {
        return value.to_string();
    };
    let mut out = String::with_capacity(value.len() + 4);
    let mut last = 0;
    for m in digits.find_iter(value) {
        let between = &value[last..m.start()];
        out.push_str(&normalize_separator(between));
        let number: i64 = m.as_str().parse().unwrap_or_default();
        let formatted = match form {
            NumberForm::Numeric => m.as_str().to_string(),
            NumberForm::Ordinal => locale.ordinal(number),
            NumberForm::LongOrdinal => locale.long_ordinal(number),
            NumberForm::Roman => u32::try_from(number)
                .map(to_roman)
                .unwrap_or_else(|_| m.as_str().to_string()),
        };
        out.push_str(&formatted);
        last = m.end();
    }
    out.push_str(&value[last..]);
    out
}

fn normalize_separator(between: &str) -> String {
    if between.trim().chars().all(|c| c == '-') && between.contains('-') {
        "\u{2013}".to_string()
    } else {
        between.to_string()
    }
}

/// Format a page value according to a `page-range-format`.
///
/// Comma-separated lists are formatted range by range; hyphens between
/// numbers become `delimiter` (the locale's `page-range-delimiter`).
/// Without a format, range ends stay as written.
pub fn format_page_range(pages: &str, format: Option<PageRangeFormat>, delimiter: &str) -> String {
    pages
        .split(',')
        .map(|part| format_one_range(part, format, delimiter))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_one_range(part: &str, format: Option<PageRangeFormat>, delimiter: &str) -> String {
    let Some(caps) = page_range().and_then(|re| re.captures(part)) else {
        return part.to_string();
    };
    let leading = &part[..part.len() - part.trim_start().len()];
    let start_prefix = caps.get(1).map_or("", |m| m.as_str());
    let start = caps.get(2).map_or("", |m| m.as_str());
    let end_prefix = caps.get(3).map_or("", |m| m.as_str());
    let end = caps.get(4).map_or("", |m| m.as_str());

    if start_prefix != end_prefix && !end_prefix.is_empty() {
        return format!("{leading}{start_prefix}{start}{delimiter}{end_prefix}{end}");
    }

    let expanded = expand_end(start, end);
    let (Ok(s), Ok(e)) = (start.parse::<u64>(), expanded.parse::<u64>()) else {
        return part.to_string();
    };
    let end_text = if e <= s {
        expanded
    } else {
        match format {
            None => end.to_string(),
            Some(PageRangeFormat::Expanded) => expanded,
            Some(PageRangeFormat::Minimal) => format_minimal(start, &expanded, 1),
            Some(PageRangeFormat::MinimalTwo) => format_minimal(start, &expanded, 2),
            Some(PageRangeFormat::Chicago | PageRangeFormat::Chicago16) => {
                format_chicago(s, &expanded)
            }
        }
    };
    format!("{leading}{start_prefix}{start}{delimiter}{end_text}")
}

/// Restore digits omitted from an abbreviated range end ("321-8" ends at 328).
fn expand_end(start: &str, end: &str) -> String {
    if end.len() >= start.len() {
        return end.to_string();
    }
    format!("{}{}", &start[..start.len() - end.len()], end)
}

/// Minimal format: keep only differing digits, with at least `min_digits`.
pub fn format_minimal(start: &str, end: &str, min_digits: usize) -> String {
    if start.len() != end.len() {
        return end.to_string();
    }
    let first_diff = start
        .chars()
        .zip(end.chars())
        .position(|(s, e)| s != e)
        .unwrap_or(end.len());
    let keep_from = first_diff.min(end.len().saturating_sub(min_digits));
    end[keep_from..].to_string()
}

/// Chicago Manual of Style page ranges.
///
/// Under 100 and multiples of 100 keep all digits; 101–109 style starts keep
/// the changed part only; otherwise at least two digits, falling back to all
/// digits when more than two change in a four-digit range.
pub fn format_chicago(start: u64, end: &str) -> String {
    if start < 100 || start % 100 == 0 {
        return end.to_string();
    }
    let start_str = start.to_string();
    if start % 100 < 10 {
        return format_minimal(&start_str, end, 1);
    }
    let minimal = format_minimal(&start_str, end, 2);
    if start_str.len() == 4 && minimal.len() > 2 {
        end.to_string()
    } else {
        minimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN_DASH: &str = "\u{2013}";

    #[test]
    fn test_roman() {
        assert_eq!(to_roman(4), "iv");
        assert_eq!(to_roman(1994), "mcmxciv");
        assert_eq!(to_roman(0), "0");
    }

    #[test]
    fn test_number_forms() {
        let locale = Locale::en_us();
        assert_eq!(format_number("3", NumberForm::Ordinal, &locale), "3rd");
        assert_eq!(format_number("2", NumberForm::LongOrdinal, &locale), "second");
        assert_eq!(format_number("12", NumberForm::Roman, &locale), "xii");
        assert_eq!(format_number("1-3", NumberForm::Ordinal, &locale), "1st\u{2013}3rd");
        assert_eq!(format_number("2 & 4", NumberForm::Roman, &locale), "ii & iv");
    }

    #[test]
    fn test_non_numeric_falls_back_to_raw() {
        let locale = Locale::en_us();
        assert_eq!(format_number("2nd rev.", NumberForm::Ordinal, &locale), "2nd rev.");
        assert_eq!(format_number("Spring", NumberForm::Roman, &locale), "Spring");
    }

    #[test]
    fn test_is_numeric_and_multiple() {
        assert!(is_numeric("12"));
        assert!(is_numeric("2nd"));
        assert!(!is_numeric("Second"));
        assert!(is_multiple("1-3"));
        assert!(is_multiple("2, 5"));
        assert!(!is_multiple("12"));
    }

    #[test]
    fn test_page_range_formats() {
        let fmt = |pages, format| format_page_range(pages, Some(format), EN_DASH);
        assert_eq!(fmt("321-328", PageRangeFormat::Expanded), "321–328");
        assert_eq!(fmt("321-8", PageRangeFormat::Expanded), "321–328");
        assert_eq!(fmt("321-328", PageRangeFormat::Minimal), "321–8");
        assert_eq!(fmt("321-328", PageRangeFormat::MinimalTwo), "321–28");
        assert_eq!(fmt("42-45", PageRangeFormat::MinimalTwo), "42–45");
        assert_eq!(fmt("3-10", PageRangeFormat::Chicago), "3–10");
        assert_eq!(fmt("100-104", PageRangeFormat::Chicago), "100–104");
        assert_eq!(fmt("101-108", PageRangeFormat::Chicago), "101–8");
        assert_eq!(fmt("321-328", PageRangeFormat::Chicago), "321–28");
        assert_eq!(fmt("1496-1504", PageRangeFormat::Chicago), "1496–1504");
    }

    #[test]
    fn test_page_lists_and_unformatted() {
        assert_eq!(format_page_range("12-15, 20", None, EN_DASH), "12–15, 20");
        assert_eq!(format_page_range("xii", None, EN_DASH), "xii");
        assert_eq!(
            format_page_range("S12-S15", None, EN_DASH),
            "S12–15"
        );
    }
}
