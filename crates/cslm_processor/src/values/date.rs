/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Date values: parsing the `-`-delimited entry form and rendering
//! localized and non-localized `<date>` elements.
//!
//! Accepted input: `[sign]YYYY[-MM[-DD]]`, optionally followed by `/` and an
//! end date (or nothing, for an open range). Months 21–24 (and 13–16) are
//! seasons. `~`, `?` and `%` qualifiers and a leading "circa"-style word mark
//! the date uncertain. Anything else renders as the raw string.

use cslm_core::Locale;
use cslm_style::{Date, DatePart, DatePartForm, DatePartName, DatePartsSelector, Rendering};
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::render::{Output, Tag};

const DEFAULT_RANGE_DELIMITER: &str = "\u{2013}";

/// Words and markers that flag a date as uncertain.
const UNCERTAINTY_MARKERS: &[&str] = &["circa", "c.", "~", "?", "ca.", "approximately"];

/// Leading words stripped before parsing, longest first.
const CIRCA_WORDS: &[&str] = &["approximately", "circa", "ca.", "c."];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateParts {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateParts {
    pub fn is_season(&self) -> bool {
        self.month.is_some_and(is_season)
    }

    /// Sortable key: offset year, month, day.
    pub fn sort_key(&self) -> String {
        format!(
            "{:05}{:02}{:02}",
            i64::from(self.year) + 10_000,
            self.month.unwrap_or(0),
            self.day.unwrap_or(0)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDate {
    pub start: DateParts,
    pub end: Option<DateParts>,
    /// `2000/`: a range with no end.
    pub open_end: bool,
    pub uncertain: bool,
}

impl ParsedDate {
    pub fn year(&self) -> i32 {
        self.start.year
    }

    pub fn has_day(&self) -> bool {
        self.start.day.is_some()
    }

    pub fn has_year_only(&self) -> bool {
        self.start.month.is_none() && self.start.day.is_none()
    }

    pub fn has_month_or_season(&self) -> bool {
        self.start.month.is_some() && self.start.day.is_none()
    }

    pub fn sort_key(&self) -> String {
        match &self.end {
            Some(end) => format!("{}-{}", self.start.sort_key(), end.sort_key()),
            None => self.start.sort_key(),
        }
    }
}

fn is_season(month: u32) -> bool {
    (13..=16).contains(&month) || (21..=24).contains(&month)
}

/// True when the raw value carries an uncertainty marker.
pub fn is_uncertain(value: &str) -> bool {
    let lower = value.to_lowercase();
    UNCERTAINTY_MARKERS.iter().any(|m| lower.contains(m))
}

/// Parse a raw date value; `None` when it is not in the normalized form.
pub fn parse(value: &str) -> Option<ParsedDate> {
    let mut rest = value.trim();
    let mut uncertain = false;
    let lower = rest.to_lowercase();
    if let Some(word) = CIRCA_WORDS.iter().find(|w| lower.starts_with(*w)) {
        rest = rest[word.len()..].trim_start();
        uncertain = true;
    }
    let mut input = rest;
    let date = parse_range(&mut input).ok()?;
    if !input.trim().is_empty() {
        return None;
    }
    Some(ParsedDate {
        uncertain: uncertain || date.uncertain,
        ..date
    })
}

fn parse_quality(input: &mut &str) -> Result<bool, ErrMode<ContextError>> {
    let qualifier = opt(alt(('?', '~', '%'))).parse_next(input)?;
    Ok(qualifier.is_some())
}

fn parse_year(input: &mut &str) -> Result<i32, ErrMode<ContextError>> {
    let sign = opt(alt(('-', '+'))).parse_next(input)?;
    let value = take_while(1..=6, |c: char| c.is_ascii_digit())
        .try_map(|s: &str| s.parse::<i32>())
        .parse_next(input)?;
    Ok(if sign == Some('-') { -value } else { value })
}

fn parse_two_digits(input: &mut &str) -> Result<u32, ErrMode<ContextError>> {
    take_while(1..=2, |c: char| c.is_ascii_digit())
        .try_map(|s: &str| s.parse::<u32>())
        .parse_next(input)
}

fn parse_month(input: &mut &str) -> Result<u32, ErrMode<ContextError>> {
    let month = parse_two_digits.parse_next(input)?;
    if (1..=12).contains(&month) || is_season(month) {
        Ok(month)
    } else {
        Err(ErrMode::Backtrack(ContextError::default()))
    }
}

fn parse_day(input: &mut &str) -> Result<u32, ErrMode<ContextError>> {
    let day = parse_two_digits.parse_next(input)?;
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(ErrMode::Backtrack(ContextError::default()))
    }
}

/// One date: year, optional month, optional day, each with a qualifier.
fn parse_parts(input: &mut &str) -> Result<(DateParts, bool), ErrMode<ContextError>> {
    let year = parse_year.parse_next(input)?;
    let mut uncertain = parse_quality.parse_next(input)?;
    let month = opt(preceded('-', parse_month)).parse_next(input)?;
    let mut day = None;
    if month.is_some() {
        uncertain |= parse_quality.parse_next(input)?;
        day = opt(preceded('-', parse_day)).parse_next(input)?;
        if day.is_some() {
            uncertain |= parse_quality.parse_next(input)?;
        }
    }
    Ok((DateParts { year, month, day }, uncertain))
}

fn parse_range(input: &mut &str) -> Result<ParsedDate, ErrMode<ContextError>> {
    let (start, mut uncertain) = parse_parts.parse_next(input)?;
    let end = opt(preceded('/', opt(parse_parts))).parse_next(input)?;
    let (end, open_end) = match end {
        None => (None, false),
        Some(None) => (None, true),
        Some(Some((end, end_uncertain))) => {
            uncertain |= end_uncertain;
            (Some(end).filter(|e| *e != start), false)
        }
    };
    Ok(ParsedDate {
        start,
        end,
        open_end,
        uncertain,
    })
}

/// The date parts a `<date>` renders, with its part delimiter.
///
/// Localized dates take the locale's parts filtered by `date-parts`; parts
/// written inside the style element override form, range delimiter,
/// formatting and text case but keep the locale's affixes.
pub fn resolve_parts(node: &Date, locale: &Locale) -> (Vec<DatePart>, Option<String>) {
    let Some(form) = node.form else {
        return (node.parts.clone(), node.delimiter.clone());
    };
    let Some(base) = locale.date_formats.get(form) else {
        return (node.parts.clone(), node.delimiter.clone());
    };
    let parts = base
        .parts
        .iter()
        .filter(|p| match node.date_parts {
            DatePartsSelector::YearMonthDay => true,
            DatePartsSelector::YearMonth => p.name != DatePartName::Day,
            DatePartsSelector::Year => p.name == DatePartName::Year,
        })
        .map(|p| match node.parts.iter().find(|o| o.name == p.name) {
            Some(over) => DatePart {
                name: p.name,
                form: over.form.or(p.form),
                range_delimiter: over.range_delimiter.clone().or(p.range_delimiter.clone()),
                rendering: Rendering {
                    formatting: if over.rendering.formatting.is_empty() {
                        p.rendering.formatting
                    } else {
                        over.rendering.formatting
                    },
                    text_case: over.rendering.text_case.or(p.rendering.text_case),
                    strip_periods: over.rendering.strip_periods || p.rendering.strip_periods,
                    ..p.rendering.clone()
                },
            },
            None => p.clone(),
        })
        .collect();
    (parts, base.delimiter.clone())
}

/// Renders parsed dates with a resolved part list.
pub struct DateRenderer<'a> {
    pub parts: &'a [DatePart],
    pub delimiter: &'a str,
    pub locale: &'a Locale,
}

impl DateRenderer<'_> {
    /// Render a date, appending `year_suffix` to the last rendered year.
    pub fn render(&self, date: &ParsedDate, year_suffix: Option<char>) -> Output {
        let Some(end) = date.end else {
            let single = self.render_parts(self.parts, &date.start, year_suffix, false);
            if date.open_end {
                let delimiter = self.range_delimiter(DatePartName::Year);
                return Output::seq(vec![single, Output::text(delimiter)]);
            }
            return single;
        };
        let start = &date.start;
        let diff = if start.year != end.year {
            DatePartName::Year
        } else if start.month != end.month {
            DatePartName::Month
        } else {
            DatePartName::Day
        };
        let delimiter = self.range_delimiter(diff);

        let in_segment = |part: &DatePart| match diff {
            DatePartName::Year => true,
            DatePartName::Month => part.name != DatePartName::Year,
            DatePartName::Day => part.name == DatePartName::Day,
        };
        let positions: Vec<usize> = self
            .parts
            .iter()
            .enumerate()
            .filter(|(_, p)| in_segment(p))
            .map(|(i, _)| i)
            .collect();
        let contiguous = positions.windows(2).all(|w| w[1] == w[0] + 1);
        let (Some(&first), Some(&last), true) = (positions.first(), positions.last(), contiguous)
        else {
            return self.full_range(start, &end, delimiter, year_suffix);
        };
        if diff == DatePartName::Year {
            return self.full_range(start, &end, delimiter, year_suffix);
        }

        let segment = &self.parts[first..=last];
        let range = Output::seq(vec![
            self.render_parts(segment, start, None, true),
            Output::text(delimiter),
            self.render_parts(segment, &end, None, false),
        ]);
        let mut items = Vec::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i == first {
                items.push(range.clone());
            } else if !(first..=last).contains(&i) {
                items.push(self.render_part(part, start, year_suffix));
            }
        }
        Output::join(items, self.delimiter)
    }

    fn full_range(
        &self,
        start: &DateParts,
        end: &DateParts,
        delimiter: &str,
        year_suffix: Option<char>,
    ) -> Output {
        Output::seq(vec![
            self.render_parts(self.parts, start, None, true),
            Output::text(delimiter),
            self.render_parts(self.parts, end, year_suffix, false),
        ])
    }

    fn range_delimiter(&self, name: DatePartName) -> &str {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.range_delimiter.as_deref())
            .unwrap_or(DEFAULT_RANGE_DELIMITER)
    }

    /// Render `parts` of one date. `drop_last_suffix` removes the suffix of
    /// the last rendered part, used on the start side of a range.
    fn render_parts(
        &self,
        parts: &[DatePart],
        date: &DateParts,
        year_suffix: Option<char>,
        drop_last_suffix: bool,
    ) -> Output {
        let rendered: Vec<(&DatePart, Output)> = parts
            .iter()
            .map(|p| (p, self.render_value(p, date, year_suffix)))
            .filter(|(_, o)| !o.is_empty())
            .collect();
        let count = rendered.len();
        let items = rendered
            .into_iter()
            .enumerate()
            .map(|(i, (part, value))| {
                let suffix = if drop_last_suffix && i + 1 == count {
                    None
                } else {
                    part.rendering.suffix.as_deref()
                };
                decorate(value, &part.rendering, suffix)
            })
            .collect();
        Output::join(items, self.delimiter)
    }

    fn render_part(&self, part: &DatePart, date: &DateParts, year_suffix: Option<char>) -> Output {
        let value = self.render_value(part, date, year_suffix);
        decorate(value, &part.rendering, part.rendering.suffix.as_deref())
    }

    /// The bare value of one part, before affixes and formatting.
    fn render_value(&self, part: &DatePart, date: &DateParts, year_suffix: Option<char>) -> Output {
        match part.name {
            DatePartName::Year => {
                let year = Output::text(self.year_text(date.year, part.form));
                match year_suffix {
                    Some(c) => Output::seq(vec![
                        year,
                        Output::tagged(Tag::YearSuffix(c), Output::text(c.to_string())),
                    ]),
                    None => year,
                }
            }
            DatePartName::Month => date
                .month
                .map(|m| Output::text(self.month_text(m, part.form)))
                .unwrap_or_default(),
            DatePartName::Day => match (date.day, date.is_season()) {
                (Some(day), false) => Output::text(self.day_text(day, part.form)),
                _ => Output::Null,
            },
        }
    }

    fn year_text(&self, year: i32, form: Option<DatePartForm>) -> String {
        if year < 0 {
            let era = self.term("bc");
            return format!("{}{}", -year, era);
        }
        if form == Some(DatePartForm::Short) {
            return format!("{:02}", year % 100);
        }
        if year > 0 && year < 1000 {
            return format!("{}{}", year, self.term("ad"));
        }
        year.to_string()
    }

    fn month_text(&self, month: u32, form: Option<DatePartForm>) -> String {
        if is_season(month) {
            return self
                .locale
                .month_name(month, false)
                .map(str::to_string)
                .unwrap_or_else(|| month.to_string());
        }
        match form {
            Some(DatePartForm::Numeric) => month.to_string(),
            Some(DatePartForm::NumericLeadingZeros) => format!("{month:02}"),
            Some(DatePartForm::Short) => self
                .locale
                .month_name(month, true)
                .map(str::to_string)
                .unwrap_or_else(|| month.to_string()),
            _ => self
                .locale
                .month_name(month, false)
                .map(str::to_string)
                .unwrap_or_else(|| month.to_string()),
        }
    }

    fn day_text(&self, day: u32, form: Option<DatePartForm>) -> String {
        match form {
            Some(DatePartForm::NumericLeadingZeros) => format!("{day:02}"),
            Some(DatePartForm::Ordinal) => {
                if self.locale.limit_day_ordinals_to_day_1() && day != 1 {
                    day.to_string()
                } else {
                    self.locale.ordinal(i64::from(day))
                }
            }
            _ => day.to_string(),
        }
    }

    fn term(&self, name: &str) -> &str {
        self.locale
            .term(name, cslm_style::TermForm::Long, false)
            .unwrap_or_default()
    }
}

/// Apply a date part's own text transforms, formatting and affixes.
fn decorate(mut value: Output, rendering: &Rendering, suffix: Option<&str>) -> Output {
    if value.is_empty() {
        return value;
    }
    if rendering.strip_periods {
        value.strip_periods();
    }
    if let Some(case) = rendering.text_case {
        value.apply_text_case(case);
    }
    value
        .formatted(rendering.formatting, rendering.quotes, None)
        .with_affixes(rendering.prefix.as_deref(), suffix)
}
