/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Variable access and value formatting.
//!
//! [`lookup`] maps a normalized [`Entry`] into CSL variable space, including
//! the fallbacks needed for records converted from BibTeX-like sources. The
//! submodules format the three structured value kinds: names, dates and
//! numbers.

pub mod contributor;
pub mod date;
pub mod number;

use std::borrow::Cow;

use cslm_core::{Entry, Name};

/// Variables holding name lists.
pub const NAME_VARIABLES: &[&str] = &[
    "author",
    "chair",
    "collection-editor",
    "compiler",
    "composer",
    "container-author",
    "contributor",
    "curator",
    "director",
    "editor",
    "editorial-director",
    "executive-producer",
    "guest",
    "host",
    "illustrator",
    "interviewer",
    "narrator",
    "organizer",
    "original-author",
    "performer",
    "producer",
    "recipient",
    "reviewed-author",
    "script-writer",
    "series-creator",
    "translator",
];

/// Variables holding dates.
pub const DATE_VARIABLES: &[&str] = &[
    "accessed",
    "available-date",
    "event-date",
    "issued",
    "original-date",
    "submitted",
    // CSL-M
    "publication-date",
    "locator-date",
];

/// Variables treated as numbers by `<number>` and `is-numeric`.
pub const NUMBER_VARIABLES: &[&str] = &[
    "chapter-number",
    "citation-number",
    "collection-number",
    "edition",
    "first-reference-note-number",
    "issue",
    "locator",
    "number",
    "number-of-pages",
    "number-of-volumes",
    "page",
    "page-first",
    "part-number",
    "printing-number",
    "section",
    "supplement-number",
    "version",
    "volume",
];

/// Per-entry disambiguation state.
///
/// Fields only ever grow while the disambiguation engine runs; the whole
/// state is recomputed when the cited set changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisambiguationState {
    pub year_suffix: Option<char>,
    pub names_expanded: u8,
    /// 0 = as styled, 1 = initials, 2 = full given names.
    pub givenname_level: u8,
    /// Still ambiguous after name expansion: `disambiguate="true"` matches.
    pub condition: bool,
}

/// Fallback field names tried after the variable itself.
fn fallbacks(variable: &str, csl_type: &str) -> &'static [&'static str] {
    match (variable, csl_type) {
        ("publisher", "thesis") => &["school", "institution", "organization"],
        ("publisher", "report") => &["institution", "organization"],
        ("publisher", _) => &["organization"],
        ("issue", "article-journal" | "article-magazine" | "article-newspaper") => &["number"],
        ("container-title", _) => &["journal", "journaltitle", "booktitle"],
        ("container-title-short", _) => &["journalAbbreviation", "journal-abbreviation"],
        ("publisher-place", _) => &["address", "location"],
        ("event-place", _) => &["venue"],
        ("page", _) => &["pages"],
        ("title-short", _) => &["shortTitle", "shorttitle"],
        ("issued", _) => &["date", "year"],
        ("collection-title", _) => &["series"],
        ("DOI", _) => &["doi"],
        ("URL", _) => &["url"],
        ("ISBN", _) => &["isbn"],
        ("ISSN", _) => &["issn"],
        ("PMID", _) => &["pmid"],
        ("PMCID", _) => &["pmcid"],
        // CSL-M legal variables
        ("authority", "legal_case") => &["court"],
        ("jurisdiction", _) => &["country"],
        _ => &[],
    }
}

/// The value of a standard variable, after type-specific fallbacks.
///
/// Virtual variables that depend on the citation (`locator`,
/// `citation-number`, `year-suffix`, ...) are not entry data and are
/// resolved by the interpreter.
pub fn lookup<'e>(entry: &'e Entry, variable: &str) -> Option<Cow<'e, str>> {
    if let Some(value) = entry.field(variable) {
        return Some(Cow::Borrowed(value));
    }
    if variable == "page-first" {
        return lookup(entry, "page").and_then(|page| first_page(&page).map(Cow::Owned));
    }
    fallbacks(variable, entry.csl_type())
        .iter()
        .find_map(|name| entry.field(name))
        .map(Cow::Borrowed)
}

/// The short form of a variable, falling back to the long form.
pub fn lookup_short<'e>(entry: &'e Entry, variable: &str) -> Option<Cow<'e, str>> {
    lookup(entry, &format!("{variable}-short")).or_else(|| lookup(entry, variable))
}

/// A name variable.
pub fn names<'e>(entry: &'e Entry, variable: &str) -> Option<&'e [Name]> {
    entry.names(variable)
}

/// Whether a variable has content, for `variable` conditions.
pub fn has_variable(entry: &Entry, variable: &str) -> bool {
    names(entry, variable).is_some() || lookup(entry, variable).is_some()
}

/// The issued year, if the date parses.
pub fn year(entry: &Entry) -> Option<i32> {
    lookup(entry, "issued")
        .and_then(|value| date::parse(&value))
        .map(|date| date.year())
}

/// The first name list among the usual author roles.
pub fn primary_names(entry: &Entry) -> Option<&[Name]> {
    ["author", "editor", "translator"]
        .iter()
        .find_map(|role| names(entry, role))
}

/// The first page of a page range ("321" for "321-328").
fn first_page(page: &str) -> Option<String> {
    let first = page
        .split(|c: char| c == '-' || c == '\u{2013}' || c == ',' || c == '&')
        .next()?
        .trim();
    (!first.is_empty()).then(|| first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thesis_publisher_falls_back_to_school() {
        let thesis = Entry::new("t", "phdthesis").with_field("school", "MIT");
        assert_eq!(lookup(&thesis, "publisher").as_deref(), Some("MIT"));
        let book = Entry::new("b", "book").with_field("school", "MIT");
        assert_eq!(lookup(&book, "publisher"), None);
    }

    #[test]
    fn test_bibtex_field_fallbacks() {
        let entry = Entry::new("a", "article")
            .with_field("journal", "Nature")
            .with_field("pages", "10--12")
            .with_field("number", "4")
            .with_field("doi", "10.1000/x");
        assert_eq!(lookup(&entry, "container-title").as_deref(), Some("Nature"));
        assert_eq!(lookup(&entry, "page").as_deref(), Some("10--12"));
        assert_eq!(lookup(&entry, "issue").as_deref(), Some("4"));
        assert_eq!(lookup(&entry, "DOI").as_deref(), Some("10.1000/x"));
        assert_eq!(lookup(&entry, "page-first").as_deref(), Some("10"));
    }

    #[test]
    fn test_short_form_falls_back_to_long() {
        let entry = Entry::new("a", "book").with_field("title", "A Long Title");
        assert_eq!(lookup_short(&entry, "title").as_deref(), Some("A Long Title"));
        let entry = entry.with_field("shortTitle", "Long");
        assert_eq!(lookup_short(&entry, "title").as_deref(), Some("Long"));
    }

    #[test]
    fn test_year() {
        let entry = Entry::new("a", "book").with_field("issued", "2020-05-01");
        assert_eq!(year(&entry), Some(2020));
        assert_eq!(year(&Entry::new("b", "book")), None);
    }
}
