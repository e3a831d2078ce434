/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use cslm_processor::{Bibliography, CitationOccurrence, Entry, Name, Processor};
use cslm_style::Style;

// --- Helper Functions for Test Data Construction ---

/// Parse a style from the inner XML of a `<style>` element.
pub fn make_style(body: &str) -> Style {
    make_style_with(r#"class="in-text""#, body)
}

/// Parse a style with extra attributes on the root element.
pub fn make_style_with(attributes: &str, body: &str) -> Style {
    cslm_style::parse_style(&format!(
        r#"<style xmlns="http://purl.org/net/xbiblio/csl" version="1.0" {attributes}>{body}</style>"#
    ))
    .expect("test style should parse")
}

/// Create a book with a single author.
pub fn make_book(id: &str, family: &str, given: &str, year: i32, title: &str) -> Entry {
    Entry::new(id, "book")
        .with_names("author", vec![Name::new(family, given)])
        .with_field("issued", &year.to_string())
        .with_field("title", title)
}

/// Create a book with multiple authors.
pub fn make_book_multi_author(
    id: &str,
    authors: Vec<(&str, &str)>,
    year: i32,
    title: &str,
) -> Entry {
    let names = authors
        .into_iter()
        .map(|(family, given)| Name::new(family, given))
        .collect();
    Entry::new(id, "book")
        .with_names("author", names)
        .with_field("issued", &year.to_string())
        .with_field("title", title)
}

/// Create a journal article.
pub fn make_article(
    id: &str,
    family: &str,
    given: &str,
    year: i32,
    title: &str,
    journal: &str,
) -> Entry {
    Entry::new(id, "article-journal")
        .with_names("author", vec![Name::new(family, given)])
        .with_field("issued", &year.to_string())
        .with_field("title", title)
        .with_field("container-title", journal)
}

pub fn make_bibliography(entries: Vec<Entry>) -> Bibliography {
    entries
        .into_iter()
        .map(|entry| (entry.id.clone(), entry))
        .collect()
}

/// A processor with one citation per entry, in the given order.
pub fn cite_each(style: Style, entries: Vec<Entry>) -> Processor {
    let citations = entries
        .iter()
        .map(|entry| CitationOccurrence::simple(&entry.id))
        .collect();
    let mut processor = Processor::new(style, make_bibliography(entries));
    processor.register_citations(citations);
    processor
}

/// Author-date citation and bibliography in the common pattern.
pub const AUTHOR_DATE: &str = r#"
  <macro name="author-short">
    <names variable="author">
      <name form="short" and="symbol" delimiter=", " initialize-with=". "/>
      <substitute><names variable="editor"/><text variable="title" font-style="italic"/></substitute>
    </names>
  </macro>
  <macro name="author">
    <names variable="author">
      <name name-as-sort-order="first" and="symbol" delimiter=", " initialize-with=". "/>
      <substitute><names variable="editor"/><text variable="title" font-style="italic"/></substitute>
    </names>
  </macro>
  <macro name="year">
    <date variable="issued"><date-part name="year"/></date>
  </macro>
  <citation disambiguate-add-year-suffix="true" et-al-min="3" et-al-use-first="1">
    <sort><key macro="author-short"/><key macro="year"/></sort>
    <layout prefix="(" suffix=")" delimiter="; ">
      <group delimiter=", ">
        <text macro="author-short"/>
        <text macro="year"/>
        <group delimiter=" "><label variable="locator" form="short"/><text variable="locator"/></group>
      </group>
    </layout>
  </citation>
  <bibliography>
    <sort><key macro="author"/><key macro="year"/></sort>
    <layout suffix=".">
      <group delimiter=". ">
        <text macro="author"/>
        <text macro="year" prefix="(" suffix=")"/>
        <text variable="title" font-style="italic"/>
        <text variable="publisher"/>
      </group>
    </layout>
  </bibliography>
"#;
