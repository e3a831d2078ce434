/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! `<choose>` branches as seen through rendered output.

mod common;
use common::*;

use cslm_processor::{CitationItem, CitationOccurrence, Entry, Processor};

fn render(layout: &str, entry: Entry) -> String {
    let style = make_style(&format!("<citation><layout>{layout}</layout></citation>"));
    cite_each(style, vec![entry]).process_citations().remove(0)
}

fn choose(condition: &str) -> String {
    format!(
        r#"<choose><if {condition}><text value="yes"/></if><else><text value="no"/></else></choose>"#
    )
}

fn book() -> Entry {
    make_book("item", "Doe", "Jane", 2020, "Title")
}

#[test]
fn test_type() {
    let layout = choose(r#"type="chapter article-journal" match="any""#);
    assert_eq!(render(&layout, book()), "no");
    assert_eq!(
        render(&layout, make_article("item", "Doe", "Jane", 2020, "Title", "Journal")),
        "yes"
    );
}

#[test]
fn test_type_aliases_match_csl_names() {
    let entry = Entry::new("item", "inproceedings").with_field("title", "Talk");
    assert_eq!(render(&choose(r#"type="paper-conference""#), entry), "yes");
}

#[test]
fn test_match_modes() {
    let entry = || book().with_field("publisher", "Acme");
    assert_eq!(
        render(&choose(r#"variable="publisher editor" match="all""#), entry()),
        "no"
    );
    assert_eq!(
        render(&choose(r#"variable="publisher editor" match="any""#), entry()),
        "yes"
    );
    assert_eq!(
        render(&choose(r#"variable="editor translator" match="none""#), entry()),
        "yes"
    );
    assert_eq!(
        render(&choose(r#"variable="publisher editor" match="nand""#), entry()),
        "yes"
    );
}

#[test]
fn test_names_count_as_variables() {
    assert_eq!(render(&choose(r#"variable="author""#), book()), "yes");
    assert_eq!(render(&choose(r#"variable="editor""#), book()), "no");
}

#[test]
fn test_is_numeric() {
    let layout = choose(r#"is-numeric="edition""#);
    assert_eq!(render(&layout, book().with_field("edition", "2")), "yes");
    assert_eq!(render(&layout, book().with_field("edition", "2nd")), "yes");
    assert_eq!(render(&layout, book().with_field("edition", "Second")), "no");
    assert_eq!(render(&layout, book()), "no");
}

#[test]
fn test_is_multiple() {
    let layout = choose(r#"is-multiple="page""#);
    assert_eq!(render(&layout, book().with_field("page", "12-15")), "yes");
    assert_eq!(render(&layout, book().with_field("page", "12")), "no");
}

#[test]
fn test_date_tests() {
    let uncertain = choose(r#"is-uncertain-date="issued""#);
    let circa = Entry::new("item", "book").with_field("issued", "circa 1850");
    assert_eq!(render(&uncertain, circa), "yes");
    assert_eq!(render(&uncertain, book()), "no");

    let year_only = choose(r#"has-year-only="issued""#);
    assert_eq!(render(&year_only, book()), "yes");
    let dated = Entry::new("item", "book").with_field("issued", "2020-03-04");
    assert_eq!(render(&year_only, dated.clone()), "no");
    assert_eq!(render(&choose(r#"has-day="issued""#), dated), "yes");
}

#[test]
fn test_nested_conditions() {
    let layout = r#"<choose>
                      <if>
                        <conditions match="all">
                          <condition type="book"/>
                          <condition variable="publisher editor" match="any"/>
                        </conditions>
                        <text value="published book"/>
                      </if>
                      <else><text value="other"/></else>
                    </choose>"#;
    assert_eq!(
        render(layout, book().with_field("publisher", "Acme")),
        "published book"
    );
    assert_eq!(render(layout, book()), "other");
    assert_eq!(
        render(
            layout,
            make_article("item", "Doe", "Jane", 2020, "Title", "Journal").with_field("publisher", "Acme")
        ),
        "other"
    );
}

#[test]
fn test_else_if_chain() {
    let layout = r#"<choose>
                      <if type="article-journal"><text value="article"/></if>
                      <else-if type="book"><text value="book"/></else-if>
                      <else><text value="other"/></else>
                    </choose>"#;
    assert_eq!(render(layout, book()), "book");
    assert_eq!(render(layout, Entry::new("item", "report")), "other");
}

#[test]
fn test_locator_label() {
    let style = make_style(&format!(
        "<citation><layout>{}</layout></citation>",
        choose(r#"locator="page""#)
    ));
    let mut processor = Processor::new(style, make_bibliography(vec![book()]));
    processor.register_citations(vec![
        CitationOccurrence {
            items: vec![CitationItem::new("item").with_locator("12", None)],
            ..Default::default()
        },
        CitationOccurrence {
            items: vec![CitationItem::new("item").with_locator("3", Some("chapter"))],
            ..Default::default()
        },
    ]);
    assert_eq!(processor.process_citations(), vec!["yes", "no"]);
}

#[test]
fn test_position_in_citations() {
    let style = make_style(&format!(
        "<citation><layout>{}</layout></citation>",
        r#"<choose>
             <if position="first"><text value="first"/></if>
             <else-if position="ibid"><text value="ibid"/></else-if>
             <else><text value="subsequent"/></else>
           </choose>"#
    ));
    let other = make_book("other", "Roe", "Rita", 2001, "Other");
    let mut processor = Processor::new(style, make_bibliography(vec![book(), other]));
    processor.register_citations(vec![
        CitationOccurrence::simple("item"),
        CitationOccurrence::simple("item"),
        CitationOccurrence::simple("other"),
        CitationOccurrence::simple("item"),
    ]);
    assert_eq!(
        processor.process_citations(),
        vec!["first", "ibid", "first", "subsequent"]
    );
}

#[test]
fn test_context_and_position_in_bibliography() {
    let style = make_style(
        r#"<macro name="where">
             <choose>
               <if context="citation"><text value="citation"/></if>
               <else><text value="bibliography"/></else>
             </choose>
           </macro>
           <citation><layout><text macro="where"/></layout></citation>
           <bibliography>
             <layout>
               <group delimiter=" ">
                 <text macro="where"/>
                 <choose><if position="first"><text value="positioned"/></if></choose>
               </group>
             </layout>
           </bibliography>"#,
    );
    let processor = cite_each(style, vec![book()]);
    assert_eq!(processor.process_citations(), vec!["citation"]);
    assert_eq!(processor.bibliography_entries()[0].text, "bibliography");
}
