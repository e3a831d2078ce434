/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

mod common;
use common::*;

use cslm_processor::Entry;

fn issued(value: &str) -> Entry {
    Entry::new("item", "book").with_field("issued", value)
}

/// Render `issued` through a one-element citation layout.
fn render_date(layout: &str, entry: Entry) -> String {
    let style = make_style(&format!("<citation><layout>{layout}</layout></citation>"));
    cite_each(style, vec![entry]).process_citations().remove(0)
}

const TEXT: &str = r#"<date variable="issued" form="text"/>"#;

#[test]
fn test_localized_forms() {
    assert_eq!(render_date(TEXT, issued("2020-01-05")), "January 5, 2020");
    assert_eq!(
        render_date(r#"<date variable="issued" form="numeric"/>"#, issued("2020-01-05")),
        "1/5/2020"
    );
    assert_eq!(
        render_date(
            r#"<date variable="issued" form="text" date-parts="year-month"/>"#,
            issued("2020-01-05")
        ),
        "January 2020"
    );
}

#[test]
fn test_localized_part_override() {
    assert_eq!(
        render_date(
            r#"<date variable="issued" form="text"><date-part name="month" form="short"/></date>"#,
            issued("2020-03-09")
        ),
        "Mar. 9, 2020"
    );
}

#[test]
fn test_non_localized_parts() {
    let layout = r#"<date variable="issued" delimiter="-">
                      <date-part name="year"/>
                      <date-part name="month" form="numeric-leading-zeros"/>
                      <date-part name="day" form="numeric-leading-zeros"/>
                    </date>"#;
    assert_eq!(render_date(layout, issued("2020-03-09")), "2020-03-09");
    assert_eq!(render_date(layout, issued("2020")), "2020");
}

#[test]
fn test_ranges() {
    assert_eq!(
        render_date(TEXT, issued("2020-05-05/2020-05-07")),
        "May 5\u{2013}7, 2020"
    );
    assert_eq!(
        render_date(TEXT, issued("2019-05/2020-06")),
        "May 2019\u{2013}June 2020"
    );
    let custom = r#"<date variable="issued"><date-part name="year" range-delimiter="/"/></date>"#;
    assert_eq!(render_date(custom, issued("1999/2001")), "1999/2001");
    assert_eq!(render_date(TEXT, issued("2000/")), "2000\u{2013}");
}

#[test]
fn test_seasons() {
    assert_eq!(render_date(TEXT, issued("1999-22")), "Summer 1999");
}

#[test]
fn test_eras() {
    let year = r#"<date variable="issued"><date-part name="year"/></date>"#;
    assert_eq!(render_date(year, issued("-0044")), "44BC");
    assert_eq!(render_date(year, issued("0800")), "800AD");
    assert_eq!(render_date(year, issued("1066")), "1066");
}

#[test]
fn test_unparseable_dates_render_raw() {
    assert_eq!(render_date(TEXT, issued("Spring 2001")), "Spring 2001");
}

#[test]
fn test_date_affixes_and_formatting() {
    assert_eq!(
        render_date(
            r#"<date variable="issued" prefix="(" suffix=")"><date-part name="year"/></date>"#,
            issued("2020-05-01")
        ),
        "(2020)"
    );
}

#[test]
fn test_csl_json_dates() {
    let json = r#"[
      {"id": "range", "type": "book", "issued": {"date-parts": [[2020, 5, 5], [2020, 5, 7]]}},
      {"id": "season", "type": "book", "issued": {"date-parts": [[1999]], "season": 2}},
      {"id": "literal", "type": "book", "issued": {"literal": "Spring 2001"}}
    ]"#;
    let style = format!(
        r#"<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
             <citation><layout>{TEXT}</layout></citation>
           </style>"#
    );
    let mut processor = cslm_processor::Processor::from_sources(&style, json).unwrap();
    processor.register_citations(vec![
        cslm_processor::CitationOccurrence::simple("range"),
        cslm_processor::CitationOccurrence::simple("season"),
        cslm_processor::CitationOccurrence::simple("literal"),
    ]);
    assert_eq!(
        processor.process_citations(),
        vec!["May 5\u{2013}7, 2020", "Summer 1999", "Spring 2001"]
    );
}

#[test]
fn test_missing_date_uses_no_date_term() {
    let layout = r#"<choose>
                      <if variable="issued"><date variable="issued"><date-part name="year"/></date></if>
                      <else><text term="no date" form="short"/></else>
                    </choose>"#;
    assert_eq!(render_date(layout, Entry::new("item", "book")), "n.d.");
    assert_eq!(render_date(layout, issued("1984")), "1984");
}
