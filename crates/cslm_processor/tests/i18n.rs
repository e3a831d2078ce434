/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Locale resolution as seen through rendered output.

mod common;
use common::*;

use cslm_processor::{Entry, Locale, Processor, ProcessorOptions};

const PAIR_LAYOUT: &str = r#"<citation><layout>
    <names variable="author"><name and="text"/></names>
  </layout></citation>"#;

fn pair() -> Entry {
    make_book_multi_author("pair", vec![("Doe", "Jane"), ("Roe", "John")], 2020, "Title")
}

fn with_locale(style: cslm_style::Style, entries: Vec<Entry>, lang: &str) -> Processor {
    let options = ProcessorOptions {
        locale: Some(lang.to_string()),
        ..Default::default()
    };
    let citations = entries
        .iter()
        .map(|entry| cslm_processor::CitationOccurrence::simple(&entry.id))
        .collect();
    let mut processor = Processor::with_options(style, make_bibliography(entries), options);
    processor.register_citations(citations);
    processor
}

#[test]
fn test_builtin_terms() {
    let processor = cite_each(make_style(PAIR_LAYOUT), vec![pair()]);
    assert_eq!(processor.process_citations(), vec!["Jane Doe and John Roe"]);
}

#[test]
fn test_style_locale_overrides_term() {
    let style = make_style(&format!(
        r#"<locale><terms><term name="and">plus</term></terms></locale>{PAIR_LAYOUT}"#
    ));
    let processor = cite_each(style, vec![pair()]);
    assert_eq!(processor.process_citations(), vec!["Jane Doe plus John Roe"]);
}

#[test]
fn test_base_language_matches_region() {
    let style = make_style_with(
        r#"class="in-text" default-locale="en""#,
        &format!(
            r#"<locale xml:lang="en-US"><terms><term name="and">with</term></terms></locale>{PAIR_LAYOUT}"#
        ),
    );
    let processor = cite_each(style, vec![pair()]);
    assert_eq!(processor.process_citations(), vec!["Jane Doe with John Roe"]);
}

#[test]
fn test_exact_style_locale_beats_base() {
    let style = make_style(&format!(
        r#"<locale xml:lang="en-US"><terms><term name="and">exact</term></terms></locale>
           <locale xml:lang="en"><terms><term name="and">base</term></terms></locale>
           {PAIR_LAYOUT}"#
    ));
    let processor = with_locale(style, vec![pair()], "en-US");
    assert_eq!(processor.process_citations(), vec!["Jane Doe exact John Roe"]);
}

#[test]
fn test_external_locale() {
    let german = Locale::from_xml(
        r#"<locale xmlns="http://purl.org/net/xbiblio/csl" version="1.0" xml:lang="de-DE">
             <style-options punctuation-in-quote="false"/>
             <terms>
               <term name="and">und</term>
               <term name="month-03">März</term>
             </terms>
           </locale>"#,
    )
    .unwrap();
    let style = make_style(
        r#"<citation><layout>
             <group delimiter=", ">
               <names variable="author"><name and="text"/></names>
               <date variable="issued" form="text" date-parts="year-month"/>
             </group>
           </layout></citation>"#,
    );
    let entry = pair().with_field("issued", "2020-03-09");
    let mut processor = with_locale(style, vec![entry], "de-DE");
    assert_eq!(
        processor.process_citations(),
        vec!["Jane Doe and John Roe, March 2020"]
    );
    processor.add_locale(german);
    assert_eq!(processor.locale.lang, "de-DE");
    assert_eq!(
        processor.process_citations(),
        vec!["Jane Doe und John Roe, März 2020"]
    );
}

#[test]
fn test_style_locale_beats_external() {
    let style = make_style(&format!(
        r#"<locale xml:lang="de"><terms><term name="and">sowie</term></terms></locale>{PAIR_LAYOUT}"#
    ));
    let mut processor = with_locale(style, vec![pair()], "de-DE");
    let mut external = Locale {
        lang: "de-DE".to_string(),
        ..Default::default()
    };
    external.set_term(
        "and",
        cslm_style::TermForm::Long,
        cslm_core::locale::TermValue::Simple("und".to_string()),
    );
    processor.add_locale(external);
    assert_eq!(processor.process_citations(), vec!["Jane Doe sowie John Roe"]);
}

#[test]
fn test_punctuation_in_quote_by_locale() {
    let style = || {
        make_style(
            r#"<citation><layout>
                 <group delimiter=", ">
                   <text variable="title" quotes="true"/>
                   <text variable="publisher"/>
                 </group>
               </layout></citation>"#,
        )
    };
    let entry = || make_book("item", "Doe", "Jane", 2020, "Title").with_field("publisher", "Acme");
    let us = with_locale(style(), vec![entry()], "en-US");
    assert_eq!(us.process_citations(), vec!["\u{201c}Title,\u{201d} Acme"]);
    let gb = with_locale(style(), vec![entry()], "en-GB");
    assert_eq!(gb.process_citations(), vec!["\u{201c}Title\u{201d}, Acme"]);
}

#[test]
fn test_options_locale_overrides_default_locale() {
    let style = make_style_with(
        r#"class="in-text" default-locale="fr-FR""#,
        &format!(
            r#"<locale xml:lang="fr"><terms><term name="and">et</term></terms></locale>{PAIR_LAYOUT}"#
        ),
    );
    let french = cite_each(style.clone(), vec![pair()]);
    assert_eq!(french.process_citations(), vec!["Jane Doe et John Roe"]);
    let english = with_locale(style, vec![pair()], "en-US");
    assert_eq!(english.process_citations(), vec!["Jane Doe and John Roe"]);
}
