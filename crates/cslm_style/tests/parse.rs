/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use cslm_style::{
    parse_locale, parse_style, BranchCondition, Collapse, CslNode, DemoteParticle, Match,
    NameForm, SortSource, StyleClass, StyleError, Test, TextSource,
};

const AUTHOR_DATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0"
       demote-non-dropping-particle="sort-only" default-locale="en-GB">
  <info>
    <title>Author-Date Test</title>
    <id>http://example.org/author-date</id>
  </info>
  <locale xml:lang="en">
    <terms>
      <term name="editor" form="short">
        <single>ed.</single>
        <multiple>eds.</multiple>
      </term>
    </terms>
    <style-options punctuation-in-quote="true"/>
  </locale>
  <macro name="author">
    <names variable="author">
      <name form="short" and="symbol"/>
      <substitute>
        <names variable="editor"/>
        <text variable="title"/>
      </substitute>
    </names>
  </macro>
  <macro name="year">
    <date variable="issued">
      <date-part name="year"/>
    </date>
  </macro>
  <citation disambiguate-add-year-suffix="true" collapse="year-suffix" et-al-min="3" et-al-use-first="1">
    <sort>
      <key macro="author"/>
      <key variable="issued" sort="descending"/>
    </sort>
    <layout prefix="(" suffix=")" delimiter="; ">
      <group delimiter=", ">
        <text macro="author"/>
        <text macro="year"/>
      </group>
    </layout>
  </citation>
  <bibliography hanging-indent="true" subsequent-author-substitute="---">
    <layout>
      <text macro="author" suffix=". "/>
      <text variable="title" font-style="italic"/>
    </layout>
  </bibliography>
</style>"#;

#[test]
fn test_parse_author_date_style() {
    let style = parse_style(AUTHOR_DATE).unwrap();
    assert_eq!(style.class, StyleClass::InText);
    assert_eq!(style.info.title, "Author-Date Test");
    assert_eq!(style.default_locale.as_deref(), Some("en-GB"));
    assert_eq!(
        style.options.demote_non_dropping_particle,
        DemoteParticle::SortOnly
    );
    assert_eq!(style.macros.len(), 2);
    assert_eq!(
        style.macros.keys().collect::<Vec<_>>(),
        vec!["author", "year"]
    );

    let citation = &style.citation;
    assert!(citation.options.disambiguate_add_year_suffix);
    assert_eq!(citation.options.collapse, Some(Collapse::YearSuffix));
    assert_eq!(citation.names.et_al_min, Some(3));
    let sort = citation.sort.as_ref().unwrap();
    assert_eq!(sort.keys[0].source, SortSource::Macro("author".into()));
    assert!(sort.keys[1].descending);

    let layout = &citation.layouts[0];
    assert_eq!(layout.rendering.prefix.as_deref(), Some("("));
    assert_eq!(layout.delimiter.as_deref(), Some("; "));

    let bib = style.bibliography.as_ref().unwrap();
    assert!(bib.options.hanging_indent);
    assert_eq!(
        bib.options.subsequent_author_substitute.as_deref(),
        Some("---")
    );
}

#[test]
fn test_parse_embedded_locale() {
    let style = parse_style(AUTHOR_DATE).unwrap();
    let locale = &style.locales[0];
    assert_eq!(locale.lang.as_deref(), Some("en"));
    assert_eq!(locale.punctuation_in_quote, Some(true));
    assert_eq!(locale.terms[0].single, "ed.");
    assert_eq!(locale.terms[0].multiple.as_deref(), Some("eds."));
}

#[test]
fn test_parse_names_with_substitute() {
    let style = parse_style(AUTHOR_DATE).unwrap();
    let CslNode::Names(names) = &style.macros["author"][0] else {
        panic!("expected names");
    };
    assert_eq!(names.variables, vec!["author"]);
    let name = names.name.as_ref().unwrap();
    assert_eq!(name.options.form, Some(NameForm::Short));
    let substitute = names.substitute.as_ref().unwrap();
    assert_eq!(substitute.len(), 2);
    assert!(matches!(
        &substitute[1],
        CslNode::Text(t) if t.source == TextSource::Variable {
            name: "title".into(),
            form: cslm_style::VariableForm::Long
        }
    ));
}

#[test]
fn test_parse_cslm_nested_conditions() {
    let xml = r#"<style class="note">
      <citation>
        <layout>
          <choose>
            <if>
              <conditions match="all">
                <condition type="legal_case" variable="authority" match="all"/>
                <condition position="first" match="none"/>
              </conditions>
              <text variable="title"/>
            </if>
            <else><text value="other"/></else>
          </choose>
        </layout>
      </citation>
    </style>"#;
    let style = parse_style(xml).unwrap();
    assert_eq!(style.class, StyleClass::Note);
    let CslNode::Choose(choose) = &style.citation.layouts[0].children[0] else {
        panic!("expected choose");
    };
    let BranchCondition::Nested(conditions) = &choose.if_branch.condition else {
        panic!("expected nested conditions");
    };
    assert_eq!(conditions.conditions.len(), 2);
    assert_eq!(conditions.conditions[1].match_mode, Match::None);
    assert_eq!(
        conditions.conditions[0].tests,
        vec![
            Test::Type("legal_case".into()),
            Test::Variable("authority".into())
        ]
    );
    assert_eq!(choose.if_branch.children.len(), 1);
    assert!(choose.else_branch.is_some());
}

#[test]
fn test_parse_multilingual_layouts() {
    let xml = r#"<style class="in-text">
      <citation>
        <layout locale="de fr"><text value="de"/></layout>
        <layout><text value="default"/></layout>
      </citation>
    </style>"#;
    let style = parse_style(xml).unwrap();
    assert_eq!(style.citation.layouts.len(), 2);
    assert_eq!(style.citation.layouts[0].locales, vec!["de", "fr"]);
    let chosen = style.citation.layout_for(Some("fr-FR")).unwrap();
    assert_eq!(chosen.locales, vec!["de", "fr"]);
    let fallback = style.citation.layout_for(Some("ja")).unwrap();
    assert!(fallback.locales.is_empty());
}

#[test]
fn test_missing_citation_is_error() {
    let xml = r#"<style class="in-text"><info><title>x</title></info></style>"#;
    assert!(matches!(
        parse_style(xml),
        Err(StyleError::MissingSection("citation"))
    ));
}

#[test]
fn test_unknown_rendering_element_is_error() {
    let xml = r#"<style class="in-text">
      <citation><layout><paragraph/></layout></citation>
    </style>"#;
    match parse_style(xml) {
        Err(StyleError::UnknownElement { parent, element }) => {
            assert_eq!(parent, "layout");
            assert_eq!(element, "paragraph");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_wrong_root_is_error() {
    assert!(matches!(
        parse_style("<locale/>"),
        Err(StyleError::UnknownRoot { .. })
    ));
}

#[test]
fn test_malformed_xml_is_error() {
    assert!(matches!(
        parse_style("<style><citation>"),
        Err(StyleError::Xml(_))
    ));
}

#[test]
fn test_parse_standalone_locale() {
    let xml = r#"<locale xmlns="http://purl.org/net/xbiblio/csl" xml:lang="de-DE">
      <style-options punctuation-in-quote="false"/>
      <date form="numeric" delimiter=".">
        <date-part name="day" form="numeric-leading-zeros"/>
        <date-part name="month" form="numeric-leading-zeros"/>
        <date-part name="year"/>
      </date>
      <terms>
        <term name="and">und</term>
        <term name="page" form="short"><single>S.</single><multiple>S.</multiple></term>
      </terms>
    </locale>"#;
    let locale = parse_locale(xml).unwrap();
    assert_eq!(locale.lang.as_deref(), Some("de-DE"));
    assert_eq!(locale.punctuation_in_quote, Some(false));
    assert_eq!(locale.date_formats.len(), 1);
    assert_eq!(locale.date_formats[0].parts.len(), 3);
    assert_eq!(locale.terms[0].single, "und");
    assert_eq!(locale.terms[0].multiple, None);
}
