/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! XML to [`Style`] conversion.
//!
//! Unknown attributes are ignored (logged at trace level). Unknown elements
//! inside rendering content are errors, since silently dropping them would
//! change output.

use std::str::FromStr;

use indexmap::IndexMap;
use roxmltree::{Document, Node};

use crate::error::{Result, StyleError};
use crate::model::*;

/// Attributes shared by every rendering element.
const RENDERING_ATTRS: &[&str] = &[
    "prefix",
    "suffix",
    "font-style",
    "font-variant",
    "font-weight",
    "text-decoration",
    "vertical-align",
    "text-case",
    "strip-periods",
    "quotes",
    "display",
];

/// Parse a CSL 1.0.2 or CSL-M style document.
pub fn parse_style(xml: &str) -> Result<Style> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "style" {
        return Err(StyleError::UnknownRoot {
            expected: "style",
            found: root.tag_name().name().to_string(),
        });
    }
    parse_style_node(root)
}

/// Parse a standalone locale file (`<locale xml:lang="...">`).
pub fn parse_locale(xml: &str) -> Result<Locale> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "locale" {
        return Err(StyleError::UnknownRoot {
            expected: "locale",
            found: root.tag_name().name().to_string(),
        });
    }
    parse_locale_node(root)
}

fn parse_style_node(node: Node) -> Result<Style> {
    let version = attr(node, "version").unwrap_or("1.0").to_string();
    let class = enum_attr(node, "class")?.unwrap_or(StyleClass::InText);
    let default_locale = attr_string(node, "default-locale");

    let options = StyleOptions {
        names: parse_name_options(node, true)?,
        demote_non_dropping_particle: enum_attr(node, "demote-non-dropping-particle")?
            .unwrap_or_default(),
        initialize_with_hyphen: bool_attr(node, "initialize-with-hyphen")?.unwrap_or(true),
        page_range_format: enum_attr(node, "page-range-format")?,
    };

    let mut info = Info::default();
    let mut locales = Vec::new();
    let mut macros = IndexMap::new();
    let mut citation = None;
    let mut bibliography = None;

    for child in elements(node) {
        match child.tag_name().name() {
            "info" => info = parse_info(child),
            "locale" => locales.push(parse_locale_node(child)?),
            "macro" => {
                let name = required(child, "name")?.to_string();
                let body = parse_children(child)?;
                if macros.insert(name.clone(), body).is_some() {
                    tracing::warn!(macro_name = %name, "duplicate macro definition, last one wins");
                }
            }
            "citation" => citation = Some(parse_citation(child)?),
            "bibliography" => bibliography = Some(parse_bibliography(child)?),
            other => tracing::trace!(element = other, "ignoring unknown top-level element"),
        }
    }

    let citation = citation.ok_or(StyleError::MissingSection("citation"))?;
    tracing::debug!(
        title = %info.title,
        macros = macros.len(),
        has_bibliography = bibliography.is_some(),
        "parsed style"
    );

    Ok(Style {
        version,
        class,
        default_locale,
        info,
        options,
        locales,
        macros,
        citation,
        bibliography,
    })
}

fn parse_info(node: Node) -> Info {
    let mut info = Info::default();
    for child in elements(node) {
        let text = child.text().unwrap_or_default().trim().to_string();
        match child.tag_name().name() {
            "title" => info.title = text,
            "id" => info.id = text,
            "updated" => info.updated = text,
            _ => {}
        }
    }
    info
}

fn parse_locale_node(node: Node) -> Result<Locale> {
    let mut locale = Locale {
        lang: node
            .attribute((roxmltree::NS_XML_URI, "lang"))
            .or_else(|| node.attribute("lang"))
            .map(str::to_string),
        ..Locale::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "terms" => {
                for term in elements(child).filter(|n| n.tag_name().name() == "term") {
                    locale.terms.push(parse_term(term)?);
                }
            }
            "date" => locale.date_formats.push(parse_date(child, false)?),
            "style-options" => {
                locale.punctuation_in_quote = bool_attr(child, "punctuation-in-quote")?;
                locale.limit_day_ordinals_to_day_1 =
                    bool_attr(child, "limit-day-ordinals-to-day-1")?;
            }
            _ => {}
        }
    }
    Ok(locale)
}

fn parse_term(node: Node) -> Result<Term> {
    let name = required(node, "name")?.to_string();
    let form = enum_attr(node, "form")?.unwrap_or_default();
    let mut single = None;
    let mut multiple = None;
    for child in elements(node) {
        match child.tag_name().name() {
            "single" => single = Some(child.text().unwrap_or_default().to_string()),
            "multiple" => multiple = Some(child.text().unwrap_or_default().to_string()),
            _ => {}
        }
    }
    let single = single.unwrap_or_else(|| node.text().unwrap_or_default().trim().to_string());
    Ok(Term {
        name,
        form,
        single,
        multiple,
    })
}

fn parse_citation(node: Node) -> Result<Citation> {
    let options = CitationOptions {
        disambiguate_add_names: bool_attr(node, "disambiguate-add-names")?.unwrap_or(false),
        disambiguate_add_givenname: bool_attr(node, "disambiguate-add-givenname")?
            .unwrap_or(false),
        givenname_disambiguation_rule: enum_attr(node, "givenname-disambiguation-rule")?
            .unwrap_or_default(),
        disambiguate_add_year_suffix: bool_attr(node, "disambiguate-add-year-suffix")?
            .unwrap_or(false),
        collapse: enum_attr(node, "collapse")?,
        cite_group_delimiter: attr_string(node, "cite-group-delimiter"),
        year_suffix_delimiter: attr_string(node, "year-suffix-delimiter"),
        after_collapse_delimiter: attr_string(node, "after-collapse-delimiter"),
        near_note_distance: number_attr(node, "near-note-distance")?.unwrap_or(5),
    };

    let mut sort = None;
    let mut layouts = Vec::new();
    for child in elements(node) {
        match child.tag_name().name() {
            "layout" => layouts.push(parse_layout(child)?),
            "sort" => sort = Some(parse_sort(child)?),
            other => tracing::trace!(element = other, "ignoring element in <citation>"),
        }
    }
    if layouts.is_empty() {
        return Err(StyleError::MissingSection("citation/layout"));
    }

    Ok(Citation {
        options,
        names: parse_name_options(node, true)?,
        sort,
        layouts,
    })
}

fn parse_bibliography(node: Node) -> Result<Bibliography> {
    let options = BibliographyOptions {
        hanging_indent: bool_attr(node, "hanging-indent")?.unwrap_or(false),
        second_field_align: attr_string(node, "second-field-align"),
        line_spacing: number_attr(node, "line-spacing")?.unwrap_or(1),
        entry_spacing: number_attr(node, "entry-spacing")?.unwrap_or(1),
        subsequent_author_substitute: attr_string(node, "subsequent-author-substitute"),
        subsequent_author_substitute_rule: enum_attr(node, "subsequent-author-substitute-rule")?
            .unwrap_or_default(),
    };

    let mut sort = None;
    let mut layouts = Vec::new();
    for child in elements(node) {
        match child.tag_name().name() {
            "layout" => layouts.push(parse_layout(child)?),
            "sort" => sort = Some(parse_sort(child)?),
            other => tracing::trace!(element = other, "ignoring element in <bibliography>"),
        }
    }
    if layouts.is_empty() {
        return Err(StyleError::MissingSection("bibliography/layout"));
    }

    Ok(Bibliography {
        options,
        names: parse_name_options(node, true)?,
        sort,
        layouts,
    })
}

fn parse_layout(node: Node) -> Result<Layout> {
    let locales = attr(node, "locale")
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    Ok(Layout {
        locales,
        delimiter: attr_string(node, "delimiter"),
        rendering: parse_rendering(node)?,
        children: parse_children(node)?,
    })
}

fn parse_sort(node: Node) -> Result<Sort> {
    let mut keys = Vec::new();
    for child in elements(node).filter(|n| n.tag_name().name() == "key") {
        keys.push(parse_sort_key(child)?);
    }
    Ok(Sort { keys })
}

fn parse_sort_key(node: Node) -> Result<SortKey> {
    let source = match (attr(node, "variable"), attr(node, "macro")) {
        (Some(variable), _) => SortSource::Variable(variable.to_string()),
        (None, Some(name)) => SortSource::Macro(name.to_string()),
        (None, None) => {
            return Err(StyleError::MissingAttribute {
                element: "key".to_string(),
                attribute: "variable",
            })
        }
    };
    let descending = match attr(node, "sort") {
        None | Some("ascending") => false,
        Some("descending") => true,
        Some(other) => return Err(invalid(node, "sort", other)),
    };
    Ok(SortKey {
        source,
        descending,
        names_min: number_attr(node, "names-min")?,
        names_use_first: number_attr(node, "names-use-first")?,
        names_use_last: bool_attr(node, "names-use-last")?,
    })
}

fn parse_children(node: Node) -> Result<Vec<CslNode>> {
    elements(node).map(parse_node).collect()
}

fn parse_node(node: Node) -> Result<CslNode> {
    match node.tag_name().name() {
        "text" => Ok(CslNode::Text(parse_text(node)?)),
        "date" => Ok(CslNode::Date(parse_date(node, true)?)),
        "number" => Ok(CslNode::Number(parse_number(node)?)),
        "label" => Ok(CslNode::Label(parse_label(node)?)),
        "names" => Ok(CslNode::Names(parse_names(node)?)),
        "group" => Ok(CslNode::Group(parse_group(node)?)),
        "choose" => Ok(CslNode::Choose(parse_choose(node)?)),
        other => Err(StyleError::UnknownElement {
            parent: node
                .parent_element()
                .map(|p| p.tag_name().name().to_string())
                .unwrap_or_default(),
            element: other.to_string(),
        }),
    }
}

fn parse_text(node: Node) -> Result<Text> {
    trace_unknown_attributes(
        node,
        &["variable", "macro", "term", "value", "form", "plural"],
    );

    let source = if let Some(name) = attr(node, "variable") {
        TextSource::Variable {
            name: name.to_string(),
            form: enum_attr(node, "form")?.unwrap_or(VariableForm::Long),
        }
    } else if let Some(name) = attr(node, "macro") {
        TextSource::Macro(name.to_string())
    } else if let Some(name) = attr(node, "term") {
        TextSource::Term {
            name: name.to_string(),
            form: enum_attr(node, "form")?.unwrap_or_default(),
            plural: bool_attr(node, "plural")?.unwrap_or(false),
        }
    } else if let Some(value) = attr(node, "value") {
        TextSource::Value(value.to_string())
    } else {
        return Err(StyleError::MissingAttribute {
            element: "text".to_string(),
            attribute: "variable",
        });
    };

    Ok(Text {
        source,
        rendering: parse_rendering(node)?,
    })
}

fn parse_date(node: Node, require_variable: bool) -> Result<Date> {
    trace_unknown_attributes(node, &["variable", "form", "date-parts", "delimiter"]);

    let variable = if require_variable {
        required(node, "variable")?.to_string()
    } else {
        attr(node, "variable").unwrap_or_default().to_string()
    };

    let mut parts = Vec::new();
    for child in elements(node).filter(|n| n.tag_name().name() == "date-part") {
        parts.push(DatePart {
            name: enum_attr(child, "name")?.ok_or_else(|| StyleError::MissingAttribute {
                element: "date-part".to_string(),
                attribute: "name",
            })?,
            form: enum_attr(child, "form")?,
            range_delimiter: attr_string(child, "range-delimiter"),
            rendering: parse_rendering(child)?,
        });
    }

    Ok(Date {
        variable,
        form: enum_attr(node, "form")?,
        date_parts: enum_attr(node, "date-parts")?.unwrap_or(DatePartsSelector::YearMonthDay),
        delimiter: attr_string(node, "delimiter"),
        parts,
        rendering: parse_rendering(node)?,
    })
}

fn parse_number(node: Node) -> Result<Number> {
    trace_unknown_attributes(node, &["variable", "form"]);
    Ok(Number {
        variable: required(node, "variable")?.to_string(),
        form: enum_attr(node, "form")?.unwrap_or(NumberForm::Numeric),
        rendering: parse_rendering(node)?,
    })
}

fn parse_label(node: Node) -> Result<Label> {
    trace_unknown_attributes(node, &["variable", "form", "plural"]);
    Ok(Label {
        variable: attr(node, "variable").unwrap_or_default().to_string(),
        form: enum_attr(node, "form")?.unwrap_or_default(),
        plural: enum_attr(node, "plural")?.unwrap_or_default(),
        rendering: parse_rendering(node)?,
    })
}

fn parse_names(node: Node) -> Result<Names> {
    let variables: Vec<String> = required(node, "variable")?
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut names = Names {
        variables,
        delimiter: attr_string(node, "delimiter"),
        name: None,
        et_al: None,
        label: None,
        label_before_name: false,
        institution: None,
        substitute: None,
        rendering: parse_rendering(node)?,
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "name" => names.name = Some(parse_name(child)?),
            "et-al" => {
                names.et_al = Some(EtAl {
                    term: attr(child, "term").unwrap_or("et-al").to_string(),
                    rendering: parse_rendering(child)?,
                })
            }
            "label" => {
                names.label_before_name = names.name.is_none();
                names.label = Some(parse_label(child)?);
            }
            "institution" => names.institution = Some(parse_institution(child)?),
            "substitute" => names.substitute = Some(parse_children(child)?),
            other => {
                return Err(StyleError::UnknownElement {
                    parent: "names".to_string(),
                    element: other.to_string(),
                })
            }
        }
    }
    Ok(names)
}

fn parse_name(node: Node) -> Result<Name> {
    let mut parts = Vec::new();
    for child in elements(node).filter(|n| n.tag_name().name() == "name-part") {
        parts.push(NamePart {
            name: enum_attr(child, "name")?.ok_or_else(|| StyleError::MissingAttribute {
                element: "name-part".to_string(),
                attribute: "name",
            })?,
            rendering: parse_rendering(child)?,
        });
    }
    Ok(Name {
        options: parse_name_options(node, false)?,
        suppress_min: number_attr(node, "suppress-min")?,
        suppress_max: number_attr(node, "suppress-max")?,
        parts,
        rendering: parse_rendering(node)?,
    })
}

fn parse_institution(node: Node) -> Result<Institution> {
    Ok(Institution {
        and: enum_attr(node, "and")?,
        delimiter: attr_string(node, "delimiter"),
        use_first: number_attr(node, "use-first")?,
        use_last: number_attr(node, "use-last")?,
        reverse_order: bool_attr(node, "reverse-order")?.unwrap_or(false),
        parts: enum_attr(node, "institution-parts")?.unwrap_or(InstitutionParts::Long),
        rendering: parse_rendering(node)?,
    })
}

/// Read name options from an element.
///
/// On `<name>` the delimiter and form are written `delimiter` and `form`;
/// on `<style>`, `<citation>` and `<bibliography>` they are the inheritable
/// `name-delimiter` and `name-form`.
fn parse_name_options(node: Node, inheritable: bool) -> Result<NameOptions> {
    let (delimiter_attr, form_attr) = if inheritable {
        ("name-delimiter", "name-form")
    } else {
        ("delimiter", "form")
    };
    Ok(NameOptions {
        and: enum_attr(node, "and")?,
        delimiter: attr_string(node, delimiter_attr),
        delimiter_precedes_et_al: enum_attr(node, "delimiter-precedes-et-al")?,
        delimiter_precedes_last: enum_attr(node, "delimiter-precedes-last")?,
        et_al_min: number_attr(node, "et-al-min")?,
        et_al_use_first: number_attr(node, "et-al-use-first")?,
        et_al_use_last: bool_attr(node, "et-al-use-last")?,
        et_al_subsequent_min: number_attr(node, "et-al-subsequent-min")?,
        et_al_subsequent_use_first: number_attr(node, "et-al-subsequent-use-first")?,
        initialize: bool_attr(node, "initialize")?,
        initialize_with: attr_string(node, "initialize-with"),
        name_as_sort_order: enum_attr(node, "name-as-sort-order")?,
        sort_separator: attr_string(node, "sort-separator"),
        form: enum_attr(node, form_attr)?,
        names_delimiter: if inheritable {
            attr_string(node, "names-delimiter")
        } else {
            None
        },
    })
}

fn parse_group(node: Node) -> Result<Group> {
    trace_unknown_attributes(node, &["delimiter", "require", "reject"]);
    Ok(Group {
        delimiter: attr_string(node, "delimiter"),
        require: enum_attr(node, "require")?,
        reject: enum_attr(node, "reject")?,
        rendering: parse_rendering(node)?,
        children: parse_children(node)?,
    })
}

fn parse_choose(node: Node) -> Result<Choose> {
    let mut if_branch = None;
    let mut else_if_branches = Vec::new();
    let mut else_branch = None;

    for child in elements(node) {
        match child.tag_name().name() {
            "if" => if_branch = Some(parse_branch(child)?),
            "else-if" => else_if_branches.push(parse_branch(child)?),
            "else" => else_branch = Some(parse_children(child)?),
            other => {
                return Err(StyleError::UnknownElement {
                    parent: "choose".to_string(),
                    element: other.to_string(),
                })
            }
        }
    }

    let if_branch = if_branch.ok_or(StyleError::MissingSection("choose/if"))?;
    Ok(Choose {
        if_branch,
        else_if_branches,
        else_branch,
    })
}

fn parse_branch(node: Node) -> Result<ChooseBranch> {
    let mut nested = None;
    let mut children = Vec::new();
    for child in elements(node) {
        if child.tag_name().name() == "conditions" {
            nested = Some(parse_conditions(child)?);
        } else {
            children.push(parse_node(child)?);
        }
    }
    let condition = match nested {
        Some(conditions) => BranchCondition::Nested(conditions),
        None => BranchCondition::Simple(parse_condition(node)?),
    };
    Ok(ChooseBranch {
        condition,
        children,
    })
}

fn parse_conditions(node: Node) -> Result<Conditions> {
    let mut conditions = Vec::new();
    for child in elements(node).filter(|n| n.tag_name().name() == "condition") {
        conditions.push(parse_condition(child)?);
    }
    Ok(Conditions {
        match_mode: enum_attr(node, "match")?.unwrap_or_default(),
        conditions,
    })
}

fn parse_condition(node: Node) -> Result<Condition> {
    let mut tests = Vec::new();
    for attribute in node.attributes() {
        let value = attribute.value();
        let values = value.split_whitespace();
        match attribute.name() {
            "match" => {}
            "type" => tests.extend(values.map(|v| Test::Type(v.to_string()))),
            "variable" => tests.extend(values.map(|v| Test::Variable(v.to_string()))),
            "is-numeric" => tests.extend(values.map(|v| Test::IsNumeric(v.to_string()))),
            "is-uncertain-date" => {
                tests.extend(values.map(|v| Test::IsUncertainDate(v.to_string())))
            }
            "locator" => tests.extend(values.map(|v| Test::Locator(v.to_string()))),
            "genre" => tests.extend(values.map(|v| Test::Genre(v.to_string()))),
            "has-day" => tests.extend(values.map(|v| Test::HasDay(v.to_string()))),
            "has-year-only" => tests.extend(values.map(|v| Test::HasYearOnly(v.to_string()))),
            "has-to-month-or-season" => {
                tests.extend(values.map(|v| Test::HasToMonthOrSeason(v.to_string())))
            }
            "is-multiple" => tests.extend(values.map(|v| Test::IsMultiple(v.to_string()))),
            "position" => {
                for v in values {
                    let position =
                        PositionTest::from_str(v).map_err(|_| invalid(node, "position", v))?;
                    tests.push(Test::Position(position));
                }
            }
            "context" => {
                for v in values {
                    let context = Context::from_str(v).map_err(|_| invalid(node, "context", v))?;
                    tests.push(Test::Context(context));
                }
            }
            "disambiguate" => tests.push(Test::Disambiguate(parse_bool(node, "disambiguate", value)?)),
            other => tracing::trace!(attribute = other, "ignoring unknown condition attribute"),
        }
    }
    Ok(Condition {
        match_mode: enum_attr(node, "match")?.unwrap_or_default(),
        tests,
    })
}

fn parse_rendering(node: Node) -> Result<Rendering> {
    Ok(Rendering {
        prefix: attr_string(node, "prefix"),
        suffix: attr_string(node, "suffix"),
        formatting: Formatting {
            font_style: enum_attr(node, "font-style")?,
            font_variant: enum_attr(node, "font-variant")?,
            font_weight: enum_attr(node, "font-weight")?,
            text_decoration: enum_attr(node, "text-decoration")?,
            vertical_align: enum_attr(node, "vertical-align")?,
        },
        text_case: enum_attr(node, "text-case")?,
        strip_periods: bool_attr(node, "strip-periods")?.unwrap_or(false),
        quotes: bool_attr(node, "quotes")?.unwrap_or(false),
        display: enum_attr(node, "display")?,
    })
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

fn attr_string(node: Node, name: &str) -> Option<String> {
    node.attribute(name).map(|s| s.to_string())
}

fn required<'a>(node: Node<'a, '_>, name: &'static str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| StyleError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name,
        })
}

fn enum_attr<T: FromStr>(node: Node, name: &str) -> Result<Option<T>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(value) => T::from_str(value)
            .map(Some)
            .map_err(|_| invalid(node, name, value)),
    }
}

fn bool_attr(node: Node, name: &str) -> Result<Option<bool>> {
    node.attribute(name)
        .map(|value| parse_bool(node, name, value))
        .transpose()
}

fn parse_bool(node: Node, name: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(invalid(node, name, other)),
    }
}

fn number_attr<T: FromStr>(node: Node, name: &str) -> Result<Option<T>> {
    enum_attr(node, name)
}

fn invalid(node: Node, attribute: &str, value: &str) -> StyleError {
    StyleError::InvalidAttribute {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn trace_unknown_attributes(node: Node, own: &[&str]) {
    for attribute in node.attributes() {
        let name = attribute.name();
        if !own.contains(&name) && !RENDERING_ATTRS.contains(&name) {
            tracing::trace!(
                element = node.tag_name().name(),
                attribute = name,
                "ignoring unknown attribute"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_valued_condition_expands() {
        let xml = r#"<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text">
            <citation><layout>
              <choose>
                <if type="book chapter" match="any"><text value="B"/></if>
                <else-if position="ibid near-note"><text value="I"/></else-if>
              </choose>
            </layout></citation></style>"#;
        let style = parse_style(xml).unwrap();
        let CslNode::Choose(choose) = &style.citation.layouts[0].children[0] else {
            panic!("expected choose");
        };
        let BranchCondition::Simple(cond) = &choose.if_branch.condition else {
            panic!("expected simple condition");
        };
        assert_eq!(cond.match_mode, Match::Any);
        assert_eq!(
            cond.tests,
            vec![Test::Type("book".into()), Test::Type("chapter".into())]
        );
        let BranchCondition::Simple(cond) = &choose.else_if_branches[0].condition else {
            panic!("expected simple condition");
        };
        assert_eq!(
            cond.tests,
            vec![
                Test::Position(PositionTest::Ibid),
                Test::Position(PositionTest::NearNote)
            ]
        );
    }

    #[test]
    fn test_inheritable_name_delimiter() {
        let xml = r#"<style class="in-text" name-delimiter="; " names-delimiter=" / " et-al-min="3">
            <citation><layout><text value="x"/></layout></citation></style>"#;
        let style = parse_style(xml).unwrap();
        assert_eq!(style.options.names.delimiter.as_deref(), Some("; "));
        assert_eq!(style.options.names.names_delimiter.as_deref(), Some(" / "));
        assert_eq!(style.options.names.et_al_min, Some(3));
    }

    #[test]
    fn test_invalid_boolean_is_error() {
        let xml = r#"<style class="in-text">
            <citation><layout><text value="x" quotes="yes"/></layout></citation></style>"#;
        assert!(matches!(
            parse_style(xml),
            Err(StyleError::InvalidAttribute { .. })
        ));
    }
}
