/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The parsed style tree.
//!
//! A [`Style`] is built once per style load and never mutated afterwards.
//! Rendering elements form a closed enum ([`CslNode`]) so that adding a CSL
//! element is a compile-time-checked change in every consumer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declares a keyword enum that maps one-to-one onto CSL attribute values.
macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $kw:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $kw)] $variant),+
        }

        impl $name {
            /// The attribute value as written in CSL.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $kw),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($kw => Ok(Self::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

keyword_enum! {
    /// Style class: in-text (author-date, numeric, label) or note.
    StyleClass { InText => "in-text", Note => "note" }
}

keyword_enum! {
    FontStyle { Normal => "normal", Italic => "italic", Oblique => "oblique" }
}

keyword_enum! {
    FontVariant { Normal => "normal", SmallCaps => "small-caps" }
}

keyword_enum! {
    FontWeight { Normal => "normal", Bold => "bold", Light => "light" }
}

keyword_enum! {
    TextDecoration { None => "none", Underline => "underline" }
}

keyword_enum! {
    VerticalAlign { Baseline => "baseline", Sup => "sup", Sub => "sub" }
}

keyword_enum! {
    Display {
        Block => "block",
        LeftMargin => "left-margin",
        RightInline => "right-inline",
        Indent => "indent",
    }
}

keyword_enum! {
    TextCase {
        Lowercase => "lowercase",
        Uppercase => "uppercase",
        CapitalizeFirst => "capitalize-first",
        CapitalizeAll => "capitalize-all",
        Sentence => "sentence",
        Title => "title",
    }
}

keyword_enum! {
    /// Form of a locale term.
    TermForm {
        Long => "long",
        Short => "short",
        Verb => "verb",
        VerbShort => "verb-short",
        Symbol => "symbol",
    }
}

keyword_enum! {
    VariableForm { Long => "long", Short => "short" }
}

keyword_enum! {
    /// Localized date format selector.
    DateForm { Text => "text", Numeric => "numeric" }
}

keyword_enum! {
    /// Which parts a localized date shows.
    DatePartsSelector {
        YearMonthDay => "year-month-day",
        YearMonth => "year-month",
        Year => "year",
    }
}

keyword_enum! {
    DatePartName { Day => "day", Month => "month", Year => "year" }
}

keyword_enum! {
    DatePartForm {
        Numeric => "numeric",
        NumericLeadingZeros => "numeric-leading-zeros",
        Ordinal => "ordinal",
        Long => "long",
        Short => "short",
    }
}

keyword_enum! {
    NumberForm {
        Numeric => "numeric",
        Ordinal => "ordinal",
        LongOrdinal => "long-ordinal",
        Roman => "roman",
    }
}

keyword_enum! {
    Plural { Contextual => "contextual", Always => "always", Never => "never" }
}

keyword_enum! {
    And { Text => "text", Symbol => "symbol" }
}

keyword_enum! {
    /// Controls the delimiter before the last name or before "et al.".
    DelimiterPrecedes {
        Contextual => "contextual",
        AfterInvertedName => "after-inverted-name",
        Always => "always",
        Never => "never",
    }
}

keyword_enum! {
    NameAsSortOrder { First => "first", All => "all" }
}

keyword_enum! {
    NameForm { Long => "long", Short => "short", Count => "count" }
}

keyword_enum! {
    NamePartName { Given => "given", Family => "family" }
}

keyword_enum! {
    /// CSL-M `institution-parts`.
    InstitutionParts {
        Long => "long",
        Short => "short",
        ShortLong => "short-long",
        LongShort => "long-short",
    }
}

keyword_enum! {
    DemoteParticle {
        Never => "never",
        SortOnly => "sort-only",
        DisplayAndSort => "display-and-sort",
    }
}

keyword_enum! {
    PageRangeFormat {
        Chicago => "chicago",
        Chicago16 => "chicago-16",
        Expanded => "expanded",
        Minimal => "minimal",
        MinimalTwo => "minimal-two",
    }
}

keyword_enum! {
    Collapse {
        CitationNumber => "citation-number",
        Year => "year",
        YearSuffix => "year-suffix",
        YearSuffixRanged => "year-suffix-ranged",
    }
}

keyword_enum! {
    GivenNameRule {
        AllNames => "all-names",
        AllNamesWithInitials => "all-names-with-initials",
        PrimaryName => "primary-name",
        PrimaryNameWithInitials => "primary-name-with-initials",
        ByCite => "by-cite",
    }
}

keyword_enum! {
    SubstituteRule {
        CompleteAll => "complete-all",
        CompleteEach => "complete-each",
        PartialEach => "partial-each",
        PartialFirst => "partial-first",
    }
}

keyword_enum! {
    /// How the tests of one condition combine.
    Match { All => "all", Any => "any", None => "none", Nand => "nand" }
}

keyword_enum! {
    /// Values of the `position` condition.
    PositionTest {
        First => "first",
        Subsequent => "subsequent",
        Ibid => "ibid",
        IbidWithLocator => "ibid-with-locator",
        NearNote => "near-note",
        FarNote => "far-note",
    }
}

keyword_enum! {
    /// Rendering target, also the value of the CSL-M `context` condition.
    Context { Citation => "citation", Bibliography => "bibliography" }
}

keyword_enum! {
    /// CSL-M `require` / `reject` values on `<group>`.
    GroupGuard {
        CommaSafe => "comma-safe",
        CommaSafeNumbersOnly => "comma-safe-numbers-only",
    }
}

impl Default for DemoteParticle {
    fn default() -> Self {
        DemoteParticle::DisplayAndSort
    }
}

impl Default for Match {
    fn default() -> Self {
        Match::All
    }
}

impl Default for Plural {
    fn default() -> Self {
        Plural::Contextual
    }
}

impl Default for TermForm {
    fn default() -> Self {
        TermForm::Long
    }
}

impl Default for SubstituteRule {
    fn default() -> Self {
        SubstituteRule::CompleteAll
    }
}

impl Default for GivenNameRule {
    fn default() -> Self {
        GivenNameRule::ByCite
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Style {
    pub version: String,
    pub class: StyleClass,
    pub default_locale: Option<String>,
    pub info: Info,
    pub options: StyleOptions,
    pub locales: Vec<Locale>,
    pub macros: IndexMap<String, Vec<CslNode>>,
    pub citation: Citation,
    pub bibliography: Option<Bibliography>,
}

impl Style {
    /// Look up a macro body by name.
    pub fn macro_body(&self, name: &str) -> Option<&[CslNode]> {
        self.macros.get(name).map(Vec::as_slice)
    }

    /// Whether any layout or macro renders the given variable through
    /// `<text>` or `<number>`.
    pub fn uses_variable(&self, variable: &str) -> bool {
        let in_layouts = self
            .citation
            .layouts
            .iter()
            .chain(self.bibliography.iter().flat_map(|b| b.layouts.iter()))
            .any(|layout| nodes_use_variable(&layout.children, variable));
        let in_macros = self
            .macros
            .values()
            .any(|nodes| nodes_use_variable(nodes, variable));
        in_layouts || in_macros
    }
}

fn nodes_use_variable(nodes: &[CslNode], variable: &str) -> bool {
    nodes.iter().any(|node| match node {
        CslNode::Text(text) => {
            matches!(&text.source, TextSource::Variable { name, .. } if name == variable)
        }
        CslNode::Number(number) => number.variable == variable,
        CslNode::Group(group) => nodes_use_variable(&group.children, variable),
        CslNode::Choose(choose) => choose
            .branches()
            .any(|children| nodes_use_variable(children, variable)),
        CslNode::Names(names) => names
            .substitute
            .as_ref()
            .is_some_and(|nodes| nodes_use_variable(nodes, variable)),
        CslNode::Date(_) | CslNode::Label(_) => false,
    })
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Info {
    pub title: String,
    pub id: String,
    pub updated: String,
}

/// Options set on the `<style>` element.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleOptions {
    pub names: NameOptions,
    pub demote_non_dropping_particle: DemoteParticle,
    pub initialize_with_hyphen: bool,
    pub page_range_format: Option<PageRangeFormat>,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            names: NameOptions::default(),
            demote_non_dropping_particle: DemoteParticle::default(),
            initialize_with_hyphen: true,
            page_range_format: None,
        }
    }
}

/// Inheritable name options.
///
/// These may appear on `<style>`, `<citation>`, `<bibliography>`, `<names>`
/// and `<name>`; the innermost set value wins (see [`NameOptions::merge`]).
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct NameOptions {
    pub and: Option<And>,
    pub delimiter: Option<String>,
    pub delimiter_precedes_et_al: Option<DelimiterPrecedes>,
    pub delimiter_precedes_last: Option<DelimiterPrecedes>,
    pub et_al_min: Option<usize>,
    pub et_al_use_first: Option<usize>,
    pub et_al_use_last: Option<bool>,
    pub et_al_subsequent_min: Option<usize>,
    pub et_al_subsequent_use_first: Option<usize>,
    pub initialize: Option<bool>,
    pub initialize_with: Option<String>,
    pub name_as_sort_order: Option<NameAsSortOrder>,
    pub sort_separator: Option<String>,
    pub form: Option<NameForm>,
    /// `names-delimiter`, the delimiter between name variables.
    pub names_delimiter: Option<String>,
}

impl NameOptions {
    /// Overlay `inner` on top of `self`; values set in `inner` win.
    pub fn merge(&self, inner: &NameOptions) -> NameOptions {
        NameOptions {
            and: inner.and.or(self.and),
            delimiter: inner.delimiter.clone().or_else(|| self.delimiter.clone()),
            delimiter_precedes_et_al: inner
                .delimiter_precedes_et_al
                .or(self.delimiter_precedes_et_al),
            delimiter_precedes_last: inner
                .delimiter_precedes_last
                .or(self.delimiter_precedes_last),
            et_al_min: inner.et_al_min.or(self.et_al_min),
            et_al_use_first: inner.et_al_use_first.or(self.et_al_use_first),
            et_al_use_last: inner.et_al_use_last.or(self.et_al_use_last),
            et_al_subsequent_min: inner.et_al_subsequent_min.or(self.et_al_subsequent_min),
            et_al_subsequent_use_first: inner
                .et_al_subsequent_use_first
                .or(self.et_al_subsequent_use_first),
            initialize: inner.initialize.or(self.initialize),
            initialize_with: inner
                .initialize_with
                .clone()
                .or_else(|| self.initialize_with.clone()),
            name_as_sort_order: inner.name_as_sort_order.or(self.name_as_sort_order),
            sort_separator: inner
                .sort_separator
                .clone()
                .or_else(|| self.sort_separator.clone()),
            form: inner.form.or(self.form),
            names_delimiter: inner
                .names_delimiter
                .clone()
                .or_else(|| self.names_delimiter.clone()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CitationOptions {
    pub disambiguate_add_names: bool,
    pub disambiguate_add_givenname: bool,
    pub givenname_disambiguation_rule: GivenNameRule,
    pub disambiguate_add_year_suffix: bool,
    pub collapse: Option<Collapse>,
    pub cite_group_delimiter: Option<String>,
    pub year_suffix_delimiter: Option<String>,
    pub after_collapse_delimiter: Option<String>,
    pub near_note_distance: u32,
}

impl Default for CitationOptions {
    fn default() -> Self {
        Self {
            disambiguate_add_names: false,
            disambiguate_add_givenname: false,
            givenname_disambiguation_rule: GivenNameRule::default(),
            disambiguate_add_year_suffix: false,
            collapse: None,
            cite_group_delimiter: None,
            year_suffix_delimiter: None,
            after_collapse_delimiter: None,
            near_note_distance: 5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BibliographyOptions {
    pub hanging_indent: bool,
    pub second_field_align: Option<String>,
    pub line_spacing: u32,
    pub entry_spacing: u32,
    pub subsequent_author_substitute: Option<String>,
    pub subsequent_author_substitute_rule: SubstituteRule,
}

impl Default for BibliographyOptions {
    fn default() -> Self {
        Self {
            hanging_indent: false,
            second_field_align: None,
            line_spacing: 1,
            entry_spacing: 1,
            subsequent_author_substitute: None,
            subsequent_author_substitute_rule: SubstituteRule::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Citation {
    pub options: CitationOptions,
    pub names: NameOptions,
    pub sort: Option<Sort>,
    pub layouts: Vec<Layout>,
}

impl Citation {
    /// Select the layout for an entry language (CSL-M multilingual layouts).
    pub fn layout_for(&self, lang: Option<&str>) -> Option<&Layout> {
        select_layout(&self.layouts, lang)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Bibliography {
    pub options: BibliographyOptions,
    pub names: NameOptions,
    pub sort: Option<Sort>,
    pub layouts: Vec<Layout>,
}

impl Bibliography {
    /// Select the layout for an entry language (CSL-M multilingual layouts).
    pub fn layout_for(&self, lang: Option<&str>) -> Option<&Layout> {
        select_layout(&self.layouts, lang)
    }
}

fn select_layout<'a>(layouts: &'a [Layout], lang: Option<&str>) -> Option<&'a Layout> {
    if let Some(lang) = lang {
        let primary = primary_subtag(lang);
        let exact = layouts
            .iter()
            .find(|l| l.locales.iter().any(|candidate| candidate == lang));
        let by_primary = || {
            layouts
                .iter()
                .find(|l| l.locales.iter().any(|c| primary_subtag(c) == primary))
        };
        if let Some(layout) = exact.or_else(by_primary) {
            return Some(layout);
        }
    }
    layouts
        .iter()
        .find(|l| l.locales.is_empty())
        .or_else(|| layouts.first())
}

/// The primary language subtag of a BCP 47 tag (`en` for `en-US`).
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Layout {
    /// CSL-M `locale` attribute; empty for the default layout.
    pub locales: Vec<String>,
    pub delimiter: Option<String>,
    pub rendering: Rendering,
    pub children: Vec<CslNode>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Sort {
    pub keys: Vec<SortKey>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SortKey {
    pub source: SortSource,
    pub descending: bool,
    pub names_min: Option<usize>,
    pub names_use_first: Option<usize>,
    pub names_use_last: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum SortSource {
    Variable(String),
    Macro(String),
}

/// A locale block, either embedded in a style or loaded from a locale file.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Locale {
    pub lang: Option<String>,
    pub terms: Vec<Term>,
    pub date_formats: Vec<Date>,
    pub punctuation_in_quote: Option<bool>,
    pub limit_day_ordinals_to_day_1: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Term {
    pub name: String,
    pub form: TermForm,
    pub single: String,
    pub multiple: Option<String>,
}

/// Affixes, formatting and text transforms shared by rendering elements.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Rendering {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub formatting: Formatting,
    pub text_case: Option<TextCase>,
    pub strip_periods: bool,
    pub quotes: bool,
    pub display: Option<Display>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatting {
    pub font_style: Option<FontStyle>,
    pub font_variant: Option<FontVariant>,
    pub font_weight: Option<FontWeight>,
    pub text_decoration: Option<TextDecoration>,
    pub vertical_align: Option<VerticalAlign>,
}

impl Formatting {
    pub fn is_empty(&self) -> bool {
        *self == Formatting::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CslNode {
    Text(Text),
    Date(Date),
    Number(Number),
    Label(Label),
    Names(Names),
    Group(Group),
    Choose(Choose),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Text {
    pub source: TextSource,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum TextSource {
    Variable { name: String, form: VariableForm },
    Macro(String),
    Term { name: String, form: TermForm, plural: bool },
    Value(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Date {
    pub variable: String,
    /// Localized format; `None` for a fully specified date.
    pub form: Option<DateForm>,
    pub date_parts: DatePartsSelector,
    pub delimiter: Option<String>,
    pub parts: Vec<DatePart>,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatePart {
    pub name: DatePartName,
    pub form: Option<DatePartForm>,
    pub range_delimiter: Option<String>,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Number {
    pub variable: String,
    pub form: NumberForm,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Label {
    pub variable: String,
    pub form: TermForm,
    pub plural: Plural,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Names {
    pub variables: Vec<String>,
    pub delimiter: Option<String>,
    pub name: Option<Name>,
    pub et_al: Option<EtAl>,
    pub label: Option<Label>,
    /// Whether `<label>` precedes `<name>` in the source.
    pub label_before_name: bool,
    pub institution: Option<Institution>,
    pub substitute: Option<Vec<CslNode>>,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Name {
    pub options: NameOptions,
    /// CSL-M: suppress the list when it holds at least this many names;
    /// `0` drops personal names and keeps institutions.
    pub suppress_min: Option<usize>,
    /// CSL-M: suppress the list when it holds at most this many names.
    pub suppress_max: Option<usize>,
    pub parts: Vec<NamePart>,
    pub rendering: Rendering,
}

impl Name {
    pub fn part(&self, name: NamePartName) -> Option<&NamePart> {
        self.parts.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NamePart {
    pub name: NamePartName,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EtAl {
    /// `et-al` or `and others`.
    pub term: String,
    pub rendering: Rendering,
}

/// CSL-M `<institution>` inside `<names>`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Institution {
    pub and: Option<And>,
    pub delimiter: Option<String>,
    pub use_first: Option<usize>,
    pub use_last: Option<usize>,
    pub reverse_order: bool,
    pub parts: InstitutionParts,
    pub rendering: Rendering,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Group {
    pub delimiter: Option<String>,
    pub require: Option<GroupGuard>,
    pub reject: Option<GroupGuard>,
    pub rendering: Rendering,
    pub children: Vec<CslNode>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Choose {
    pub if_branch: ChooseBranch,
    pub else_if_branches: Vec<ChooseBranch>,
    pub else_branch: Option<Vec<CslNode>>,
}

impl Choose {
    /// All branch bodies in document order, including `else`.
    pub fn branches(&self) -> impl Iterator<Item = &[CslNode]> {
        std::iter::once(self.if_branch.children.as_slice())
            .chain(self.else_if_branches.iter().map(|b| b.children.as_slice()))
            .chain(self.else_branch.iter().map(Vec::as_slice))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChooseBranch {
    pub condition: BranchCondition,
    pub children: Vec<CslNode>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum BranchCondition {
    /// Tests written as attributes on `<if>` / `<else-if>`.
    Simple(Condition),
    /// CSL-M `<conditions>`; overrides any attributes on the branch.
    Nested(Conditions),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Condition {
    pub match_mode: Match,
    pub tests: Vec<Test>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Conditions {
    pub match_mode: Match,
    pub conditions: Vec<Condition>,
}

/// A single predicate. Space-separated attribute values expand into one
/// test per value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Test {
    Type(String),
    Variable(String),
    IsNumeric(String),
    IsUncertainDate(String),
    Position(PositionTest),
    Locator(String),
    Disambiguate(bool),
    Context(Context),
    Genre(String),
    HasDay(String),
    HasYearOnly(String),
    HasToMonthOrSeason(String),
    IsMultiple(String),
}
