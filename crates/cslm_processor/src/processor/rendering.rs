/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The layout interpreter.
//!
//! [`Renderer`] walks style nodes against one entry and produces an
//! [`Output`] tree. A render is pure given its [`RenderContext`]; all state
//! it keeps (macro cache, suppressed variables, first-names bookkeeping)
//! lives in a per-render [`RenderState`] that is dropped afterwards.
//!
//! ## Macro memoization
//!
//! Within one render a macro body is expanded once per distinct render
//! state and the result reused by later calls; each call site still applies
//! its own affixes and formatting. The state is part of the cache key
//! because macro output depends on it (a substitute may have suppressed a
//! variable, the year suffix may already be placed).
//!
//! ## Group suppression
//!
//! A `<group>` is dropped when it renders nothing, or when it calls at least
//! one variable and every variable it calls is empty.

use std::borrow::Cow;
use std::collections::HashMap;

use cslm_core::{CitationItem, Entry, Locale, Name, Position};
use cslm_style::{
    Choose, Context, CslNode, Date, DatePartName, Group, GroupGuard, Label, Layout, NameForm,
    NameOptions, Names, Number, Plural, SortKey, SortSource, Style, Text, TextSource,
    VariableForm,
};
use tracing::{trace, warn};

use super::conditions::{self, ConditionContext};
use super::labels;
use crate::render::{decorate, Output, Tag};
use crate::values::contributor::{NameExpansion, NameFormatter};
use crate::values::date::{self, DateRenderer};
use crate::values::{self, number, DisambiguationState};

/// Macro nesting deeper than this is treated as recursion.
const MAX_MACRO_DEPTH: usize = 64;

/// Inputs of one interpretation pass.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub entry: &'a Entry,
    pub target: Context,
    pub item: Option<&'a CitationItem>,
    /// Cite position; `None` for bibliography renders.
    pub position: Option<Position>,
    pub near_note: bool,
    pub first_note_number: Option<u32>,
    pub citation_number: Option<usize>,
    pub state: DisambiguationState,
    /// Set while computing a sort key.
    pub sort_key: Option<&'a SortKey>,
    /// Drop the first rendered names (`suppress-author` and collapsed cites).
    pub suppress_author: bool,
    /// Replace the first rendered names (`subsequent-author-substitute`).
    pub author_substitute: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    /// A first-position cite.
    pub fn citation(entry: &'a Entry, item: Option<&'a CitationItem>) -> Self {
        Self {
            entry,
            target: Context::Citation,
            item,
            position: Some(Position::First),
            near_note: false,
            first_note_number: None,
            citation_number: None,
            state: DisambiguationState::default(),
            sort_key: None,
            suppress_author: false,
            author_substitute: None,
        }
    }

    pub fn bibliography(entry: &'a Entry) -> Self {
        Self {
            target: Context::Bibliography,
            position: None,
            ..Self::citation(entry, None)
        }
    }

    pub fn with_state(mut self, state: DisambiguationState) -> Self {
        self.state = state;
        self
    }

    pub fn with_citation_number(mut self, number: Option<usize>) -> Self {
        self.citation_number = number;
        self
    }

    /// Variable value including citation-level variables.
    fn value(&self, name: &str) -> Option<Cow<'a, str>> {
        match name {
            "locator" => self
                .item
                .and_then(|item| item.locator.as_deref())
                .filter(|locator| !locator.is_empty())
                .map(Cow::Borrowed),
            "citation-number" => self.citation_number.map(|n| Cow::Owned(n.to_string())),
            "year-suffix" => self.state.year_suffix.map(|c| Cow::Owned(c.to_string())),
            "first-reference-note-number" => self
                .first_note_number
                .map(|n| Cow::Owned(n.to_string())),
            "citation-label" => Some(Cow::Owned(labels::generate_label(
                self.entry,
                self.state.year_suffix,
            ))),
            _ => values::lookup(self.entry, name),
        }
    }
}

impl ConditionContext for RenderContext<'_> {
    fn entry(&self) -> &Entry {
        self.entry
    }

    fn target(&self) -> Context {
        self.target
    }

    fn position(&self) -> Option<Position> {
        self.position
    }

    fn near_note(&self) -> bool {
        self.near_note
    }

    fn locator_label(&self) -> Option<&str> {
        self.item.and_then(CitationItem::locator_label)
    }

    fn disambiguate(&self) -> bool {
        self.state.condition
    }

    fn variable(&self, name: &str) -> Option<Cow<'_, str>> {
        self.value(name)
    }
}

/// Variable calls seen while rendering a group.
#[derive(Debug, Clone, Copy, Default)]
struct VarStats {
    called: usize,
    filled: usize,
}

impl VarStats {
    fn record(&mut self, filled: bool) {
        self.called += 1;
        if filled {
            self.filled += 1;
        }
    }

    fn absorb(&mut self, other: VarStats) {
        self.called += other.called;
        self.filled += other.filled;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MemoKey<'a> {
    name: &'a str,
    after_digit: bool,
    first_names_done: bool,
    year_suffix_done: bool,
    suppressed: usize,
    inherited: usize,
}

/// A cached macro expansion and the state changes it made.
#[derive(Debug, Clone)]
struct MacroResult {
    output: Output,
    stats: VarStats,
    first_names_done: bool,
    year_suffix_done: bool,
    suppressed: Vec<String>,
    rendered: Vec<String>,
}

/// Mutable state of one render.
#[derive(Debug, Default)]
pub struct RenderState<'a> {
    memo: HashMap<MemoKey<'a>, MacroResult>,
    /// Variables consumed by a substitute (variable-once rule).
    suppressed: Vec<String>,
    /// Variables rendered so far, in order.
    rendered: Vec<String>,
    first_names_done: bool,
    year_suffix_done: bool,
    /// Last character rendered so far.
    tail: Option<char>,
    depth: usize,
    /// `<names>` whose substitute is being rendered.
    inherited: Vec<&'a Names>,
    macro_expansions: usize,
}

impl RenderState<'_> {
    fn is_suppressed(&self, variable: &str) -> bool {
        self.suppressed.iter().any(|v| v == variable)
    }
}

/// Interprets style layouts.
pub struct Renderer<'a> {
    pub style: &'a Style,
    pub locale: &'a Locale,
    pub memoize: bool,
    /// The style renders `year-suffix` itself.
    explicit_year_suffix: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(style: &'a Style, locale: &'a Locale) -> Self {
        Self {
            style,
            locale,
            memoize: true,
            explicit_year_suffix: style.uses_variable("year-suffix"),
        }
    }

    pub fn with_memoization(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// The citation layout for an entry's language.
    pub fn citation_layout(&self, entry: &Entry) -> Option<&'a Layout> {
        self.style.citation.layout_for(entry.field("language"))
    }

    pub fn bibliography_layout(&self, entry: &Entry) -> Option<&'a Layout> {
        self.style
            .bibliography
            .as_ref()?
            .layout_for(entry.field("language"))
    }

    /// Render a layout's children, without the layout's own affixes.
    pub fn render_layout(&self, layout: &'a Layout, ctx: &RenderContext<'a>) -> Output {
        Output::seq(self.render_layout_fields(layout, ctx))
    }

    /// Render a layout's top-level fields separately (for
    /// `second-field-align`). `<choose>` contributes the fields of its
    /// chosen branch.
    pub fn render_layout_fields(&self, layout: &'a Layout, ctx: &RenderContext<'a>) -> Vec<Output> {
        let mut st = RenderState::default();
        let mut stats = VarStats::default();
        let mut fields = Vec::new();
        self.collect(&layout.children, ctx, &mut st, &mut stats, &mut fields);
        trace!(
            entry = %ctx.entry.id,
            expansions = st.macro_expansions,
            "rendered layout"
        );
        fields
    }

    /// Count macro expansions for one layout render.
    pub fn macro_expansions(&self, layout: &'a Layout, ctx: &RenderContext<'a>) -> usize {
        let mut st = RenderState::default();
        let mut stats = VarStats::default();
        let mut fields = Vec::new();
        self.collect(&layout.children, ctx, &mut st, &mut stats, &mut fields);
        st.macro_expansions
    }

    /// The comparable string of one sort key.
    pub fn render_sort_key(&self, key: &'a SortKey, ctx: &RenderContext<'a>) -> String {
        let ctx = RenderContext {
            sort_key: Some(key),
            ..ctx.clone()
        };
        match &key.source {
            SortSource::Macro(name) => {
                let mut st = RenderState::default();
                let mut stats = VarStats::default();
                self.render_macro(name, &ctx, &mut st, &mut stats).to_plain()
            }
            SortSource::Variable(name) => self.sort_variable(name, &ctx),
        }
    }

    fn sort_variable(&self, name: &str, ctx: &RenderContext<'a>) -> String {
        if let Some(list) = values::names(ctx.entry, name) {
            let options = self.name_options(ctx, None);
            let formatter = self.formatter(ctx, options, None, None, None, false);
            return formatter.format(list).to_plain();
        }
        let Some(value) = ctx.value(name) else {
            return String::new();
        };
        if values::DATE_VARIABLES.contains(&name) {
            return date::parse(&value)
                .map(|d| d.sort_key())
                .unwrap_or_else(|| value.into_owned());
        }
        if values::NUMBER_VARIABLES.contains(&name) {
            if let Some(padded) = padded_number(&value) {
                return padded;
            }
        }
        value.into_owned()
    }

    /// Render nodes into `out`, splicing chosen `<choose>` branches so they
    /// take part in the enclosing delimiter.
    fn collect(
        &self,
        nodes: &'a [CslNode],
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
        out: &mut Vec<Output>,
    ) {
        for node in nodes {
            if let CslNode::Choose(choose) = node {
                if let Some(children) = self.choose_branch(choose, ctx) {
                    self.collect(children, ctx, st, stats, out);
                }
                continue;
            }
            let output = self.render_node(node, ctx, st, stats);
            if !output.is_empty() {
                st.tail = output.last_char();
                out.push(output);
            }
        }
    }

    fn render_children(
        &self,
        nodes: &'a [CslNode],
        delimiter: Option<&str>,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        let mut out = Vec::new();
        self.collect(nodes, ctx, st, stats, &mut out);
        Output::join(out, delimiter.unwrap_or_default())
    }

    fn choose_branch(&self, choose: &'a Choose, ctx: &RenderContext<'a>) -> Option<&'a [CslNode]> {
        std::iter::once(&choose.if_branch)
            .chain(choose.else_if_branches.iter())
            .find(|branch| conditions::evaluate(&branch.condition, ctx))
            .map(|branch| branch.children.as_slice())
            .or(choose.else_branch.as_deref())
    }

    fn render_node(
        &self,
        node: &'a CslNode,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        match node {
            CslNode::Text(text) => self.render_text(text, ctx, st, stats),
            CslNode::Date(date) => self.render_date(date, ctx, st, stats),
            CslNode::Number(number) => self.render_number(number, ctx, st, stats),
            CslNode::Label(label) => self.render_label(label, ctx, st),
            CslNode::Names(names) => self.render_names(names, ctx, st, stats),
            CslNode::Group(group) => self.render_group(group, ctx, st, stats),
            CslNode::Choose(choose) => match self.choose_branch(choose, ctx) {
                Some(children) => self.render_children(children, None, ctx, st, stats),
                None => Output::Null,
            },
        }
    }

    fn render_text(
        &self,
        text: &'a Text,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        let content = match &text.source {
            TextSource::Variable { name, form } => {
                let content = self.text_variable(name, *form, ctx, st);
                stats.record(!content.is_empty());
                if !content.is_empty() {
                    st.rendered.push(name.clone());
                }
                content
            }
            TextSource::Macro(name) => self.render_macro(name, ctx, st, stats),
            TextSource::Term { name, form, plural } => {
                Output::text(self.locale.term(name, *form, *plural).unwrap_or_default())
            }
            TextSource::Value(value) => Output::text(value.as_str()),
        };
        let decorated = decorate(content, &text.rendering);
        match (&text.source, ctx.citation_number) {
            (TextSource::Variable { name, .. }, Some(n)) if name == "citation-number" => {
                Output::tagged(Tag::CitationNumber(n), decorated)
            }
            _ => decorated,
        }
    }

    fn text_variable(
        &self,
        name: &str,
        form: VariableForm,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
    ) -> Output {
        if st.is_suppressed(name) {
            return Output::Null;
        }
        match name {
            "year-suffix" => {
                let Some(suffix) = ctx.state.year_suffix else {
                    return Output::Null;
                };
                st.year_suffix_done = true;
                Output::tagged(Tag::YearSuffix(suffix), Output::text(suffix.to_string()))
            }
            "page" => ctx
                .value(name)
                .map(|pages| Output::text(self.page_range(&pages)))
                .unwrap_or_default(),
            "locator" => {
                let Some(locator) = ctx.value(name) else {
                    return Output::Null;
                };
                if ctx.item.and_then(CitationItem::locator_label) == Some("page") {
                    Output::text(self.page_range(&locator))
                } else {
                    Output::text(locator.into_owned())
                }
            }
            _ => {
                let value = match form {
                    VariableForm::Short => values::lookup_short(ctx.entry, name),
                    VariableForm::Long => ctx.value(name),
                };
                value
                    .map(|v| Output::text(v.into_owned()))
                    .unwrap_or_default()
            }
        }
    }

    fn page_range(&self, pages: &str) -> String {
        let delimiter = self
            .locale
            .term("page-range-delimiter", cslm_style::TermForm::Long, false)
            .unwrap_or("\u{2013}");
        number::format_page_range(pages, self.style.options.page_range_format, delimiter)
    }

    fn render_macro(
        &self,
        name: &'a str,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        let Some(body) = self.style.macro_body(name) else {
            trace!(name, "unknown macro renders empty");
            return Output::Null;
        };
        if st.depth >= MAX_MACRO_DEPTH {
            warn!(name, "macro nesting too deep, cutting off");
            return Output::Null;
        }
        let key = MemoKey {
            name,
            after_digit: st.tail.is_some_and(|c| c.is_ascii_digit()),
            first_names_done: st.first_names_done,
            year_suffix_done: st.year_suffix_done,
            suppressed: st.suppressed.len(),
            inherited: st.inherited.len(),
        };
        if self.memoize {
            if let Some(hit) = st.memo.get(&key).cloned() {
                st.first_names_done = hit.first_names_done;
                st.year_suffix_done = hit.year_suffix_done;
                st.suppressed.extend(hit.suppressed);
                st.rendered.extend(hit.rendered);
                if !hit.output.is_empty() {
                    st.tail = hit.output.last_char();
                }
                stats.absorb(hit.stats);
                return hit.output;
            }
        }

        let suppressed_mark = st.suppressed.len();
        let rendered_mark = st.rendered.len();
        let mut macro_stats = VarStats::default();
        st.depth += 1;
        st.macro_expansions += 1;
        let output = self.render_children(body, None, ctx, st, &mut macro_stats);
        st.depth -= 1;
        stats.absorb(macro_stats);

        if self.memoize {
            let result = MacroResult {
                output: output.clone(),
                stats: macro_stats,
                first_names_done: st.first_names_done,
                year_suffix_done: st.year_suffix_done,
                suppressed: st.suppressed[suppressed_mark..].to_vec(),
                rendered: st.rendered[rendered_mark..].to_vec(),
            };
            st.memo.insert(key, result);
        }
        output
    }

    fn render_number(
        &self,
        node: &'a Number,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        let value = if st.is_suppressed(&node.variable) {
            None
        } else {
            ctx.value(&node.variable)
        };
        stats.record(value.is_some());
        let Some(value) = value else {
            return Output::Null;
        };
        st.rendered.push(node.variable.clone());
        if ctx.sort_key.is_some() {
            if let Some(padded) = padded_number(&value) {
                return Output::text(padded);
            }
        }
        let text = number::format_number(&value, node.form, self.locale);
        decorate(Output::text(text), &node.rendering)
    }

    fn render_label(
        &self,
        label: &'a Label,
        ctx: &RenderContext<'a>,
        st: &RenderState<'a>,
    ) -> Output {
        let (term, value) = if label.variable == "locator" {
            let Some(item) = ctx.item else {
                return Output::Null;
            };
            let (Some(value), Some(term)) = (item.locator.as_deref(), item.locator_label()) else {
                return Output::Null;
            };
            (term, Cow::Borrowed(value))
        } else {
            if st.is_suppressed(&label.variable) {
                return Output::Null;
            }
            let Some(value) = ctx.value(&label.variable) else {
                return Output::Null;
            };
            (label.variable.as_str(), value)
        };
        let plural = match label.plural {
            Plural::Always => true,
            Plural::Never => false,
            Plural::Contextual => is_plural_value(&label.variable, &value),
        };
        self.locale
            .term(term, label.form, plural)
            .map(|text| decorate(Output::text(text), &label.rendering))
            .unwrap_or_default()
    }

    fn render_date(
        &self,
        node: &'a Date,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        let value = if st.is_suppressed(&node.variable) {
            None
        } else {
            ctx.value(&node.variable)
        };
        stats.record(value.is_some());
        let Some(value) = value else {
            return Output::Null;
        };
        st.rendered.push(node.variable.clone());
        let Some(parsed) = date::parse(&value) else {
            return decorate(Output::text(value.into_owned()), &node.rendering);
        };
        if ctx.sort_key.is_some() {
            return Output::text(parsed.sort_key());
        }

        let (parts, delimiter) = date::resolve_parts(node, self.locale);
        let has_year = parts.iter().any(|p| p.name == DatePartName::Year);
        let year_suffix = if has_year && !self.explicit_year_suffix && !st.year_suffix_done {
            ctx.state.year_suffix
        } else {
            None
        };
        if year_suffix.is_some() {
            st.year_suffix_done = true;
        }
        let renderer = DateRenderer {
            parts: &parts,
            delimiter: delimiter.as_deref().unwrap_or_default(),
            locale: self.locale,
        };
        decorate(renderer.render(&parsed, year_suffix), &node.rendering)
    }

    fn render_group(
        &self,
        group: &'a Group,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        let tail = st.tail;
        let after_digit = tail.is_some_and(|c| c.is_ascii_digit());
        let mut inner = VarStats::default();
        let output = self.render_children(
            &group.children,
            group.delimiter.as_deref(),
            ctx,
            st,
            &mut inner,
        );
        let empty_variables = inner.called > 0 && inner.filled == 0;
        let guard = |g: Option<GroupGuard>| g.map(|g| guard_holds(g, after_digit, &output));
        let blocked = guard(group.require) == Some(false) || guard(group.reject) == Some(true);
        if output.is_empty() || empty_variables || blocked {
            st.tail = tail;
            stats.called += inner.called;
            return Output::Null;
        }
        stats.absorb(inner);
        decorate(output, &group.rendering)
    }

    fn render_names(
        &self,
        names: &'a Names,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
        stats: &mut VarStats,
    ) -> Output {
        let parent = st.inherited.last().copied();
        let name_element = names
            .name
            .as_ref()
            .or_else(|| parent.and_then(|p| p.name.as_ref()));
        let et_al = names
            .et_al
            .as_ref()
            .or_else(|| parent.and_then(|p| p.et_al.as_ref()));
        let (label, label_before_name) = match (&names.label, parent) {
            (Some(label), _) => (Some(label), names.label_before_name),
            (None, Some(p)) => (p.label.as_ref(), p.label_before_name),
            (None, None) => (None, false),
        };
        let institution = names
            .institution
            .as_ref()
            .or_else(|| parent.and_then(|p| p.institution.as_ref()));
        let primary = names.variables.first().cloned().unwrap_or_default();
        // substitutes inside a substitute are not the cite's first names
        let is_first = !st.first_names_done && st.inherited.is_empty();

        let lists = self.name_lists(names, ctx, st);
        if lists.is_empty() {
            let output = self.render_substitute(names, ctx, st);
            stats.record(!output.is_empty());
            return self.finish_names(output, names, primary, is_first, ctx, st);
        }
        stats.record(true);
        for (role, _) in &lists {
            if *role == "editortranslator" {
                st.rendered.push("editor".to_string());
                st.rendered.push("translator".to_string());
            } else {
                st.rendered.push(role.to_string());
            }
        }

        let options = self.name_options(ctx, name_element);
        let expand = ctx.target == Context::Citation && !st.first_names_done;
        let formatter = self.formatter(ctx, options, name_element, et_al, institution, expand);

        let output = if formatter.options.form == Some(NameForm::Count) {
            let count: usize = lists
                .iter()
                .map(|(_, list)| formatter.shown_count(list.len()))
                .sum();
            if count == 0 {
                Output::Null
            } else {
                Output::text(count.to_string())
            }
        } else {
            let rendered: Vec<Output> = lists
                .iter()
                .map(|(role, list)| {
                    let names_out = formatter.format(list);
                    let label_out = label
                        .map(|l| self.names_label(l, role, list.len()))
                        .unwrap_or_default();
                    if names_out.is_empty() {
                        Output::Null
                    } else if label_before_name {
                        Output::seq(vec![label_out, names_out])
                    } else {
                        Output::seq(vec![names_out, label_out])
                    }
                })
                .collect();
            let delimiter = names
                .delimiter
                .as_deref()
                .or(formatter.options.names_delimiter.as_deref())
                .unwrap_or(", ");
            Output::join(rendered, delimiter)
        };
        self.finish_names(output, names, primary, is_first, ctx, st)
    }

    /// The name lists a `<names>` renders, with `editor` and `translator`
    /// merged into `editortranslator` when they hold the same names.
    fn name_lists(
        &self,
        names: &'a Names,
        ctx: &RenderContext<'a>,
        st: &RenderState<'a>,
    ) -> Vec<(&'a str, &'a [Name])> {
        let mut lists: Vec<(&'a str, &'a [Name])> = names
            .variables
            .iter()
            .filter(|v| !st.is_suppressed(v))
            .filter_map(|v| values::names(ctx.entry, v).map(|list| (v.as_str(), list)))
            .collect();
        let editor = lists.iter().position(|(role, _)| *role == "editor");
        let translator = lists.iter().position(|(role, _)| *role == "translator");
        if let (Some(e), Some(t)) = (editor, translator) {
            if lists[e].1 == lists[t].1 {
                lists[e].0 = "editortranslator";
                lists.remove(t);
            }
        }
        lists
    }

    fn render_substitute(
        &self,
        names: &'a Names,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
    ) -> Output {
        let Some(nodes) = names.substitute.as_deref() else {
            return Output::Null;
        };
        st.inherited.push(names);
        let mut result = Output::Null;
        for node in nodes {
            let mark = st.rendered.len();
            let mut scratch = VarStats::default();
            let output = self.render_node(node, ctx, st, &mut scratch);
            if !output.is_empty() {
                let consumed = st.rendered[mark..].to_vec();
                st.suppressed.extend(consumed);
                result = output;
                break;
            }
        }
        st.inherited.pop();
        result
    }

    fn finish_names(
        &self,
        output: Output,
        names: &'a Names,
        primary: String,
        is_first: bool,
        ctx: &RenderContext<'a>,
        st: &mut RenderState<'a>,
    ) -> Output {
        if output.is_empty() {
            return Output::Null;
        }
        if !is_first {
            return decorate(output, &names.rendering);
        }
        st.first_names_done = true;
        if ctx.suppress_author {
            return Output::Null;
        }
        let output = match ctx.author_substitute {
            Some(substitute) => Output::text(substitute),
            None => output,
        };
        Output::tagged(
            Tag::Names { variable: primary },
            decorate(output, &names.rendering),
        )
    }

    fn names_label(&self, label: &Label, role: &str, count: usize) -> Output {
        let plural = match label.plural {
            Plural::Always => true,
            Plural::Never => false,
            Plural::Contextual => count > 1,
        };
        self.locale
            .term(role, label.form, plural)
            .map(|text| decorate(Output::text(text), &label.rendering))
            .unwrap_or_default()
    }

    /// Name options inherited from the style, the citation or bibliography
    /// element and `<name>`, with sort key overrides on top.
    fn name_options(
        &self,
        ctx: &RenderContext<'a>,
        element: Option<&cslm_style::Name>,
    ) -> NameOptions {
        let target = match ctx.target {
            Context::Citation => Cow::Borrowed(&self.style.citation.names),
            Context::Bibliography => match &self.style.bibliography {
                Some(bibliography) => Cow::Borrowed(&bibliography.names),
                None => Cow::Owned(NameOptions::default()),
            },
        };
        let mut options = self.style.options.names.merge(&target);
        if let Some(element) = element {
            options = options.merge(&element.options);
        }
        if let Some(key) = ctx.sort_key {
            if key.names_min.is_some() {
                options.et_al_min = key.names_min;
                options.et_al_subsequent_min = key.names_min;
            }
            if key.names_use_first.is_some() {
                options.et_al_use_first = key.names_use_first;
                options.et_al_subsequent_use_first = key.names_use_first;
            }
            if key.names_use_last.is_some() {
                options.et_al_use_last = key.names_use_last;
            }
        }
        options
    }

    fn formatter(
        &self,
        ctx: &RenderContext<'a>,
        options: NameOptions,
        name: Option<&'a cslm_style::Name>,
        et_al: Option<&'a cslm_style::EtAl>,
        institution: Option<&'a cslm_style::Institution>,
        expand: bool,
    ) -> NameFormatter<'a> {
        let sort_mode = ctx.sort_key.is_some();
        NameFormatter {
            locale: self.locale,
            options,
            name,
            et_al,
            institution,
            demote: self.style.options.demote_non_dropping_particle,
            initialize_with_hyphen: self.style.options.initialize_with_hyphen,
            subsequent: matches!(ctx.position, Some(p) if p != Position::First),
            sort_mode,
            expansion: NameExpansion {
                givenname_level: ctx.state.givenname_level,
                names_expanded: ctx.state.names_expanded,
                rule: self.style.citation.options.givenname_disambiguation_rule,
                active: expand && !sort_mode,
            },
        }
    }
}

/// CSL-M comma safety: no comma would fall between two numbers.
fn guard_holds(guard: GroupGuard, after_digit: bool, output: &Output) -> bool {
    let starts_with_digit = output.first_char().is_some_and(|c| c.is_ascii_digit());
    let comma_safe = !(after_digit && starts_with_digit);
    match guard {
        GroupGuard::CommaSafe => comma_safe,
        GroupGuard::CommaSafeNumbersOnly => comma_safe && starts_with_digit,
    }
}

fn is_plural_value(variable: &str, value: &str) -> bool {
    match variable {
        "number-of-pages" | "number-of-volumes" => value
            .trim()
            .parse::<u64>()
            .is_ok_and(|n| n > 1),
        _ => number::is_multiple(value),
    }
}

/// Zero-padded form of a plain number, so numbers sort numerically.
fn padded_number(value: &str) -> Option<String> {
    value.trim().parse::<u64>().ok().map(|n| format!("{n:010}"))
}
