/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The processor session for one document.
//!
//! A [`Processor`] owns the style, the bibliography, the resolved locale and
//! the registered citations. Registering citations is the barrier between
//! collecting and rendering: it derives cite positions, orders the
//! bibliography, assigns citation numbers and runs disambiguation to a fixed
//! point. Rendering afterwards only reads that state.
//!
//! ## Positions
//!
//! Cites without an explicit position get one from the citation history:
//! the first cite of an entry is `first`; a cite directly following a cite
//! of the same entry (the previous item of the same citation, or the only
//! item of the previous citation) is `ibid` or `ibid-with-locator`; any other
//! repeat is `subsequent`.

pub mod collapse;
pub mod conditions;
pub mod disambiguation;
pub mod labels;
pub mod rendering;
pub mod sorting;


use std::collections::HashMap;

use cslm_core::{
    Bibliography, CitationItem, CitationOccurrence, CiteForm, Entry, Locale, LocaleResolver,
    Position,
};
use cslm_style::{
    CslNode, Display, Formatting, InstitutionParts, Layout, Sort, SortSource, Style,
    SubstituteRule,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ProcessorError;
use crate::render::{decorate, Output, OutputFormat, PlainText, QuoteMarks};
use crate::values::{self, DisambiguationState};

use self::collapse::{Collapser, RenderedCite};
use self::disambiguation::{Convergence, Disambiguator, States};
use self::rendering::{RenderContext, Renderer};
use self::sorting::Sorter;

const FALLBACK_LOCALE: &str = "en-US";

/// Engine configuration, loadable from JSON or YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProcessorOptions {
    /// Output locale; overrides the style's `default-locale`.
    pub locale: Option<String>,
    /// Cache macro expansions within one entry render.
    pub memoize_macros: bool,
    /// Put entries that were never cited into the bibliography.
    pub include_uncited: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            locale: None,
            memoize_macros: true,
            include_uncited: true,
        }
    }
}

impl ProcessorOptions {
    pub fn from_json_str(json: &str) -> Result<Self, ProcessorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProcessorError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// One rendered bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibliographyEntry {
    pub id: String,
    pub text: String,
    /// The entry with its citation number removed, for custom numbering.
    pub text_without_number: String,
    pub citation_number: Option<usize>,
}

/// Derived placement of one cite.
#[derive(Debug, Clone, Copy)]
struct CiteInfo {
    position: Position,
    near_note: bool,
    first_note: Option<u32>,
}

/// The session for one document.
#[derive(Debug)]
pub struct Processor {
    pub style: Style,
    pub bibliography: Bibliography,
    pub locale: Locale,
    pub options: ProcessorOptions,
    resolver: LocaleResolver,
    citations: Vec<CitationOccurrence>,
    placements: Vec<Vec<CiteInfo>>,
    /// Bibliography entry ids in output order.
    order: Vec<String>,
    citation_numbers: HashMap<String, usize>,
    states: States,
    convergence: Convergence,
}

impl Processor {
    pub fn new(style: Style, bibliography: Bibliography) -> Self {
        Self::with_options(style, bibliography, ProcessorOptions::default())
    }

    pub fn with_options(style: Style, bibliography: Bibliography, options: ProcessorOptions) -> Self {
        let mut resolver = LocaleResolver::new(&style.locales);
        let lang = options
            .locale
            .clone()
            .or_else(|| style.default_locale.clone())
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string());
        let locale = resolver.resolve(&lang).clone();
        let mut processor = Self {
            style,
            bibliography,
            locale,
            options,
            resolver,
            citations: Vec::new(),
            placements: Vec::new(),
            order: Vec::new(),
            citation_numbers: HashMap::new(),
            states: States::new(),
            convergence: Convergence::Converged,
        };
        for feature in processor.unsupported_features() {
            warn!(feature = %feature, "style uses a feature that is only partly supported");
        }
        processor.refresh();
        processor
    }

    /// Build a session from CSL style XML and CSL-JSON entries.
    pub fn from_sources(style_xml: &str, entries_json: &str) -> Result<Self, ProcessorError> {
        let style = cslm_style::parse_style(style_xml)?;
        let bibliography = Entry::bibliography_from_csl_json(entries_json)?;
        Ok(Self::new(style, bibliography))
    }

    /// Add an external locale table and re-resolve the output locale.
    pub fn add_locale(&mut self, locale: Locale) {
        let lang = self.locale.lang.clone();
        self.resolver.add_external(locale);
        self.locale = self.resolver.resolve(&lang).clone();
        self.refresh();
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.style, &self.locale).with_memoization(self.options.memoize_macros)
    }

    /// Register the document's citations, in document order.
    ///
    /// Replaces earlier registrations and recomputes positions, bibliography
    /// order, citation numbers and disambiguation.
    pub fn register_citations(&mut self, citations: Vec<CitationOccurrence>) {
        let distance = self.style.citation.options.near_note_distance;
        self.placements = derive_positions(&citations, distance);
        self.citations = citations;
        for item in self.citations.iter().flat_map(|c| c.items.iter()) {
            if !self.bibliography.contains_key(&item.id) {
                warn!(id = %item.id, "citation references an unknown entry");
            }
        }
        self.refresh();
    }

    /// Recompute bibliography order, citation numbers and disambiguation.
    fn refresh(&mut self) {
        let registered = self.registration_order();
        let numbers_by_registration: HashMap<String, usize> = registered
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i + 1))
            .collect();

        // Numbered styles list entries in first-cite order.
        let numbered = self.style.uses_variable("citation-number");

        let (order, states, convergence) = {
            let renderer = self.renderer();
            let entries: Vec<&Entry> = registered
                .iter()
                .filter_map(|id| self.bibliography.get(id))
                .collect();
            let sort = self
                .style
                .bibliography
                .as_ref()
                .and_then(|b| b.sort.as_ref())
                .filter(|sort| !numbered || keys_only_citation_number(sort));
            let sorted: Vec<&Entry> = match sort {
                Some(sort) => {
                    let contexts: Vec<RenderContext<'_>> = entries
                        .iter()
                        .map(|&entry| {
                            RenderContext::bibliography(entry)
                                .with_citation_number(numbers_by_registration.get(&entry.id).copied())
                        })
                        .collect();
                    Sorter::new(&renderer)
                        .order(sort, &contexts)
                        .into_iter()
                        .map(|i| entries[i])
                        .collect()
                }
                None => entries,
            };
            let mut states = States::new();
            let convergence = Disambiguator::new(&renderer).run(&sorted, &mut states);
            let order: Vec<String> = sorted.iter().map(|entry| entry.id.clone()).collect();
            (order, states, convergence)
        };

        let by_registration = numbered || self.sorts_by_citation_number();
        self.citation_numbers = order
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let number = match numbers_by_registration.get(id) {
                    Some(&n) if by_registration => n,
                    _ => i + 1,
                };
                (id.clone(), number)
            })
            .collect();
        debug!(
            entries = order.len(),
            citations = self.citations.len(),
            ?convergence,
            "processor state refreshed"
        );
        self.order = order;
        self.states = states;
        self.convergence = convergence;
    }

    /// Cited entries in first-cite order, then uncited ones in input order.
    fn registration_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for item in self.citations.iter().flat_map(|c| c.items.iter()) {
            if self.bibliography.contains_key(&item.id) && !order.contains(&item.id) {
                order.push(item.id.clone());
            }
        }
        if self.options.include_uncited || self.citations.is_empty() {
            for id in self.bibliography.keys() {
                if !order.contains(id) {
                    order.push(id.clone());
                }
            }
        }
        order
    }

    /// Whether the bibliography sort keys on `citation-number`.
    fn sorts_by_citation_number(&self) -> bool {
        self.style
            .bibliography
            .as_ref()
            .and_then(|b| b.sort.as_ref())
            .is_some_and(|sort| {
                sort.keys.iter().any(|key| {
                    matches!(&key.source, SortSource::Variable(v) if v == "citation-number")
                })
            })
    }

    pub fn disambiguation_state(&self, id: &str) -> Option<DisambiguationState> {
        self.states.get(id).copied()
    }

    /// How the last disambiguation run ended.
    pub fn convergence(&self) -> Convergence {
        self.convergence
    }

    pub fn citation_number(&self, id: &str) -> Option<usize> {
        self.citation_numbers.get(id).copied()
    }

    /// Render all registered citations as plain text.
    pub fn process_citations(&self) -> Vec<String> {
        self.render_citations::<PlainText>()
    }

    pub fn render_citations<F: OutputFormat>(&self) -> Vec<String> {
        let renderer = self.renderer();
        let marks = QuoteMarks::from_locale(&self.locale);
        self.citations
            .iter()
            .zip(&self.placements)
            .map(|(citation, infos)| {
                self.render_occurrence(&renderer, citation, infos)
                    .finish(&F::default(), &marks)
            })
            .collect()
    }

    /// Render one citation outside the registered sequence. Cites without
    /// an explicit position are treated as first cites.
    pub fn process_citation(&self, citation: &CitationOccurrence) -> String {
        let renderer = self.renderer();
        let infos: Vec<CiteInfo> = citation
            .items
            .iter()
            .map(|item| CiteInfo {
                position: item.position.unwrap_or(Position::First),
                near_note: false,
                first_note: None,
            })
            .collect();
        self.render_occurrence(&renderer, citation, &infos)
            .finish(&PlainText, &QuoteMarks::from_locale(&self.locale))
    }

    fn render_occurrence<'s>(
        &'s self,
        renderer: &Renderer<'s>,
        citation: &'s CitationOccurrence,
        infos: &[CiteInfo],
    ) -> Output {
        let Some(layout) = self.style.citation.layout_for(None) else {
            return Output::Null;
        };
        let mut cites: Vec<(&'s CitationItem, CiteInfo, Option<&'s Entry>)> = citation
            .items
            .iter()
            .zip(infos.iter().copied())
            .map(|(item, info)| (item, info, self.bibliography.get(&item.id)))
            .collect();

        if let Some(sort) = &self.style.citation.sort {
            let known: Vec<usize> = (0..cites.len()).filter(|&i| cites[i].2.is_some()).collect();
            let contexts: Vec<RenderContext<'s>> = known
                .iter()
                .filter_map(|&i| {
                    let (item, info, entry) = cites[i];
                    entry.map(|entry| self.cite_context(entry, item, info))
                })
                .collect();
            let order = Sorter::new(renderer).order(sort, &contexts);
            let mut sorted: Vec<_> = order.into_iter().map(|k| cites[known[k]]).collect();
            sorted.extend(cites.iter().filter(|c| c.2.is_none()).copied());
            cites = sorted;
        }

        let rendered = cites
            .into_iter()
            .map(|(item, info, entry)| match entry {
                Some(entry) => self.render_cite(renderer, entry, item, info),
                None => {
                    warn!(id = %item.id, "rendering unknown entry as its key");
                    RenderedCite {
                        id: item.id.clone(),
                        output: Output::text(item.id.as_str()),
                        without_author: Output::text(item.id.as_str()),
                        year: None,
                        has_locator: item.locator.is_some(),
                    }
                }
            })
            .collect();
        let delimiter = layout.delimiter.as_deref().unwrap_or_default();
        let joined = Collapser::new(&self.style.citation.options, delimiter).join(rendered);
        // narrative "Kuhn" cites carry no layout affixes
        let author_only = !citation.items.is_empty()
            && citation
                .items
                .iter()
                .all(|item| item.form == CiteForm::AuthorOnly);
        if author_only {
            return joined;
        }
        decorate(joined, &layout.rendering)
    }

    fn cite_context<'s>(
        &'s self,
        entry: &'s Entry,
        item: &'s CitationItem,
        info: CiteInfo,
    ) -> RenderContext<'s> {
        RenderContext {
            position: Some(info.position),
            near_note: info.near_note,
            first_note_number: info.first_note,
            citation_number: self.citation_number(&entry.id),
            state: self.states.get(&entry.id).copied().unwrap_or_default(),
            suppress_author: item.form == CiteForm::SuppressAuthor,
            ..RenderContext::citation(entry, Some(item))
        }
    }

    fn render_cite<'s>(
        &'s self,
        renderer: &Renderer<'s>,
        entry: &'s Entry,
        item: &'s CitationItem,
        info: CiteInfo,
    ) -> RenderedCite {
        let ctx = self.cite_context(entry, item, info);
        let render = |ctx: &RenderContext<'s>| {
            renderer
                .citation_layout(entry)
                .map(|layout| renderer.render_layout(layout, ctx))
                .unwrap_or_default()
        };
        let full = render(&ctx);
        let output = match item.form {
            CiteForm::AuthorOnly => full.first_names().cloned().unwrap_or_default(),
            _ => full,
        };
        let without_author = render(&RenderContext {
            suppress_author: true,
            ..ctx.clone()
        });
        let affix = |output: Output| {
            output.with_affixes(item.prefix.as_deref(), item.suffix.as_deref())
        };
        RenderedCite {
            id: entry.id.clone(),
            output: affix(output),
            without_author: affix(without_author),
            year: values::year(entry),
            has_locator: item.locator.is_some(),
        }
    }

    /// The rendered bibliography, in order.
    pub fn bibliography_entries(&self) -> Vec<BibliographyEntry> {
        let marks = QuoteMarks::from_locale(&self.locale);
        self.bibliography_outputs()
            .into_iter()
            .map(|(id, output)| BibliographyEntry {
                text_without_number: output
                    .without_citation_number()
                    .finish(&PlainText, &marks),
                citation_number: self.citation_number(&id),
                text: output.finish(&PlainText, &marks),
                id,
            })
            .collect()
    }

    /// The whole bibliography through an output format.
    pub fn render_bibliography<F: OutputFormat>(&self) -> String {
        let fmt = F::default();
        let marks = QuoteMarks::from_locale(&self.locale);
        let entries = self
            .bibliography_outputs()
            .into_iter()
            .map(|(id, mut output)| {
                output.tidy(&marks);
                fmt.entry(&id, output.render(&fmt, &marks))
            })
            .collect();
        fmt.finish(fmt.bibliography(entries))
    }

    /// Render one bibliography entry as plain text.
    pub fn render_entry(&self, id: &str) -> Result<String, ProcessorError> {
        let entry = self
            .bibliography
            .get(id)
            .ok_or_else(|| ProcessorError::EntryNotFound(id.to_string()))?;
        let renderer = self.renderer();
        let layout = renderer
            .bibliography_layout(entry)
            .ok_or(ProcessorError::NoBibliography)?;
        let output = self.render_bibliography_entry(&renderer, layout, entry, None);
        Ok(decorate(output, &layout.rendering)
            .finish(&PlainText, &QuoteMarks::from_locale(&self.locale)))
    }

    fn bibliography_outputs(&self) -> Vec<(String, Output)> {
        let Some(bibliography) = &self.style.bibliography else {
            return Vec::new();
        };
        let substitute = bibliography.options.subsequent_author_substitute.as_deref();
        let renderer = self.renderer();
        let mut previous_names: Option<String> = None;
        let mut outputs = Vec::new();
        for id in &self.order {
            let Some(entry) = self.bibliography.get(id) else {
                continue;
            };
            let Some(layout) = renderer.bibliography_layout(entry) else {
                continue;
            };
            let output = self.render_bibliography_entry(&renderer, layout, entry, None);
            let names = output
                .first_names()
                .map(Output::to_plain)
                .filter(|names| !names.is_empty());
            let output = match substitute {
                Some(substitute) if names.is_some() && names == previous_names => {
                    self.render_bibliography_entry(&renderer, layout, entry, Some(substitute))
                }
                _ => output,
            };
            previous_names = names;
            outputs.push((id.clone(), decorate(output, &layout.rendering)));
        }
        outputs
    }

    fn render_bibliography_entry<'s>(
        &'s self,
        renderer: &Renderer<'s>,
        layout: &'s Layout,
        entry: &'s Entry,
        author_substitute: Option<&'s str>,
    ) -> Output {
        let ctx = RenderContext {
            author_substitute,
            ..RenderContext::bibliography(entry)
                .with_state(self.states.get(&entry.id).copied().unwrap_or_default())
                .with_citation_number(self.citation_number(&entry.id))
        };
        let aligned = self
            .style
            .bibliography
            .as_ref()
            .is_some_and(|b| b.options.second_field_align.is_some());
        if !aligned {
            return renderer.render_layout(layout, &ctx);
        }
        let mut fields = renderer.render_layout_fields(layout, &ctx).into_iter();
        let first = fields.next().unwrap_or_default();
        let rest = Output::seq(fields.collect());
        Output::seq(vec![
            first.formatted(Formatting::default(), false, Some(Display::LeftMargin)),
            rest.formatted(Formatting::default(), false, Some(Display::RightInline)),
        ])
    }

    /// Style constructs this engine recognises but only partly implements.
    pub fn unsupported_features(&self) -> Vec<String> {
        let mut features = Vec::new();
        let rule = self
            .style
            .bibliography
            .as_ref()
            .filter(|b| b.options.subsequent_author_substitute.is_some())
            .map(|b| b.options.subsequent_author_substitute_rule);
        if let Some(rule) = rule.filter(|r| *r != SubstituteRule::CompleteAll) {
            features.push(format!(
                "subsequent-author-substitute-rule=\"{}\" (rendered as complete-all)",
                rule.as_str()
            ));
        }
        let layouts = self
            .style
            .citation
            .layouts
            .iter()
            .chain(self.style.bibliography.iter().flat_map(|b| b.layouts.iter()))
            .map(|layout| layout.children.as_slice());
        let uses_short_parts = layouts
            .chain(self.style.macros.values().map(Vec::as_slice))
            .any(uses_short_institution_parts);
        if uses_short_parts {
            features.push(
                "institution-parts with short forms (rendered as long)".to_string(),
            );
        }
        features
    }
}

fn uses_short_institution_parts(nodes: &[CslNode]) -> bool {
    nodes.iter().any(|node| match node {
        CslNode::Names(names) => {
            names
                .institution
                .as_ref()
                .is_some_and(|i| i.parts != InstitutionParts::Long)
                || names
                    .substitute
                    .as_deref()
                    .is_some_and(uses_short_institution_parts)
        }
        CslNode::Group(group) => uses_short_institution_parts(&group.children),
        CslNode::Choose(choose) => choose.branches().any(uses_short_institution_parts),
        CslNode::Text(_) | CslNode::Date(_) | CslNode::Number(_) | CslNode::Label(_) => false,
    })
}

/// Positions, near-note flags and first note numbers for every cite.
/// Whether every key of a sort is the citation number.
fn keys_only_citation_number(sort: &Sort) -> bool {
    sort.keys
        .iter()
        .all(|key| matches!(&key.source, SortSource::Variable(v) if v == "citation-number"))
}

fn derive_positions(citations: &[CitationOccurrence], near_note_distance: u32) -> Vec<Vec<CiteInfo>> {
    let mut first_note: HashMap<&str, u32> = HashMap::new();
    let mut last_note: HashMap<&str, u32> = HashMap::new();
    let mut previous: Option<&CitationOccurrence> = None;
    let mut placements = Vec::with_capacity(citations.len());
    for (index, citation) in citations.iter().enumerate() {
        let note = citation
            .note_number
            .unwrap_or_else(|| u32::try_from(index + 1).unwrap_or(u32::MAX));
        let mut infos = Vec::with_capacity(citation.items.len());
        for (i, item) in citation.items.iter().enumerate() {
            let id = item.id.as_str();
            let preceding = match i {
                0 => previous.and_then(|p| match p.items.as_slice() {
                    [only] => Some(only),
                    _ => None,
                }),
                _ => citation.items.get(i - 1),
            };
            let derived = if !first_note.contains_key(id) {
                Position::First
            } else {
                match preceding.filter(|p| p.id == item.id) {
                    Some(preceding) => ibid_position(preceding, item),
                    None => Position::Subsequent,
                }
            };
            let near_note = last_note
                .get(id)
                .is_some_and(|&last| note.saturating_sub(last) <= near_note_distance);
            let first = *first_note.entry(id).or_insert(note);
            last_note.insert(id, note);
            infos.push(CiteInfo {
                position: item.position.unwrap_or(derived),
                near_note,
                first_note: Some(first),
            });
        }
        previous = Some(citation);
        placements.push(infos);
    }
    placements
}

fn ibid_position(preceding: &CitationItem, current: &CitationItem) -> Position {
    match (&preceding.locator, &current.locator) {
        (None, None) => Position::Ibid,
        (Some(_), None) => Position::Subsequent,
        (None, Some(_)) => Position::IbidWithLocator,
        (Some(a), Some(b)) if a == b && preceding.label == current.label => Position::Ibid,
        (Some(_), Some(_)) => Position::IbidWithLocator,
    }
}
