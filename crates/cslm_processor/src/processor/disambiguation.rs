/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Cross-entry disambiguation.
//!
//! Runs over the whole cited set, in bibliography order, and produces one
//! [`DisambiguationState`] per entry:
//!
//! 1. Year suffixes (`disambiguate-add-year-suffix`): entries sharing the
//!    lowercased first author family (or title) and year get `a`, `b`, `c`...
//! 2. Name expansion (`disambiguate-add-givenname`, `disambiguate-add-names`):
//!    entries whose first-position cites render the same names for the same
//!    year show more given name, then more names, one step per pass, until
//!    a pass changes nothing or the pass cap is hit. Year suffixes from step
//!    1 do not separate these groups.
//!
//! Entries that still collide afterwards match `disambiguate="true"`.

use std::collections::HashMap;

use cslm_core::Entry;
use cslm_style::GivenNameRule;
use tracing::{debug, warn};

use super::rendering::{RenderContext, Renderer};
use crate::values::{self, DisambiguationState};

/// Name-expansion passes before giving up.
pub const MAX_PASSES: usize = 10;

const SUFFIXES: &str = "abcdefghijklmnopqrstuvwxyz";

/// How the name-expansion loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// A pass changed nothing.
    Converged,
    /// Stopped after this many passes with collisions still changing.
    CappedAt(usize),
}

pub type States = HashMap<String, DisambiguationState>;

#[derive(Debug, Clone, Copy)]
enum CiteKey {
    /// First rendered names only.
    Names,
    Whole,
}

pub struct Disambiguator<'a> {
    renderer: &'a Renderer<'a>,
}

impl<'a> Disambiguator<'a> {
    pub fn new(renderer: &'a Renderer<'a>) -> Self {
        Self { renderer }
    }

    /// Compute states for `entries`, which must be in bibliography order.
    ///
    /// Existing states are taken as the starting point, so running again on
    /// the result changes nothing.
    pub fn run(&self, entries: &[&'a Entry], states: &mut States) -> Convergence {
        let options = &self.renderer.style.citation.options;
        for entry in entries {
            states.entry(entry.id.clone()).or_default();
        }
        if options.disambiguate_add_year_suffix {
            self.assign_year_suffixes(entries, states);
        }
        let convergence =
            if options.disambiguate_add_givenname || options.disambiguate_add_names {
                self.expand_names(entries, states)
            } else {
                Convergence::Converged
            };
        self.mark_remaining(entries, states);
        convergence
    }

    fn assign_year_suffixes(&self, entries: &[&'a Entry], states: &mut States) {
        let mut groups: HashMap<(String, Option<i32>), Vec<&Entry>> = HashMap::new();
        let mut order = Vec::new();
        for &entry in entries {
            let key = (author_key(entry), values::year(entry));
            let group = groups.entry(key.clone()).or_default();
            if group.is_empty() {
                order.push(key);
            }
            group.push(entry);
        }
        for key in order {
            let Some(group) = groups.get(&key) else {
                continue;
            };
            if group.len() < 2 {
                continue;
            }
            if group.len() > SUFFIXES.len() {
                warn!(
                    author = %key.0,
                    members = group.len(),
                    "more than 26 entries share author and year; extra entries get no suffix"
                );
            }
            for (entry, suffix) in group.iter().zip(SUFFIXES.chars()) {
                match states.get_mut(&entry.id) {
                    Some(state) if state.year_suffix.is_none() => state.year_suffix = Some(suffix),
                    _ => {}
                }
            }
        }
    }

    fn expand_names(&self, entries: &[&'a Entry], states: &mut States) -> Convergence {
        for pass in 1..=MAX_PASSES {
            let mut changed = 0;
            for group in self.collisions(entries, states, CiteKey::Names) {
                for (i, &entry) in group.iter().enumerate() {
                    if !distinguishable(entry, i, &group) {
                        continue;
                    }
                    let current = states.get(&entry.id).copied().unwrap_or_default();
                    if let Some(next) = self.expand(entry, current) {
                        states.insert(entry.id.clone(), next);
                        changed += 1;
                    }
                }
            }
            debug!(pass, changed, "name disambiguation pass");
            if changed == 0 {
                return Convergence::Converged;
            }
        }
        warn!(passes = MAX_PASSES, "name disambiguation did not converge");
        Convergence::CappedAt(MAX_PASSES)
    }

    /// Groups of entries with identical cite keys, in bibliography order.
    fn collisions(
        &self,
        entries: &[&'a Entry],
        states: &States,
        by: CiteKey,
    ) -> Vec<Vec<&'a Entry>> {
        type Key = (String, Option<i32>, Option<char>);
        let mut groups: HashMap<Key, Vec<&'a Entry>> = HashMap::new();
        let mut order: Vec<Key> = Vec::new();
        for &entry in entries {
            let state = states.get(&entry.id).copied().unwrap_or_default();
            let text = match by {
                CiteKey::Names => self.cite_key(entry, state),
                CiteKey::Whole => self.cite_text(entry, state),
            };
            // Suffixes only separate whole cites; names still collide.
            let suffix = match by {
                CiteKey::Names => None,
                CiteKey::Whole => state.year_suffix,
            };
            let key = (text, values::year(entry), suffix);
            let group = groups.entry(key.clone()).or_default();
            if group.is_empty() {
                order.push(key);
            }
            group.push(entry);
        }
        order
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .filter(|group| group.len() > 1)
            .collect()
    }

    /// The names part of the entry's first-position cite, or the whole cite
    /// when it renders no names.
    fn cite_key(&self, entry: &'a Entry, state: DisambiguationState) -> String {
        let Some(layout) = self.renderer.citation_layout(entry) else {
            return String::new();
        };
        let ctx = RenderContext::citation(entry, None).with_state(state);
        let output = self.renderer.render_layout(layout, &ctx);
        match output.first_names() {
            Some(names) => names.to_plain(),
            None => output.to_plain(),
        }
    }

    fn cite_text(&self, entry: &'a Entry, state: DisambiguationState) -> String {
        self.renderer
            .citation_layout(entry)
            .map(|layout| {
                let ctx = RenderContext::citation(entry, None).with_state(state);
                self.renderer.render_layout(layout, &ctx).to_plain()
            })
            .unwrap_or_default()
    }

    /// One expansion step that changes the rendered names, if any.
    fn expand(&self, entry: &'a Entry, current: DisambiguationState) -> Option<DisambiguationState> {
        let options = &self.renderer.style.citation.options;
        let max_level = match options.givenname_disambiguation_rule {
            GivenNameRule::AllNamesWithInitials | GivenNameRule::PrimaryNameWithInitials => 1,
            _ => 2,
        };
        let total = values::primary_names(entry).map_or(0, <[_]>::len);
        let before = self.cite_key(entry, current);

        let mut candidates = Vec::new();
        if options.disambiguate_add_givenname {
            for level in current.givenname_level + 1..=max_level {
                candidates.push(DisambiguationState {
                    givenname_level: level,
                    ..current
                });
            }
        }
        if options.disambiguate_add_names && usize::from(current.names_expanded) < total {
            candidates.push(DisambiguationState {
                names_expanded: current.names_expanded + 1,
                ..current
            });
        }
        candidates
            .into_iter()
            .find(|candidate| self.cite_key(entry, *candidate) != before)
    }

    /// Flag entries whose whole cites still render identically.
    fn mark_remaining(&self, entries: &[&'a Entry], states: &mut States) {
        for group in self.collisions(entries, states, CiteKey::Whole) {
            for entry in group {
                if let Some(state) = states.get_mut(&entry.id) {
                    state.condition = true;
                }
            }
        }
    }
}

/// Lowercased family of the first primary name, or the title.
fn author_key(entry: &Entry) -> String {
    values::primary_names(entry)
        .and_then(|names| names.first())
        .map(|name| name.family_or_literal().to_lowercase())
        .or_else(|| values::lookup(entry, "title").map(|title| title.to_lowercase()))
        .unwrap_or_default()
}

/// Whether more names could tell this entry apart from some other member.
fn distinguishable(entry: &Entry, index: usize, group: &[&Entry]) -> bool {
    let own = values::primary_names(entry);
    group
        .iter()
        .enumerate()
        .any(|(j, other)| j != index && values::primary_names(other) != own)
}
