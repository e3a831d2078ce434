/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! `<sort>` evaluation for the bibliography and for items inside a citation.

use std::cmp::Ordering;

use cslm_style::Sort;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::rendering::{RenderContext, Renderer};

pub struct Sorter<'a> {
    renderer: &'a Renderer<'a>,
}

impl<'a> Sorter<'a> {
    pub fn new(renderer: &'a Renderer<'a>) -> Self {
        Self { renderer }
    }

    /// Comparable keys of one item, one per `<key>`.
    pub fn keys(&self, sort: &'a Sort, ctx: &RenderContext<'a>) -> Vec<String> {
        sort.keys
            .iter()
            .map(|key| fold(&self.renderer.render_sort_key(key, ctx)))
            .collect()
    }

    /// The stable sort order of `items`, as indices into the slice.
    pub fn order(&self, sort: &'a Sort, items: &[RenderContext<'a>]) -> Vec<usize> {
        let keys: Vec<Vec<String>> = items.iter().map(|ctx| self.keys(sort, ctx)).collect();
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| compare(sort, &keys[a], &keys[b]));
        order
    }
}

fn compare(sort: &Sort, a: &[String], b: &[String]) -> Ordering {
    for ((key, a), b) in sort.keys.iter().zip(a).zip(b) {
        let ordering = match (a.is_empty(), b.is_empty()) {
            (true, true) => Ordering::Equal,
            // empty values sort last in either direction
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if key.descending => b.cmp(a),
            (false, false) => a.cmp(b),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Case- and accent-insensitive form of a sort key.
pub fn fold(key: &str) -> String {
    key.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim()
        .to_string()
}
