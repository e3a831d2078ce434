/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Format-independent rendered output.
//!
//! The interpreter produces an [`Output`] tree. Post-processing passes
//! (punctuation cleanup, quote punctuation, text case) work on the tree,
//! and [`Output::render`] writes it out through an [`OutputFormat`].

pub mod format;
pub mod html;
pub mod plain;
pub mod text_case;

use cslm_style::{
    Display, FontStyle, FontVariant, FontWeight, Formatting, Rendering, TextCase,
    TextDecoration, VerticalAlign,
};

pub use format::OutputFormat;
pub use html::Html;
pub use plain::PlainText;

/// Marks a rendered span with the role it plays for post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// Output of a `<names>` element (or its substitute).
    Names { variable: String },
    YearSuffix(char),
    CitationNumber(usize),
}

/// A rendered span.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Output {
    #[default]
    Null,
    Text(String),
    Seq(Vec<Output>),
    Formatted {
        formatting: Formatting,
        quotes: bool,
        display: Option<Display>,
        child: Box<Output>,
    },
    Tagged {
        tag: Tag,
        child: Box<Output>,
    },
}

/// Quote marks and quote punctuation rules of the active locale.
#[derive(Debug, Clone)]
pub struct QuoteMarks {
    pub outer: (String, String),
    pub inner: (String, String),
    pub punctuation_in_quote: bool,
}

impl Default for QuoteMarks {
    fn default() -> Self {
        Self {
            outer: ("\u{201c}".to_string(), "\u{201d}".to_string()),
            inner: ("\u{2018}".to_string(), "\u{2019}".to_string()),
            punctuation_in_quote: true,
        }
    }
}

impl QuoteMarks {
    pub fn from_locale(locale: &cslm_core::Locale) -> Self {
        let (oo, oc) = locale.quotes(false);
        let (io, ic) = locale.quotes(true);
        Self {
            outer: (oo.to_string(), oc.to_string()),
            inner: (io.to_string(), ic.to_string()),
            punctuation_in_quote: locale.punctuation_in_quote(),
        }
    }
}

impl Output {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Output::Null
        } else {
            Output::Text(s)
        }
    }

    /// A sequence with empty members dropped.
    pub fn seq(items: Vec<Output>) -> Self {
        let mut items: Vec<Output> = items.into_iter().filter(|o| !o.is_empty()).collect();
        match items.len() {
            0 => Output::Null,
            1 => items.pop().unwrap_or_default(),
            _ => Output::Seq(items),
        }
    }

    /// Join non-empty members with a delimiter.
    pub fn join(items: Vec<Output>, delimiter: &str) -> Self {
        let mut joined = Vec::new();
        for item in items.into_iter().filter(|o| !o.is_empty()) {
            if !joined.is_empty() && !delimiter.is_empty() {
                joined.push(Output::Text(delimiter.to_string()));
            }
            joined.push(item);
        }
        Output::seq(joined)
    }

    pub fn tagged(tag: Tag, child: Output) -> Self {
        if child.is_empty() {
            return Output::Null;
        }
        Output::Tagged {
            tag,
            child: Box::new(child),
        }
    }

    /// Wrap in affixes; empty content takes no affixes.
    pub fn with_affixes(self, prefix: Option<&str>, suffix: Option<&str>) -> Self {
        if self.is_empty() {
            return self;
        }
        let prefix = prefix.unwrap_or_default();
        let suffix = suffix.unwrap_or_default();
        if prefix.is_empty() && suffix.is_empty() {
            return self;
        }
        Output::seq(vec![Output::text(prefix), self, Output::text(suffix)])
    }

    /// Wrap in formatting, quotes and display when any is set.
    pub fn formatted(self, formatting: Formatting, quotes: bool, display: Option<Display>) -> Self {
        if self.is_empty() || (formatting.is_empty() && !quotes && display.is_none()) {
            return self;
        }
        Output::Formatted {
            formatting,
            quotes,
            display,
            child: Box::new(self),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Output::Null => true,
            Output::Text(s) => s.is_empty(),
            Output::Seq(items) => items.iter().all(Output::is_empty),
            Output::Formatted { child, .. } | Output::Tagged { child, .. } => child.is_empty(),
        }
    }

    /// Concatenated text of all leaves, without formatting or quote marks.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.push_plain(&mut out);
        out
    }

    fn push_plain(&self, out: &mut String) {
        match self {
            Output::Null => {}
            Output::Text(s) => out.push_str(s),
            Output::Seq(items) => items.iter().for_each(|i| i.push_plain(out)),
            Output::Formatted { child, .. } | Output::Tagged { child, .. } => {
                child.push_plain(out)
            }
        }
    }

    pub fn first_char(&self) -> Option<char> {
        self.to_plain().chars().next()
    }

    pub fn last_char(&self) -> Option<char> {
        self.to_plain().chars().next_back()
    }

    /// The first span with a matching tag, in document order.
    pub fn find_tag(&self, pred: &dyn Fn(&Tag) -> bool) -> Option<&Output> {
        match self {
            Output::Null | Output::Text(_) => None,
            Output::Seq(items) => items.iter().find_map(|i| i.find_tag(pred)),
            Output::Formatted { child, .. } => child.find_tag(pred),
            Output::Tagged { tag, child } => {
                if pred(tag) {
                    Some(self)
                } else {
                    child.find_tag(pred)
                }
            }
        }
    }

    /// The first rendered `<names>` output.
    pub fn first_names(&self) -> Option<&Output> {
        self.find_tag(&|tag| matches!(tag, Tag::Names { .. }))
    }

    pub fn year_suffix(&self) -> Option<&Output> {
        self.find_tag(&|tag| matches!(tag, Tag::YearSuffix(_)))
    }

    pub fn citation_number(&self) -> Option<usize> {
        match self.find_tag(&|tag| matches!(tag, Tag::CitationNumber(_))) {
            Some(Output::Tagged {
                tag: Tag::CitationNumber(n),
                ..
            }) => Some(*n),
            _ => None,
        }
    }

    /// Copy of this tree with citation-number spans removed.
    pub fn without_citation_number(&self) -> Output {
        match self {
            Output::Tagged {
                tag: Tag::CitationNumber(_),
                ..
            } => Output::Null,
            Output::Tagged { tag, child } => Output::Tagged {
                tag: tag.clone(),
                child: Box::new(child.without_citation_number()),
            },
            Output::Seq(items) => {
                let mut removed_at_start = false;
                let mut kept = Vec::new();
                for item in items {
                    let stripped = item.without_citation_number();
                    if stripped.is_empty() && !item.is_empty() {
                        removed_at_start |= kept.is_empty();
                        continue;
                    }
                    if removed_at_start && kept.is_empty() && is_delimiter_text(&stripped) {
                        continue;
                    }
                    kept.push(stripped);
                }
                Output::seq(kept)
            }
            Output::Formatted {
                formatting,
                quotes,
                display,
                child,
            } => child
                .without_citation_number()
                .formatted(*formatting, *quotes, *display),
            other => other.clone(),
        }
    }

    /// Visit text leaves in document order.
    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        match self {
            Output::Null => {}
            Output::Text(s) => f(s),
            Output::Seq(items) => items.iter_mut().for_each(|i| i.for_each_text_mut(f)),
            Output::Formatted { child, .. } | Output::Tagged { child, .. } => {
                child.for_each_text_mut(f)
            }
        }
    }

    pub fn strip_periods(&mut self) {
        self.for_each_text_mut(&mut |s| s.retain(|c| c != '.'));
    }

    /// Change the case of plain text. Spans that carry their own
    /// formatting keep their case.
    pub fn apply_text_case(&mut self, case: TextCase) {
        let mut at_start = true;
        self.case_plain_text(case, &mut at_start);
    }

    fn case_plain_text(&mut self, case: TextCase, at_start: &mut bool) {
        match self {
            Output::Null => {}
            Output::Text(s) => {
                let (cased, still_at_start) = text_case::apply(case, s, *at_start);
                *s = cased;
                *at_start = still_at_start;
            }
            Output::Seq(items) => items
                .iter_mut()
                .for_each(|item| item.case_plain_text(case, at_start)),
            Output::Formatted {
                formatting, child, ..
            } if !formatting.is_empty() => {
                if !child.is_empty() {
                    *at_start = false;
                }
            }
            Output::Formatted { child, .. } | Output::Tagged { child, .. } => {
                child.case_plain_text(case, at_start)
            }
        }
    }

    /// Collapse punctuation doubled at span boundaries (`..`, `,,`, `;;`,
    /// `::`, `!.`, `?.`) and doubled spaces.
    pub fn dedupe_punctuation(&mut self) {
        let mut previous: Option<char> = None;
        self.for_each_text_mut(&mut |s| {
            if let (Some(prev), Some(first)) = (previous, s.chars().next()) {
                let doubled = match first {
                    '.' => matches!(prev, '.' | '!' | '?'),
                    ',' | ';' | ':' | ' ' => prev == first,
                    _ => false,
                };
                if doubled {
                    s.remove(0);
                }
            }
            if let Some(last) = s.chars().next_back() {
                previous = Some(last);
            }
        });
    }

    /// Move a period or comma that directly follows a quoted span inside the
    /// closing quote.
    pub fn move_punctuation_into_quotes(&mut self) {
        // pass 1: leaf positions of every quoted span's end
        let mut leaves = Vec::new();
        let mut quote_ends = Vec::new();
        self.collect_quote_ends(&mut leaves, &mut quote_ends);

        // pass 2: decide which quote takes which leading character
        let mut moves: Vec<(usize, usize, char)> = Vec::new();
        for (quote_id, end) in quote_ends.iter().enumerate() {
            let Some(end) = *end else { continue };
            // nested quotes closing together: the outermost one takes it
            if moves.iter().any(|(q, _, _)| quote_ends[*q] == Some(end)) {
                continue;
            }
            let next = leaves
                .iter()
                .enumerate()
                .skip(end + 1)
                .find(|(_, text)| !text.is_empty());
            if let Some((leaf, text)) = next {
                if let Some(c @ ('.' | ',')) = text.chars().next() {
                    moves.push((quote_id, leaf, c));
                }
            }
        }
        if moves.is_empty() {
            return;
        }

        // pass 3: apply
        let mut leaf_index = 0;
        let mut quote_index = 0;
        self.apply_quote_moves(&moves, &mut leaf_index, &mut quote_index);
    }

    fn collect_quote_ends(&self, leaves: &mut Vec<String>, quote_ends: &mut Vec<Option<usize>>) {
        match self {
            Output::Null => {}
            Output::Text(s) => leaves.push(s.clone()),
            Output::Seq(items) => items
                .iter()
                .for_each(|i| i.collect_quote_ends(leaves, quote_ends)),
            Output::Formatted { quotes, child, .. } => {
                let slot = quote_ends.len();
                if *quotes {
                    quote_ends.push(None);
                }
                child.collect_quote_ends(leaves, quote_ends);
                if *quotes {
                    quote_ends[slot] = leaves.len().checked_sub(1);
                }
            }
            Output::Tagged { child, .. } => child.collect_quote_ends(leaves, quote_ends),
        }
    }

    fn apply_quote_moves(
        &mut self,
        moves: &[(usize, usize, char)],
        leaf_index: &mut usize,
        quote_index: &mut usize,
    ) {
        match self {
            Output::Null => {}
            Output::Text(s) => {
                if moves.iter().any(|(_, leaf, _)| leaf == leaf_index) {
                    s.remove(0);
                }
                *leaf_index += 1;
            }
            Output::Seq(items) => items
                .iter_mut()
                .for_each(|i| i.apply_quote_moves(moves, leaf_index, quote_index)),
            Output::Formatted { quotes, child, .. } => {
                let my_quote = if *quotes {
                    *quote_index += 1;
                    Some(*quote_index - 1)
                } else {
                    None
                };
                child.apply_quote_moves(moves, leaf_index, quote_index);
                if let Some(id) = my_quote {
                    if let Some((_, _, c)) = moves.iter().find(|(q, _, _)| *q == id) {
                        let inner = std::mem::take(child.as_mut());
                        **child = Output::seq(vec![inner, Output::Text(c.to_string())]);
                    }
                }
            }
            Output::Tagged { child, .. } => child.apply_quote_moves(moves, leaf_index, quote_index),
        }
    }

    /// Write the tree through an output format.
    pub fn render<F: OutputFormat>(&self, fmt: &F, quotes: &QuoteMarks) -> F::Output {
        self.render_at(fmt, quotes, 0)
    }

    fn render_at<F: OutputFormat>(&self, fmt: &F, marks: &QuoteMarks, depth: usize) -> F::Output {
        match self {
            Output::Null => fmt.text(""),
            Output::Text(s) => fmt.text(s),
            Output::Seq(items) => fmt.join(
                items
                    .iter()
                    .map(|i| i.render_at(fmt, marks, depth))
                    .collect(),
                "",
            ),
            Output::Tagged { child, .. } => child.render_at(fmt, marks, depth),
            Output::Formatted {
                formatting,
                quotes,
                display,
                child,
            } => {
                let inner_depth = if *quotes { depth + 1 } else { depth };
                let mut out = child.render_at(fmt, marks, inner_depth);
                if matches!(
                    formatting.font_style,
                    Some(FontStyle::Italic | FontStyle::Oblique)
                ) {
                    out = fmt.emph(out);
                }
                if formatting.font_weight == Some(FontWeight::Bold) {
                    out = fmt.strong(out);
                }
                if formatting.font_variant == Some(FontVariant::SmallCaps) {
                    out = fmt.small_caps(out);
                }
                if formatting.text_decoration == Some(TextDecoration::Underline) {
                    out = fmt.underline(out);
                }
                match formatting.vertical_align {
                    Some(VerticalAlign::Sup) => out = fmt.superscript(out),
                    Some(VerticalAlign::Sub) => out = fmt.subscript(out),
                    _ => {}
                }
                if *quotes {
                    let (open, close) = if depth % 2 == 0 {
                        &marks.outer
                    } else {
                        &marks.inner
                    };
                    out = fmt.quote(open, out, close);
                }
                if let Some(display) = display {
                    out = fmt.display(*display, out);
                }
                out
            }
        }
    }

    /// The cleanup passes run before output: duplicate punctuation from
    /// affixes, then quote punctuation.
    pub fn tidy(&mut self, marks: &QuoteMarks) {
        self.dedupe_punctuation();
        if marks.punctuation_in_quote {
            self.move_punctuation_into_quotes();
        }
    }

    /// Tidy the tree and write it out.
    pub fn finish<F: OutputFormat>(mut self, fmt: &F, marks: &QuoteMarks) -> String {
        self.tidy(marks);
        fmt.finish(self.render(fmt, marks))
    }
}

/// Apply an element's rendering attributes: text transforms first, then
/// formatting and quotes, then affixes, with `display` outermost.
pub fn decorate(mut output: Output, rendering: &Rendering) -> Output {
    if output.is_empty() {
        return output;
    }
    if rendering.strip_periods {
        output.strip_periods();
    }
    if let Some(case) = rendering.text_case {
        output.apply_text_case(case);
    }
    output
        .formatted(rendering.formatting, rendering.quotes, None)
        .with_affixes(rendering.prefix.as_deref(), rendering.suffix.as_deref())
        .formatted(Formatting::default(), false, rendering.display)
}

/// Punctuation and spacing left behind by a removed span.
fn is_delimiter_text(output: &Output) -> bool {
    match output {
        Output::Text(s) => s
            .chars()
            .all(|c| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':')),
        _ => false,
    }
}
