/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Output format trait for pluggable renderers.

use cslm_style::Display;

/// Trait for defining how rendered output is written in a specific format.
///
/// Implementations translate formatting instructions (emphasis, quotes,
/// display blocks) into markup or plain text. The interpreter never sees a
/// format: it builds an [`Output`](super::Output) tree which is written out
/// through this trait once per citation or bibliography entry.
pub trait OutputFormat: Default + Clone {
    /// The type used for intermediate rendered content.
    type Output;

    /// Convert a raw string into the format's output type, escaping as needed.
    fn text(&self, s: &str) -> Self::Output;

    /// Join multiple outputs into a single output using a delimiter.
    fn join(&self, items: Vec<Self::Output>, delimiter: &str) -> Self::Output;

    /// Convert the intermediate output into the final result string.
    fn finish(&self, output: Self::Output) -> String;

    /// Italic or oblique text.
    fn emph(&self, content: Self::Output) -> Self::Output;

    /// Bold text.
    fn strong(&self, content: Self::Output) -> Self::Output;

    fn small_caps(&self, content: Self::Output) -> Self::Output;

    fn underline(&self, content: Self::Output) -> Self::Output;

    fn superscript(&self, content: Self::Output) -> Self::Output;

    fn subscript(&self, content: Self::Output) -> Self::Output;

    /// Enclose content in the given quotation marks.
    fn quote(&self, open: &str, content: Self::Output, close: &str) -> Self::Output;

    /// Wrap content in a CSL-M `display` block.
    fn display(&self, display: Display, content: Self::Output) -> Self::Output;

    /// Wrap one bibliography entry.
    fn entry(&self, id: &str, content: Self::Output) -> Self::Output;

    /// Wrap the complete list of bibliography entries.
    fn bibliography(&self, entries: Vec<Self::Output>) -> Self::Output;
}
