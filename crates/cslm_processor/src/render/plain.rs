/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Plain text output format.
//!
//! Font formatting and display blocks have no plain-text representation and
//! are dropped; quotation marks are kept since they are part of the text.

use super::format::OutputFormat;
use cslm_style::Display;

#[derive(Debug, Default, Clone)]
pub struct PlainText;

impl OutputFormat for PlainText {
    type Output = String;

    fn text(&self, s: &str) -> Self::Output {
        s.to_string()
    }

    fn join(&self, items: Vec<Self::Output>, delimiter: &str) -> Self::Output {
        items.join(delimiter)
    }

    fn finish(&self, output: Self::Output) -> String {
        output
    }

    fn emph(&self, content: Self::Output) -> Self::Output {
        content
    }

    fn strong(&self, content: Self::Output) -> Self::Output {
        content
    }

    fn small_caps(&self, content: Self::Output) -> Self::Output {
        content
    }

    fn underline(&self, content: Self::Output) -> Self::Output {
        content
    }

    fn superscript(&self, content: Self::Output) -> Self::Output {
        content
    }

    fn subscript(&self, content: Self::Output) -> Self::Output {
        content
    }

    fn quote(&self, open: &str, content: Self::Output, close: &str) -> Self::Output {
        if content.is_empty() {
            return content;
        }
        format!("{open}{content}{close}")
    }

    fn display(&self, _display: Display, content: Self::Output) -> Self::Output {
        content
    }

    fn entry(&self, _id: &str, content: Self::Output) -> Self::Output {
        content
    }

    fn bibliography(&self, entries: Vec<Self::Output>) -> Self::Output {
        entries.join("\n")
    }
}
