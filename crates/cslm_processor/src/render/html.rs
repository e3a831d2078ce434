/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! HTML output format.

use super::format::OutputFormat;
use cslm_style::Display;

#[derive(Debug, Default, Clone)]
pub struct Html;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn wrap(open: &str, content: String, close: &str) -> String {
    if content.is_empty() {
        return content;
    }
    format!("{open}{content}{close}")
}

impl OutputFormat for Html {
    type Output = String;

    fn text(&self, s: &str) -> Self::Output {
        escape(s)
    }

    fn join(&self, items: Vec<Self::Output>, delimiter: &str) -> Self::Output {
        items.join(&escape(delimiter))
    }

    fn finish(&self, output: Self::Output) -> String {
        output
    }

    fn emph(&self, content: Self::Output) -> Self::Output {
        wrap("<i>", content, "</i>")
    }

    fn strong(&self, content: Self::Output) -> Self::Output {
        wrap("<b>", content, "</b>")
    }

    fn small_caps(&self, content: Self::Output) -> Self::Output {
        wrap(
            r#"<span style="font-variant:small-caps;">"#,
            content,
            "</span>",
        )
    }

    fn underline(&self, content: Self::Output) -> Self::Output {
        wrap(
            r#"<span style="text-decoration:underline;">"#,
            content,
            "</span>",
        )
    }

    fn superscript(&self, content: Self::Output) -> Self::Output {
        wrap("<sup>", content, "</sup>")
    }

    fn subscript(&self, content: Self::Output) -> Self::Output {
        wrap("<sub>", content, "</sub>")
    }

    fn quote(&self, open: &str, content: Self::Output, close: &str) -> Self::Output {
        wrap(&escape(open), content, &escape(close))
    }

    fn display(&self, display: Display, content: Self::Output) -> Self::Output {
        let class = match display {
            Display::Block => "csl-block",
            Display::LeftMargin => "csl-left-margin",
            Display::RightInline => "csl-right-inline",
            Display::Indent => "csl-indent",
        };
        wrap(&format!(r#"<div class="{class}">"#), content, "</div>")
    }

    fn entry(&self, id: &str, content: Self::Output) -> Self::Output {
        format!(
            r#"<div class="csl-entry" id="ref-{}">{}</div>"#,
            escape(id),
            content
        )
    }

    fn bibliography(&self, entries: Vec<Self::Output>) -> Self::Output {
        format!(
            "<div class=\"csl-bib-body\">\n{}\n</div>",
            entries.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping() {
        assert_eq!(Html.text("Smith & Wesson <Ltd>"), "Smith &amp; Wesson &lt;Ltd&gt;");
    }

    #[test]
    fn test_empty_content_is_not_wrapped() {
        assert_eq!(Html.emph(String::new()), "");
        assert_eq!(Html.strong("x".to_string()), "<b>x</b>");
    }

    #[test]
    fn test_display_classes() {
        assert_eq!(
            Html.display(Display::LeftMargin, "[1]".to_string()),
            r#"<div class="csl-left-margin">[1]</div>"#
        );
    }
}
