/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation input model.
//!
//! A [`CitationOccurrence`] is one placed citation in a document, as reported
//! by the document scanner. Occurrences are consumed read-only; positions the
//! scanner leaves out are derived by the processor session.

use serde::{Deserialize, Serialize};

/// How a cite renders its author part.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CiteForm {
    /// Author and the rest of the cite (default).
    #[default]
    Normal,
    /// Drop the first rendered names: "(2020)".
    SuppressAuthor,
    /// Render only the first rendered names: "Smith".
    AuthorOnly,
}

/// Position class of a cite relative to earlier cites of the same entry.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    First,
    Subsequent,
    Ibid,
    IbidWithLocator,
}

/// One placed citation, possibly citing several entries.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CitationOccurrence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub items: Vec<CitationItem>,
    /// Footnote number for note styles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_number: Option<u32>,
}

impl CitationOccurrence {
    /// A citation of a single entry.
    pub fn simple(id: &str) -> Self {
        Self {
            items: vec![CitationItem::new(id)],
            ..Default::default()
        }
    }

    /// A citation of several entries, in the given order.
    pub fn of(ids: &[&str]) -> Self {
        Self {
            items: ids.iter().map(|id| CitationItem::new(id)).collect(),
            ..Default::default()
        }
    }

    pub fn with_note(mut self, note_number: u32) -> Self {
        self.note_number = Some(note_number);
        self
    }
}

/// A single cited entry within an occurrence.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct CitationItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    /// Locator type as a CSL locator term name (`page`, `chapter`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default)]
    pub form: CiteForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl CitationItem {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Attach a locator; the label defaults to `page`.
    pub fn with_locator(mut self, locator: &str, label: Option<&str>) -> Self {
        self.locator = Some(locator.to_string());
        self.label = Some(label.unwrap_or("page").to_string());
        self
    }

    pub fn with_form(mut self, form: CiteForm) -> Self {
        self.form = form;
        self
    }

    /// The locator label, defaulting to `page` when a locator is present.
    pub fn locator_label(&self) -> Option<&str> {
        self.locator
            .as_ref()
            .map(|_| self.label.as_deref().unwrap_or("page"))
    }
}
