/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Input data for the CSL-M processor: normalized bibliography entries,
//! citation occurrences and locale term tables.

pub mod citation;
pub mod entry;
pub mod error;
pub mod locale;

pub use citation::{CitationItem, CitationOccurrence, CiteForm, Position};
pub use entry::{canonical_type, Bibliography, Entry, Name};
pub use error::{EntryError, LocaleError};
pub use locale::{Locale, LocaleResolver};
