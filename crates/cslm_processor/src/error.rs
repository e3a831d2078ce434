/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use cslm_core::{EntryError, LocaleError};
use cslm_style::StyleError;
use thiserror::Error;

/// Errors surfaced by the processor session.
///
/// Rendering itself never fails: missing data renders as nothing. These
/// cover loading inputs and direct lookups of single entries.
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("style error: {0}")]
    Style(#[from] StyleError),

    #[error("locale error: {0}")]
    Locale(#[from] LocaleError),

    #[error("entry data error: {0}")]
    Entry(#[from] EntryError),

    #[error("invalid processor options: {0}")]
    Options(String),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("style has no bibliography")]
    NoBibliography,
}

impl From<serde_json::Error> for ProcessorError {
    fn from(err: serde_json::Error) -> Self {
        ProcessorError::Options(err.to_string())
    }
}

impl From<serde_yaml::Error> for ProcessorError {
    fn from(err: serde_yaml::Error) -> Self {
        ProcessorError::Options(err.to_string())
    }
}
