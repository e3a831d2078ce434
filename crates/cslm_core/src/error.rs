/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use thiserror::Error;

/// Errors raised while loading locale tables.
#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("failed to parse locale YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse locale JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse locale XML: {0}")]
    Xml(#[from] cslm_style::StyleError),
}

/// Errors raised while adapting input records into entries.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("invalid entry JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("entry has no `id`")]
    MissingId,
}
