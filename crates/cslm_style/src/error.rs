/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use thiserror::Error;

/// Errors raised while loading a style or locale file.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected root element <{expected}>, found <{found}>")]
    UnknownRoot { expected: &'static str, found: String },

    #[error("style has no <{0}> section")]
    MissingSection(&'static str),

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("<{element}> has invalid value `{value}` for `{attribute}`")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("unknown element <{element}> inside <{parent}>")]
    UnknownElement { parent: String, element: String },
}

pub type Result<T> = std::result::Result<T, StyleError>;
