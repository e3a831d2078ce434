/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! CSL 1.0.2 and CSL-M style model.
//!
//! [`parse_style`] turns style XML into an immutable [`Style`] tree that the
//! processor walks; [`parse_locale`] does the same for standalone locale
//! files.

pub mod error;
pub mod model;
pub mod parser;

pub use error::StyleError;
pub use model::*;
pub use parser::{parse_locale, parse_style};
