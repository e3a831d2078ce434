/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! CSL-M Processor
//!
//! Renders citations and bibliographies for CSL 1.0.2 and CSL-M styles. A
//! [`Processor`] takes a parsed style and a normalized bibliography,
//! registers a document's citations, runs disambiguation over the cited set
//! and renders the results through an [`OutputFormat`].
//!
//! # Example
//!
//! ```rust
//! use cslm_processor::{CitationOccurrence, Entry, Name, Processor};
//!
//! let style = cslm_style::parse_style(r#"
//! <style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
//!   <citation>
//!     <layout prefix="(" suffix=")" delimiter="; ">
//!       <group delimiter=" ">
//!         <names variable="author"><name form="short"/></names>
//!         <date variable="issued"><date-part name="year"/></date>
//!       </group>
//!     </layout>
//!   </citation>
//! </style>"#).unwrap();
//!
//! let mut bibliography = cslm_processor::Bibliography::new();
//! bibliography.insert(
//!     "kuhn1962".to_string(),
//!     Entry::new("kuhn1962", "book")
//!         .with_names("author", vec![Name::new("Kuhn", "Thomas")])
//!         .with_field("issued", "1962"),
//! );
//!
//! let mut processor = Processor::new(style, bibliography);
//! processor.register_citations(vec![CitationOccurrence::simple("kuhn1962")]);
//! assert_eq!(processor.process_citations(), vec!["(Kuhn 1962)"]);
//! ```

pub mod error;
pub mod processor;
pub mod render;
pub mod values;

pub use error::ProcessorError;
pub use processor::disambiguation::Convergence;
pub use processor::{BibliographyEntry, Processor, ProcessorOptions};
pub use render::{Html, Output, OutputFormat, PlainText};
pub use values::DisambiguationState;

pub use cslm_core::{
    Bibliography, CitationItem, CitationOccurrence, CiteForm, Entry, Locale, Name, Position,
};
