/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Layered locale resolution.

use std::collections::HashMap;

use cslm_style::primary_subtag;

use super::Locale;

/// Merges built-in, external and style-embedded locale tables.
///
/// Layers apply lowest priority first: built-in en-US, external locales for
/// the base language, external locales for the exact tag, style locales
/// without a language, style locales for the base language, then style
/// locales for the exact tag. A base-language match is any tag sharing the
/// primary subtag, so `en` matches `en-US` and `en-US` matches `en`.
#[derive(Debug, Default, Clone)]
pub struct LocaleResolver {
    external: Vec<Locale>,
    style: Vec<Locale>,
    cache: HashMap<String, Locale>,
}

impl LocaleResolver {
    /// Build a resolver over a style's embedded `<locale>` blocks.
    pub fn new(style_locales: &[cslm_style::Locale]) -> Self {
        Self {
            external: Vec::new(),
            style: style_locales.iter().map(Locale::from_model).collect(),
            cache: HashMap::new(),
        }
    }

    /// Register an externally supplied locale table.
    pub fn add_external(&mut self, locale: Locale) {
        self.cache.clear();
        self.external.push(locale);
    }

    pub fn with_external(mut self, locale: Locale) -> Self {
        self.add_external(locale);
        self
    }

    /// The merged locale for a language tag, cached per tag.
    pub fn resolve(&mut self, lang: &str) -> &Locale {
        let external = &self.external;
        let style = &self.style;
        self.cache
            .entry(lang.to_string())
            .or_insert_with(|| merge_layers(lang, external, style))
    }
}

fn merge_layers(lang: &str, external: &[Locale], style: &[Locale]) -> Locale {
    let primary = primary_subtag(lang);
    let mut locale = Locale::en_us();
    locale.lang = lang.to_string();
    // en-US quoting conventions do not carry over to other languages
    if primary != "en" || lang == "en-GB" {
        locale.punctuation_in_quote = Some(false);
    }

    let is_base = |l: &Locale| {
        !l.lang.is_empty() && l.lang != lang && primary_subtag(&l.lang) == primary
    };
    let is_exact = |l: &Locale| l.lang == lang;

    let mut layers = 0;
    for candidate in external.iter().filter(|&l| is_base(l)) {
        locale.merge(candidate);
        layers += 1;
    }
    for candidate in external.iter().filter(|&l| is_exact(l)) {
        locale.merge(candidate);
        layers += 1;
    }
    for candidate in style.iter().filter(|l| l.lang.is_empty()) {
        locale.merge(candidate);
        layers += 1;
    }
    for candidate in style.iter().filter(|&l| is_base(l)) {
        locale.merge(candidate);
        layers += 1;
    }
    for candidate in style.iter().filter(|&l| is_exact(l)) {
        locale.merge(candidate);
        layers += 1;
    }
    tracing::debug!(lang, layers, "resolved locale");
    locale
}
