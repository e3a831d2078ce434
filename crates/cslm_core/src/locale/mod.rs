/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Locale term tables.
//!
//! Locales provide language-specific terms, date formats and punctuation
//! rules. A [`Locale`] may be partial (a style-embedded override or an
//! external file); [`LocaleResolver`] layers partial tables over the
//! built-in en-US table.

mod en_us;
pub mod resolver;

use std::collections::HashMap;

use cslm_style::{Date, DateForm, TermForm};
use serde::{Deserialize, Serialize};

use crate::error::LocaleError;
pub use resolver::LocaleResolver;

/// A term value: one string, or distinct singular and plural strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TermValue {
    Simple(String),
    Plural { single: String, multiple: String },
}

impl TermValue {
    pub fn get(&self, plural: bool) -> &str {
        match self {
            TermValue::Simple(s) => s,
            TermValue::Plural { single, multiple } => {
                if plural {
                    multiple
                } else {
                    single
                }
            }
        }
    }
}

/// All forms of one term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TermForms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<TermValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<TermValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<TermValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb_short: Option<TermValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<TermValue>,
}

impl TermForms {
    fn slot(&self, form: TermForm) -> Option<&TermValue> {
        match form {
            TermForm::Long => self.long.as_ref(),
            TermForm::Short => self.short.as_ref(),
            TermForm::Verb => self.verb.as_ref(),
            TermForm::VerbShort => self.verb_short.as_ref(),
            TermForm::Symbol => self.symbol.as_ref(),
        }
    }

    fn slot_mut(&mut self, form: TermForm) -> &mut Option<TermValue> {
        match form {
            TermForm::Long => &mut self.long,
            TermForm::Short => &mut self.short,
            TermForm::Verb => &mut self.verb,
            TermForm::VerbShort => &mut self.verb_short,
            TermForm::Symbol => &mut self.symbol,
        }
    }

    fn overlay(&mut self, other: &TermForms) {
        for form in ALL_FORMS {
            if let Some(value) = other.slot(form) {
                *self.slot_mut(form) = Some(value.clone());
            }
        }
    }
}

const ALL_FORMS: [TermForm; 5] = [
    TermForm::Long,
    TermForm::Short,
    TermForm::Verb,
    TermForm::VerbShort,
    TermForm::Symbol,
];

/// Localized date formats (`<date form="text">`, `<date form="numeric">`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateFormats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<Date>,
}

impl DateFormats {
    pub fn get(&self, form: DateForm) -> Option<&Date> {
        match form {
            DateForm::Text => self.text.as_ref(),
            DateForm::Numeric => self.numeric.as_ref(),
        }
    }
}

/// A locale definition containing language-specific terms and formatting rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Locale {
    /// Language tag (`en-US`, `de`); empty for a language-neutral override.
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub terms: HashMap<String, TermForms>,
    #[serde(default)]
    pub date_formats: DateFormats,
    /// Whether periods and commas move inside closing quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punctuation_in_quote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_day_ordinals_to_day_1: Option<bool>,
}

impl Locale {
    /// The built-in English (US) locale.
    pub fn en_us() -> Self {
        en_us::en_us()
    }

    /// Load a locale from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LocaleError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a locale from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LocaleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a CSL locale XML file.
    pub fn from_xml(xml: &str) -> Result<Self, LocaleError> {
        let model = cslm_style::parse_locale(xml)?;
        Ok(Self::from_model(&model))
    }

    /// Convert a parsed `<locale>` element (standalone or style-embedded).
    pub fn from_model(model: &cslm_style::Locale) -> Self {
        let mut locale = Locale {
            lang: model.lang.clone().unwrap_or_default(),
            punctuation_in_quote: model.punctuation_in_quote,
            limit_day_ordinals_to_day_1: model.limit_day_ordinals_to_day_1,
            ..Default::default()
        };
        for term in &model.terms {
            let value = match &term.multiple {
                Some(multiple) => TermValue::Plural {
                    single: term.single.clone(),
                    multiple: multiple.clone(),
                },
                None => TermValue::Simple(term.single.clone()),
            };
            locale.set_term(&term.name, term.form, value);
        }
        for date in &model.date_formats {
            match date.form {
                Some(DateForm::Text) => locale.date_formats.text = Some(date.clone()),
                Some(DateForm::Numeric) => locale.date_formats.numeric = Some(date.clone()),
                None => tracing::trace!("ignoring locale date format without form"),
            }
        }
        locale
    }

    pub fn set_term(&mut self, name: &str, form: TermForm, value: TermValue) {
        *self
            .terms
            .entry(name.to_string())
            .or_default()
            .slot_mut(form) = Some(value);
    }

    /// Overlay `other` on this locale; anything `other` defines wins.
    pub fn merge(&mut self, other: &Locale) {
        for (name, forms) in &other.terms {
            self.terms.entry(name.clone()).or_default().overlay(forms);
        }
        if other.date_formats.text.is_some() {
            self.date_formats.text = other.date_formats.text.clone();
        }
        if other.date_formats.numeric.is_some() {
            self.date_formats.numeric = other.date_formats.numeric.clone();
        }
        if other.punctuation_in_quote.is_some() {
            self.punctuation_in_quote = other.punctuation_in_quote;
        }
        if other.limit_day_ordinals_to_day_1.is_some() {
            self.limit_day_ordinals_to_day_1 = other.limit_day_ordinals_to_day_1;
        }
    }

    /// Look up a term, falling back through related forms.
    ///
    /// `verb-short` falls back to `verb` then `long`; `symbol` to `short`
    /// then `long`; `short` and `verb` to `long`.
    pub fn term(&self, name: &str, form: TermForm, plural: bool) -> Option<&str> {
        let forms = self.terms.get(name)?;
        let chain: &[TermForm] = match form {
            TermForm::Long => &[TermForm::Long],
            TermForm::Short => &[TermForm::Short, TermForm::Long],
            TermForm::Verb => &[TermForm::Verb, TermForm::Long],
            TermForm::VerbShort => &[TermForm::VerbShort, TermForm::Verb, TermForm::Long],
            TermForm::Symbol => &[TermForm::Symbol, TermForm::Short, TermForm::Long],
        };
        chain
            .iter()
            .find_map(|f| forms.slot(*f))
            .map(|value| value.get(plural))
    }

    /// Get the "and" term based on style preference.
    pub fn and_term(&self, use_symbol: bool) -> &str {
        if use_symbol {
            self.term("and", TermForm::Symbol, false).unwrap_or("&")
        } else {
            self.term("and", TermForm::Long, false).unwrap_or("and")
        }
    }

    pub fn punctuation_in_quote(&self) -> bool {
        self.punctuation_in_quote.unwrap_or(false)
    }

    pub fn limit_day_ordinals_to_day_1(&self) -> bool {
        self.limit_day_ordinals_to_day_1.unwrap_or(false)
    }

    /// Opening and closing quote marks, outer or inner.
    pub fn quotes(&self, inner: bool) -> (&str, &str) {
        if inner {
            (
                self.term("open-inner-quote", TermForm::Long, false)
                    .unwrap_or("\u{2018}"),
                self.term("close-inner-quote", TermForm::Long, false)
                    .unwrap_or("\u{2019}"),
            )
        } else {
            (
                self.term("open-quote", TermForm::Long, false)
                    .unwrap_or("\u{201c}"),
                self.term("close-quote", TermForm::Long, false)
                    .unwrap_or("\u{201d}"),
            )
        }
    }

    /// Month name (1–12) or season name (13–16 and 21–24).
    pub fn month_name(&self, month: u32, short: bool) -> Option<&str> {
        let form = if short {
            TermForm::Short
        } else {
            TermForm::Long
        };
        match month {
            1..=12 => self.term(&format!("month-{month:02}"), form, false),
            13..=16 => self.term(&format!("season-{:02}", month - 12), TermForm::Long, false),
            21..=24 => self.term(&format!("season-{:02}", month - 20), TermForm::Long, false),
            _ => None,
        }
    }

    /// Ordinal suffix for a number ("st", "nd", "th").
    ///
    /// Two-digit terms (`ordinal-11`) match the last two digits, one-digit
    /// terms (`ordinal-01`) the last digit; `ordinal` is the fallback.
    pub fn ordinal_suffix(&self, number: i64) -> &str {
        let n = number.unsigned_abs();
        let last_two = n % 100;
        if last_two >= 10 {
            if let Some(term) = self.term(&format!("ordinal-{last_two:02}"), TermForm::Long, false)
            {
                return term;
            }
        }
        self.term(&format!("ordinal-{:02}", n % 10), TermForm::Long, false)
            .or_else(|| self.term("ordinal", TermForm::Long, false))
            .unwrap_or_default()
    }

    /// Number with its ordinal suffix ("21st").
    pub fn ordinal(&self, number: i64) -> String {
        format!("{number}{}", self.ordinal_suffix(number))
    }

    /// Spelled-out ordinal for 1–10 ("first"); other numbers fall back to
    /// [`Locale::ordinal`].
    pub fn long_ordinal(&self, number: i64) -> String {
        if (1..=10).contains(&number) {
            if let Some(term) =
                self.term(&format!("long-ordinal-{number:02}"), TermForm::Long, false)
            {
                return term.to_string();
            }
        }
        self.ordinal(number)
    }
}
