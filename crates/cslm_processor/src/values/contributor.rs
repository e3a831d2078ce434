/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Name list formatting.
//!
//! [`NameFormatter`] renders one name variable: suppression, et-al
//! truncation, per-name layout (initials, sort order, particles, suffixes),
//! joining with the "and" term, and CSL-M institutional grouping.

use cslm_core::{Locale, Name};
use cslm_style::{
    And, DelimiterPrecedes, DemoteParticle, EtAl, GivenNameRule, Institution, NameAsSortOrder,
    NameForm, NameOptions, NamePartName, TermForm,
};

use crate::render::{decorate, Output};

const DEFAULT_ET_AL_MIN: usize = 4;
const DEFAULT_ET_AL_USE_FIRST: usize = 3;

/// Disambiguation inputs for one name list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameExpansion {
    /// 0 = as styled, 1 = initials, 2 = full given names.
    pub givenname_level: u8,
    /// Extra names shown beyond `et-al-use-first`.
    pub names_expanded: u8,
    pub rule: GivenNameRule,
    /// Only the first `<names>` element of a cite takes expansion.
    pub active: bool,
}

/// Renders name lists for one `<names>` element.
pub struct NameFormatter<'a> {
    pub locale: &'a Locale,
    /// Options merged from style, citation/bibliography, `<names>` and `<name>`.
    pub options: NameOptions,
    pub name: Option<&'a cslm_style::Name>,
    pub et_al: Option<&'a EtAl>,
    pub institution: Option<&'a Institution>,
    pub demote: DemoteParticle,
    pub initialize_with_hyphen: bool,
    /// Position is not `first`: `et-al-subsequent-*` apply.
    pub subsequent: bool,
    /// Rendering a sort key: all names inverted, no "and" or "et al.".
    pub sort_mode: bool,
    pub expansion: NameExpansion,
}

impl<'a> NameFormatter<'a> {
    fn form(&self) -> NameForm {
        self.options.form.unwrap_or(NameForm::Long)
    }

    fn delimiter(&self) -> &str {
        self.options.delimiter.as_deref().unwrap_or(", ")
    }

    /// `(et-al-min, et-al-use-first)` for this position.
    pub fn et_al_limits(&self) -> (usize, usize) {
        let min = self.options.et_al_min.unwrap_or(DEFAULT_ET_AL_MIN);
        let use_first = self.options.et_al_use_first.unwrap_or(DEFAULT_ET_AL_USE_FIRST);
        if self.subsequent {
            (
                self.options.et_al_subsequent_min.unwrap_or(min),
                self.options.et_al_subsequent_use_first.unwrap_or(use_first),
            )
        } else {
            (min, use_first)
        }
    }

    /// Number of names shown for a list of `total` names.
    pub fn shown_count(&self, total: usize) -> usize {
        let (min, use_first) = self.et_al_limits();
        if total >= min && use_first < total {
            let expanded = if self.expansion.active {
                usize::from(self.expansion.names_expanded)
            } else {
                0
            };
            (use_first + expanded).min(total)
        } else {
            total
        }
    }

    /// Format a name list.
    pub fn format(&self, names: &[Name]) -> Output {
        let mut names: Vec<&Name> = names.iter().collect();
        if let Some(element) = self.name {
            match element.suppress_min {
                Some(0) => names.retain(|n| n.is_institution()),
                Some(min) if names.len() >= min => return Output::Null,
                _ => {}
            }
            if let Some(max) = element.suppress_max {
                if names.len() <= max {
                    return if self.form() == NameForm::Count {
                        Output::text(self.shown_count(names.len()).to_string())
                    } else {
                        Output::Null
                    };
                }
            }
        }
        if names.is_empty() {
            return Output::Null;
        }
        if self.form() == NameForm::Count {
            return Output::text(self.shown_count(names.len()).to_string());
        }

        let list = match self.institution {
            Some(institution) if names.iter().any(|n| n.is_institution()) => {
                self.institution_list(&names, institution)
            }
            _ => self.person_list(&names),
        };
        match self.name {
            Some(element) => decorate(list, &element.rendering),
            None => list,
        }
    }

    fn person_list(&self, names: &[&Name]) -> Output {
        let total = names.len();
        let shown = self.shown_count(total);
        if shown == 0 {
            return Output::Null;
        }
        let rendered: Vec<Output> = names[..shown]
            .iter()
            .enumerate()
            .map(|(i, n)| self.render_name(n, i))
            .collect();
        if shown == total {
            let inverted: Vec<bool> = (0..total).map(|i| self.is_inverted(i)).collect();
            return self.join_with_and(rendered, &inverted);
        }

        let delimiter = self.delimiter().to_string();
        let head = Output::join(rendered, &delimiter);
        if self.sort_mode {
            return head;
        }
        let use_last = self.options.et_al_use_last.unwrap_or(false);
        if use_last && total - shown >= 2 {
            let last = self.render_name(names[total - 1], total - 1);
            return Output::seq(vec![
                head,
                Output::text(format!("{delimiter}\u{2026} ")),
                last,
            ]);
        }
        let term_name = self.et_al.map_or("et-al", |e| e.term.as_str());
        let Some(term) = self
            .locale
            .term(term_name, TermForm::Long, false)
            .filter(|t| !t.is_empty())
        else {
            return head;
        };
        let precedes = match self
            .options
            .delimiter_precedes_et_al
            .unwrap_or(DelimiterPrecedes::Contextual)
        {
            DelimiterPrecedes::Contextual => shown >= 2,
            DelimiterPrecedes::AfterInvertedName => self.is_inverted(shown - 1),
            DelimiterPrecedes::Always => true,
            DelimiterPrecedes::Never => false,
        };
        let separator = if precedes { delimiter } else { " ".to_string() };
        let mut et_al = Output::text(term);
        if let Some(element) = self.et_al {
            et_al = decorate(et_al, &element.rendering);
        }
        Output::seq(vec![head, Output::text(separator), et_al])
    }

    fn join_with_and(&self, mut rendered: Vec<Output>, inverted: &[bool]) -> Output {
        let delimiter = self.delimiter().to_string();
        let count = rendered.len();
        let and = match (self.options.and, self.sort_mode) {
            (Some(And::Text), false) => Some(self.locale.and_term(false)),
            (Some(And::Symbol), false) => Some(self.locale.and_term(true)),
            _ => None,
        };
        let Some(and) = and.filter(|_| count >= 2) else {
            return Output::join(rendered, &delimiter);
        };
        let precedes = match self
            .options
            .delimiter_precedes_last
            .unwrap_or(DelimiterPrecedes::Contextual)
        {
            DelimiterPrecedes::Contextual => count >= 3,
            DelimiterPrecedes::AfterInvertedName => inverted.get(count - 2).copied().unwrap_or(false),
            DelimiterPrecedes::Always => true,
            DelimiterPrecedes::Never => false,
        };
        let separator = if precedes {
            format!("{delimiter}{and} ")
        } else {
            format!(" {and} ")
        };
        let last = rendered.pop().unwrap_or_default();
        Output::seq(vec![
            Output::join(rendered, &delimiter),
            Output::text(separator),
            last,
        ])
    }

    fn is_inverted(&self, index: usize) -> bool {
        self.sort_mode
            || match self.options.name_as_sort_order {
                Some(NameAsSortOrder::All) => true,
                Some(NameAsSortOrder::First) => index == 0,
                None => false,
            }
    }

    /// Given-name expansion level applying to the name at `index`.
    fn givenname_level(&self, index: usize) -> u8 {
        if !self.expansion.active {
            return 0;
        }
        let rule = self.expansion.rule;
        let applies = match rule {
            GivenNameRule::PrimaryName | GivenNameRule::PrimaryNameWithInitials => index == 0,
            _ => true,
        };
        if !applies {
            return 0;
        }
        let cap = match rule {
            GivenNameRule::AllNamesWithInitials | GivenNameRule::PrimaryNameWithInitials => 1,
            _ => 2,
        };
        self.expansion.givenname_level.min(cap)
    }

    /// Render one name in the list.
    pub fn render_name(&self, name: &Name, index: usize) -> Output {
        if name.is_institution() {
            let literal = name.family_or_literal();
            let text = literal
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            return self.part(NamePartName::Family, Output::text(text));
        }

        let family = name.family.as_deref().unwrap_or_default();
        let particle = name.prefix.as_deref().unwrap_or_default();
        let suffix = name.suffix.as_deref().unwrap_or_default();
        let level = self.givenname_level(index);
        let with_initials = matches!(
            self.expansion.rule,
            GivenNameRule::AllNamesWithInitials | GivenNameRule::PrimaryNameWithInitials
        );

        let (form, initialize_with) = match (self.form(), level) {
            (NameForm::Short, 0) => (NameForm::Short, None),
            (NameForm::Short, _) if with_initials => (
                NameForm::Long,
                Some(self.options.initialize_with.clone().unwrap_or_else(|| ".".to_string())),
            ),
            (NameForm::Short, 1) => (NameForm::Long, self.options.initialize_with.clone()),
            (_, 2) => (NameForm::Long, None),
            (form, _) => (form, self.options.initialize_with.clone()),
        };

        let family_with_particle = join_words(&[particle, family]);
        if form == NameForm::Short {
            return self.part(NamePartName::Family, Output::text(family_with_particle));
        }

        let given = name.given.as_deref().unwrap_or_default();
        let given = match initialize_with {
            Some(with) if self.options.initialize != Some(false) => {
                initialize(given, &with, self.initialize_with_hyphen)
            }
            _ => given.to_string(),
        };

        if self.is_inverted(index) {
            let demote = match self.demote {
                DemoteParticle::DisplayAndSort => true,
                DemoteParticle::SortOnly => self.sort_mode,
                DemoteParticle::Never => false,
            };
            let (family_text, trailing_particle) = if demote {
                (family.to_string(), particle)
            } else {
                (family_with_particle, "")
            };
            let family_out = self.part(NamePartName::Family, Output::text(family_text));
            let given_out = self.part(NamePartName::Given, Output::text(given));
            let rest = Output::join(
                vec![given_out, Output::text(trailing_particle), Output::text(suffix)],
                " ",
            );
            let separator = self.options.sort_separator.as_deref().unwrap_or(", ");
            Output::join(vec![family_out, rest], separator)
        } else {
            Output::join(
                vec![
                    self.part(NamePartName::Given, Output::text(given)),
                    self.part(NamePartName::Family, Output::text(family_with_particle)),
                    Output::text(suffix),
                ],
                " ",
            )
        }
    }

    /// Apply `<name-part>` formatting.
    fn part(&self, which: NamePartName, value: Output) -> Output {
        match self.name.and_then(|n| n.part(which)) {
            Some(part) => decorate(value, &part.rendering),
            None => value,
        }
    }

    /// CSL-M institutional grouping: personal names attach to the
    /// institution that follows them; trailing personal names are
    /// unaffiliated and join the groups with the "with" term.
    fn institution_list(&self, names: &[&Name], institution: &Institution) -> Output {
        let mut groups: Vec<(Vec<&Name>, &Name)> = Vec::new();
        let mut pending: Vec<&Name> = Vec::new();
        for name in names {
            if name.is_institution() {
                groups.push((std::mem::take(&mut pending), name));
            } else {
                pending.push(name);
            }
        }

        let rendered: Vec<Output> = groups
            .iter()
            .map(|(persons, org)| {
                let org = self.render_institution(org, institution);
                if persons.is_empty() {
                    org
                } else {
                    Output::join(vec![self.person_list(persons), org], ", ")
                }
            })
            .collect();
        let inverted = vec![false; rendered.len()];
        let joiner = NameFormatter {
            locale: self.locale,
            options: NameOptions {
                and: institution.and,
                ..self.options.clone()
            },
            name: None,
            et_al: None,
            institution: None,
            demote: self.demote,
            initialize_with_hyphen: self.initialize_with_hyphen,
            subsequent: self.subsequent,
            sort_mode: self.sort_mode,
            expansion: NameExpansion::default(),
        };
        let affiliated = joiner.join_with_and(rendered, &inverted);
        if pending.is_empty() {
            return affiliated;
        }
        let with = self
            .locale
            .term("with", TermForm::Long, false)
            .unwrap_or("with");
        Output::seq(vec![
            self.person_list(&pending),
            Output::text(format!(" {with} ")),
            affiliated,
        ])
    }

    /// Render `|`-delimited subunits, reversed and truncated as configured.
    fn render_institution(&self, name: &Name, institution: &Institution) -> Output {
        let mut units: Vec<&str> = name
            .family_or_literal()
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if institution.reverse_order {
            units.reverse();
        }
        if institution.use_first.is_some() || institution.use_last.is_some() {
            let first = institution.use_first.unwrap_or(0);
            let last = institution.use_last.unwrap_or(0);
            if first + last < units.len() {
                let tail = units.split_off(units.len() - last);
                units.truncate(first);
                units.extend(tail);
            }
        }
        let delimiter = institution.delimiter.as_deref().unwrap_or(", ");
        decorate(Output::text(units.join(delimiter)), &institution.rendering)
    }
}

/// Initials from a given name: `"Jean-Pierre Marie"` with `". "` becomes
/// `"J.-P. M."` (hyphen kept when `hyphen` is set).
pub fn initialize(given: &str, with: &str, hyphen: bool) -> String {
    let mark = with.trim_end();
    let spaced = with.ends_with(char::is_whitespace);
    let initial = |part: &str| {
        part.chars()
            .next()
            .map(|c| format!("{}{}", c.to_uppercase(), mark))
            .unwrap_or_default()
    };
    let tokens: Vec<String> = given
        .split_whitespace()
        .map(|token| {
            let parts: Vec<String> = token
                .split('-')
                .filter(|p| !p.is_empty())
                .map(|p| initial(p.trim_end_matches('.')))
                .collect();
            parts.join(if hyphen { "-" } else { "" })
        })
        .filter(|t| !t.is_empty())
        .collect();
    tokens.join(if spaced { " " } else { "" })
}

fn join_words(words: &[&str]) -> String {
    words
        .iter()
        .filter(|w| !w.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(locale: &Locale, options: NameOptions) -> NameFormatter<'_> {
        NameFormatter {
            locale,
            options,
            name: None,
            et_al: None,
            institution: None,
            demote: DemoteParticle::DisplayAndSort,
            initialize_with_hyphen: true,
            subsequent: false,
            sort_mode: false,
            expansion: NameExpansion::default(),
        }
    }

    fn people(n: usize) -> Vec<Name> {
        ["Doe", "Roe", "Poe", "Moe", "Zoe"]
            .iter()
            .take(n)
            .map(|f| Name::new(f, "Jane"))
            .collect()
    }

    #[test]
    fn test_initialize() {
        assert_eq!(initialize("John Ronald Reuel", ". ", true), "J. R. R.");
        assert_eq!(initialize("John Ronald", ".", true), "J.R.");
        assert_eq!(initialize("Jean-Pierre", ". ", true), "J.-P.");
        assert_eq!(initialize("Jean-Pierre", ". ", false), "J.P.");
        assert_eq!(initialize("J. R.", ". ", true), "J. R.");
    }

    #[test]
    fn test_inverted_suffix_has_no_comma() {
        let locale = Locale::en_us();
        let f = formatter(
            &locale,
            NameOptions {
                name_as_sort_order: Some(NameAsSortOrder::All),
                ..Default::default()
            },
        );
        let name = Name::new("Smith", "John").with_suffix("Jr.");
        assert_eq!(f.format(&[name]).to_plain(), "Smith, John Jr.");
    }

    #[test]
    fn test_particles() {
        let locale = Locale::en_us();
        let name = Name::new("Gogh", "Vincent").with_prefix("van");
        let inverted = NameOptions {
            name_as_sort_order: Some(NameAsSortOrder::All),
            ..Default::default()
        };
        let mut f = formatter(&locale, inverted);
        assert_eq!(f.format(&[name.clone()]).to_plain(), "Gogh, Vincent van");
        f.demote = DemoteParticle::Never;
        assert_eq!(f.format(&[name.clone()]).to_plain(), "van Gogh, Vincent");
        let f = formatter(&locale, NameOptions::default());
        assert_eq!(f.format(&[name.clone()]).to_plain(), "Vincent van Gogh");
        let short = formatter(
            &locale,
            NameOptions {
                form: Some(NameForm::Short),
                ..Default::default()
            },
        );
        assert_eq!(short.format(&[name]).to_plain(), "van Gogh");
    }

    #[test]
    fn test_and_joining() {
        let locale = Locale::en_us();
        let f = formatter(
            &locale,
            NameOptions {
                and: Some(And::Text),
                form: Some(NameForm::Short),
                ..Default::default()
            },
        );
        assert_eq!(f.format(&people(2)).to_plain(), "Doe and Roe");
        assert_eq!(f.format(&people(3)).to_plain(), "Doe, Roe, and Poe");
        let never = formatter(
            &locale,
            NameOptions {
                and: Some(And::Symbol),
                form: Some(NameForm::Short),
                delimiter_precedes_last: Some(DelimiterPrecedes::Never),
                ..Default::default()
            },
        );
        assert_eq!(never.format(&people(3)).to_plain(), "Doe, Roe & Poe");
    }

    #[test]
    fn test_et_al() {
        let locale = Locale::en_us();
        let f = formatter(
            &locale,
            NameOptions {
                et_al_min: Some(4),
                et_al_use_first: Some(1),
                form: Some(NameForm::Short),
                ..Default::default()
            },
        );
        assert_eq!(f.format(&people(4)).to_plain(), "Doe et al.");
        assert_eq!(f.format(&people(3)).to_plain(), "Doe, Roe, Poe");
    }

    #[test]
    fn test_et_al_defaults_and_expansion() {
        let locale = Locale::en_us();
        let mut f = formatter(
            &locale,
            NameOptions {
                form: Some(NameForm::Short),
                ..Default::default()
            },
        );
        assert_eq!(f.format(&people(5)).to_plain(), "Doe, Roe, Poe, et al.");
        f.expansion = NameExpansion {
            names_expanded: 1,
            active: true,
            ..Default::default()
        };
        assert_eq!(f.format(&people(5)).to_plain(), "Doe, Roe, Poe, Moe, et al.");
    }

    #[test]
    fn test_et_al_use_last() {
        let locale = Locale::en_us();
        let f = formatter(
            &locale,
            NameOptions {
                et_al_min: Some(3),
                et_al_use_first: Some(1),
                et_al_use_last: Some(true),
                form: Some(NameForm::Short),
                ..Default::default()
            },
        );
        assert_eq!(f.format(&people(5)).to_plain(), "Doe, \u{2026} Zoe");
    }

    #[test]
    fn test_givenname_levels() {
        let locale = Locale::en_us();
        let mut f = formatter(
            &locale,
            NameOptions {
                form: Some(NameForm::Short),
                initialize_with: Some(". ".to_string()),
                ..Default::default()
            },
        );
        let names = vec![Name::new("Doe", "John")];
        assert_eq!(f.format(&names).to_plain(), "Doe");
        f.expansion = NameExpansion {
            givenname_level: 1,
            active: true,
            ..Default::default()
        };
        assert_eq!(f.format(&names).to_plain(), "J. Doe");
        f.expansion.givenname_level = 2;
        assert_eq!(f.format(&names).to_plain(), "John Doe");
    }

    #[test]
    fn test_count_form() {
        let locale = Locale::en_us();
        let f = formatter(
            &locale,
            NameOptions {
                form: Some(NameForm::Count),
                ..Default::default()
            },
        );
        assert_eq!(f.format(&people(2)).to_plain(), "2");
        assert_eq!(f.format(&people(5)).to_plain(), "3");
    }

    #[test]
    fn test_institution_subunits() {
        let locale = Locale::en_us();
        let institution = Institution {
            and: None,
            delimiter: Some(", ".to_string()),
            use_first: Some(1),
            use_last: Some(1),
            reverse_order: false,
            parts: cslm_style::InstitutionParts::Long,
            rendering: cslm_style::Rendering::default(),
        };
        let mut f = formatter(&locale, NameOptions::default());
        f.institution = Some(&institution);
        let names = vec![
            Name::literal("University|Faculty of Arts|Department of History"),
            Name::new("Smith", "Ann"),
        ];
        assert_eq!(
            f.format(&names).to_plain(),
            "Ann Smith with University, Department of History"
        );
        let affiliated = vec![
            Name::new("Smith", "Ann"),
            Name::literal("University|Library"),
        ];
        assert_eq!(f.format(&affiliated).to_plain(), "Ann Smith, University, Library");
    }

    #[test]
    fn test_suppress_min_zero_keeps_institutions() {
        let locale = Locale::en_us();
        let element = cslm_style::Name {
            suppress_min: Some(0),
            ..Default::default()
        };
        let mut f = formatter(&locale, NameOptions::default());
        f.name = Some(&element);
        let names = vec![Name::new("Smith", "Ann"), Name::literal("Acme Corp")];
        assert_eq!(f.format(&names).to_plain(), "Acme Corp");
    }
}
