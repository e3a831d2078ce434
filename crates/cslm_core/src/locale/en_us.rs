/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use cslm_style::{
    Date, DateForm, DatePart, DatePartForm, DatePartName, DatePartsSelector, Rendering, TermForm,
};

use super::{DateFormats, Locale, TermValue};

/// (name, form, singular, plural); an empty plural means the term has one value.
const TERMS: &[(&str, &str, &str, &str)] = &[
    // general
    ("accessed", "long", "accessed", ""),
    ("and", "long", "and", ""),
    ("and", "symbol", "&", ""),
    ("and others", "long", "and others", ""),
    ("anonymous", "long", "anonymous", ""),
    ("anonymous", "short", "anon.", ""),
    ("at", "long", "at", ""),
    ("available at", "long", "available at", ""),
    ("by", "long", "by", ""),
    ("circa", "long", "circa", ""),
    ("circa", "short", "c.", ""),
    ("cited", "long", "cited", ""),
    ("edition", "long", "edition", "editions"),
    ("edition", "short", "ed.", "eds."),
    ("et-al", "long", "et al.", ""),
    ("forthcoming", "long", "forthcoming", ""),
    ("from", "long", "from", ""),
    ("ibid", "long", "ibid.", ""),
    ("in", "long", "in", ""),
    ("in press", "long", "in press", ""),
    ("internet", "long", "internet", ""),
    ("interview", "long", "interview", ""),
    ("letter", "long", "letter", ""),
    ("no date", "long", "no date", ""),
    ("no date", "short", "n.d.", ""),
    ("online", "long", "online", ""),
    ("presented at", "long", "presented at the", ""),
    ("reference", "long", "reference", "references"),
    ("reference", "short", "ref.", "refs."),
    ("retrieved", "long", "retrieved", ""),
    ("scale", "long", "scale", ""),
    ("version", "long", "version", ""),
    ("with", "long", "with", ""),
    ("ad", "long", "AD", ""),
    ("bc", "long", "BC", ""),
    ("open-quote", "long", "\u{201c}", ""),
    ("close-quote", "long", "\u{201d}", ""),
    ("open-inner-quote", "long", "\u{2018}", ""),
    ("close-inner-quote", "long", "\u{2019}", ""),
    ("page-range-delimiter", "long", "\u{2013}", ""),
    // ordinals
    ("ordinal", "long", "th", ""),
    ("ordinal-01", "long", "st", ""),
    ("ordinal-02", "long", "nd", ""),
    ("ordinal-03", "long", "rd", ""),
    ("ordinal-11", "long", "th", ""),
    ("ordinal-12", "long", "th", ""),
    ("ordinal-13", "long", "th", ""),
    ("long-ordinal-01", "long", "first", ""),
    ("long-ordinal-02", "long", "second", ""),
    ("long-ordinal-03", "long", "third", ""),
    ("long-ordinal-04", "long", "fourth", ""),
    ("long-ordinal-05", "long", "fifth", ""),
    ("long-ordinal-06", "long", "sixth", ""),
    ("long-ordinal-07", "long", "seventh", ""),
    ("long-ordinal-08", "long", "eighth", ""),
    ("long-ordinal-09", "long", "ninth", ""),
    ("long-ordinal-10", "long", "tenth", ""),
    // locators
    ("book", "long", "book", "books"),
    ("book", "short", "bk.", "bks."),
    ("chapter", "long", "chapter", "chapters"),
    ("chapter", "short", "chap.", "chaps."),
    ("column", "long", "column", "columns"),
    ("column", "short", "col.", "cols."),
    ("figure", "long", "figure", "figures"),
    ("figure", "short", "fig.", "figs."),
    ("folio", "long", "folio", "folios"),
    ("folio", "short", "fol.", "fols."),
    ("issue", "long", "issue", "issues"),
    ("issue", "short", "no.", "nos."),
    ("line", "long", "line", "lines"),
    ("line", "short", "l.", "ll."),
    ("note", "long", "note", "notes"),
    ("note", "short", "n.", "nn."),
    ("number", "long", "number", "numbers"),
    ("number", "short", "no.", "nos."),
    ("opus", "long", "opus", "opera"),
    ("opus", "short", "op.", "opp."),
    ("page", "long", "page", "pages"),
    ("page", "short", "p.", "pp."),
    ("paragraph", "long", "paragraph", "paragraphs"),
    ("paragraph", "short", "para.", "paras."),
    ("paragraph", "symbol", "¶", "¶¶"),
    ("part", "long", "part", "parts"),
    ("part", "short", "pt.", "pts."),
    ("section", "long", "section", "sections"),
    ("section", "short", "sec.", "secs."),
    ("section", "symbol", "§", "§§"),
    ("sub verbo", "long", "sub verbo", "sub verbis"),
    ("sub verbo", "short", "s.v.", "s.vv."),
    ("verse", "long", "verse", "verses"),
    ("verse", "short", "v.", "vv."),
    ("volume", "long", "volume", "volumes"),
    ("volume", "short", "vol.", "vols."),
    // roles
    ("author", "verb", "by", ""),
    ("collection-editor", "long", "editor", "editors"),
    ("collection-editor", "short", "ed.", "eds."),
    ("composer", "long", "composer", "composers"),
    ("composer", "short", "comp.", "comps."),
    ("composer", "verb", "composed by", ""),
    ("composer", "verb-short", "comp. by", ""),
    ("container-author", "verb", "by", ""),
    ("director", "long", "director", "directors"),
    ("director", "short", "dir.", "dirs."),
    ("director", "verb", "directed by", ""),
    ("director", "verb-short", "dir. by", ""),
    ("editor", "long", "editor", "editors"),
    ("editor", "short", "ed.", "eds."),
    ("editor", "verb", "edited by", ""),
    ("editor", "verb-short", "ed. by", ""),
    ("editorial-director", "long", "editor", "editors"),
    ("editorial-director", "short", "ed.", "eds."),
    ("editorial-director", "verb", "edited by", ""),
    ("editorial-director", "verb-short", "ed. by", ""),
    ("editortranslator", "long", "editor & translator", "editors & translators"),
    ("editortranslator", "short", "ed. & tran.", "eds. & trans."),
    ("editortranslator", "verb", "edited & translated by", ""),
    ("editortranslator", "verb-short", "ed. & trans. by", ""),
    ("illustrator", "long", "illustrator", "illustrators"),
    ("illustrator", "short", "ill.", "ills."),
    ("illustrator", "verb", "illustrated by", ""),
    ("illustrator", "verb-short", "illus. by", ""),
    ("interviewer", "long", "interviewer", "interviewers"),
    ("interviewer", "verb", "interview by", ""),
    ("recipient", "verb", "to", ""),
    ("reviewed-author", "verb", "by", ""),
    ("translator", "long", "translator", "translators"),
    ("translator", "short", "tran.", "trans."),
    ("translator", "verb", "translated by", ""),
    ("translator", "verb-short", "trans. by", ""),
    // months and seasons
    ("month-01", "long", "January", ""),
    ("month-01", "short", "Jan.", ""),
    ("month-02", "long", "February", ""),
    ("month-02", "short", "Feb.", ""),
    ("month-03", "long", "March", ""),
    ("month-03", "short", "Mar.", ""),
    ("month-04", "long", "April", ""),
    ("month-04", "short", "Apr.", ""),
    ("month-05", "long", "May", ""),
    ("month-05", "short", "May", ""),
    ("month-06", "long", "June", ""),
    ("month-06", "short", "Jun.", ""),
    ("month-07", "long", "July", ""),
    ("month-07", "short", "Jul.", ""),
    ("month-08", "long", "August", ""),
    ("month-08", "short", "Aug.", ""),
    ("month-09", "long", "September", ""),
    ("month-09", "short", "Sep.", ""),
    ("month-10", "long", "October", ""),
    ("month-10", "short", "Oct.", ""),
    ("month-11", "long", "November", ""),
    ("month-11", "short", "Nov.", ""),
    ("month-12", "long", "December", ""),
    ("month-12", "short", "Dec.", ""),
    ("season-01", "long", "Spring", ""),
    ("season-02", "long", "Summer", ""),
    ("season-03", "long", "Autumn", ""),
    ("season-04", "long", "Winter", ""),
];

pub(super) fn en_us() -> Locale {
    let mut locale = Locale {
        lang: "en-US".to_string(),
        date_formats: DateFormats {
            text: Some(text_date()),
            numeric: Some(numeric_date()),
        },
        punctuation_in_quote: Some(true),
        limit_day_ordinals_to_day_1: Some(false),
        ..Default::default()
    };
    for (name, form, single, multiple) in TERMS {
        let form = form.parse().unwrap_or(TermForm::Long);
        let value = if multiple.is_empty() {
            TermValue::Simple(single.to_string())
        } else {
            TermValue::Plural {
                single: single.to_string(),
                multiple: multiple.to_string(),
            }
        };
        locale.set_term(name, form, value);
    }
    locale
}

fn part(name: DatePartName, form: Option<DatePartForm>, suffix: &str) -> DatePart {
    DatePart {
        name,
        form,
        range_delimiter: None,
        rendering: Rendering {
            suffix: Some(suffix.to_string()).filter(|s| !s.is_empty()),
            ..Default::default()
        },
    }
}

/// "January 5, 2020"
fn text_date() -> Date {
    Date {
        variable: String::new(),
        form: Some(DateForm::Text),
        date_parts: DatePartsSelector::YearMonthDay,
        delimiter: None,
        parts: vec![
            part(DatePartName::Month, None, " "),
            part(DatePartName::Day, None, ", "),
            part(DatePartName::Year, None, ""),
        ],
        rendering: Rendering::default(),
    }
}

/// "1/5/2020"
fn numeric_date() -> Date {
    Date {
        variable: String::new(),
        form: Some(DateForm::Numeric),
        date_parts: DatePartsSelector::YearMonthDay,
        delimiter: None,
        parts: vec![
            part(DatePartName::Month, Some(DatePartForm::Numeric), "/"),
            part(DatePartName::Day, Some(DatePartForm::Numeric), "/"),
            part(DatePartName::Year, None, ""),
        ],
        rendering: Rendering::default(),
    }
}
