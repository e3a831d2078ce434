/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Joining the cites of one citation: author grouping and collapsing.
//!
//! Cites are grouped by the plain text of their first rendered `<names>`
//! output, so "Doe" and "Doe et al." never share a group. A group moves to
//! the position of its first member and keeps its members' relative order.

use cslm_style::{CitationOptions, Collapse};

use crate::render::{Output, Tag};

const NUMBER_RANGE_DELIMITER: &str = "-";
const SUFFIX_RANGE_DELIMITER: &str = "\u{2013}";

/// One rendered cite, ready to be joined.
#[derive(Debug, Clone)]
pub struct RenderedCite {
    pub id: String,
    pub output: Output,
    /// The cite rendered with its first names suppressed.
    pub without_author: Output,
    pub year: Option<i32>,
    pub has_locator: bool,
}

impl RenderedCite {
    fn author_key(&self) -> Option<String> {
        self.output.first_names().map(Output::to_plain)
    }

    fn suffix(&self) -> Option<char> {
        match self.output.year_suffix() {
            Some(Output::Tagged {
                tag: Tag::YearSuffix(c),
                ..
            }) => Some(*c),
            _ => None,
        }
    }
}

pub struct Collapser<'a> {
    options: &'a CitationOptions,
    /// The citation layout delimiter.
    delimiter: &'a str,
}

impl<'a> Collapser<'a> {
    pub fn new(options: &'a CitationOptions, delimiter: &'a str) -> Self {
        Self { options, delimiter }
    }

    /// The collapse mode in effect. Year-suffix modes act as `year` when
    /// the style does not add year suffixes.
    fn mode(&self) -> Option<Collapse> {
        match self.options.collapse {
            Some(Collapse::YearSuffix | Collapse::YearSuffixRanged)
                if !self.options.disambiguate_add_year_suffix =>
            {
                Some(Collapse::Year)
            }
            other => other,
        }
    }

    pub fn join(&self, cites: Vec<RenderedCite>) -> Output {
        let mode = self.mode();
        if mode == Some(Collapse::CitationNumber) {
            return self.collapse_numbers(&cites);
        }
        let grouping = mode.is_some() || self.options.cite_group_delimiter.is_some();
        let groups = if grouping {
            group_by_author(cites)
        } else {
            cites.into_iter().map(|cite| vec![cite]).collect()
        };

        let mut pieces = Vec::new();
        let mut previous_collapsed = false;
        for group in groups {
            if !pieces.is_empty() {
                let delimiter = match &self.options.after_collapse_delimiter {
                    Some(after) if previous_collapsed => after.as_str(),
                    _ => self.delimiter,
                };
                pieces.push(Output::text(delimiter));
            }
            previous_collapsed = mode.is_some() && group.len() > 1;
            pieces.push(match mode {
                Some(mode) if group.len() > 1 => self.collapse_years(group, mode),
                _ => Output::join(
                    group.into_iter().map(|cite| cite.output).collect(),
                    self.group_delimiter(),
                ),
            });
        }
        Output::seq(pieces)
    }

    fn group_delimiter(&self) -> &str {
        self.options.cite_group_delimiter.as_deref().unwrap_or(", ")
    }

    /// Runs of three or more consecutive citation numbers become ranges.
    fn collapse_numbers(&self, cites: &[RenderedCite]) -> Output {
        let number = |i: usize| {
            let cite: &RenderedCite = &cites[i];
            if cite.has_locator {
                None
            } else {
                cite.output.citation_number()
            }
        };
        let mut pieces = Vec::new();
        let mut i = 0;
        while i < cites.len() {
            let start = i;
            if let Some(mut last) = number(i) {
                while i + 1 < cites.len() && number(i + 1) == Some(last + 1) {
                    i += 1;
                    last += 1;
                }
            }
            if i - start >= 2 {
                pieces.push(Output::seq(vec![
                    cites[start].output.clone(),
                    Output::text(NUMBER_RANGE_DELIMITER),
                    cites[i].output.clone(),
                ]));
            } else {
                pieces.extend(cites[start..=i].iter().map(|cite| cite.output.clone()));
            }
            i += 1;
        }
        Output::join(pieces, self.delimiter)
    }

    /// One author group: the first cite in full, then later cites without
    /// their names, merging same-year suffixes in the year-suffix modes.
    fn collapse_years(&self, group: Vec<RenderedCite>, mode: Collapse) -> Output {
        let merge_suffixes = matches!(mode, Collapse::YearSuffix | Collapse::YearSuffixRanged);
        let mut segments: Vec<Segment> = Vec::new();
        for (i, cite) in group.into_iter().enumerate() {
            let suffix = cite.suffix();
            if merge_suffixes && !cite.has_locator {
                if let (Some(segment), Some(c)) = (segments.last_mut(), suffix) {
                    if segment.accepts(cite.year) {
                        let output = cite.output.year_suffix().cloned().unwrap_or_default();
                        segment.suffixes.push((c, output));
                        continue;
                    }
                }
            }
            let head = if i == 0 { cite.output } else { cite.without_author };
            segments.push(Segment {
                head,
                year: cite.year,
                head_suffix: suffix.filter(|_| !cite.has_locator),
                suffixes: Vec::new(),
            });
        }
        let ranged = mode == Collapse::YearSuffixRanged;
        let suffix_delimiter = self
            .options
            .year_suffix_delimiter
            .as_deref()
            .unwrap_or(self.delimiter);
        Output::join(
            segments
                .into_iter()
                .map(|segment| segment.render(suffix_delimiter, ranged))
                .collect(),
            self.group_delimiter(),
        )
    }
}

/// A cite followed by bare year suffixes of the same year.
struct Segment {
    head: Output,
    year: Option<i32>,
    /// Suffix of the head cite, when later suffixes may merge into it.
    head_suffix: Option<char>,
    suffixes: Vec<(char, Output)>,
}

impl Segment {
    fn accepts(&self, year: Option<i32>) -> bool {
        self.head_suffix.is_some() && year.is_some() && self.year == year
    }

    fn render(self, delimiter: &str, ranged: bool) -> Output {
        if self.suffixes.is_empty() {
            return self.head;
        }
        let mut items = vec![self.head];
        if !ranged {
            for (_, output) in self.suffixes {
                items.push(Output::text(delimiter));
                items.push(output);
            }
            return Output::seq(items);
        }

        let letters: Vec<char> = self
            .head_suffix
            .into_iter()
            .chain(self.suffixes.iter().map(|(c, _)| *c))
            .collect();
        let outputs: Vec<&Output> = self.suffixes.iter().map(|(_, o)| o).collect();
        // letters[k] belongs to outputs[k - 1]; index 0 is the head
        let mut k = 0;
        while k < letters.len() {
            let start = k;
            while k + 1 < letters.len() && next_letter(letters[k]) == Some(letters[k + 1]) {
                k += 1;
            }
            if start > 0 {
                items.push(Output::text(delimiter));
                items.push(outputs[start - 1].clone());
            }
            match k - start {
                0 => {}
                1 => {
                    items.push(Output::text(delimiter));
                    items.push(outputs[k - 1].clone());
                }
                _ => {
                    items.push(Output::text(SUFFIX_RANGE_DELIMITER));
                    items.push(outputs[k - 1].clone());
                }
            }
            k += 1;
        }
        Output::seq(items)
    }
}

fn next_letter(c: char) -> Option<char> {
    char::from_u32(c as u32 + 1)
}

/// Group cites with equal first-names output, in order of first
/// appearance.
fn group_by_author(cites: Vec<RenderedCite>) -> Vec<Vec<RenderedCite>> {
    let mut groups: Vec<(Option<String>, Vec<RenderedCite>)> = Vec::new();
    for cite in cites {
        let key = cite.author_key();
        let found = key
            .as_ref()
            .and_then(|k| groups.iter().position(|(g, _)| g.as_ref() == Some(k)));
        match found {
            Some(i) => groups[i].1.push(cite),
            None => groups.push((key, vec![cite])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> RenderedCite {
        RenderedCite {
            id: n.to_string(),
            output: Output::tagged(Tag::CitationNumber(n), Output::text(n.to_string())),
            without_author: Output::Null,
            year: None,
            has_locator: false,
        }
    }

    fn authored(author: &str, year: i32, suffix: Option<char>) -> RenderedCite {
        let year_output = match suffix {
            Some(c) => Output::seq(vec![
                Output::text(year.to_string()),
                Output::tagged(Tag::YearSuffix(c), Output::text(c.to_string())),
            ]),
            None => Output::text(year.to_string()),
        };
        RenderedCite {
            id: format!("{author}{year}"),
            output: Output::seq(vec![
                Output::tagged(
                    Tag::Names {
                        variable: "author".into(),
                    },
                    Output::text(author),
                ),
                Output::text(" "),
                year_output.clone(),
            ]),
            without_author: year_output,
            year: Some(year),
            has_locator: false,
        }
    }

    fn options(collapse: Option<Collapse>) -> CitationOptions {
        CitationOptions {
            collapse,
            disambiguate_add_year_suffix: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_citation_number_ranges() {
        let options = options(Some(Collapse::CitationNumber));
        let collapser = Collapser::new(&options, ", ");
        let cites = [1, 2, 3, 5].into_iter().map(numbered).collect();
        assert_eq!(collapser.join(cites).to_plain(), "1-3, 5");
        let cites = (1..=6).map(numbered).collect();
        assert_eq!(collapser.join(cites).to_plain(), "1-6");
        let cites = [1, 2, 4].into_iter().map(numbered).collect();
        assert_eq!(collapser.join(cites).to_plain(), "1, 2, 4");
    }

    #[test]
    fn test_year_collapse_groups_authors() {
        let options = options(Some(Collapse::Year));
        let collapser = Collapser::new(&options, "; ");
        let cites = vec![
            authored("Doe", 2019, None),
            authored("Roe", 2018, None),
            authored("Doe", 2021, None),
        ];
        assert_eq!(collapser.join(cites).to_plain(), "Doe 2019, 2021; Roe 2018");
    }

    #[test]
    fn test_year_suffix_collapse() {
        let options = options(Some(Collapse::YearSuffix));
        let collapser = Collapser::new(&options, "; ");
        let cites = vec![
            authored("Doe", 2020, Some('a')),
            authored("Doe", 2020, Some('b')),
            authored("Doe", 2021, None),
        ];
        assert_eq!(collapser.join(cites).to_plain(), "Doe 2020a; b, 2021");
    }

    #[test]
    fn test_year_suffix_ranged() {
        let mut options = options(Some(Collapse::YearSuffixRanged));
        options.year_suffix_delimiter = Some(",".into());
        let collapser = Collapser::new(&options, "; ");
        let cites = vec![
            authored("Doe", 2020, Some('a')),
            authored("Doe", 2020, Some('b')),
            authored("Doe", 2020, Some('c')),
            authored("Doe", 2020, Some('e')),
        ];
        assert_eq!(collapser.join(cites).to_plain(), "Doe 2020a–c,e");
    }

    #[test]
    fn test_year_suffix_falls_back_to_year() {
        let mut options = options(Some(Collapse::YearSuffix));
        options.disambiguate_add_year_suffix = false;
        let collapser = Collapser::new(&options, "; ");
        let cites = vec![authored("Doe", 2019, None), authored("Doe", 2020, None)];
        assert_eq!(collapser.join(cites).to_plain(), "Doe 2019, 2020");
    }

    #[test]
    fn test_cite_group_delimiter_without_collapse() {
        let mut options = options(None);
        options.cite_group_delimiter = Some(", ".into());
        let collapser = Collapser::new(&options, "; ");
        let cites = vec![
            authored("Doe", 2019, None),
            authored("Roe", 2018, None),
            authored("Doe", 2021, None),
        ];
        assert_eq!(
            collapser.join(cites).to_plain(),
            "Doe 2019, Doe 2021; Roe 2018"
        );
    }

    #[test]
    fn test_after_collapse_delimiter() {
        let mut options = options(Some(Collapse::Year));
        options.after_collapse_delimiter = Some(", ".into());
        let collapser = Collapser::new(&options, "; ");
        let cites = vec![
            authored("Doe", 2019, None),
            authored("Doe", 2021, None),
            authored("Roe", 2018, None),
        ];
        assert_eq!(collapser.join(cites).to_plain(), "Doe 2019, 2021, Roe 2018");
    }
}
