/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The `citation-label` variable.
//!
//! Generates labels like `Knut84`, `AhUl74` or `ABC+92` from author family
//! names and the issued year.
//!
//! ## Algorithm
//!
//! - 1 author: up to 4 letters of the family name
//! - 2–3 authors: up to 2 letters of each family name
//! - 4 or more: first letters of the first three names, then `+`
//! - no names: up to 4 letters of the title
//!
//! The last two digits of the year follow, then the year suffix if any.

use cslm_core::Entry;

use crate::values;

const SINGLE_AUTHOR_CHARS: usize = 4;
const MULTI_AUTHOR_CHARS: usize = 2;
const ET_AL_MIN: usize = 4;
const ET_AL_MARKER: &str = "+";

/// Generate the label for an entry.
pub fn generate_label(entry: &Entry, year_suffix: Option<char>) -> String {
    let mut label = name_part(entry);
    label.push_str(&year_part(entry));
    if let Some(suffix) = year_suffix {
        label.push(suffix);
    }
    label
}

fn letters(text: &str, count: usize) -> String {
    text.chars().filter(|c| c.is_alphabetic()).take(count).collect()
}

fn name_part(entry: &Entry) -> String {
    let Some(names) = values::primary_names(entry) else {
        return values::lookup(entry, "title")
            .map(|title| letters(&title, SINGLE_AUTHOR_CHARS))
            .unwrap_or_default();
    };
    match names.len() {
        1 => letters(names[0].family_or_literal(), SINGLE_AUTHOR_CHARS),
        n if n < ET_AL_MIN => names
            .iter()
            .map(|name| letters(name.family_or_literal(), MULTI_AUTHOR_CHARS))
            .collect(),
        _ => {
            let initials: String = names
                .iter()
                .take(3)
                .map(|name| letters(name.family_or_literal(), 1))
                .collect();
            format!("{initials}{ET_AL_MARKER}")
        }
    }
}

fn year_part(entry: &Entry) -> String {
    values::year(entry)
        .map(|year| format!("{:02}", year.rem_euclid(100)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cslm_core::Name;

    fn book(authors: &[&str], year: &str) -> Entry {
        Entry::new("x", "book")
            .with_field("issued", year)
            .with_field("title", "The Art of Computer Programming")
            .with_names(
                "author",
                authors.iter().map(|family| Name::new(family, "A")).collect(),
            )
    }

    #[test]
    fn test_single_author() {
        assert_eq!(generate_label(&book(&["Knuth"], "1984"), None), "Knut84");
    }

    #[test]
    fn test_two_and_three_authors() {
        assert_eq!(generate_label(&book(&["Aho", "Ullman"], "1974"), None), "AhUl74");
        assert_eq!(
            generate_label(&book(&["Aho", "Hopcroft", "Ullman"], "1974"), None),
            "AhHoUl74"
        );
    }

    #[test]
    fn test_many_authors_use_marker() {
        let entry = book(&["Bancroft", "Crane", "Dunn", "Evans"], "1992");
        assert_eq!(generate_label(&entry, None), "BCD+92");
    }

    #[test]
    fn test_year_suffix_and_title_fallback() {
        assert_eq!(generate_label(&book(&["Knuth"], "1984"), Some('b')), "Knut84b");
        let anonymous = Entry::new("y", "book")
            .with_field("title", "Beowulf")
            .with_field("issued", "2005");
        assert_eq!(generate_label(&anonymous, None), "Beow05");
    }
}
