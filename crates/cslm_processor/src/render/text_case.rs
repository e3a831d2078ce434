/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! `text-case` transforms.
//!
//! Transforms run per text leaf. `at_start` tells a leaf whether it begins
//! the transformed span, which matters for the first-word rules.

use cslm_style::TextCase;

/// Words kept lowercase by title case unless they open the title.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "down", "for", "from", "in", "into", "nor", "of",
    "on", "onto", "or", "over", "so", "the", "till", "to", "up", "via", "with", "yet",
];

/// Apply a text case to one leaf. Returns the transformed text and whether
/// the span is still at its start (the leaf had no words).
pub fn apply(case: TextCase, text: &str, at_start: bool) -> (String, bool) {
    let has_words = text.chars().any(char::is_alphanumeric);
    let still_at_start = at_start && !has_words;
    let out = match case {
        TextCase::Lowercase => text.to_lowercase(),
        TextCase::Uppercase => text.to_uppercase(),
        TextCase::CapitalizeFirst => {
            if at_start {
                capitalize(text)
            } else {
                text.to_string()
            }
        }
        TextCase::CapitalizeAll => map_words(text, |word, _| capitalize(word)),
        TextCase::Sentence => sentence(text, at_start),
        TextCase::Title => title(text, at_start),
    };
    (out, still_at_start)
}

fn sentence(text: &str, at_start: bool) -> String {
    let shouting = text.chars().any(char::is_alphabetic)
        && !text.chars().any(char::is_lowercase);
    let base = if shouting {
        text.to_lowercase()
    } else {
        text.to_string()
    };
    if at_start {
        capitalize(&base)
    } else {
        base
    }
}

fn title(text: &str, at_start: bool) -> String {
    map_words(text, |word, index| {
        let first = at_start && index == 0;
        if word.chars().any(char::is_uppercase) {
            return word.to_string();
        }
        let bare: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if !first && MINOR_WORDS.contains(&bare.as_str()) {
            word.to_string()
        } else {
            capitalize(word)
        }
    })
}

/// Rebuild `text` with each whitespace-separated word mapped; whitespace is
/// preserved. The closure receives the word and its index.
fn map_words(text: &str, mut f: impl FnMut(&str, usize) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let mut index = 0;
    for c in text.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                out.push_str(&f(&word, index));
                index += 1;
                word.clear();
            }
            out.push(c);
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        out.push_str(&f(&word, index));
    }
    out
}

/// Uppercase the first alphabetic character.
fn capitalize(text: &str) -> String {
    let mut done = false;
    text.chars()
        .flat_map(|c| {
            if !done && c.is_alphabetic() {
                done = true;
                c.to_uppercase().collect::<Vec<_>>()
            } else {
                vec![c]
            }
        })
        .collect()
}
