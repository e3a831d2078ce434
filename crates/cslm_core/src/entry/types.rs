/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Entry type vocabulary.

/// CSL 1.0.2 item types plus the CSL-M legal and extension types.
pub const CSL_TYPES: &[&str] = &[
    "article",
    "article-journal",
    "article-magazine",
    "article-newspaper",
    "bill",
    "book",
    "broadcast",
    "chapter",
    "classic",
    "collection",
    "dataset",
    "document",
    "entry",
    "entry-dictionary",
    "entry-encyclopedia",
    "event",
    "figure",
    "gazette",
    "graphic",
    "hearing",
    "interview",
    "legal_case",
    "legislation",
    "manuscript",
    "map",
    "motion_picture",
    "musical_score",
    "pamphlet",
    "paper-conference",
    "patent",
    "performance",
    "periodical",
    "personal_communication",
    "post",
    "post-weblog",
    "regulation",
    "report",
    "review",
    "review-book",
    "software",
    "song",
    "speech",
    "standard",
    "thesis",
    "treaty",
    "video",
    "webpage",
];

/// Map a BibTeX/biblatex or CSL-M type name onto the CSL type vocabulary.
///
/// BibTeX `article` means a journal article. Unknown names pass through
/// unchanged so that `type` conditions on non-standard types still match
/// literally.
pub fn canonical_type(entry_type: &str) -> &str {
    let trimmed = entry_type.trim();
    let alias = match trimmed.to_ascii_lowercase().as_str() {
        "article" | "journalarticle" => Some("article-journal"),
        "inbook" | "incollection" | "bookinbook" | "suppbook" => Some("chapter"),
        "inproceedings" | "conference" | "proceedings-article" => Some("paper-conference"),
        "proceedings" | "mvbook" | "manual" | "booklet" | "mvcollection" => Some("book"),
        "phdthesis" | "mastersthesis" | "dissertation" => Some("thesis"),
        "techreport" | "tech-report" => Some("report"),
        "unpublished" => Some("manuscript"),
        "online" | "electronic" | "www" | "web" => Some("webpage"),
        "misc" => Some("document"),
        "inreference" | "encyclopedia-entry" => Some("entry-encyclopedia"),
        "case" | "legal-case" | "legalcase" | "jurisdiction" => Some("legal_case"),
        "statute" | "law" | "legal-statute" => Some("legislation"),
        "legal-regulation" => Some("regulation"),
        "film" | "movie" | "motion-picture" => Some("motion_picture"),
        "score" | "musical-score" => Some("musical_score"),
        "letter" | "correspondence" | "personal-communication" => Some("personal_communication"),
        "blogpost" | "blog-post" => Some("post-weblog"),
        "audio" | "music" => Some("song"),
        "artwork" | "image" => Some("graphic"),
        _ => None,
    };
    if let Some(alias) = alias {
        return alias;
    }
    CSL_TYPES
        .iter()
        .find(|t| t.eq_ignore_ascii_case(trimmed))
        .copied()
        .unwrap_or(entry_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csl_types_pass_through() {
        assert_eq!(canonical_type("article-journal"), "article-journal");
        assert_eq!(canonical_type("legal_case"), "legal_case");
        assert_eq!(canonical_type("Book"), "book");
    }

    #[test]
    fn test_bibtex_types_map() {
        assert_eq!(canonical_type("inproceedings"), "paper-conference");
        assert_eq!(canonical_type("phdthesis"), "thesis");
        assert_eq!(canonical_type("incollection"), "chapter");
        assert_eq!(canonical_type("techreport"), "report");
        assert_eq!(canonical_type("article"), "article-journal");
    }

    #[test]
    fn test_legal_aliases_map() {
        assert_eq!(canonical_type("case"), "legal_case");
        assert_eq!(canonical_type("statute"), "legislation");
    }

    #[test]
    fn test_unknown_type_is_unchanged() {
        assert_eq!(canonical_type("hologram"), "hologram");
    }
}
