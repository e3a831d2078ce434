/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Normalized bibliography entries.
//!
//! Field keys are CSL variable names; dates are stored as `-`-delimited
//! strings (`2020-03-15`, ranges joined with `/`). Ingestion from raw source
//! formats happens upstream; [`Entry::from_csl_json`] covers the common
//! CSL-JSON case.

pub mod types;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EntryError;
pub use types::canonical_type;

/// Entries keyed by id, in insertion order.
pub type Bibliography = IndexMap<String, Entry>;

/// A normalized bibliographic record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub fields: IndexMap<String, String>,
    #[serde(default)]
    pub names: IndexMap<String, Vec<Name>>,
}

impl Entry {
    pub fn new(id: &str, entry_type: &str) -> Self {
        Self {
            id: id.to_string(),
            entry_type: entry_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_names(mut self, role: &str, names: Vec<Name>) -> Self {
        self.names.insert(role.to_string(), names);
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn names(&self, role: &str) -> Option<&[Name]> {
        self.names
            .get(role)
            .map(Vec::as_slice)
            .filter(|v| !v.is_empty())
    }

    /// The entry type mapped onto the CSL type vocabulary.
    pub fn csl_type(&self) -> &str {
        canonical_type(&self.entry_type)
    }

    /// Adapt a CSL-JSON item.
    pub fn from_csl_json(value: &Value) -> Result<Self, EntryError> {
        let object = value.as_object().ok_or(EntryError::NotAnObject)?;
        let id = match object.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(EntryError::MissingId),
        };
        let entry_type = object
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("article")
            .to_string();

        let mut entry = Entry::new(&id, &entry_type);
        for (key, value) in object {
            if key == "id" || key == "type" {
                continue;
            }
            match value {
                Value::String(s) => {
                    entry.fields.insert(key.clone(), s.clone());
                }
                Value::Number(n) => {
                    entry.fields.insert(key.clone(), n.to_string());
                }
                Value::Array(items) => {
                    let names: Vec<Name> = items.iter().filter_map(name_from_json).collect();
                    if !names.is_empty() {
                        entry.names.insert(key.clone(), names);
                    }
                }
                Value::Object(_) => {
                    if let Some(date) = date_from_json(value) {
                        entry.fields.insert(key.clone(), date);
                    }
                }
                Value::Bool(_) | Value::Null => {}
            }
        }
        Ok(entry)
    }

    /// Parse a CSL-JSON array into a bibliography keyed by id.
    pub fn bibliography_from_csl_json(json: &str) -> Result<Bibliography, EntryError> {
        let value: Value = serde_json::from_str(json)?;
        let items = value.as_array().ok_or(EntryError::NotAnObject)?;
        let mut bibliography = Bibliography::new();
        for item in items {
            let entry = Entry::from_csl_json(item)?;
            bibliography.insert(entry.id.clone(), entry);
        }
        Ok(bibliography)
    }
}

/// A personal or institutional name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// Particle ("van", "de la").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Unstructured name, used as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl Name {
    pub fn new(family: &str, given: &str) -> Self {
        Self {
            family: Some(family.to_string()),
            given: Some(given.to_string()).filter(|g| !g.is_empty()),
            ..Default::default()
        }
    }

    pub fn literal(literal: &str) -> Self {
        Self {
            literal: Some(literal.to_string()),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    /// Literal names and family-only names are institutional.
    pub fn is_institution(&self) -> bool {
        self.literal.is_some() || self.given.as_deref().map_or(true, str::is_empty)
    }

    /// Family name, or the literal for institutions.
    pub fn family_or_literal(&self) -> &str {
        self.literal
            .as_deref()
            .or(self.family.as_deref())
            .unwrap_or_default()
    }
}

fn name_from_json(value: &Value) -> Option<Name> {
    let object = value.as_object()?;
    let get = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let dropping = get("dropping-particle");
    let non_dropping = get("non-dropping-particle");
    let prefix = match (dropping, non_dropping) {
        (Some(d), Some(n)) => Some(format!("{d} {n}")),
        (d, n) => d.or(n),
    };
    let name = Name {
        family: get("family"),
        given: get("given"),
        prefix,
        suffix: get("suffix"),
        literal: get("literal"),
    };
    (name.family.is_some() || name.literal.is_some()).then_some(name)
}

/// Turn a CSL-JSON date object into the `-`/`/` string form.
fn date_from_json(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    if let Some(Value::Array(parts)) = object.get("date-parts") {
        let season = object.get("season").and_then(json_int);
        let rendered: Vec<String> = parts
            .iter()
            .filter_map(|part| part.as_array())
            .map(|part| {
                let mut nums: Vec<i64> = part.iter().filter_map(json_int).collect();
                if nums.len() == 1 {
                    if let Some(season) = season.filter(|s| (1..=4).contains(s)) {
                        nums.push(20 + season);
                    }
                }
                format_date_parts(&nums)
            })
            .filter(|s| !s.is_empty())
            .collect();
        if rendered.is_empty() {
            return None;
        }
        let mut date = rendered.join("/");
        if object.get("circa").is_some_and(json_truthy) {
            date.push('~');
        }
        return Some(date);
    }
    object
        .get("literal")
        .or_else(|| object.get("raw"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn format_date_parts(nums: &[i64]) -> String {
    match nums {
        [] => String::new(),
        [y] => format_year(*y),
        [y, m] => format!("{}-{:02}", format_year(*y), m),
        [y, m, d, ..] => format!("{}-{:02}-{:02}", format_year(*y), m, d),
    }
}

fn format_year(year: i64) -> String {
    if year < 0 {
        format!("-{:04}", -year)
    } else {
        format!("{year:04}")
    }
}

fn json_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_csl_json() {
        let value = json!({
            "id": "doe2020",
            "type": "article-journal",
            "title": "On Things",
            "volume": 12,
            "author": [
                {"family": "Doe", "given": "Jane"},
                {"family": "Beethoven", "given": "Ludwig", "dropping-particle": "van"},
                {"literal": "World Health Organization"}
            ],
            "issued": {"date-parts": [[2020, 3, 5]]},
            "accessed": {"date-parts": [[2021]], "circa": true}
        });
        let entry = Entry::from_csl_json(&value).unwrap();
        assert_eq!(entry.id, "doe2020");
        assert_eq!(entry.field("volume"), Some("12"));
        assert_eq!(entry.field("issued"), Some("2020-03-05"));
        assert_eq!(entry.field("accessed"), Some("2021~"));
        let authors = entry.names("author").unwrap();
        assert_eq!(authors.len(), 3);
        assert_eq!(authors[1].prefix.as_deref(), Some("van"));
        assert!(authors[2].is_institution());
        assert!(!authors[0].is_institution());
    }

    #[test]
    fn test_date_ranges_and_seasons() {
        let range = json!({"date-parts": [[2001, 5], [2002, 6]]});
        assert_eq!(date_from_json(&range).as_deref(), Some("2001-05/2002-06"));
        let season = json!({"date-parts": [[1999]], "season": 2});
        assert_eq!(date_from_json(&season).as_deref(), Some("1999-22"));
        let bc = json!({"date-parts": [[-44, 3, 15]]});
        assert_eq!(date_from_json(&bc).as_deref(), Some("-0044-03-15"));
    }

    #[test]
    fn test_missing_id_is_error() {
        let value = json!({"type": "book"});
        assert!(matches!(
            Entry::from_csl_json(&value),
            Err(EntryError::MissingId)
        ));
    }

    #[test]
    fn test_empty_field_is_absent() {
        let entry = Entry::new("a", "book").with_field("title", "");
        assert_eq!(entry.field("title"), None);
    }
}
