//! Parsing of the user-authored key/value mapping.

use indexmap::IndexMap;
use serde_json::Value;

/// Prompt snippets keyed by name, in the order they were authored.
pub type PromptTable = IndexMap<String, String>;

/// Pairs installed whenever a reparse leaves the table empty.
pub const DEFAULT_PAIRS: [(&str, &str); 3] =
    [("key1", "value1"), ("key2", "value2"), ("key3", "value3")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingParse {
    Parsed(PromptTable),
    /// Valid JSON whose top level is not a flat string-to-string object.
    /// `key` names the first entry whose value is not a string.
    WrongShape { key: Option<String> },
    SyntaxError(String),
}

pub fn parse_mapping(raw: &str) -> MappingParse {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => return MappingParse::SyntaxError(err.to_string()),
    };
    let Value::Object(object) = value else {
        return MappingParse::WrongShape { key: None };
    };

    let mut table = PromptTable::with_capacity(object.len());
    for (key, value) in object {
        let Value::String(text) = value else {
            return MappingParse::WrongShape { key: Some(key) };
        };
        table.insert(key, text);
    }
    MappingParse::Parsed(table)
}

pub fn default_table() -> PromptTable {
    DEFAULT_PAIRS
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}
