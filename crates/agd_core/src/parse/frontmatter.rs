//! Restricted frontmatter parser.
//!
//! # Responsibility
//! - Extract a flat `key: value` mapping from the leading `---` block.
//! - Split comma-separated list values.
//!
//! # Invariants
//! - Documents not starting with `---`, or without a second `---`, parse to
//!   an empty mapping.
//! - Values are trimmed and lose at most one symmetric layer of quotes.
//! - Duplicate keys keep the last value; the key is recorded in
//!   `duplicate_keys`.
//! - Parsing never panics and has no side effects beyond a warn-level log.
//!
//! # See also
//! - `model::record` for the typed projection of a parsed block.

use log::warn;
use std::collections::BTreeMap;

/// Opening and closing delimiter of a frontmatter block.
pub const DELIMITER: &str = "---";
const KEY_VALUE_SEPARATOR: char = ':';
const LIST_SEPARATOR: char = ',';

/// Parsed view of one frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: BTreeMap<String, String>,
    duplicate_keys: Vec<String>,
}

impl Frontmatter {
    /// Returns the value for `key`, if declared.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the value for `key` only when declared and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Keys that appeared more than once, in order of their repeat.
    pub fn duplicate_keys(&self) -> &[String] {
        &self.duplicate_keys
    }
}

/// Parses the frontmatter block at the start of `content`.
pub fn parse_frontmatter(content: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();
    let Some(body) = block_body(content) else {
        return frontmatter;
    };

    for line in body.trim().lines() {
        let Some((raw_key, raw_value)) = line.split_once(KEY_VALUE_SEPARATOR) else {
            continue;
        };
        let key = raw_key.trim().to_string();
        let value = unquote(raw_value.trim()).to_string();
        if frontmatter.fields.insert(key.clone(), value).is_some() {
            warn!("event=frontmatter_parse module=parse status=duplicate_key key={key}");
            frontmatter.duplicate_keys.push(key);
        }
    }

    frontmatter
}

/// Splits a comma-separated value into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn block_body(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    // Why: records written by the existing tooling close the block on any
    // later `---`, not only a whole `---` line; matching textually keeps
    // both readers agreeing on where the block ends.
    let end = rest.find(DELIMITER)?;
    Some(&rest[..end])
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::{parse_frontmatter, split_list, unquote};

    #[test]
    fn unquote_strips_one_symmetric_layer_only() {
        assert_eq!(unquote("\"a\""), "a");
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"'a'\""), "'a'");
        assert_eq!(unquote("\"a'"), "\"a'");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn split_list_trims_and_drops_empty_items() {
        assert_eq!(split_list(" a, b ,,c, "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn value_keeps_text_after_first_separator() {
        let parsed = parse_frontmatter("---\nlink: https://example.com/a\n---\n");
        assert_eq!(parsed.get("link"), Some("https://example.com/a"));
    }

    #[test]
    fn duplicate_keys_keep_last_value_and_are_reported() {
        let parsed = parse_frontmatter("---\ntags: a\ntags: b\n---\n");
        assert_eq!(parsed.get("tags"), Some("b"));
        assert_eq!(parsed.duplicate_keys(), ["tags".to_string()]);
    }

    #[test]
    fn crlf_documents_parse_like_lf_documents() {
        let parsed = parse_frontmatter("---\r\ntitle: \"X\"\r\nstatus: draft\r\n---\r\nbody");
        assert_eq!(parsed.get("title"), Some("X"));
        assert_eq!(parsed.get("status"), Some("draft"));
    }
}
