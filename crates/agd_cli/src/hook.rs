//! Tool hook payload parsing.
//!
//! Hooks deliver a JSON object on stdin; only `tool_input.file_path` and
//! `tool_input.content` are read. Missing fields default to empty strings.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Read};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_input: ToolInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug)]
pub enum HookInputError {
    Read(io::Error),
    Parse(serde_json::Error),
}

impl Display for HookInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "cannot read hook input: {err}"),
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HookInputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

pub fn parse_hook_input(raw: &str) -> Result<HookInput, HookInputError> {
    serde_json::from_str(raw).map_err(HookInputError::Parse)
}

pub fn read_hook_input(mut reader: impl Read) -> Result<HookInput, HookInputError> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .map_err(HookInputError::Read)?;
    parse_hook_input(&raw)
}

#[cfg(test)]
mod tests {
    use super::{parse_hook_input, read_hook_input, HookInputError};

    #[test]
    fn reads_tool_input_fields() {
        let input = parse_hook_input(
            r#"{"tool_name": "Write", "tool_input": {"file_path": "/p/a.md", "content": "x"}}"#,
        )
        .unwrap();
        assert_eq!(input.tool_input.file_path, "/p/a.md");
        assert_eq!(input.tool_input.content, "x");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let input = parse_hook_input("{}").unwrap();
        assert!(input.tool_input.file_path.is_empty());
        assert!(input.tool_input.content.is_empty());
    }

    #[test]
    fn empty_or_invalid_payload_is_a_parse_error() {
        assert!(matches!(
            read_hook_input("".as_bytes()),
            Err(HookInputError::Parse(_))
        ));
        assert!(matches!(
            parse_hook_input("[1, 2"),
            Err(HookInputError::Parse(_))
        ));
    }
}
