//! Text parsers for decision record content.
//!
//! Parsers are pure: no filesystem access, no logging state required.

pub mod frontmatter;
