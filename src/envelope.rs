//! JSON envelope around a parsed document.
//!
//! Wraps the parsed blocks with metadata that makes on-disk inspection and
//! diffing easier: schema versioning, position encoding, and source info.
//! The formatted-text model itself is a pure in-memory value; this wrapper
//! is the CLI's debugging surface, not part of the core.

use serde::{Deserialize, Serialize};

use crate::markdown::Block;

/// Schema version for this JSON payload.
///
/// Bump when making non-backwards-compatible changes to the structure.
pub const SCHEMA_VERSION: u32 = 1;

/// The generator name stored in the envelope.
pub const GENERATOR_NAME: &str = "rangemark";

/// The generator version stored in the envelope.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level JSON file written next to generated HTML on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFile {
    pub schema_version: u32,

    pub generator: GeneratorInfo,

    /// How to interpret all range positions contained in this file.
    pub position_encoding: PositionEncoding,

    pub source: SourceInfo,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

/// Identifies the program that produced the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub version: String,
}

impl Default for GeneratorInfo {
    fn default() -> Self {
        Self {
            name: GENERATOR_NAME.to_string(),
            version: GENERATOR_VERSION.to_string(),
        }
    }
}

/// Captures how range positions should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEncoding {
    pub unit: PositionUnit,
    pub base: PositionBase,
}

impl Default for PositionEncoding {
    fn default() -> Self {
        Self {
            unit: PositionUnit::Char,
            base: PositionBase::BlockText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionUnit {
    /// Character offsets (Unicode scalar values), not bytes.
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionBase {
    /// Positions are measured within each block's own text, after delimiter
    /// characters were stripped by the Markdown adapter.
    BlockText,
}

/// Optional information about the input used to produce the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// If available, a path to the `.md` file used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Length of the Markdown body (frontmatter excluded) in characters.
    pub char_len: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse;

    #[test]
    fn docfile_json_round_trip() {
        let blocks = parse("# Title\n\nSome **bold** text with [a link](https://x.y).\n")
            .expect("parse");
        let doc = DocFile {
            schema_version: SCHEMA_VERSION,
            generator: GeneratorInfo::default(),
            position_encoding: PositionEncoding::default(),
            source: SourceInfo {
                path: Some("docs/sample.md".to_string()),
                char_len: 52,
            },
            blocks,
        };

        let json = serde_json::to_string_pretty(&doc).expect("serialize");
        let back: DocFile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(doc, back);
    }
}
