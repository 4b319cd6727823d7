//! Conversion settings

use serde::{Deserialize, Serialize};

/// Letter case of `xs:hexBinary` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    #[default]
    Upper,
    Lower,
}

/// Settings carried by a [`crate::Converter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Check grammar and bounds before decoding instead of falling back to
    /// the lexical string
    pub strict_decode: bool,
    pub hex_case: HexCase,
}

impl ConvertConfig {
    pub fn strict() -> Self {
        Self {
            strict_decode: true,
            ..Self::default()
        }
    }
}
