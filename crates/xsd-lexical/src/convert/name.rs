//! String, name and token types.
//!
//! These are grammar-only: a valid string is returned as given.

use iri_string::types::IriReferenceStr;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::types::AtomicType;
use crate::value::{NativeValue, Value};

// XML 1.0 (fifth edition) NameStartChar without ':' and the extra NameChars
const NC_NAME_START: &str = r"A-Z_a-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}";
const NAME_EXTRA: &str = r"\-.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

static NCNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[{s}][{s}{e}]*$", s = NC_NAME_START, e = NAME_EXTRA))
        .expect("valid NCName regex")
});
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[:{s}][:{s}{e}]*$", s = NC_NAME_START, e = NAME_EXTRA))
        .expect("valid Name regex")
});
static NMTOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[:{s}{e}]+$", s = NC_NAME_START, e = NAME_EXTRA))
        .expect("valid NMTOKEN regex")
});
static LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*$").expect("valid language regex")
});

pub(crate) fn is_ncname(s: &str) -> bool {
    NCNAME_RE.is_match(s)
}

fn is_normalized(s: &str) -> bool {
    !s.contains(['\r', '\n', '\t'])
}

fn is_token(s: &str) -> bool {
    is_normalized(s) && !s.starts_with(' ') && !s.ends_with(' ') && !s.contains("  ")
}

fn is_any_uri(s: &str) -> bool {
    IriReferenceStr::new(s).is_ok()
}

/// The string family, from `xs:string` down to `xs:ID`
#[derive(Debug, Clone, Copy)]
pub struct NameToken {
    ty: AtomicType,
}

impl NameToken {
    pub fn new(ty: AtomicType) -> Self {
        Self { ty }
    }

    /// Whether `s` is in the lexical space of this type
    pub fn accepts(&self, s: &str) -> bool {
        match self.ty {
            AtomicType::NormalizedString => is_normalized(s),
            AtomicType::Token => is_token(s),
            AtomicType::Language => LANGUAGE_RE.is_match(s),
            AtomicType::NmToken => NMTOKEN_RE.is_match(s),
            AtomicType::Name => NAME_RE.is_match(s),
            AtomicType::NcName | AtomicType::Id | AtomicType::IdRef | AtomicType::Entity => {
                is_ncname(s)
            }
            AtomicType::AnyUri => is_any_uri(s),
            _ => true,
        }
    }
}

impl Convertor for NameToken {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::NameToken
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if self.accepts(&text) {
            Ok(text)
        } else {
            Err(ConversionError::malformed(
                self.ty,
                format!("{:?} is not a valid {}", text, self.ty.local_name()),
            ))
        }
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        NativeValue::String(lexical.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(ty: AtomicType, s: &str) -> bool {
        NameToken::new(ty).accepts(s)
    }

    #[test]
    fn ncname_excludes_colon() {
        assert!(accepts(AtomicType::NcName, "thingy"));
        assert!(accepts(AtomicType::NcName, "_a-b.c"));
        assert!(!accepts(AtomicType::NcName, "a:thingy"));
        assert!(!accepts(AtomicType::NcName, "1abc"));
        assert!(accepts(AtomicType::Name, "a:thingy"));
        assert!(accepts(AtomicType::Id, "été"));
    }

    #[test]
    fn nmtoken_may_start_with_digit() {
        assert!(accepts(AtomicType::NmToken, "123-abc"));
        assert!(!accepts(AtomicType::NmToken, "a b"));
        assert!(!accepts(AtomicType::NmToken, ""));
    }

    #[test]
    fn token_whitespace_rules() {
        assert!(accepts(AtomicType::Token, "a b c"));
        assert!(!accepts(AtomicType::Token, " a"));
        assert!(!accepts(AtomicType::Token, "a  b"));
        assert!(accepts(AtomicType::NormalizedString, " a  b "));
        assert!(!accepts(AtomicType::NormalizedString, "a\tb"));
    }

    #[test]
    fn language_tags() {
        assert!(accepts(AtomicType::Language, "en-GB"));
        assert!(!accepts(AtomicType::Language, "toolonglanguage"));
    }

    #[test]
    fn any_uri() {
        assert!(accepts(AtomicType::AnyUri, "http://example.com/a?b#c"));
        assert!(accepts(AtomicType::AnyUri, "relative/path"));
        assert!(!accepts(AtomicType::AnyUri, "http://exa mple.com/"));
    }

    #[test]
    fn encode_returns_input_unchanged() {
        let c = NameToken::new(AtomicType::Token);
        assert_eq!(c.encode(&Value::from("a b")).unwrap(), "a b");
        let s = NameToken::new(AtomicType::String);
        assert_eq!(s.encode(&Value::Integer(5)).unwrap(), "5");
    }
}
