//! `xs:QName` and `xs:NOTATION`
//!
//! A lexical QName is only meaningful together with the namespace bindings
//! in scope where it appeared, so encoding needs an already resolved
//! [`QName`]. NOTATION values are never constructed here at all.

use once_cell::sync::Lazy;
use regex::Regex;

use super::name::is_ncname;
use super::{describe, identity, Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::types::AtomicType;
use crate::value::{NativeValue, QName, Value};

static EXPANDED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Q\{([^{}]*)\}(.+)$").expect("valid expanded QName regex"));

#[derive(Debug, Clone, Copy)]
pub struct QNameLike {
    ty: AtomicType,
}

impl QNameLike {
    pub fn new(ty: AtomicType) -> Self {
        Self { ty }
    }
}

fn split_lexical(lexical: &str) -> Option<(Option<&str>, &str)> {
    match lexical.split_once(':') {
        Some((prefix, local)) if is_ncname(prefix) && is_ncname(local) => {
            Some((Some(prefix), local))
        }
        None if is_ncname(lexical) => Some((None, lexical)),
        _ => None,
    }
}

impl Convertor for QNameLike {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::QNameLike
    }

    fn encode(&self, value: &Value) -> Result<String> {
        if self.ty == AtomicType::Notation {
            return Err(ConversionError::namespace_sensitive(
                self.ty,
                "NOTATION values cannot be constructed",
            ));
        }
        match value {
            Value::QName(q) => {
                let prefix_ok = q.prefix.as_deref().map_or(true, |p| p.is_empty() || is_ncname(p));
                if prefix_ok && is_ncname(&q.local) {
                    Ok(q.to_string())
                } else {
                    Err(ConversionError::malformed(
                        self.ty,
                        format!("{:?} is not a valid QName", q.to_string()),
                    ))
                }
            }
            other => Err(ConversionError::namespace_sensitive(
                self.ty,
                format!(
                    "{} has no namespace binding; pass a resolved QName",
                    describe(other)
                ),
            )),
        }
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        if let Some(caps) = EXPANDED_RE.captures(lexical) {
            let local = &caps[2];
            if is_ncname(local) {
                let namespace = Some(&caps[1]).filter(|ns| !ns.is_empty());
                return NativeValue::QName(QName::new(namespace.map(str::to_string), local));
            }
        }
        match split_lexical(lexical) {
            Some((prefix, local)) => {
                let mut q = QName::new(None, local);
                q.prefix = prefix.map(str::to_string);
                NativeValue::QName(q)
            }
            None => identity(self.ty, lexical),
        }
    }

    fn validate(&self, lexical: &str) -> Result<()> {
        match split_lexical(lexical) {
            Some(_) => Ok(()),
            None => Err(ConversionError::malformed(
                self.ty,
                format!("{:?} is not a lexical QName", lexical),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn plain_string_is_namespace_sensitive_error() {
        let err = QNameLike::new(AtomicType::QName)
            .encode(&Value::from("a:thingy"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnconvertableNamespaceSensitiveType);
    }

    #[test]
    fn resolved_qname_encodes_prefixed() {
        let q = QName::new(Some("urn:a".to_string()), "thingy").with_prefix("a");
        let c = QNameLike::new(AtomicType::QName);
        assert_eq!(c.encode(&Value::QName(q)).unwrap(), "a:thingy");
    }

    #[test]
    fn notation_never_constructs() {
        let q = QName::new(None, "gif");
        let err = QNameLike::new(AtomicType::Notation)
            .encode(&Value::QName(q))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnconvertableNamespaceSensitiveType);
    }

    #[test]
    fn decode_expanded_and_prefixed() {
        let c = QNameLike::new(AtomicType::QName);
        assert_eq!(
            c.decode("Q{urn:a}thingy"),
            NativeValue::QName(QName::new(Some("urn:a".to_string()), "thingy"))
        );
        assert_eq!(
            c.decode("a:thingy"),
            NativeValue::QName(QName::new(None, "thingy").with_prefix("a"))
        );
        assert_eq!(c.decode("Q{}local"), NativeValue::QName(QName::new(None, "local")));
        assert_eq!(c.decode("a:b:c"), NativeValue::String("a:b:c".to_string()));
    }
}
