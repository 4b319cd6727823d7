//! `xs:base64Binary` and `xs:hexBinary`

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{describe, identity, Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::types::AtomicType;
use crate::value::{NativeValue, Value};

#[derive(Debug, Clone, Copy)]
pub struct Binary {
    ty: AtomicType,
}

impl Binary {
    pub fn new(ty: AtomicType) -> Self {
        Self { ty }
    }

    fn is_hex(&self) -> bool {
        self.ty == AtomicType::HexBinary
    }

    fn bytes_of(&self, lexical: &str) -> Option<Vec<u8>> {
        if self.is_hex() {
            hex::decode(lexical).ok()
        } else {
            let compact: String = lexical.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            STANDARD.decode(compact).ok()
        }
    }
}

impl Convertor for Binary {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::Binary
    }

    /// Treats strings as raw bytes; hex output is uppercase
    fn encode(&self, value: &Value) -> Result<String> {
        let bytes: &[u8] = match value {
            Value::Bytes(b) => b,
            Value::String(s) => s.as_bytes(),
            other => {
                return Err(ConversionError::malformed(
                    self.ty,
                    format!("expected bytes, got {}", describe(other)),
                ))
            }
        };
        Ok(if self.is_hex() {
            hex::encode_upper(bytes)
        } else {
            STANDARD.encode(bytes)
        })
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        match self.bytes_of(lexical) {
            Some(bytes) => NativeValue::Binary(bytes),
            None => identity(self.ty, lexical),
        }
    }

    fn validate(&self, lexical: &str) -> Result<()> {
        match self.bytes_of(lexical) {
            Some(_) => Ok(()),
            None => Err(ConversionError::malformed(
                self.ty,
                format!("{:?} is not valid {}", lexical, self.ty.local_name()),
            )),
        }
    }
}
