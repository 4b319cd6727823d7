//! Configured entry point for encoding and decoding

use log::trace;

use crate::config::{ConvertConfig, HexCase};
use crate::error::{ConversionError, Result};
use crate::registry::{registry, resolve_atomic, TypeRegistry};
use crate::types::AtomicType;
use crate::value::{NativeValue, Value};

/// Handle over the shared registry with per-caller settings.
///
/// Cheap to create; every converter reads the same registry.
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConvertConfig,
    registry: &'static TypeRegistry,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_config(ConvertConfig::default())
    }

    pub fn with_config(config: ConvertConfig) -> Self {
        Self {
            config,
            registry: registry(),
        }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Lexical form of `value` as `ty`
    pub fn encode<V: Into<Value>>(&self, value: V, ty: AtomicType) -> Result<String> {
        let value = value.into();
        trace!("encode {:?} as {}", value, ty);
        let lexical = self.registry.convertor(ty).encode(&value)?;
        Ok(match (ty, self.config.hex_case) {
            (AtomicType::HexBinary, HexCase::Lower) => lexical.to_ascii_lowercase(),
            _ => lexical,
        })
    }

    /// [`Converter::encode`] with the type given as an identifier
    pub fn encode_as<V: Into<Value>>(&self, value: V, identifier: &str) -> Result<String> {
        self.encode(value, resolve_atomic(identifier)?)
    }

    /// Encode with the type implied by the value itself
    pub fn encode_implicit<V: Into<Value>>(&self, value: V) -> Result<String> {
        let value = value.into();
        let ty = AtomicType::implicit_for(&value).ok_or_else(|| {
            ConversionError::malformed("xs:anyAtomicType", "an absent value has no implicit type")
        })?;
        self.encode(value, ty)
    }

    /// Native value for `lexical` as `ty`.
    ///
    /// Only fails when `strict_decode` is set and the string is not valid
    /// for the type.
    pub fn decode(&self, lexical: &str, ty: AtomicType) -> Result<NativeValue> {
        trace!("decode {:?} as {}", lexical, ty);
        let convertor = self.registry.convertor(ty);
        if self.config.strict_decode {
            convertor.validate(lexical)?;
        }
        Ok(convertor.decode(lexical))
    }

    /// [`Converter::decode`] with the type given as an identifier
    pub fn decode_as(&self, lexical: &str, identifier: &str) -> Result<NativeValue> {
        self.decode(lexical, resolve_atomic(identifier)?)
    }
}

/// Encode with default settings
pub fn encode<V: Into<Value>>(value: V, ty: AtomicType) -> Result<String> {
    registry().convertor(ty).encode(&value.into())
}

/// Decode with default settings; never fails
pub fn decode(lexical: &str, ty: AtomicType) -> NativeValue {
    registry().convertor(ty).decode(lexical)
}
