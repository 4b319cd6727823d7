//! Type registry
//!
//! Resolves type identifiers to [`AtomicType`]s and holds the one convertor
//! per type. The convertor table is built on first use under the lock inside
//! [`OnceCell`] and is read without locking afterwards.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use ibig::IBig;
use log::debug;
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;

use crate::convert::{convertor_for, Convertor};
use crate::error::{ConversionError, Result};
use crate::types::{AtomicType, ItemType, XS_NAMESPACE};
use crate::value::{QName, Value, XsdDecimal};

static REGISTRY: OnceCell<TypeRegistry> = OnceCell::new();

/// Immutable table of convertors, one per built-in atomic type
#[derive(Debug)]
pub struct TypeRegistry {
    // indexed by declaration order of `AtomicType`
    convertors: Vec<Box<dyn Convertor>>,
}

impl TypeRegistry {
    fn build() -> Self {
        let convertors: Vec<_> = AtomicType::all().iter().map(|t| convertor_for(*t)).collect();
        debug!("type registry built with {} atomic types", convertors.len());
        Self { convertors }
    }

    /// The convertor serving `ty`
    pub fn convertor(&self, ty: AtomicType) -> &dyn Convertor {
        self.convertors[ty as usize].as_ref()
    }

    pub fn len(&self) -> usize {
        self.convertors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.convertors.is_empty()
    }

    /// Every registered type with its convertor
    pub fn iter(&self) -> impl Iterator<Item = (AtomicType, &dyn Convertor)> + '_ {
        self.convertors.iter().map(|c| (c.atomic_type(), c.as_ref()))
    }
}

/// The process-wide registry, built on first call
pub fn registry() -> &'static TypeRegistry {
    REGISTRY.get_or_init(TypeRegistry::build)
}

/// Resolve a type identifier.
///
/// Accepted spellings are `xs:NAME`, `Q{http://www.w3.org/2001/XMLSchema}NAME`
/// and the pseudo-types `item()`, `node()`, `map(*)`, `array(*)`. Matching is
/// case-sensitive and a bare local name such as `string` is not accepted.
pub fn resolve(identifier: &str) -> Result<ItemType> {
    if let Some(pseudo) = ItemType::from_pseudo(identifier) {
        return Ok(pseudo);
    }
    let local = if let Some(local) = identifier.strip_prefix("xs:") {
        Some(local)
    } else {
        identifier
            .strip_prefix("Q{")
            .and_then(|rest| rest.split_once('}'))
            .filter(|(ns, _)| *ns == XS_NAMESPACE)
            .map(|(_, local)| local)
    };
    local
        .and_then(AtomicType::from_local_name)
        .map(ItemType::Atomic)
        .ok_or_else(|| ConversionError::unknown_type(identifier))
}

/// Resolve an identifier that must name an atomic type
pub fn resolve_atomic(identifier: &str) -> Result<AtomicType> {
    resolve(identifier)?
        .atomic()
        .ok_or_else(|| ConversionError::unknown_type(identifier))
}

/// Resolve an explicit `(namespace, local)` pair
pub fn resolve_qualified(namespace: &str, local: &str) -> Result<AtomicType> {
    if namespace != XS_NAMESPACE {
        return Err(ConversionError::unknown_type(format!("Q{{{}}}{}", namespace, local)));
    }
    AtomicType::from_local_name(local)
        .ok_or_else(|| ConversionError::unknown_type(format!("Q{{{}}}{}", namespace, local)))
}

/// Rust types with a natural atomic type
pub trait NativeType {
    const ATOMIC_TYPE: AtomicType;
}

macro_rules! native_types {
    ($($native:ty => $atomic:ident),* $(,)?) => {
        $(impl NativeType for $native {
            const ATOMIC_TYPE: AtomicType = AtomicType::$atomic;
        })*
    };
}

native_types! {
    bool => Boolean,
    i64 => Integer,
    IBig => Integer,
    Decimal => Decimal,
    XsdDecimal => Decimal,
    f32 => Float,
    f64 => Double,
    String => String,
    &str => String,
    NaiveDate => Date,
    DateTime<FixedOffset> => DateTime,
    NaiveTime => Time,
    Vec<u8> => Base64Binary,
    QName => QName,
}

/// The atomic type a Rust type stands for
pub fn resolve_native<T: NativeType + ?Sized>() -> AtomicType {
    T::ATOMIC_TYPE
}

impl AtomicType {
    /// The type a value converts to when no type is named. `Absent` has none.
    pub fn implicit_for(value: &Value) -> Option<AtomicType> {
        Some(match value {
            Value::Absent => return None,
            Value::Boolean(_) => AtomicType::Boolean,
            Value::Integer(_) | Value::BigInteger(_) => AtomicType::Integer,
            Value::Decimal(_) => AtomicType::Decimal,
            Value::Float(_) => AtomicType::Float,
            Value::Double(_) => AtomicType::Double,
            Value::String(_) => AtomicType::String,
            Value::Bytes(_) => AtomicType::Base64Binary,
            Value::Date(_) => AtomicType::Date,
            Value::DateTime(_) => AtomicType::DateTime,
            Value::Time(_) => AtomicType::Time,
            Value::QName(_) => AtomicType::QName,
            Value::Duration(_) => AtomicType::Duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn table_is_indexed_by_type() {
        let reg = registry();
        assert_eq!(reg.len(), AtomicType::all().len());
        for (ty, c) in reg.iter() {
            assert_eq!(reg.convertor(ty).atomic_type(), ty);
            assert_eq!(c.atomic_type(), ty);
        }
    }

    #[test]
    fn prefixed_and_expanded_names() {
        assert_eq!(resolve("xs:gYear").unwrap(), ItemType::Atomic(AtomicType::GYear));
        assert_eq!(
            resolve("Q{http://www.w3.org/2001/XMLSchema}nonNegativeInteger").unwrap(),
            ItemType::Atomic(AtomicType::NonNegativeInteger)
        );
        assert_eq!(resolve("map(*)").unwrap(), ItemType::Map);
    }

    #[test]
    fn bare_and_foreign_names_are_unknown() {
        for id in ["string", "xs:String", "Q{urn:other}string", "xsd:string", "item", ""] {
            assert_eq!(resolve(id).unwrap_err().kind(), ErrorKind::UnknownType, "{}", id);
        }
        assert_eq!(
            resolve_atomic("node()").unwrap_err().kind(),
            ErrorKind::UnknownType
        );
    }

    #[test]
    fn qualified_pair() {
        assert_eq!(resolve_qualified(XS_NAMESPACE, "time").unwrap(), AtomicType::Time);
        assert!(resolve_qualified("", "time").is_err());
    }

    #[test]
    fn native_shortcuts() {
        assert_eq!(resolve_native::<i64>(), AtomicType::Integer);
        assert_eq!(resolve_native::<f32>(), AtomicType::Float);
        assert_eq!(resolve_native::<Vec<u8>>(), AtomicType::Base64Binary);
        assert_eq!(resolve_native::<DateTime<FixedOffset>>(), AtomicType::DateTime);
    }

    #[test]
    fn from_str_goes_through_resolve() {
        assert_eq!("xs:double".parse::<AtomicType>().unwrap(), AtomicType::Double);
        assert!("double".parse::<AtomicType>().is_err());
    }
}
