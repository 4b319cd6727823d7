//! Built-in XML Schema atomic types and the non-atomic pseudo-types

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ConversionError;

/// The XML Schema namespace
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// One of the built-in XML Schema atomic datatypes.
///
/// Equality is identity of the schema type, so values can be used as map
/// keys. Adding a variant forces every exhaustive match in the encode and
/// decode tables to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomicType {
    UntypedAtomic,
    String,
    NormalizedString,
    Token,
    Language,
    NmToken,
    Name,
    NcName,
    Id,
    IdRef,
    Entity,
    AnyUri,
    QName,
    Notation,
    Boolean,
    Decimal,
    Integer,
    NonPositiveInteger,
    NegativeInteger,
    Long,
    Int,
    Short,
    Byte,
    NonNegativeInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    PositiveInteger,
    Float,
    Double,
    Duration,
    DayTimeDuration,
    YearMonthDuration,
    DateTime,
    DateTimeStamp,
    Date,
    Time,
    GYearMonth,
    GYear,
    GMonthDay,
    GDay,
    GMonth,
    HexBinary,
    Base64Binary,
}

const ALL: [AtomicType; 45] = [
    AtomicType::UntypedAtomic,
    AtomicType::String,
    AtomicType::NormalizedString,
    AtomicType::Token,
    AtomicType::Language,
    AtomicType::NmToken,
    AtomicType::Name,
    AtomicType::NcName,
    AtomicType::Id,
    AtomicType::IdRef,
    AtomicType::Entity,
    AtomicType::AnyUri,
    AtomicType::QName,
    AtomicType::Notation,
    AtomicType::Boolean,
    AtomicType::Decimal,
    AtomicType::Integer,
    AtomicType::NonPositiveInteger,
    AtomicType::NegativeInteger,
    AtomicType::Long,
    AtomicType::Int,
    AtomicType::Short,
    AtomicType::Byte,
    AtomicType::NonNegativeInteger,
    AtomicType::UnsignedLong,
    AtomicType::UnsignedInt,
    AtomicType::UnsignedShort,
    AtomicType::UnsignedByte,
    AtomicType::PositiveInteger,
    AtomicType::Float,
    AtomicType::Double,
    AtomicType::Duration,
    AtomicType::DayTimeDuration,
    AtomicType::YearMonthDuration,
    AtomicType::DateTime,
    AtomicType::DateTimeStamp,
    AtomicType::Date,
    AtomicType::Time,
    AtomicType::GYearMonth,
    AtomicType::GYear,
    AtomicType::GMonthDay,
    AtomicType::GDay,
    AtomicType::GMonth,
    AtomicType::HexBinary,
    AtomicType::Base64Binary,
];

impl AtomicType {
    /// Every built-in atomic type, in declaration order
    pub fn all() -> &'static [AtomicType] {
        &ALL
    }

    /// Local name within the XML Schema namespace
    pub fn local_name(self) -> &'static str {
        match self {
            AtomicType::UntypedAtomic => "untypedAtomic",
            AtomicType::String => "string",
            AtomicType::NormalizedString => "normalizedString",
            AtomicType::Token => "token",
            AtomicType::Language => "language",
            AtomicType::NmToken => "NMTOKEN",
            AtomicType::Name => "Name",
            AtomicType::NcName => "NCName",
            AtomicType::Id => "ID",
            AtomicType::IdRef => "IDREF",
            AtomicType::Entity => "ENTITY",
            AtomicType::AnyUri => "anyURI",
            AtomicType::QName => "QName",
            AtomicType::Notation => "NOTATION",
            AtomicType::Boolean => "boolean",
            AtomicType::Decimal => "decimal",
            AtomicType::Integer => "integer",
            AtomicType::NonPositiveInteger => "nonPositiveInteger",
            AtomicType::NegativeInteger => "negativeInteger",
            AtomicType::Long => "long",
            AtomicType::Int => "int",
            AtomicType::Short => "short",
            AtomicType::Byte => "byte",
            AtomicType::NonNegativeInteger => "nonNegativeInteger",
            AtomicType::UnsignedLong => "unsignedLong",
            AtomicType::UnsignedInt => "unsignedInt",
            AtomicType::UnsignedShort => "unsignedShort",
            AtomicType::UnsignedByte => "unsignedByte",
            AtomicType::PositiveInteger => "positiveInteger",
            AtomicType::Float => "float",
            AtomicType::Double => "double",
            AtomicType::Duration => "duration",
            AtomicType::DayTimeDuration => "dayTimeDuration",
            AtomicType::YearMonthDuration => "yearMonthDuration",
            AtomicType::DateTime => "dateTime",
            AtomicType::DateTimeStamp => "dateTimeStamp",
            AtomicType::Date => "date",
            AtomicType::Time => "time",
            AtomicType::GYearMonth => "gYearMonth",
            AtomicType::GYear => "gYear",
            AtomicType::GMonthDay => "gMonthDay",
            AtomicType::GDay => "gDay",
            AtomicType::GMonth => "gMonth",
            AtomicType::HexBinary => "hexBinary",
            AtomicType::Base64Binary => "base64Binary",
        }
    }

    /// Look up a type by its local name in the XML Schema namespace.
    ///
    /// The caller is responsible for having established that the name is
    /// namespace-qualified; see [`crate::registry::resolve`].
    pub fn from_local_name(local: &str) -> Option<AtomicType> {
        ALL.iter().copied().find(|t| t.local_name() == local)
    }

    /// Whether this type's lexical form depends on in-scope namespaces
    pub fn is_namespace_sensitive(self) -> bool {
        matches!(self, AtomicType::QName | AtomicType::Notation)
    }

    /// Whether this type belongs to the integer family (derived from `xs:integer`)
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            AtomicType::Integer
                | AtomicType::NonPositiveInteger
                | AtomicType::NegativeInteger
                | AtomicType::Long
                | AtomicType::Int
                | AtomicType::Short
                | AtomicType::Byte
                | AtomicType::NonNegativeInteger
                | AtomicType::UnsignedLong
                | AtomicType::UnsignedInt
                | AtomicType::UnsignedShort
                | AtomicType::UnsignedByte
                | AtomicType::PositiveInteger
        )
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xs:{}", self.local_name())
    }
}

impl FromStr for AtomicType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::registry::resolve_atomic(s)
    }
}

impl Serialize for AtomicType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A sequence type as named by the surrounding value-model layer.
///
/// Only [`ItemType::Atomic`] has convertors; the others are opaque here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// An atomic type
    Atomic(AtomicType),
    /// `item()`
    Item,
    /// `node()`
    Node,
    /// `map(*)`
    Map,
    /// `array(*)`
    Array,
}

impl ItemType {
    /// The atomic type, if this is one
    pub fn atomic(self) -> Option<AtomicType> {
        match self {
            ItemType::Atomic(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn from_pseudo(s: &str) -> Option<ItemType> {
        match s {
            "item()" => Some(ItemType::Item),
            "node()" => Some(ItemType::Node),
            "map(*)" => Some(ItemType::Map),
            "array(*)" => Some(ItemType::Array),
            _ => None,
        }
    }
}

impl From<AtomicType> for ItemType {
    fn from(t: AtomicType) -> Self {
        ItemType::Atomic(t)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Atomic(t) => fmt::Display::fmt(t, f),
            ItemType::Item => f.write_str("item()"),
            ItemType::Node => f.write_str("node()"),
            ItemType::Map => f.write_str("map(*)"),
            ItemType::Array => f.write_str("array(*)"),
        }
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn local_names_are_unique() {
        let names: HashSet<_> = AtomicType::all().iter().map(|t| t.local_name()).collect();
        assert_eq!(names.len(), AtomicType::all().len());
    }

    #[test]
    fn local_name_lookup_is_case_sensitive() {
        assert_eq!(AtomicType::from_local_name("gYear"), Some(AtomicType::GYear));
        assert_eq!(AtomicType::from_local_name("gyear"), None);
        assert_eq!(AtomicType::from_local_name("NMTOKEN"), Some(AtomicType::NmToken));
    }

    #[test]
    fn display_uses_xs_prefix() {
        assert_eq!(AtomicType::DateTime.to_string(), "xs:dateTime");
        assert_eq!(ItemType::Map.to_string(), "map(*)");
    }

    #[test]
    fn integer_family_membership() {
        assert!(AtomicType::UnsignedByte.is_integer());
        assert!(!AtomicType::Decimal.is_integer());
        assert!(AtomicType::QName.is_namespace_sensitive());
    }
}
