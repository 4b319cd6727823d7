//! Convertor families
//!
//! Each atomic type is served by exactly one convertor, chosen by
//! [`convertor_for`]. A convertor owns both directions:
//!
//! - `encode` turns a native [`Value`] into a lexical string, enforcing
//!   grammar and bounds
//! - `decode` picks a native representation for a lexical string that is
//!   assumed to be valid already

pub mod binary;
pub mod boolean;
pub mod duration;
pub mod gregorian;
pub mod name;
pub mod numeric;
pub mod qname;
pub mod temporal;

use std::fmt::Debug;

use crate::error::Result;
use crate::types::AtomicType;
use crate::value::{NativeValue, Value};

pub use binary::Binary;
pub use boolean::BooleanConvertor;
pub use duration::DurationConvertor;
pub use gregorian::GregorianFragment;
pub use name::NameToken;
pub use numeric::{ByteSized, DecimalConvertor, FloatLike, IntegerBounded};
pub use qname::QNameLike;
pub use temporal::Temporal;

/// Which family a convertor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    IntegerBounded,
    ByteSized,
    Decimal,
    FloatLike,
    Duration,
    Temporal,
    GregorianFragment,
    Binary,
    NameToken,
    Boolean,
    QNameLike,
}

/// A pair of conversions for one atomic type.
///
/// Implementations are pure: the same input always gives the same output
/// and nothing is cached between calls.
pub trait Convertor: Send + Sync + Debug {
    /// The type this convertor was built for
    fn atomic_type(&self) -> AtomicType;

    fn family(&self) -> Family;

    /// Produce the lexical form of `value`, or fail with
    /// `MalformedValue`/`ValueOutOfRange`
    fn encode(&self, value: &Value) -> Result<String>;

    /// Choose a native representation for an already valid lexical string
    fn decode(&self, lexical: &str) -> NativeValue;

    /// Check that `lexical` is in the lexical and value space of the type.
    ///
    /// Families whose encoder accepts strings with a different meaning
    /// (bytes, truthiness) override this.
    fn validate(&self, lexical: &str) -> Result<()> {
        self.encode(&Value::String(lexical.to_string())).map(|_| ())
    }
}

/// Identity decode used when a lexical string has no richer representation
/// or does not fit the pattern a decoder expects
pub(crate) fn identity(ty: AtomicType, lexical: &str) -> NativeValue {
    log::debug!("{}: decoding {:?} as plain string", ty, lexical);
    NativeValue::String(lexical.to_string())
}

/// Short description of a value for error messages
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Absent => "no value".to_string(),
        Value::String(s) => format!("string {:?}", s),
        Value::Bytes(b) => format!("{} bytes", b.len()),
        other => format!("{:?}", other),
    }
}

/// Build the convertor serving `ty`
pub fn convertor_for(ty: AtomicType) -> Box<dyn Convertor> {
    match ty {
        AtomicType::UntypedAtomic
        | AtomicType::String
        | AtomicType::NormalizedString
        | AtomicType::Token
        | AtomicType::Language
        | AtomicType::NmToken
        | AtomicType::Name
        | AtomicType::NcName
        | AtomicType::Id
        | AtomicType::IdRef
        | AtomicType::Entity
        | AtomicType::AnyUri => Box::new(NameToken::new(ty)),
        AtomicType::QName | AtomicType::Notation => Box::new(QNameLike::new(ty)),
        AtomicType::Boolean => Box::new(BooleanConvertor),
        AtomicType::Decimal => Box::new(DecimalConvertor),
        AtomicType::Byte | AtomicType::UnsignedByte => Box::new(ByteSized::new(ty)),
        AtomicType::Integer
        | AtomicType::NonPositiveInteger
        | AtomicType::NegativeInteger
        | AtomicType::Long
        | AtomicType::Int
        | AtomicType::Short
        | AtomicType::NonNegativeInteger
        | AtomicType::UnsignedLong
        | AtomicType::UnsignedInt
        | AtomicType::UnsignedShort
        | AtomicType::PositiveInteger => Box::new(IntegerBounded::new(ty)),
        AtomicType::Float => Box::new(FloatLike::float()),
        AtomicType::Double => Box::new(FloatLike::double()),
        AtomicType::Duration | AtomicType::DayTimeDuration | AtomicType::YearMonthDuration => {
            Box::new(DurationConvertor::new(ty))
        }
        AtomicType::DateTime | AtomicType::DateTimeStamp | AtomicType::Date | AtomicType::Time => {
            Box::new(Temporal::new(ty))
        }
        AtomicType::GYearMonth
        | AtomicType::GYear
        | AtomicType::GMonthDay
        | AtomicType::GDay
        | AtomicType::GMonth => Box::new(GregorianFragment::new(ty)),
        AtomicType::HexBinary | AtomicType::Base64Binary => Box::new(Binary::new(ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_gets_its_own_convertor() {
        for ty in AtomicType::all() {
            let c = convertor_for(*ty);
            assert_eq!(c.atomic_type(), *ty);
        }
    }

    #[test]
    fn byte_types_use_byte_family() {
        assert_eq!(convertor_for(AtomicType::Byte).family(), Family::ByteSized);
        assert_eq!(convertor_for(AtomicType::Short).family(), Family::IntegerBounded);
        assert_eq!(convertor_for(AtomicType::GDay).family(), Family::GregorianFragment);
    }
}
