//! Integer, decimal and floating point convertors

use ibig::IBig;

use super::{describe, identity, Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::lexical::{
    canonical_decimal, exact_decimal_from_f64, format_double, format_float, is_decimal_lexical,
    is_number_lexical, parse_integer, Bounds,
};
use crate::types::AtomicType;
use crate::value::{NativeValue, Value, XsdDecimal};

/// Value-space bounds of the integer family
pub fn integer_bounds(ty: AtomicType) -> Bounds {
    match ty {
        AtomicType::Byte => Bounds::closed(i8::MIN.into(), i8::MAX.into()),
        AtomicType::Short => Bounds::closed(i16::MIN.into(), i16::MAX.into()),
        AtomicType::Int => Bounds::closed(i32::MIN.into(), i32::MAX.into()),
        AtomicType::Long => Bounds::closed(i64::MIN.into(), i64::MAX.into()),
        AtomicType::UnsignedByte => Bounds::closed(0, u8::MAX.into()),
        AtomicType::UnsignedShort => Bounds::closed(0, u16::MAX.into()),
        AtomicType::UnsignedInt => Bounds::closed(0, u32::MAX.into()),
        AtomicType::UnsignedLong => Bounds::closed(0, u64::MAX.into()),
        AtomicType::PositiveInteger => Bounds::new(Some(1), None),
        AtomicType::NonNegativeInteger => Bounds::new(Some(0), None),
        AtomicType::NegativeInteger => Bounds::new(None, Some(-1)),
        AtomicType::NonPositiveInteger => Bounds::new(None, Some(0)),
        _ => Bounds::UNBOUNDED,
    }
}

fn integer_from_value(ty: AtomicType, value: &Value) -> Result<IBig> {
    match value {
        Value::Integer(i) => Ok(IBig::from(*i)),
        Value::BigInteger(i) => Ok(i.clone()),
        Value::String(s) => parse_integer(s).ok_or_else(|| {
            ConversionError::malformed(ty, format!("{:?} does not match [+-]?[0-9]+", s))
        }),
        other => Err(ConversionError::malformed(
            ty,
            format!("expected an integer, got {}", describe(other)),
        )),
    }
}

fn check_bounds(ty: AtomicType, bounds: Bounds, n: IBig) -> Result<String> {
    if bounds.contains(&n) {
        Ok(n.to_string())
    } else {
        Err(ConversionError::out_of_range(
            ty,
            format!("{} is outside {}", n, bounds),
        ))
    }
}

fn decode_integer(ty: AtomicType, lexical: &str) -> NativeValue {
    match parse_integer(lexical) {
        Some(n) => match i64::try_from(&n) {
            Ok(i) => NativeValue::Integer(i),
            Err(_) => NativeValue::BigInteger(n),
        },
        None => identity(ty, lexical),
    }
}

/// `xs:integer` and its bounded subtypes
#[derive(Debug, Clone, Copy)]
pub struct IntegerBounded {
    ty: AtomicType,
    bounds: Bounds,
}

impl IntegerBounded {
    pub fn new(ty: AtomicType) -> Self {
        Self {
            ty,
            bounds: integer_bounds(ty),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl Convertor for IntegerBounded {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::IntegerBounded
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let n = integer_from_value(self.ty, value)?;
        check_bounds(self.ty, self.bounds, n)
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        decode_integer(self.ty, lexical)
    }
}

/// `xs:byte` and `xs:unsignedByte`.
///
/// Besides integers, a one-byte string or byte slice is read as its raw
/// byte, signed for `xs:byte`. A string that is also an integer literal is
/// read as the integer.
#[derive(Debug, Clone, Copy)]
pub struct ByteSized {
    ty: AtomicType,
    signed: bool,
}

impl ByteSized {
    pub fn new(ty: AtomicType) -> Self {
        Self {
            ty,
            signed: ty == AtomicType::Byte,
        }
    }

    fn raw(&self, byte: u8) -> IBig {
        if self.signed {
            IBig::from(byte as i8)
        } else {
            IBig::from(byte)
        }
    }
}

impl Convertor for ByteSized {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::ByteSized
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let n = match value {
            Value::String(s) if parse_integer(s).is_none() && s.len() == 1 => {
                self.raw(s.as_bytes()[0])
            }
            Value::Bytes(b) if b.len() == 1 => self.raw(b[0]),
            Value::Bytes(b) => {
                return Err(ConversionError::malformed(
                    self.ty,
                    format!("expected a single byte, got {} bytes", b.len()),
                ))
            }
            other => integer_from_value(self.ty, other)?,
        };
        check_bounds(self.ty, integer_bounds(self.ty), n)
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        let decoded = if self.signed {
            lexical.parse::<i8>().ok().map(NativeValue::Byte)
        } else {
            lexical.parse::<u8>().ok().map(NativeValue::UnsignedByte)
        };
        decoded.unwrap_or_else(|| identity(self.ty, lexical))
    }

    fn validate(&self, lexical: &str) -> Result<()> {
        let n = integer_from_value(self.ty, &Value::String(lexical.to_string()))?;
        check_bounds(self.ty, integer_bounds(self.ty), n).map(|_| ())
    }
}

/// `xs:decimal`
#[derive(Debug, Clone, Copy)]
pub struct DecimalConvertor;

impl Convertor for DecimalConvertor {
    fn atomic_type(&self) -> AtomicType {
        AtomicType::Decimal
    }

    fn family(&self) -> Family {
        Family::Decimal
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let ty = AtomicType::Decimal;
        match value {
            Value::Integer(i) => Ok(i.to_string()),
            Value::BigInteger(i) => Ok(i.to_string()),
            Value::Decimal(d) => Ok(d.to_string()),
            Value::Double(v) => exact_decimal_from_f64(*v).ok_or_else(|| {
                ConversionError::malformed(ty, format!("{} has no decimal form", format_double(*v)))
            }),
            Value::Float(v) => exact_decimal_from_f64(f64::from(*v)).ok_or_else(|| {
                ConversionError::malformed(ty, format!("{} has no decimal form", format_float(*v)))
            }),
            Value::String(s) if is_decimal_lexical(s) => Ok(canonical_decimal(s)),
            Value::String(s) => Err(ConversionError::malformed(
                ty,
                format!("{:?} does not match [+-]?[0-9]+(\\.[0-9]+)?", s),
            )),
            other => Err(ConversionError::malformed(
                ty,
                format!("expected a number, got {}", describe(other)),
            )),
        }
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        match lexical.parse::<XsdDecimal>() {
            Ok(d) => NativeValue::Decimal(d),
            Err(_) => identity(AtomicType::Decimal, lexical),
        }
    }
}

/// `xs:float` and `xs:double`; float narrows to 32 bits before formatting
#[derive(Debug, Clone, Copy)]
pub struct FloatLike {
    ty: AtomicType,
    narrow: bool,
}

impl FloatLike {
    pub fn float() -> Self {
        Self {
            ty: AtomicType::Float,
            narrow: true,
        }
    }

    pub fn double() -> Self {
        Self {
            ty: AtomicType::Double,
            narrow: false,
        }
    }

    fn format(&self, v: f64) -> String {
        if self.narrow {
            format_float(v as f32)
        } else {
            format_double(v)
        }
    }
}

impl Convertor for FloatLike {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::FloatLike
    }

    fn encode(&self, value: &Value) -> Result<String> {
        match value {
            Value::Float(v) if self.narrow => Ok(format_float(*v)),
            Value::Float(v) => Ok(format_double(f64::from(*v))),
            Value::Double(v) => Ok(self.format(*v)),
            Value::Integer(i) => Ok(self.format(*i as f64)),
            Value::BigInteger(i) => Ok(self.format(i.to_string().parse().unwrap_or(f64::NAN))),
            Value::Decimal(d) => Ok(self.format(d.to_f64())),
            Value::String(s) if is_number_lexical(s) => Ok(s.clone()),
            Value::String(s) => Err(ConversionError::malformed(
                self.ty,
                format!("{:?} is not a number, INF, -INF or NaN", s),
            )),
            other => Err(ConversionError::malformed(
                self.ty,
                format!("expected a number, got {}", describe(other)),
            )),
        }
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        let parsed = match lexical {
            "INF" | "+INF" => Some(f64::INFINITY),
            "-INF" => Some(f64::NEG_INFINITY),
            "NaN" => Some(f64::NAN),
            other => other.parse::<f64>().ok(),
        };
        match parsed {
            Some(v) if self.narrow => NativeValue::Float(v as f32),
            Some(v) => NativeValue::Double(v),
            None => identity(self.ty, lexical),
        }
    }
}
