//! Native values on either side of a conversion

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use ibig::IBig;
use rust_decimal::Decimal;

use crate::convert::duration::format_duration;
use crate::error::ConversionError;
use crate::lexical::{
    format_date, format_double, format_float, format_timezone, is_decimal_lexical,
    place_decimal_point, split_sign,
};
use crate::types::AtomicType;

/// An `xs:decimal` of any precision, `unscaled / 10^scale`
///
/// Trailing fractional zeros are stripped on construction, so `12.50` and
/// `12.5` are the same value and compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XsdDecimal {
    unscaled: IBig,
    scale: u32,
}

impl XsdDecimal {
    pub fn new(unscaled: IBig, scale: u32) -> Self {
        let ten = IBig::from(10u8);
        let zero = IBig::from(0u8);
        let (mut unscaled, mut scale) = (unscaled, scale);
        while scale > 0 && &unscaled % &ten == zero {
            unscaled = &unscaled / &ten;
            scale -= 1;
        }
        Self { unscaled, scale }
    }

    pub fn unscaled(&self) -> &IBig {
        &self.unscaled
    }

    /// Number of fractional digits
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_integer(&self) -> bool {
        self.scale == 0
    }

    /// Nearest `rust_decimal::Decimal`, rounded to its 28 significant digits;
    /// `None` when the magnitude is beyond its range
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.to_string()).ok()
    }

    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for XsdDecimal {
    type Err = ConversionError;

    /// Reads the `xs:decimal` grammar, `[+-]?[0-9]+(\.[0-9]+)?`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_decimal_lexical(s) {
            return Err(ConversionError::malformed(
                AtomicType::Decimal,
                format!("{:?} is not a decimal", s),
            ));
        }
        let (negative, body) = split_sign(s);
        let (int, frac) = body.split_once('.').unwrap_or((body, ""));
        let scale = u32::try_from(frac.len()).map_err(|_| {
            ConversionError::out_of_range(AtomicType::Decimal, "too many fractional digits")
        })?;
        let magnitude = IBig::from_str_radix(&format!("{}{}", int, frac), 10).map_err(|e| {
            ConversionError::malformed(AtomicType::Decimal, format!("{:?}: {}", s, e))
        })?;
        let unscaled = if negative { -magnitude } else { magnitude };
        Ok(Self::new(unscaled, scale))
    }
}

impl fmt::Display for XsdDecimal {
    /// Canonical form: no exponent, no trailing fractional zeros, `-0` is `0`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.to_string();
        let (sign, digits) = match digits.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", digits.as_str()),
        };
        write!(f, "{}{}", sign, place_decimal_point(digits, self.scale as usize))
    }
}

impl From<Decimal> for XsdDecimal {
    fn from(d: Decimal) -> Self {
        Self::new(IBig::from(d.mantissa()), d.scale())
    }
}

impl From<IBig> for XsdDecimal {
    fn from(i: IBig) -> Self {
        Self { unscaled: i, scale: 0 }
    }
}

impl From<i64> for XsdDecimal {
    fn from(i: i64) -> Self {
        IBig::from(i).into()
    }
}

/// A qualified name whose namespace binding is already resolved
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new<S: Into<String>>(namespace: Option<String>, local: S) -> Self {
        Self {
            namespace,
            prefix: None,
            local: local.into(),
        }
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// `Q{uri}local` form
    pub fn expanded(&self) -> String {
        format!("Q{{{}}}{}", self.namespace.as_deref().unwrap_or(""), self.local)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => write!(f, "{}:{}", prefix, self.local),
            _ => f.write_str(&self.local),
        }
    }
}

/// A duration split into its month and second components.
///
/// Both components carry the same sign; a negative duration has
/// `months <= 0` and `seconds <= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct XsdDuration {
    pub months: i64,
    pub seconds: Decimal,
}

impl XsdDuration {
    pub fn from_seconds(seconds: Decimal) -> Self {
        Self { months: 0, seconds }
    }

    pub fn from_months(months: i64) -> Self {
        Self {
            months,
            seconds: Decimal::ZERO,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.months < 0 || (self.seconds.is_sign_negative() && !self.seconds.is_zero())
    }

    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.seconds.is_zero()
    }
}

impl fmt::Display for XsdDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self))
    }
}

/// `xs:gYear`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GYear {
    pub year: i64,
    pub offset: Option<FixedOffset>,
}

/// `xs:gYearMonth`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GYearMonth {
    pub year: i64,
    pub month: u8,
    pub offset: Option<FixedOffset>,
}

/// `xs:gMonth`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GMonth {
    pub month: u8,
    pub offset: Option<FixedOffset>,
}

/// `xs:gMonthDay`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GMonthDay {
    pub month: u8,
    pub day: u8,
    pub offset: Option<FixedOffset>,
}

/// `xs:gDay`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GDay {
    pub day: u8,
    pub offset: Option<FixedOffset>,
}

/// A value handed to an encoder
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value at all
    Absent,
    Boolean(bool),
    Integer(i64),
    BigInteger(IBig),
    Decimal(XsdDecimal),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Time(NaiveTime),
    QName(QName),
    Duration(XsdDuration),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Native truthiness: only `Absent` and `Boolean(false)` are false
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Absent | Value::Boolean(false))
    }

    /// Calendar date carried by a date-like value
    pub(crate) fn calendar_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date_naive()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::BigInteger(i) => write!(f, "{}", i),
            Value::Decimal(d) => fmt::Display::fmt(d, f),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Double(v) => f.write_str(&format_double(*v)),
            Value::String(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Date(d) => f.write_str(&format_date(*d)),
            Value::DateTime(dt) => {
                write!(f, "{}T{}", format_date(dt.date_naive()), dt.format("%T%.f%:z"))
            }
            Value::Time(t) => write!(f, "{}", t.format("%T%.f")),
            Value::QName(q) => fmt::Display::fmt(q, f),
            Value::Duration(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<u8> for Value {
    fn from(i: u8) -> Self {
        Value::Integer(i.into())
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        match i64::try_from(i) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::BigInteger(IBig::from(i)),
        }
    }
}

impl From<IBig> for Value {
    fn from(i: IBig) -> Self {
        Value::BigInteger(i)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d.into())
    }
}

impl From<XsdDecimal> for Value {
    fn from(d: XsdDecimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.fixed_offset())
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<QName> for Value {
    fn from(q: QName) -> Self {
        Value::QName(q)
    }
}

impl From<XsdDuration> for Value {
    fn from(d: XsdDuration) -> Self {
        Value::Duration(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Absent, Into::into)
    }
}

/// The representation a decoder chooses for a lexical string
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Boolean(bool),
    Integer(i64),
    /// An integer that does not fit in `i64`
    BigInteger(IBig),
    Decimal(XsdDecimal),
    Float(f32),
    Double(f64),
    /// The lexical string itself, for types without a richer representation
    String(String),
    Binary(Vec<u8>),
    Byte(i8),
    UnsignedByte(u8),
    Date {
        date: NaiveDate,
        offset: Option<FixedOffset>,
    },
    DateTime(DateTime<FixedOffset>),
    /// A dateTime without a timezone
    LocalDateTime(NaiveDateTime),
    Time {
        time: NaiveTime,
        offset: Option<FixedOffset>,
    },
    Duration(XsdDuration),
    GYear(GYear),
    GYearMonth(GYearMonth),
    GMonth(GMonth),
    GMonthDay(GMonthDay),
    GDay(GDay),
    QName(QName),
}

impl NativeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NativeValue::Integer(i) => Some(*i),
            NativeValue::BigInteger(i) => i64::try_from(i).ok(),
            NativeValue::Byte(b) => Some((*b).into()),
            NativeValue::UnsignedByte(b) => Some((*b).into()),
            _ => None,
        }
    }

    /// Integer value at arbitrary precision
    pub fn as_big_integer(&self) -> Option<IBig> {
        match self {
            NativeValue::BigInteger(i) => Some(i.clone()),
            other => other.as_i64().map(IBig::from),
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            NativeValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Boolean(b) => write!(f, "{}", b),
            NativeValue::Integer(i) => write!(f, "{}", i),
            NativeValue::BigInteger(i) => write!(f, "{}", i),
            NativeValue::Decimal(d) => fmt::Display::fmt(d, f),
            NativeValue::Float(v) => f.write_str(&format_float(*v)),
            NativeValue::Double(v) => f.write_str(&format_double(*v)),
            NativeValue::String(s) => f.write_str(s),
            NativeValue::Binary(b) => write!(f, "{:02x?}", b),
            NativeValue::Byte(b) => write!(f, "{}", b),
            NativeValue::UnsignedByte(b) => write!(f, "{}", b),
            NativeValue::Date { date, offset } => {
                f.write_str(&format_date(*date))?;
                write_offset(f, *offset)
            }
            NativeValue::DateTime(dt) => {
                write!(f, "{}T{}", format_date(dt.date_naive()), dt.format("%T%.f%:z"))
            }
            NativeValue::LocalDateTime(dt) => {
                write!(f, "{}T{}", format_date(dt.date()), dt.format("%T%.f"))
            }
            NativeValue::Time { time, offset } => {
                write!(f, "{}", time.format("%T%.f"))?;
                write_offset(f, *offset)
            }
            NativeValue::Duration(d) => fmt::Display::fmt(d, f),
            NativeValue::GYear(g) => write!(f, "gYear({})", g.year),
            NativeValue::GYearMonth(g) => write!(f, "gYearMonth({}, {})", g.year, g.month),
            NativeValue::GMonth(g) => write!(f, "gMonth({})", g.month),
            NativeValue::GMonthDay(g) => write!(f, "gMonthDay({}, {})", g.month, g.day),
            NativeValue::GDay(g) => write!(f, "gDay({})", g.day),
            NativeValue::QName(q) => f.write_str(&q.expanded()),
        }
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: Option<FixedOffset>) -> fmt::Result {
    match offset {
        Some(o) => f.write_str(&format_timezone(o)),
        None => Ok(()),
    }
}

/// Midnight UTC on the given date
pub(crate) fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .fixed_offset()
}
