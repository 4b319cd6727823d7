//! `xs:duration`, `xs:dayTimeDuration` and `xs:yearMonthDuration`

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{describe, identity, Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::types::AtomicType;
use crate::lexical::exact_decimal_from_f64;
use crate::value::{NativeValue, Value, XsdDecimal, XsdDuration};

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(-)?P(?:([0-9]+)Y)?(?:([0-9]+)M)?(?:([0-9]+)D)?(?:T(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+(?:\.[0-9]+)?)S)?)?$",
    )
    .expect("valid duration regex")
});

const SECONDS_PER_DAY: u64 = 86_400;

/// Lexical form with zero components omitted and the sign on the whole token
pub fn format_duration(d: &XsdDuration) -> String {
    if d.is_zero() {
        return "PT0S".to_string();
    }
    let mut out = String::new();
    if d.is_negative() {
        out.push('-');
    }
    out.push('P');

    let months = d.months.unsigned_abs();
    if months / 12 > 0 {
        out.push_str(&format!("{}Y", months / 12));
    }
    if months % 12 > 0 {
        out.push_str(&format!("{}M", months % 12));
    }

    let seconds = d.seconds.abs();
    let whole = seconds.trunc().to_u128().unwrap_or(0);
    let fraction = seconds.fract();
    let days = whole / u128::from(SECONDS_PER_DAY);
    let rest = whole % u128::from(SECONDS_PER_DAY);
    let (hours, minutes, secs) = (rest / 3600, (rest % 3600) / 60, rest % 60);

    if days > 0 {
        out.push_str(&format!("{}D", days));
    }
    if hours > 0 || minutes > 0 || secs > 0 || !fraction.is_zero() {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if secs > 0 || !fraction.is_zero() {
            let s = (Decimal::from(secs as u64) + fraction).normalize();
            out.push_str(&format!("{}S", s));
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub struct DurationConvertor {
    ty: AtomicType,
}

impl DurationConvertor {
    pub fn new(ty: AtomicType) -> Self {
        Self { ty }
    }

    fn group<'a>(caps: &'a Captures<'_>, i: usize) -> Option<&'a str> {
        caps.get(i).map(|m| m.as_str())
    }

    /// Parse a lexical duration, enforcing the component restrictions of the subtype
    fn parse(&self, lexical: &str) -> Result<XsdDuration> {
        let malformed = |why: &str| {
            ConversionError::malformed(self.ty, format!("{:?} {}", lexical, why))
        };
        let caps = DURATION_RE
            .captures(lexical)
            .filter(|_| !lexical.ends_with('P') && !lexical.ends_with('T'))
            .ok_or_else(|| malformed("is not an ISO 8601 duration"))?;

        let has_year_month = caps.get(2).is_some() || caps.get(3).is_some();
        let has_day_time = (4..=7).any(|i| caps.get(i).is_some());
        match self.ty {
            AtomicType::DayTimeDuration if has_year_month => {
                return Err(malformed("has year or month components"))
            }
            AtomicType::YearMonthDuration if has_day_time => {
                return Err(malformed("has day or time components"))
            }
            _ => {}
        }

        let overflow = || ConversionError::out_of_range(self.ty, format!("{:?} overflows", lexical));
        let count = |i: usize| -> Result<u64> {
            Self::group(&caps, i).map_or(Ok(0), |s| s.parse::<u64>().map_err(|_| overflow()))
        };

        let months = count(2)?
            .checked_mul(12)
            .and_then(|y| y.checked_add(count(3).ok()?))
            .and_then(|m| i64::try_from(m).ok())
            .ok_or_else(overflow)?;

        let whole = [(4, SECONDS_PER_DAY), (5, 3600), (6, 60)]
            .iter()
            .try_fold(Decimal::ZERO, |acc, &(i, unit)| {
                let n = Decimal::from(count(i)?);
                n.checked_mul(Decimal::from(unit))
                    .and_then(|v| acc.checked_add(v))
                    .ok_or_else(overflow)
            })?;
        let secs = match Self::group(&caps, 7) {
            Some(s) => Decimal::from_str(s).map_err(|_| overflow())?,
            None => Decimal::ZERO,
        };
        let seconds = whole.checked_add(secs).ok_or_else(overflow)?;

        Ok(if caps.get(1).is_some() {
            XsdDuration {
                months: -months,
                seconds: -seconds,
            }
        } else {
            XsdDuration { months, seconds }
        })
    }

    fn from_number(&self, value: &Value) -> Result<XsdDuration> {
        let number: XsdDecimal = match value {
            Value::Integer(i) => (*i).into(),
            Value::BigInteger(i) => i.clone().into(),
            Value::Decimal(d) => d.clone(),
            Value::Double(v) => self.from_float(*v)?,
            Value::Float(v) => self.from_float(f64::from(*v))?,
            other => {
                return Err(ConversionError::malformed(
                    self.ty,
                    format!("expected a duration or a number, got {}", describe(other)),
                ))
            }
        };
        if self.ty == AtomicType::YearMonthDuration {
            if !number.is_integer() {
                return Err(ConversionError::malformed(
                    self.ty,
                    format!("{} is not a whole number of months", number),
                ));
            }
            return i64::try_from(number.unscaled())
                .map(XsdDuration::from_months)
                .map_err(|_| ConversionError::out_of_range(self.ty, format!("{} months", number)));
        }
        number
            .to_decimal()
            .map(XsdDuration::from_seconds)
            .ok_or_else(|| {
                ConversionError::out_of_range(self.ty, format!("{} overflows a duration", number))
            })
    }

    fn from_float(&self, v: f64) -> Result<XsdDecimal> {
        exact_decimal_from_f64(v)
            .ok_or_else(|| ConversionError::malformed(self.ty, format!("{} is not finite", v)))?
            .parse()
    }

    fn check_components(&self, d: &XsdDuration) -> Result<()> {
        let mixed = (d.months > 0 && d.seconds.is_sign_negative() && !d.seconds.is_zero())
            || (d.months < 0 && d.seconds.is_sign_positive() && !d.seconds.is_zero());
        if mixed {
            return Err(ConversionError::out_of_range(
                self.ty,
                "month and second components have different signs",
            ));
        }
        match self.ty {
            AtomicType::DayTimeDuration if d.months != 0 => Err(ConversionError::out_of_range(
                self.ty,
                "a day-time duration has no months",
            )),
            AtomicType::YearMonthDuration if !d.seconds.is_zero() => Err(
                ConversionError::out_of_range(self.ty, "a year-month duration has no seconds"),
            ),
            _ => Ok(()),
        }
    }

    fn format(&self, d: &XsdDuration) -> String {
        if d.is_zero() && self.ty == AtomicType::YearMonthDuration {
            "P0M".to_string()
        } else {
            format_duration(d)
        }
    }
}

impl Convertor for DurationConvertor {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::Duration
    }

    /// Numbers count seconds, except for `xs:yearMonthDuration` where they count months
    fn encode(&self, value: &Value) -> Result<String> {
        let duration = match value {
            Value::String(s) => {
                self.parse(s)?;
                return Ok(s.clone());
            }
            Value::Duration(d) => *d,
            other => self.from_number(other)?,
        };
        self.check_components(&duration)?;
        Ok(self.format(&duration))
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        match self.parse(lexical) {
            Ok(d) => NativeValue::Duration(d),
            Err(_) => identity(self.ty, lexical),
        }
    }
}
