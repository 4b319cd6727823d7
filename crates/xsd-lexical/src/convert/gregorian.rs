//! Gregorian fragments: `xs:gDay`, `xs:gMonth`, `xs:gYear`,
//! `xs:gYearMonth` and `xs:gMonthDay`.
//!
//! Day and month fields take two digits, or more without a leading zero, so
//! that a well-formed but impossible value (`---32`, `---123456789`,
//! `--02-30`) is reported as out of range rather than malformed. `---1` and
//! `---001` are malformed.

use chrono::{Datelike, FixedOffset};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{describe, identity, Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::lexical::{format_year, parse_timezone, DAYS_IN_MONTH, TIMEZONE};
use crate::types::AtomicType;
use crate::value::{GDay, GMonth, GMonthDay, GYear, GYearMonth, NativeValue, Value};

const YEAR: &str = r"(-?(?:[1-9][0-9]{3,}|0[0-9]{3}))";

static G_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^---([0-9]{{2,}}){}?$", TIMEZONE)).expect("valid gDay regex")
});
static G_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^--([0-9]{{2,}}){}?$", TIMEZONE)).expect("valid gMonth regex")
});
static G_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}{}?$", YEAR, TIMEZONE)).expect("valid gYear regex"));
static G_YEAR_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}-([0-9]{{2,}}){}?$", YEAR, TIMEZONE)).expect("valid gYearMonth regex")
});
static G_MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^--([0-9]{{2,}})-([0-9]{{2,}}){}?$", TIMEZONE))
        .expect("valid gMonthDay regex")
});

#[derive(Debug, Clone, Copy)]
pub struct GregorianFragment {
    ty: AtomicType,
}

impl GregorianFragment {
    pub fn new(ty: AtomicType) -> Self {
        Self { ty }
    }

    fn grammar(&self) -> &'static Regex {
        match self.ty {
            AtomicType::GDay => &*G_DAY_RE,
            AtomicType::GMonth => &*G_MONTH_RE,
            AtomicType::GYear => &*G_YEAR_RE,
            AtomicType::GYearMonth => &*G_YEAR_MONTH_RE,
            _ => &*G_MONTH_DAY_RE,
        }
    }

    fn out_of_range(&self, what: String) -> ConversionError {
        ConversionError::out_of_range(self.ty, what)
    }

    fn check_year(&self, year: i64) -> Result<i64> {
        if year == 0 {
            Err(self.out_of_range("year 0 does not exist".to_string()))
        } else {
            Ok(year)
        }
    }

    fn check_month(&self, month: i64) -> Result<u8> {
        match u8::try_from(month) {
            Ok(m) if (1..=12).contains(&m) => Ok(m),
            _ => Err(self.out_of_range(format!("month {} is not in 1..=12", month))),
        }
    }

    fn check_day(&self, day: i64, month: Option<u8>) -> Result<u8> {
        let max = month.map_or(31, |m| DAYS_IN_MONTH[usize::from(m) - 1]);
        match u8::try_from(day) {
            Ok(d) if (1..=max).contains(&d) => Ok(d),
            _ => Err(self.out_of_range(match month {
                Some(m) => format!("day {} is not in month {}", day, m),
                None => format!("day {} is not in 1..=31", day),
            })),
        }
    }

    /// Parse a lexical fragment, checking both grammar and value space
    fn parse(&self, lexical: &str) -> Result<NativeValue> {
        let caps = self.grammar().captures(lexical).ok_or_else(|| {
            ConversionError::malformed(
                self.ty,
                format!("{:?} does not match the {} grammar", lexical, self.ty.local_name()),
            )
        })?;
        let field = |i: usize| -> Result<i64> {
            caps[i]
                .parse::<i64>()
                .map_err(|_| self.out_of_range(format!("{} overflows", &caps[i])))
        };
        // day and month: exactly two digits unless the value is too large anyway
        let padded = |i: usize| -> Result<i64> {
            let digits = &caps[i];
            if digits.len() > 2 && digits.starts_with('0') {
                return Err(ConversionError::malformed(
                    self.ty,
                    format!("{:?} is not a two-digit field", digits),
                ));
            }
            field(i)
        };
        let offset = |i: usize| -> Option<FixedOffset> { timezone(&caps, i) };

        Ok(match self.ty {
            AtomicType::GDay => NativeValue::GDay(GDay {
                day: self.check_day(padded(1)?, None)?,
                offset: offset(2),
            }),
            AtomicType::GMonth => NativeValue::GMonth(GMonth {
                month: self.check_month(padded(1)?)?,
                offset: offset(2),
            }),
            AtomicType::GYear => NativeValue::GYear(GYear {
                year: self.check_year(field(1)?)?,
                offset: offset(2),
            }),
            AtomicType::GYearMonth => NativeValue::GYearMonth(GYearMonth {
                year: self.check_year(field(1)?)?,
                month: self.check_month(padded(2)?)?,
                offset: offset(3),
            }),
            _ => {
                let month = self.check_month(padded(1)?)?;
                NativeValue::GMonthDay(GMonthDay {
                    month,
                    day: self.check_day(padded(2)?, Some(month))?,
                    offset: offset(3),
                })
            }
        })
    }

    fn from_integer(&self, n: i64) -> Result<String> {
        match self.ty {
            AtomicType::GDay => Ok(format!("---{:02}", self.check_day(n, None)?)),
            AtomicType::GMonth => Ok(format!("--{:02}", self.check_month(n)?)),
            AtomicType::GYear => Ok(format_year(self.check_year(n)?)),
            _ => Err(ConversionError::malformed(
                self.ty,
                format!("{} needs a date, not the integer {}", self.ty.local_name(), n),
            )),
        }
    }
}

fn timezone(caps: &Captures<'_>, i: usize) -> Option<FixedOffset> {
    caps.get(i).and_then(|tz| parse_timezone(tz.as_str()))
}

impl Convertor for GregorianFragment {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::GregorianFragment
    }

    fn encode(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => {
                self.parse(s)?;
                Ok(s.clone())
            }
            Value::Integer(n) => self.from_integer(*n),
            Value::BigInteger(n) => {
                let n = i64::try_from(n).map_err(|_| self.out_of_range(format!("{} overflows", n)))?;
                self.from_integer(n)
            }
            other => {
                let date = other.calendar_date().ok_or_else(|| {
                    ConversionError::malformed(
                        self.ty,
                        format!("expected an integer, date or string, got {}", describe(other)),
                    )
                })?;
                let year = self.check_year(date.year().into());
                Ok(match self.ty {
                    AtomicType::GDay => format!("---{:02}", date.day()),
                    AtomicType::GMonth => format!("--{:02}", date.month()),
                    AtomicType::GYear => format_year(year?),
                    AtomicType::GYearMonth => format!("{}-{:02}", format_year(year?), date.month()),
                    _ => format!("--{:02}-{:02}", date.month(), date.day()),
                })
            }
        }
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        self.parse(lexical)
            .unwrap_or_else(|_| identity(self.ty, lexical))
    }
}
