//! Grammar and bounds utilities shared by the convertor families

use std::fmt;

use chrono::{Datelike, FixedOffset, NaiveDate};
use ibig::{IBig, UBig};
use once_cell::sync::Lazy;
use regex::Regex;

/// Timezone suffix: `Z` or `±HH:MM` with at most fourteen hours
pub(crate) const TIMEZONE: &str = r"(Z|[+-](?:(?:0[0-9]|1[0-3]):[0-5][0-9]|14:00))";

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer regex"));
static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").expect("valid decimal regex"));
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|[+-]?INF|NaN)$")
        .expect("valid floating point regex")
});

/// Maximum day of each month in a leap year
pub(crate) const DAYS_IN_MONTH: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Inclusive value-space interval; `None` on either side is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<i128>,
    pub max: Option<i128>,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds::new(None, None);

    pub const fn new(min: Option<i128>, max: Option<i128>) -> Self {
        Self { min, max }
    }

    pub const fn closed(min: i128, max: i128) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn contains(&self, value: &IBig) -> bool {
        if let Some(min) = self.min {
            if *value < IBig::from(min) {
                return false;
            }
        }
        if let Some(max) = self.max {
            if *value > IBig::from(max) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.min {
            Some(min) => write!(f, "[{}", min)?,
            None => f.write_str("(-inf")?,
        }
        match self.max {
            Some(max) => write!(f, ", {}]", max),
            None => f.write_str(", inf)"),
        }
    }
}

pub(crate) fn is_integer_lexical(s: &str) -> bool {
    INTEGER_RE.is_match(s)
}

pub(crate) fn is_decimal_lexical(s: &str) -> bool {
    DECIMAL_RE.is_match(s)
}

pub(crate) fn is_number_lexical(s: &str) -> bool {
    NUMBER_RE.is_match(s)
}

/// Parse `[+-]?[0-9]+` into an arbitrary-precision integer
pub(crate) fn parse_integer(s: &str) -> Option<IBig> {
    if !is_integer_lexical(s) {
        return None;
    }
    let (negative, digits) = split_sign(s);
    let magnitude = IBig::from_str_radix(digits, 10).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub(crate) fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

/// Canonical fixed-point form of a string already matching the decimal grammar
pub(crate) fn canonical_decimal(s: &str) -> String {
    let (negative, body) = split_sign(s);
    let (int, frac) = body.split_once('.').unwrap_or((body, ""));
    let int = int.trim_start_matches('0');
    let frac = frac.trim_end_matches('0');
    let int = if int.is_empty() { "0" } else { int };
    let magnitude = if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, frac)
    };
    if negative && magnitude != "0" {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

/// Exact decimal expansion of a finite double.
///
/// Every finite binary double is `m * 2^e`, which for negative `e` equals
/// `m * 5^-e / 10^-e`, so the expansion terminates.
pub(crate) fn exact_decimal_from_f64(v: f64) -> Option<String> {
    if !v.is_finite() {
        return None;
    }
    let bits = v.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return Some("0".to_string());
    }
    while mantissa & 1 == 0 && exponent < 0 {
        mantissa >>= 1;
        exponent += 1;
    }

    let (digits, scale) = if exponent >= 0 {
        (UBig::from(mantissa) << exponent as usize, 0)
    } else {
        let scale = (-exponent) as usize;
        (UBig::from(mantissa) * UBig::from(5u8).pow(scale), scale)
    };
    let magnitude = place_decimal_point(&digits.to_string(), scale);
    Some(if negative {
        format!("-{}", magnitude)
    } else {
        magnitude
    })
}

pub(crate) fn place_decimal_point(digits: &str, scale: usize) -> String {
    if scale == 0 {
        return digits.to_string();
    }
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
    } else {
        digits.to_string()
    };
    let (int, frac) = padded.split_at(padded.len() - scale);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, frac)
    }
}

/// Year with at least four digits and a sign only when negative
pub(crate) fn format_year(year: i64) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{:04}", year)
    }
}

/// `YYYY-MM-DD` with the year as [`format_year`] writes it, so years past
/// 9999 carry no `+`
pub(crate) fn format_date(date: NaiveDate) -> String {
    format!(
        "{}-{:02}-{:02}",
        format_year(date.year().into()),
        date.month(),
        date.day()
    )
}

pub(crate) fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let token = if v > 0.0 { "INF" } else { "-INF" };
        token.to_string()
    } else {
        v.to_string()
    }
}

pub(crate) fn format_float(v: f32) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let token = if v > 0.0 { "INF" } else { "-INF" };
        token.to_string()
    } else {
        v.to_string()
    }
}

/// Build an offset from a timezone token; `Z` is read as `+00:00`
pub(crate) fn parse_timezone(tz: &str) -> Option<FixedOffset> {
    let tz = if tz == "Z" { "+00:00" } else { tz };
    let (negative, rest) = split_sign(tz);
    let (hours, minutes) = rest.split_once(':')?;
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    FixedOffset::east_opt(if negative { -seconds } else { seconds })
}

/// Render an offset as `Z` when zero, `±HH:MM` otherwise
pub(crate) fn format_timezone(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    if total == 0 {
        return "Z".to_string();
    }
    let sign = if total < 0 { '-' } else { '+' };
    let total = total.abs();
    format!("{}{:02}:{:02}", sign, total / 3600, (total % 3600) / 60)
}
