//! `xs:date`, `xs:dateTime`, `xs:dateTimeStamp` and `xs:time`
//!
//! Encoding a string checks grammar only. Decoding rebuilds a chrono value
//! from the captured fields and hands back the original string when the
//! fields do not form one. `validate`, used by strict decoding, also rejects
//! grammatical strings that are not a real date or time (`2019-02-30`).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{describe, identity, Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::lexical::{format_date, parse_timezone, TIMEZONE};
use crate::types::AtomicType;
use crate::value::{midnight_utc, NativeValue, Value};

const YEAR: &str = r"-?(?:[1-9][0-9]{3,}|0[0-9]{3})";
const MONTH_DAY: &str = r"(?:0[1-9]|1[0-2])-(?:0[1-9]|[12][0-9]|3[01])";
const TIME: &str =
    r"(?:(?:[01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9](?:\.[0-9]+)?|24:00:00(?:\.0+)?)";

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}-{}{}?$", YEAR, MONTH_DAY, TIMEZONE)).expect("valid date regex")
});
static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}-{}T{}{}?$", YEAR, MONTH_DAY, TIME, TIMEZONE))
        .expect("valid dateTime regex")
});
static DATE_TIME_STAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}-{}T{}{}$", YEAR, MONTH_DAY, TIME, TIMEZONE))
        .expect("valid dateTimeStamp regex")
});
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}{}?$", TIME, TIMEZONE)).expect("valid time regex"));

const TZ_CAPTURE: &str = r"(Z|[+-][0-9]{2}:[0-9]{2})?";

static DATE_CAPTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(-?[0-9]{{4,}})-([0-9]{{2}})-([0-9]{{2}}){}$", TZ_CAPTURE))
        .expect("valid date capture regex")
});
static DATE_TIME_CAPTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(-?[0-9]{{4,}})-([0-9]{{2}})-([0-9]{{2}})T([0-9]{{2}}):([0-9]{{2}}):([0-9]{{2}})(?:\.([0-9]+))?{}$",
        TZ_CAPTURE
    ))
    .expect("valid dateTime capture regex")
});
static TIME_CAPTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^([0-9]{{2}}):([0-9]{{2}}):([0-9]{{2}})(?:\.([0-9]+))?{}$",
        TZ_CAPTURE
    ))
    .expect("valid time capture regex")
});

#[derive(Debug, Clone, Copy)]
pub struct Temporal {
    ty: AtomicType,
}

impl Temporal {
    pub fn new(ty: AtomicType) -> Self {
        Self { ty }
    }

    fn grammar(&self) -> &'static Regex {
        match self.ty {
            AtomicType::Date => &*DATE_RE,
            AtomicType::DateTimeStamp => &*DATE_TIME_STAMP_RE,
            AtomicType::Time => &*TIME_RE,
            _ => &*DATE_TIME_RE,
        }
    }

    fn format_value(&self, value: &Value) -> Option<String> {
        let formatted = match (self.ty, value) {
            (AtomicType::Date, v) => format_date(v.calendar_date()?),
            (AtomicType::Time, Value::Time(t)) => t.format("%T%.f").to_string(),
            (AtomicType::Time, Value::DateTime(dt)) => dt.format("%T%.f%:z").to_string(),
            (AtomicType::Time, _) => return None,
            (_, Value::DateTime(dt)) => {
                format!("{}T{}", format_date(dt.date_naive()), dt.format("%T%.f%:z"))
            }
            (_, Value::Date(d)) => {
                let midnight = midnight_utc(*d);
                format!("{}T{}", format_date(*d), midnight.format("%T%:z"))
            }
            _ => return None,
        };
        Some(formatted)
    }

    /// Native value of a lexical string, `None` when it names no real
    /// date or time
    fn parse(&self, lexical: &str) -> Option<NativeValue> {
        match self.ty {
            AtomicType::Date => DATE_CAPTURE
                .captures(lexical)
                .and_then(|caps| Self::decode_date(&caps)),
            AtomicType::Time => TIME_CAPTURE
                .captures(lexical)
                .and_then(|caps| Self::decode_time(&caps)),
            _ => DATE_TIME_CAPTURE
                .captures(lexical)
                .and_then(|caps| Self::decode_date_time(&caps)),
        }
    }

    fn decode_date(caps: &Captures<'_>) -> Option<NativeValue> {
        let date = naive_date(&caps[1], &caps[2], &caps[3])?;
        let offset = match caps.get(4) {
            Some(tz) => Some(parse_timezone(tz.as_str())?),
            None => None,
        };
        Some(NativeValue::Date { date, offset })
    }

    fn decode_date_time(caps: &Captures<'_>) -> Option<NativeValue> {
        let mut date = naive_date(&caps[1], &caps[2], &caps[3])?;
        let fraction = caps.get(7).map(|m| m.as_str());
        let (time, next_day) = naive_time(&caps[4], &caps[5], &caps[6], fraction)?;
        if next_day {
            date = date.succ_opt()?;
        }
        let local = NaiveDateTime::new(date, time);
        match caps.get(8) {
            Some(tz) => {
                let offset = parse_timezone(tz.as_str())?;
                offset
                    .from_local_datetime(&local)
                    .single()
                    .map(NativeValue::DateTime)
            }
            None => Some(NativeValue::LocalDateTime(local)),
        }
    }

    fn decode_time(caps: &Captures<'_>) -> Option<NativeValue> {
        let fraction = caps.get(4).map(|m| m.as_str());
        let (time, _) = naive_time(&caps[1], &caps[2], &caps[3], fraction)?;
        let offset = match caps.get(5) {
            Some(tz) => Some(parse_timezone(tz.as_str())?),
            None => None,
        };
        Some(NativeValue::Time { time, offset })
    }
}

fn naive_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Nanoseconds from a fraction digit string, truncated past nine digits
fn nanos(fraction: Option<&str>) -> Option<u32> {
    match fraction {
        None => Some(0),
        Some(digits) => {
            let digits: String = digits.chars().take(9).collect();
            format!("{:0<9}", digits).parse().ok()
        }
    }
}

/// Time of day; `24:00:00` is midnight of the following day
fn naive_time(
    hour: &str,
    minute: &str,
    second: &str,
    fraction: Option<&str>,
) -> Option<(NaiveTime, bool)> {
    let h: u32 = hour.parse().ok()?;
    let m: u32 = minute.parse().ok()?;
    let s: u32 = second.parse().ok()?;
    let ns = nanos(fraction)?;
    if h == 24 && m == 0 && s == 0 && ns == 0 {
        return Some((NaiveTime::MIN, true));
    }
    NaiveTime::from_hms_nano_opt(h, m, s, ns).map(|t| (t, false))
}

impl Convertor for Temporal {
    fn atomic_type(&self) -> AtomicType {
        self.ty
    }

    fn family(&self) -> Family {
        Family::Temporal
    }

    fn encode(&self, value: &Value) -> Result<String> {
        if let Value::String(s) = value {
            return if self.grammar().is_match(s) {
                Ok(s.clone())
            } else {
                Err(ConversionError::malformed(
                    self.ty,
                    format!("{:?} does not match the {} grammar", s, self.ty.local_name()),
                ))
            };
        }
        self.format_value(value).ok_or_else(|| {
            ConversionError::malformed(
                self.ty,
                format!("cannot format {} as {}", describe(value), self.ty.local_name()),
            )
        })
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        self.parse(lexical).unwrap_or_else(|| identity(self.ty, lexical))
    }

    fn validate(&self, lexical: &str) -> Result<()> {
        self.encode(&Value::String(lexical.to_string()))?;
        match self.parse(lexical) {
            Some(_) => Ok(()),
            None => Err(ConversionError::out_of_range(
                self.ty,
                format!("{:?} is not a real {}", lexical, self.ty.local_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::{DateTime, Timelike};

    fn date_time() -> Temporal {
        Temporal::new(AtomicType::DateTime)
    }

    #[test]
    fn zulu_decodes_to_zero_offset() {
        match date_time().decode("2019-09-27T14:42:00Z") {
            NativeValue::DateTime(dt) => {
                assert_eq!(dt.offset().local_minus_utc(), 0);
                assert_eq!(dt.to_rfc3339(), "2019-09-27T14:42:00+00:00");
            }
            other => panic!("expected a dateTime, got {:?}", other),
        }
    }

    #[test]
    fn unmatched_strings_come_back_unchanged() {
        assert_eq!(
            date_time().decode("not-a-date"),
            NativeValue::String("not-a-date".to_string())
        );
        // matches the capture pattern but is not a calendar date
        assert_eq!(
            date_time().decode("2019-02-30T00:00:00"),
            NativeValue::String("2019-02-30T00:00:00".to_string())
        );
    }

    #[test]
    fn end_of_day_rolls_over() {
        let expected = NaiveDate::from_ymd_opt(2019, 9, 28)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            date_time().decode("2019-09-27T24:00:00"),
            NativeValue::LocalDateTime(expected)
        );
    }

    #[test]
    fn fractional_seconds_and_offset() {
        let NativeValue::DateTime(dt) = date_time().decode("2019-09-27T14:42:00.123+05:30") else {
            panic!("expected a dateTime");
        };
        assert_eq!(dt.nanosecond(), 123_000_000);
        assert_eq!(dt.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn encode_formats_calendar_values() {
        let dt = DateTime::parse_from_rfc3339("2019-09-27T14:42:00.5-07:00").unwrap();
        assert_eq!(
            date_time().encode(&Value::DateTime(dt)).unwrap(),
            "2019-09-27T14:42:00.500-07:00"
        );
        assert_eq!(
            Temporal::new(AtomicType::Date).encode(&Value::DateTime(dt)).unwrap(),
            "2019-09-27"
        );
        let d = NaiveDate::from_ymd_opt(2019, 9, 27).unwrap();
        assert_eq!(
            date_time().encode(&Value::Date(d)).unwrap(),
            "2019-09-27T00:00:00+00:00"
        );
    }

    #[test]
    fn encode_checks_grammar_only() {
        let date = Temporal::new(AtomicType::Date);
        assert_eq!(date.encode(&Value::from("2019-02-30")).unwrap(), "2019-02-30");
        assert!(date.encode(&Value::from("2019-9-27")).unwrap_err().is_malformed());
        assert!(date.encode(&Value::from("2019-09-27+15:00")).is_err());
        let stamp = Temporal::new(AtomicType::DateTimeStamp);
        assert!(stamp.encode(&Value::from("2019-09-27T14:42:00")).is_err());
        assert!(stamp.encode(&Value::from("2019-09-27T14:42:00Z")).is_ok());
    }

    #[test]
    fn validate_rejects_impossible_dates() {
        let date = Temporal::new(AtomicType::Date);
        assert_eq!(
            date.validate("2019-02-30").unwrap_err().kind(),
            ErrorKind::ValueOutOfRange
        );
        assert!(date.validate("2019-9-27").unwrap_err().is_malformed());
        assert!(date.validate("2020-02-29Z").is_ok());
        assert_eq!(
            date_time().validate("2019-04-31T10:00:00").unwrap_err().kind(),
            ErrorKind::ValueOutOfRange
        );
        assert!(date_time().validate("2019-09-27T24:00:00").is_ok());
        assert!(Temporal::new(AtomicType::Time).validate("23:59:59.5-03:00").is_ok());
    }

    #[test]
    fn years_past_9999_stay_grammatical() {
        let d = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let date = Temporal::new(AtomicType::Date);
        let lexical = date.encode(&Value::Date(d)).unwrap();
        assert_eq!(lexical, "10000-01-01");
        assert_eq!(date.encode(&Value::from(lexical.as_str())).unwrap(), lexical);
        assert_eq!(date.decode(&lexical), NativeValue::Date { date: d, offset: None });

        let lexical = date_time().encode(&Value::Date(d)).unwrap();
        assert_eq!(lexical, "10000-01-01T00:00:00+00:00");
        assert!(date_time().validate(&lexical).is_ok());

        let dt = d.and_hms_opt(12, 30, 0).unwrap().and_utc().fixed_offset();
        assert_eq!(
            date_time().encode(&Value::DateTime(dt)).unwrap(),
            "10000-01-01T12:30:00+00:00"
        );
    }

    #[test]
    fn time_round_trip() {
        let c = Temporal::new(AtomicType::Time);
        let t = NaiveTime::from_hms_milli_opt(13, 20, 0, 250).unwrap();
        let lexical = c.encode(&Value::Time(t)).unwrap();
        assert_eq!(lexical, "13:20:00.250");
        assert_eq!(c.decode(&lexical), NativeValue::Time { time: t, offset: None });
    }
}
