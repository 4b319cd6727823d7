//! Integration tests for xsd-lexical
//!
//! Exercises the public encode/decode surface family by family.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use ibig::IBig;
use rust_decimal_macros::dec;
use xsd_lexical::convert::numeric::integer_bounds;
use xsd_lexical::{
    decode, encode, AtomicType, ConvertConfig, Converter, ErrorKind, GDay, GYear, NativeValue,
    QName, Value, XsdDecimal, XsdDuration,
};

fn kind<V: Into<Value>>(value: V, ty: AtomicType) -> ErrorKind {
    encode(value, ty).unwrap_err().kind()
}

fn round_trip<V: Into<Value>>(value: V, ty: AtomicType) -> NativeValue {
    let lexical = encode(value, ty).unwrap();
    decode(&lexical, ty)
}

// ============== Integer family ==============

#[test]
fn integer_bounds_are_inclusive() {
    for ty in AtomicType::all().iter().copied().filter(|t| t.is_integer()) {
        let bounds = integer_bounds(ty);
        if let Some(min) = bounds.min {
            let min = IBig::from(min);
            let lexical = encode(min.clone(), ty).unwrap();
            assert_eq!(decode(&lexical, ty).as_big_integer(), Some(min.clone()), "{}", ty);
            assert_eq!(kind(min - IBig::from(1), ty), ErrorKind::ValueOutOfRange, "{}", ty);
        }
        if let Some(max) = bounds.max {
            let max = IBig::from(max);
            let lexical = encode(max.clone(), ty).unwrap();
            assert_eq!(decode(&lexical, ty).as_big_integer(), Some(max.clone()), "{}", ty);
            assert_eq!(kind(max + IBig::from(1), ty), ErrorKind::ValueOutOfRange, "{}", ty);
        }
    }
}

#[test]
fn byte_examples() {
    assert_eq!(encode(-110, AtomicType::Byte).unwrap(), "-110");
    assert_eq!(encode(180, AtomicType::UnsignedByte).unwrap(), "180");
    assert_eq!(kind(256, AtomicType::UnsignedByte), ErrorKind::ValueOutOfRange);
    assert_eq!(decode("-110", AtomicType::Byte), NativeValue::Byte(-110));
}

#[test]
fn integer_strings_are_canonicalised() {
    assert_eq!(encode("+0042", AtomicType::Integer).unwrap(), "42");
    assert_eq!(encode("-000", AtomicType::Integer).unwrap(), "0");
    assert_eq!(kind("4.2", AtomicType::Integer), ErrorKind::MalformedValue);
    assert_eq!(kind("0", AtomicType::PositiveInteger), ErrorKind::ValueOutOfRange);
    assert_eq!(
        decode("123456789012345678901234567890", AtomicType::Integer),
        NativeValue::BigInteger("123456789012345678901234567890".parse().unwrap())
    );
}

// ============== Decimal, float and double ==============

#[test]
fn decimal_is_fixed_point() {
    assert_eq!(
        encode(0.1_f64, AtomicType::Decimal).unwrap(),
        "0.1000000000000000055511151231257827021181583404541015625"
    );
    assert_eq!(encode(1e21_f64, AtomicType::Decimal).unwrap(), "1000000000000000000000");
    assert_eq!(encode(dec!(12.50), AtomicType::Decimal).unwrap(), "12.5");
    assert_eq!(kind("1e3", AtomicType::Decimal), ErrorKind::MalformedValue);
    assert_eq!(kind(f64::NAN, AtomicType::Decimal), ErrorKind::MalformedValue);
    assert_eq!(
        round_trip(dec!(-3.25), AtomicType::Decimal),
        NativeValue::Decimal(dec!(-3.25).into())
    );
}

#[test]
fn decimal_precision_is_unbounded() {
    let ten_to_30 = IBig::from(10).pow(30);
    assert_eq!(
        round_trip(ten_to_30.clone(), AtomicType::Decimal),
        NativeValue::Decimal(XsdDecimal::from(ten_to_30))
    );

    let lexical = encode(1e30_f64, AtomicType::Decimal).unwrap();
    assert_eq!(lexical, "1000000000000000019884624838656");
    assert_eq!(decode(&lexical, AtomicType::Decimal).to_string(), lexical);

    let long = "-3.14159265358979323846264338327950288";
    let NativeValue::Decimal(d) = decode(long, AtomicType::Decimal) else {
        panic!("{} did not decode to a decimal", long);
    };
    assert_eq!(d.scale(), 35);
    assert_eq!(encode(d, AtomicType::Decimal).unwrap(), long);
}

#[test]
fn special_floats() {
    assert_eq!(encode(f32::INFINITY, AtomicType::Float).unwrap(), "INF");
    assert_eq!(encode(f64::NEG_INFINITY, AtomicType::Double).unwrap(), "-INF");
    assert_eq!(encode(f64::NAN, AtomicType::Double).unwrap(), "NaN");
    assert_eq!(encode("-INF", AtomicType::Float).unwrap(), "-INF");
    assert_eq!(kind("infinity", AtomicType::Double), ErrorKind::MalformedValue);
}

#[test]
fn float_narrows_double_does_not() {
    assert_eq!(encode(0.1_f64, AtomicType::Double).unwrap(), "0.1");
    assert_eq!(round_trip(0.1_f64, AtomicType::Float), NativeValue::Float(0.1_f32));
    assert_eq!(round_trip(2.5_f64, AtomicType::Double), NativeValue::Double(2.5));
}

// ============== Boolean ==============

#[test]
fn boolean_uses_truthiness() {
    assert_eq!(encode("false", AtomicType::Boolean).unwrap(), "true");
    assert_eq!(encode(Value::Absent, AtomicType::Boolean).unwrap(), "false");
    assert_eq!(encode(None::<bool>, AtomicType::Boolean).unwrap(), "false");
    assert_eq!(encode(false, AtomicType::Boolean).unwrap(), "false");
    assert_eq!(round_trip(true, AtomicType::Boolean), NativeValue::Boolean(true));
}

// ============== Durations ==============

#[test]
fn durations_round_trip_through_seconds() {
    assert_eq!(
        round_trip(dec!(90.5), AtomicType::DayTimeDuration),
        NativeValue::Duration(XsdDuration::from_seconds(dec!(90.5)))
    );
    assert_eq!(
        round_trip(14, AtomicType::YearMonthDuration),
        NativeValue::Duration(XsdDuration::from_months(14))
    );
    assert_eq!(kind("P1Y", AtomicType::DayTimeDuration), ErrorKind::MalformedValue);
    assert_eq!(encode(90.5_f64, AtomicType::DayTimeDuration).unwrap(), "PT1M30.5S");
}

// ============== Dates and times ==============

#[test]
fn date_time_decoding() {
    let decoded = decode("2019-09-27T14:42:00Z", AtomicType::DateTime);
    let dt = decoded.as_date_time().expect("a dateTime");
    assert_eq!(dt.offset(), &FixedOffset::east_opt(0).unwrap());
    assert_eq!(
        decode("not-a-date", AtomicType::DateTime),
        NativeValue::String("not-a-date".to_string())
    );
}

#[test]
fn temporal_round_trips() {
    let dt = DateTime::parse_from_rfc3339("2021-03-04T05:06:07.25+02:00").unwrap();
    assert_eq!(round_trip(dt, AtomicType::DateTime), NativeValue::DateTime(dt));

    let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    assert_eq!(
        round_trip(date, AtomicType::Date),
        NativeValue::Date { date, offset: None }
    );

    let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
    assert_eq!(
        round_trip(time, AtomicType::Time),
        NativeValue::Time { time, offset: None }
    );
}

#[test]
fn year_ten_thousand_encodes_without_plus() {
    let date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    assert_eq!(encode(date, AtomicType::Date).unwrap(), "10000-01-01");
    let lexical = encode(date, AtomicType::DateTime).unwrap();
    assert_eq!(lexical, "10000-01-01T00:00:00+00:00");
    assert_eq!(encode(lexical.as_str(), AtomicType::DateTime).unwrap(), lexical);
    assert!(decode(&lexical, AtomicType::DateTime).as_date_time().is_some());
}

#[test]
fn date_time_stamp_requires_timezone() {
    assert_eq!(
        kind("2019-09-27T14:42:00", AtomicType::DateTimeStamp),
        ErrorKind::MalformedValue
    );
    assert_eq!(
        encode("2019-09-27T14:42:00-05:00", AtomicType::DateTimeStamp).unwrap(),
        "2019-09-27T14:42:00-05:00"
    );
}

// ============== Gregorian fragments ==============

#[test]
fn g_day_examples() {
    assert_eq!(encode(1, AtomicType::GDay).unwrap(), "---01");
    assert_eq!(kind(32, AtomicType::GDay), ErrorKind::ValueOutOfRange);
    assert_eq!(kind("---1", AtomicType::GDay), ErrorKind::MalformedValue);
    assert_eq!(kind("---123456789", AtomicType::GDay), ErrorKind::ValueOutOfRange);
    assert_eq!(kind("---001", AtomicType::GDay), ErrorKind::MalformedValue);
    assert_eq!(kind("--012", AtomicType::GMonth), ErrorKind::MalformedValue);
    assert_eq!(encode("---07Z", AtomicType::GDay).unwrap(), "---07Z");
    assert_eq!(
        round_trip(9, AtomicType::GDay),
        NativeValue::GDay(GDay { day: 9, offset: None })
    );
}

#[test]
fn g_month_day_table() {
    assert_eq!(kind("--02-30", AtomicType::GMonthDay), ErrorKind::ValueOutOfRange);
    assert_eq!(encode("--02-29", AtomicType::GMonthDay).unwrap(), "--02-29");
    assert_eq!(kind(1, AtomicType::GMonthDay), ErrorKind::MalformedValue);
}

#[test]
fn g_year_sign_and_padding() {
    assert_eq!(encode(-1, AtomicType::GYear).unwrap(), "-0001");
    assert_eq!(kind(0, AtomicType::GYear), ErrorKind::ValueOutOfRange);
    assert_eq!(
        round_trip(2019, AtomicType::GYear),
        NativeValue::GYear(GYear { year: 2019, offset: None })
    );
}

// ============== Binary ==============

#[test]
fn binary_round_trips() {
    let bytes = vec![0_u8, 1, 254, 255];
    assert_eq!(encode(bytes.clone(), AtomicType::HexBinary).unwrap(), "0001FEFF");
    assert_eq!(
        round_trip(bytes.clone(), AtomicType::HexBinary),
        NativeValue::Binary(bytes.clone())
    );
    assert_eq!(
        round_trip(bytes.clone(), AtomicType::Base64Binary),
        NativeValue::Binary(bytes)
    );
}

// ============== Names and QNames ==============

#[test]
fn names_are_validated_not_rewritten() {
    assert_eq!(encode("foo-bar", AtomicType::NcName).unwrap(), "foo-bar");
    assert_eq!(kind("a:b", AtomicType::NcName), ErrorKind::MalformedValue);
    assert_eq!(kind("1abc", AtomicType::Name), ErrorKind::MalformedValue);
    assert_eq!(encode("en-GB", AtomicType::Language).unwrap(), "en-GB");
    assert_eq!(kind(" lead", AtomicType::Token), ErrorKind::MalformedValue);
    assert_eq!(encode(42, AtomicType::String).unwrap(), "42");
}

#[test]
fn qname_needs_resolved_name() {
    assert_eq!(
        kind("a:thingy", AtomicType::QName),
        ErrorKind::UnconvertableNamespaceSensitiveType
    );
    let q = QName::new(Some("urn:x".to_string()), "thingy").with_prefix("a");
    assert_eq!(encode(q, AtomicType::QName).unwrap(), "a:thingy");
    assert_eq!(
        kind(QName::new(None, "gif"), AtomicType::Notation),
        ErrorKind::UnconvertableNamespaceSensitiveType
    );
}

// ============== Resolution and configuration ==============

#[test]
fn resolution_through_converter() {
    let conv = Converter::new();
    assert_eq!(conv.encode_as(180, "xs:unsignedByte").unwrap(), "180");
    assert_eq!(
        conv.encode_as(
            180,
            "Q{http://www.w3.org/2001/XMLSchema}unsignedByte"
        )
        .unwrap(),
        "180"
    );
    assert_eq!(
        conv.encode_as(180, "unsignedByte").unwrap_err().kind(),
        ErrorKind::UnknownType
    );
}

#[test]
fn strict_decode_surfaces_encoder_errors() {
    let strict = Converter::with_config(ConvertConfig::strict());
    assert_eq!(
        strict.decode("---32", AtomicType::GDay).unwrap_err().kind(),
        ErrorKind::ValueOutOfRange
    );
    assert_eq!(
        strict.decode("maybe", AtomicType::Boolean).unwrap_err().kind(),
        ErrorKind::MalformedValue
    );
    assert_eq!(
        strict.decode("1", AtomicType::Boolean).unwrap(),
        NativeValue::Boolean(true)
    );
}

#[test]
fn strict_decode_rejects_impossible_dates() {
    let strict = Converter::with_config(ConvertConfig::strict());
    assert_eq!(
        strict.decode("2019-02-30", AtomicType::Date).unwrap_err().kind(),
        ErrorKind::ValueOutOfRange
    );
    assert_eq!(
        strict.decode("2019-02-28", AtomicType::Date).unwrap(),
        NativeValue::Date {
            date: NaiveDate::from_ymd_opt(2019, 2, 28).unwrap(),
            offset: None,
        }
    );
    // lenient decoding keeps the identity fallback
    assert_eq!(
        decode("2019-02-30", AtomicType::Date),
        NativeValue::String("2019-02-30".to_string())
    );
}
