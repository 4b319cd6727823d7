//! Lexical conversion for XML Schema atomic types.
//!
//! Two pipelines share one registry of convertors:
//!
//! - **encode** turns a native [`Value`] into the lexical string of a target
//!   type, failing with [`ErrorKind::MalformedValue`] or
//!   [`ErrorKind::ValueOutOfRange`]
//! - **decode** turns a lexical string into the most natural
//!   [`NativeValue`], degrading to the string itself when it has no better
//!   representation
//!
//! ```rust
//! use xsd_lexical::{decode, encode, AtomicType, ErrorKind, NativeValue};
//!
//! assert_eq!(encode(1, AtomicType::GDay).unwrap(), "---01");
//! assert_eq!(
//!     encode(32, AtomicType::GDay).unwrap_err().kind(),
//!     ErrorKind::ValueOutOfRange
//! );
//! assert_eq!(decode("-110", AtomicType::Byte), NativeValue::Byte(-110));
//! ```
//!
//! `xs:boolean` encoding follows Rust-side truthiness rather than the
//! lexical `"false"`/`"0"` forms: only [`Value::Absent`] and `false` encode
//! as `"false"`.

pub mod config;
pub mod convert;
pub mod converter;
pub mod error;
pub mod lexical;
pub mod registry;
pub mod types;
pub mod value;

pub use config::{ConvertConfig, HexCase};
pub use convert::{convertor_for, Convertor, Family};
pub use converter::{decode, encode, Converter};
pub use error::{ConversionError, ErrorKind, Result};
pub use lexical::Bounds;
pub use registry::{
    registry, resolve, resolve_atomic, resolve_native, resolve_qualified, NativeType, TypeRegistry,
};
pub use types::{AtomicType, ItemType, XS_NAMESPACE};
pub use value::{
    GDay, GMonth, GMonthDay, GYear, GYearMonth, NativeValue, QName, Value, XsdDecimal, XsdDuration,
};
