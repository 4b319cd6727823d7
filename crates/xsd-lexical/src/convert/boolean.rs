//! `xs:boolean`
//!
//! Encoding coerces by native truthiness and does not read lexical
//! booleans: the string `"false"` is a present value and encodes as
//! `"true"`. Only [`Value::Absent`] and `Value::Boolean(false)` encode as
//! `"false"`.

use super::{identity, Convertor, Family};
use crate::error::{ConversionError, Result};
use crate::types::AtomicType;
use crate::value::{NativeValue, Value};

#[derive(Debug, Clone, Copy)]
pub struct BooleanConvertor;

impl Convertor for BooleanConvertor {
    fn atomic_type(&self) -> AtomicType {
        AtomicType::Boolean
    }

    fn family(&self) -> Family {
        Family::Boolean
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let lexical = if value.is_truthy() { "true" } else { "false" };
        Ok(lexical.to_string())
    }

    fn decode(&self, lexical: &str) -> NativeValue {
        match lexical {
            "true" | "1" => NativeValue::Boolean(true),
            "false" | "0" => NativeValue::Boolean(false),
            other => identity(AtomicType::Boolean, other),
        }
    }

    fn validate(&self, lexical: &str) -> Result<()> {
        match lexical {
            "true" | "1" | "false" | "0" => Ok(()),
            other => Err(ConversionError::malformed(
                AtomicType::Boolean,
                format!("{:?} is not one of true, false, 1, 0", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_truthiness_not_lexical() {
        let c = BooleanConvertor;
        assert_eq!(c.encode(&Value::from("false")).unwrap(), "true");
        assert_eq!(c.encode(&Value::from("0")).unwrap(), "true");
        assert_eq!(c.encode(&Value::Integer(0)).unwrap(), "true");
        assert_eq!(c.encode(&Value::Absent).unwrap(), "false");
        assert_eq!(c.encode(&Value::Boolean(false)).unwrap(), "false");
    }

    #[test]
    fn decode_reads_all_four_literals() {
        let c = BooleanConvertor;
        assert_eq!(c.decode("1"), NativeValue::Boolean(true));
        assert_eq!(c.decode("false"), NativeValue::Boolean(false));
        assert!(c.validate("yes").is_err());
    }
}
