//! Error types for lexical conversion

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Failure of a single encode or type resolution.
///
/// `MalformedValue` and `ValueOutOfRange` are value-level and are the only
/// two kinds an encoder for a supported family ever returns. `UnknownType`
/// and `UnconvertableNamespaceSensitiveType` are type-level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Value does not match the lexical grammar of the target type
    #[error("malformed value for {type_name}: {message}")]
    MalformedValue { type_name: String, message: String },

    /// Value matches the grammar but lies outside the value space
    #[error("value out of range for {type_name}: {message}")]
    ValueOutOfRange { type_name: String, message: String },

    /// Identifier does not resolve to a built-in type
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// QName and NOTATION cannot be built from an unbound lexical string
    #[error("cannot convert to namespace-sensitive type {type_name}: {message}")]
    UnconvertableNamespaceSensitiveType { type_name: String, message: String },
}

/// Payload-free discriminant of [`ConversionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedValue,
    ValueOutOfRange,
    UnknownType,
    UnconvertableNamespaceSensitiveType,
}

impl ConversionError {
    /// Create a new grammar violation error
    pub fn malformed<T: ToString, S: Into<String>>(type_name: T, msg: S) -> Self {
        ConversionError::MalformedValue {
            type_name: type_name.to_string(),
            message: msg.into(),
        }
    }

    /// Create a new bounds violation error
    pub fn out_of_range<T: ToString, S: Into<String>>(type_name: T, msg: S) -> Self {
        ConversionError::ValueOutOfRange {
            type_name: type_name.to_string(),
            message: msg.into(),
        }
    }

    /// Create a new unresolved identifier error
    pub fn unknown_type<S: Into<String>>(identifier: S) -> Self {
        ConversionError::UnknownType(identifier.into())
    }

    /// Create a new namespace-sensitive conversion error
    pub fn namespace_sensitive<T: ToString, S: Into<String>>(type_name: T, msg: S) -> Self {
        ConversionError::UnconvertableNamespaceSensitiveType {
            type_name: type_name.to_string(),
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::MalformedValue { .. } => ErrorKind::MalformedValue,
            ConversionError::ValueOutOfRange { .. } => ErrorKind::ValueOutOfRange,
            ConversionError::UnknownType(_) => ErrorKind::UnknownType,
            ConversionError::UnconvertableNamespaceSensitiveType { .. } => {
                ErrorKind::UnconvertableNamespaceSensitiveType
            }
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedValue
    }

    pub fn is_out_of_range(&self) -> bool {
        self.kind() == ErrorKind::ValueOutOfRange
    }
}
