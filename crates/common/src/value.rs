use crate::result::MarshalError;
use crate::Len;
use serde::Deserialize;
use serde::Serialize;

pub const NUMBER_BYTES: usize = std::mem::size_of::<f64>();
pub const BOOLEAN_BYTES: usize = 1;

/// The kinds of value the host knows how to put in guest memory.
/// Nothing about the kind is written to the guest, whoever reads the bytes back has to know it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Number,
    Boolean,
    Text,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Number => write!(f, "number"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Text => write!(f, "text"),
        }
    }
}

/// A host value and its wire encoding.
///
/// - Number: 8 bytes, IEEE-754 double, little endian
/// - Boolean: 1 byte, 0x01 or 0x00
/// - Text: the raw utf-8 bytes, no terminator and no length prefix
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum HostValue {
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl HostValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            HostValue::Number(_) => ValueKind::Number,
            HostValue::Boolean(_) => ValueKind::Boolean,
            HostValue::Text(_) => ValueKind::Text,
        }
    }

    /// Number of bytes the encoding occupies in the guest.
    /// For text this is the utf-8 byte length, not the number of chars.
    pub fn len(&self) -> Result<Len, MarshalError> {
        let len = match self {
            HostValue::Number(_) => NUMBER_BYTES,
            HostValue::Boolean(_) => BOOLEAN_BYTES,
            HostValue::Text(s) => s.len(),
        };
        Ok(len.try_into()?)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, HostValue::Text(s) if s.is_empty())
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            HostValue::Number(n) => n.to_le_bytes().to_vec(),
            HostValue::Boolean(b) => vec![u8::from(*b)],
            HostValue::Text(s) => s.as_bytes().to_vec(),
        }
    }

    /// Inverse of `encode` given the kind the bytes were written as.
    /// Text never fails, malformed utf-8 becomes replacement chars.
    pub fn decode(kind: ValueKind, bytes: &[u8]) -> Result<Self, MarshalError> {
        match kind {
            ValueKind::Number => {
                let bytes: [u8; NUMBER_BYTES] =
                    bytes.try_into().map_err(|_| MarshalError::WrongLength {
                        kind,
                        expected: NUMBER_BYTES,
                        actual: bytes.len(),
                    })?;
                Ok(HostValue::Number(f64::from_le_bytes(bytes)))
            }
            ValueKind::Boolean => match bytes {
                [byte] => Ok(HostValue::Boolean(*byte != 0)),
                _ => Err(MarshalError::WrongLength {
                    kind,
                    expected: BOOLEAN_BYTES,
                    actual: bytes.len(),
                }),
            },
            ValueKind::Text => Ok(HostValue::Text(decode_text(bytes))),
        }
    }
}

/// Best effort utf-8, the guest may hand us anything.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl std::fmt::Display for HostValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostValue::Number(n) => write!(f, "{}", n),
            HostValue::Boolean(b) => write!(f, "{}", b),
            HostValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for HostValue {
    fn from(n: f64) -> Self {
        HostValue::Number(n)
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Boolean(b)
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Text(s)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Text(s.to_string())
    }
}

/// Runtime inspection of a dynamically typed value.
/// Only numbers, booleans and strings have an encoding, anything else is rejected before the
/// guest is asked for memory.
impl TryFrom<serde_json::Value> for HostValue {
    type Error = MarshalError;
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Bool(b) => Ok(HostValue::Boolean(b)),
            serde_json::Value::String(s) => Ok(HostValue::Text(s)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(HostValue::Number)
                .ok_or_else(|| MarshalError::UnsupportedKind(format!("number {}", n))),
            serde_json::Value::Null => Err(MarshalError::UnsupportedKind("null".into())),
            serde_json::Value::Array(_) => Err(MarshalError::UnsupportedKind("array".into())),
            serde_json::Value::Object(_) => Err(MarshalError::UnsupportedKind("object".into())),
        }
    }
}
