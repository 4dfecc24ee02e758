//! Static schema encoding.
//!
//! Schemas are written as a comma separated list of `<type> <name>` pairs,
//! e.g. `"bytes32 pluginId,bytes32 details"`. Only fixed-width types are
//! supported; each field is encoded as exactly one word, in declaration
//! order, so the encoded payload of an `n`-field schema is `32 * n` bytes.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::{Address, Payload, WORD_SIZE, Word};

/// Errors raised while parsing a schema or encoding values against it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The field type is not one of the supported static types.
    #[error("Unsupported field type '{0}'")]
    UnsupportedType(String),

    /// A field declaration is not of the form `<type> <name>`.
    #[error("Malformed field declaration '{0}'")]
    MalformedField(String),

    /// A value does not line up with the schema field at the same position.
    #[error("Field mismatch at position {position}: expected {expected}, found {found}")]
    FieldMismatch {
        /// Position of the offending field.
        position: usize,
        /// Field as declared by the schema.
        expected: String,
        /// Field as supplied by the caller.
        found: String,
    },

    /// The number of values or the payload length does not match the schema.
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Expected count.
        expected: usize,
        /// Actual count.
        found: usize,
    },

    /// A word cannot be read back as the declared type.
    #[error("Invalid value for field '{0}'")]
    InvalidValue(String),
}

/// Static field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `bytes32`, an opaque word.
    Bytes32,
    /// `address`, left-padded to a word.
    Address,
    /// `bool`, encoded as 0 or 1.
    Bool,
    /// `uint256`, big-endian.
    Uint256,
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "bytes32" => Ok(FieldType::Bytes32),
            "address" => Ok(FieldType::Address),
            "bool" => Ok(FieldType::Bool),
            "uint256" | "uint" => Ok(FieldType::Uint256),
            other => Err(SchemaError::UnsupportedType(other.to_string())),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Bytes32 => "bytes32",
            FieldType::Address => "address",
            FieldType::Bool => "bool",
            FieldType::Uint256 => "uint256",
        };
        f.write_str(name)
    }
}

/// A single value of a static field.
///
/// Integers are limited to the `u128` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaValue {
    /// A `bytes32` value.
    Bytes32(Word),
    /// An `address` value.
    Address(Address),
    /// A `bool` value.
    Bool(bool),
    /// A `uint256` value.
    Uint256(u128),
}

impl SchemaValue {
    /// The type of field this value encodes.
    pub fn field_type(&self) -> FieldType {
        match self {
            SchemaValue::Bytes32(_) => FieldType::Bytes32,
            SchemaValue::Address(_) => FieldType::Address,
            SchemaValue::Bool(_) => FieldType::Bool,
            SchemaValue::Uint256(_) => FieldType::Uint256,
        }
    }

    fn to_word(self) -> Word {
        match self {
            SchemaValue::Bytes32(word) => word,
            SchemaValue::Address(address) => address.to_word(),
            SchemaValue::Bool(flag) => uint_word(flag as u128),
            SchemaValue::Uint256(value) => uint_word(value),
        }
    }

    fn from_word(field: &SchemaField, word: Word) -> Result<Self, SchemaError> {
        let invalid = || SchemaError::InvalidValue(field.name.clone());
        match field.kind {
            FieldType::Bytes32 => Ok(SchemaValue::Bytes32(word)),
            FieldType::Address => Address::from_word(&word)
                .map(SchemaValue::Address)
                .ok_or_else(invalid),
            FieldType::Bool => match word_uint(&word) {
                Some(0) => Ok(SchemaValue::Bool(false)),
                Some(1) => Ok(SchemaValue::Bool(true)),
                _ => Err(invalid()),
            },
            FieldType::Uint256 => word_uint(&word)
                .map(SchemaValue::Uint256)
                .ok_or_else(invalid),
        }
    }
}

fn uint_word(value: u128) -> Word {
    let mut bytes = [0u8; WORD_SIZE];
    bytes[WORD_SIZE - 16..].copy_from_slice(&value.to_be_bytes());
    Word::from(bytes)
}

fn word_uint(word: &Word) -> Option<u128> {
    let (high, low) = word.bytes().split_at(WORD_SIZE - 16);
    if high.iter().any(|byte| *byte != 0) {
        return None;
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(low);
    Some(u128::from_be_bytes(bytes))
}

/// A named, typed schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Declared type.
    pub kind: FieldType,
    /// Declared name.
    pub name: String,
}

impl Display for SchemaField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Encodes and decodes payloads for a static schema.
///
/// ```rust
/// use plexus_common::{SchemaEncoder, SchemaValue, Word};
///
/// let encoder = SchemaEncoder::new("bytes32 pluginId,bytes32 details").unwrap();
/// let payload = encoder
///     .encode(&[
///         ("pluginId", SchemaValue::Bytes32(Word::hash(b"plugin"))),
///         ("details", SchemaValue::Bytes32(Word::ZERO)),
///     ])
///     .unwrap();
///
/// assert_eq!(payload.len(), 64);
/// assert_eq!(payload.word_at(0).unwrap(), Word::hash(b"plugin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEncoder {
    fields: Vec<SchemaField>,
}

impl SchemaEncoder {
    /// Parses a schema definition.
    pub fn new(schema: &str) -> Result<Self, SchemaError> {
        let fields = schema
            .split(',')
            .map(str::trim)
            .filter(|declaration| !declaration.is_empty())
            .map(|declaration| {
                let mut parts = declaration.split_whitespace();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(kind), Some(name), None) => Ok(SchemaField {
                        kind: kind.parse()?,
                        name: name.to_string(),
                    }),
                    _ => Err(SchemaError::MalformedField(declaration.to_string())),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { fields })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Byte offset of the named field in an encoded payload.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name == name)
            .map(|position| position * WORD_SIZE)
    }

    /// Encodes `values`, which must name every field in declaration order.
    pub fn encode(&self, values: &[(&str, SchemaValue)]) -> Result<Payload, SchemaError> {
        if values.len() != self.fields.len() {
            return Err(SchemaError::LengthMismatch {
                expected: self.fields.len(),
                found: values.len(),
            });
        }

        let mut words = Vec::with_capacity(values.len());
        for (position, (field, (name, value))) in self.fields.iter().zip(values).enumerate() {
            if field.name != *name || field.kind != value.field_type() {
                return Err(SchemaError::FieldMismatch {
                    position,
                    expected: field.to_string(),
                    found: format!("{} {}", value.field_type(), name),
                });
            }
            words.push(value.to_word());
        }

        Ok(Payload::from_words(&words))
    }

    /// Decodes a payload produced by [`SchemaEncoder::encode`].
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<(String, SchemaValue)>, SchemaError> {
        let expected = self.fields.len() * WORD_SIZE;
        if payload.len() != expected {
            return Err(SchemaError::LengthMismatch {
                expected,
                found: payload.len(),
            });
        }

        self.fields
            .iter()
            .zip(payload.chunks_exact(WORD_SIZE))
            .map(|(field, chunk)| {
                let word = Word::try_from(chunk)
                    .map_err(|_| SchemaError::InvalidValue(field.name.clone()))?;
                Ok((field.name.clone(), SchemaValue::from_word(field, word)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[test]
    fn it_parses_the_plugin_schema() -> TestResult {
        let encoder = SchemaEncoder::new("bytes32 pluginId,bytes32 details")?;
        assert_eq!(
            encoder.fields(),
            &[
                SchemaField {
                    kind: FieldType::Bytes32,
                    name: "pluginId".into()
                },
                SchemaField {
                    kind: FieldType::Bytes32,
                    name: "details".into()
                },
            ]
        );
        assert_eq!(encoder.offset_of("details"), Some(32));
        assert_eq!(encoder.offset_of("missing"), None);
        Ok(())
    }

    #[test]
    fn it_rejects_dynamic_types() {
        assert_eq!(
            SchemaEncoder::new("string name"),
            Err(SchemaError::UnsupportedType("string".into()))
        );
        assert_eq!(
            SchemaEncoder::new("bool"),
            Err(SchemaError::MalformedField("bool".into()))
        );
    }

    #[test]
    fn it_encodes_mixed_static_fields() -> TestResult {
        let encoder = SchemaEncoder::new("address owner, bool isFriend, uint256 score")?;
        let owner = Address::derive(&[b"owner"]);
        let values = [
            ("owner", SchemaValue::Address(owner)),
            ("isFriend", SchemaValue::Bool(true)),
            ("score", SchemaValue::Uint256(42)),
        ];
        let payload = encoder.encode(&values)?;

        assert_eq!(payload.len(), 96);
        assert_eq!(payload[63], 1);
        assert_eq!(payload[95], 42);
        assert_eq!(
            encoder.decode(&payload)?,
            vec![
                ("owner".to_string(), SchemaValue::Address(owner)),
                ("isFriend".to_string(), SchemaValue::Bool(true)),
                ("score".to_string(), SchemaValue::Uint256(42)),
            ]
        );
        Ok(())
    }

    #[test]
    fn it_refuses_values_out_of_order() -> TestResult {
        let encoder = SchemaEncoder::new("bytes32 pluginId,bytes32 details")?;
        let result = encoder.encode(&[
            ("details", SchemaValue::Bytes32(Word::ZERO)),
            ("pluginId", SchemaValue::Bytes32(Word::ZERO)),
        ]);
        assert!(matches!(
            result,
            Err(SchemaError::FieldMismatch { position: 0, .. })
        ));
        Ok(())
    }

    #[test]
    fn it_refuses_a_truncated_payload() -> TestResult {
        let encoder = SchemaEncoder::new("bytes32 pluginId,bytes32 details")?;
        assert_eq!(
            encoder.decode(&[0u8; 63]),
            Err(SchemaError::LengthMismatch {
                expected: 64,
                found: 63
            })
        );
        Ok(())
    }

    #[test]
    fn it_refuses_a_non_boolean_word() -> TestResult {
        let encoder = SchemaEncoder::new("bool isFriend")?;
        let mut bytes = [0u8; 32];
        bytes[31] = 2;
        assert_eq!(
            encoder.decode(&bytes),
            Err(SchemaError::InvalidValue("isFriend".into()))
        );
        Ok(())
    }
}
