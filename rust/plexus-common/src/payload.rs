//! Opaque attestation payloads.
//!
//! A [`Payload`] is the byte buffer produced by a schema encoder and carried
//! by an attestation. Resolvers only ever peek at fixed-width words inside it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;

use crate::{OutOfBounds, Word, extract_word};

/// Encoded attestation data.
///
/// Serializes as a byte string rather than a sequence of integers.
///
/// ```rust
/// use plexus_common::{Payload, Word};
///
/// let payload = Payload::from_words(&[Word::hash(b"plugin"), Word::ZERO]);
/// assert_eq!(payload.len(), 64);
/// assert_eq!(payload.word_at(0).unwrap(), Word::hash(b"plugin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// An empty payload.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Concatenates words into a payload.
    pub fn from_words(words: &[Word]) -> Self {
        Self(words.iter().flat_map(|word| *word.bytes()).collect())
    }

    /// The payload bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Unwraps the payload bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there is nothing in it.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads the word at `offset`; see [`extract_word`].
    pub fn word_at(&self, offset: usize) -> Result<Word, OutOfBounds> {
        extract_word(&self.0, offset)
    }
}

impl Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(vec: Vec<u8>) -> Self {
        Self(vec)
    }
}

impl From<&[u8]> for Payload {
    fn from(slice: &[u8]) -> Self {
        Self(slice.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Payload {
    fn from(array: [u8; N]) -> Self {
        Self(array.to_vec())
    }
}

impl From<Payload> for Vec<u8> {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PayloadVisitor;

        impl<'de> serde::de::Visitor<'de> for PayloadVisitor {
            type Value = Payload;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("byte array")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Payload(v.to_vec()))
            }

            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Payload(v))
            }

            // Self-describing text formats such as JSON hand bytes over as a
            // sequence of integers.
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                Ok(Payload(bytes))
            }
        }

        deserializer.deserialize_byte_buf(PayloadVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_concatenates_words() {
        let payload = Payload::from_words(&[Word::from([1u8; 32]), Word::from([2u8; 32])]);
        assert_eq!(payload.len(), 64);
        assert_eq!(&payload[..32], &[1u8; 32]);
        assert_eq!(&payload[32..], &[2u8; 32]);
    }

    #[test]
    fn it_exposes_words_by_offset() {
        let payload = Payload::from_words(&[Word::from([1u8; 32]), Word::from([2u8; 32])]);
        assert_eq!(payload.word_at(32), Ok(Word::from([2u8; 32])));
        assert!(payload.word_at(33).is_err());
    }

    #[test]
    fn it_round_trips_through_json() -> testresult::TestResult {
        let payload = Payload::from([0x12u8, 0x34]);
        let json = serde_json::to_string(&payload)?;
        assert_eq!(json, "[18,52]");
        assert_eq!(serde_json::from_str::<Payload>(&json)?, payload);
        Ok(())
    }
}
