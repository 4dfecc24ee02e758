use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{WORD_SIZE, Word};

/// The size of an address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Identity of a party (attester, recipient, registrant) or of a deployed
/// resolver.
///
/// Displays, parses and serializes as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// The zero address, used where no party or resolver is bound.
    pub const ZERO: Address = Address([0u8; ADDRESS_SIZE]);

    /// Derives an address from a list of seed parts.
    ///
    /// The address is the trailing 20 bytes of the BLAKE3 hash of the
    /// concatenated parts, so distinct seeds yield distinct addresses with
    /// overwhelming probability.
    ///
    /// ```rust
    /// use plexus_common::Address;
    ///
    /// let alice = Address::derive(&[b"alice"]);
    /// assert_eq!(alice, Address::derive(&[b"alice"]));
    /// assert_ne!(alice, Address::derive(&[b"bob"]));
    /// ```
    pub fn derive(parts: &[&[u8]]) -> Self {
        let digest = Word::hash_iter(parts.iter().copied());
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(&digest.bytes()[WORD_SIZE - ADDRESS_SIZE..]);
        Self(bytes)
    }

    /// The raw address bytes.
    pub fn bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Whether this is [`Address::ZERO`].
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The address left-padded with zeros to a full word.
    pub fn to_word(&self) -> Word {
        let mut bytes = [0u8; WORD_SIZE];
        bytes[WORD_SIZE - ADDRESS_SIZE..].copy_from_slice(&self.0);
        Word::from(bytes)
    }

    /// Reads an address back from a left-padded word.
    ///
    /// Returns `None` when any of the padding bytes is set.
    pub fn from_word(word: &Word) -> Option<Self> {
        let (padding, tail) = word.bytes().split_at(WORD_SIZE - ADDRESS_SIZE);
        if padding.iter().any(|byte| *byte != 0) {
            return None;
        }
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(tail);
        Some(Self(bytes))
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(value: [u8; ADDRESS_SIZE]) -> Self {
        Self(value)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error returned when a string is not a `0x`-prefixed 20-byte hex address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid address '{0}'")]
pub struct AddressParseError(String);

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressParseError(input.to_string());
        let digits = input.strip_prefix("0x").ok_or_else(invalid)?;
        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({self})")
    }
}
