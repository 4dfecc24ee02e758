use std::array::TryFromSliceError;
use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};
use zerocopy::FromBytes;

/// The size of a word in bytes.
///
/// Every fixed-width field of an attestation payload (identifiers, padded
/// addresses, integers) occupies exactly one word.
pub const WORD_SIZE: usize = 32;

/// A raw 32-byte value.
///
/// A `Word` carries no interpretation: it is whatever bytes were found in a
/// buffer or produced by a hash. Higher level identifiers (plugin ids,
/// schema uids, attestation uids) wrap it.
///
/// # Examples
///
/// ```rust
/// use plexus_common::Word;
///
/// let word = Word::hash(b"hello world");
/// assert_ne!(word, Word::ZERO);
/// ```
#[derive(
    zerocopy_derive::FromBytes,
    zerocopy_derive::Immutable,
    zerocopy_derive::KnownLayout,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct Word([u8; WORD_SIZE]);

impl Word {
    /// The all-zero word.
    pub const ZERO: Word = Word([0u8; WORD_SIZE]);

    /// Computes the BLAKE3 hash of the given bytes.
    pub fn hash(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).into())
    }

    /// Computes the BLAKE3 hash of a sequence of chunks, as if they were
    /// concatenated.
    pub fn hash_iter<'a, I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut hasher = blake3::Hasher::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        Self(hasher.finalize().into())
    }

    /// The raw bytes of the word.
    pub fn bytes(&self) -> &[u8; WORD_SIZE] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; WORD_SIZE]
    }
}

impl From<[u8; WORD_SIZE]> for Word {
    fn from(value: [u8; WORD_SIZE]) -> Self {
        Word(value)
    }
}

impl From<Word> for [u8; WORD_SIZE] {
    fn from(value: Word) -> Self {
        value.0
    }
}

impl TryFrom<&[u8]> for Word {
    type Error = TryFromSliceError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Ok(Word(value.try_into()?))
    }
}

impl AsRef<[u8]> for Word {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Word({self})")
    }
}

/// A fixed-width read past the end of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Out of bounds: cannot read a word at offset {offset} from a buffer of {length} bytes")]
pub struct OutOfBounds {
    /// Requested offset.
    pub offset: usize,
    /// Length of the buffer that was read.
    pub length: usize,
}

/// Reads the word stored at `[offset, offset + 32)` of `buffer`.
///
/// The bytes are copied verbatim. Fails with [`OutOfBounds`] when the window
/// does not fit inside the buffer, including when `offset + 32` overflows.
///
/// ```rust
/// use plexus_common::{extract_word, OutOfBounds};
///
/// let buffer = [7u8; 40];
/// assert_eq!(extract_word(&buffer, 8).unwrap().bytes(), &[7u8; 32]);
/// assert_eq!(
///     extract_word(&buffer, 9),
///     Err(OutOfBounds { offset: 9, length: 40 })
/// );
/// ```
pub fn extract_word(buffer: &[u8], offset: usize) -> Result<Word, OutOfBounds> {
    let out_of_bounds = OutOfBounds {
        offset,
        length: buffer.len(),
    };

    let end = offset.checked_add(WORD_SIZE).ok_or(out_of_bounds)?;
    let window = buffer.get(offset..end).ok_or(out_of_bounds)?;

    Word::read_from_bytes(window).map_err(|_| out_of_bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn it_reads_the_leading_word() {
        let mut buffer = vec![0u8; 64];
        buffer[..32].copy_from_slice(&[1u8; 32]);
        buffer[32..].copy_from_slice(&[2u8; 32]);

        assert_eq!(extract_word(&buffer, 0), Ok(Word::from([1u8; 32])));
        assert_eq!(extract_word(&buffer, 32), Ok(Word::from([2u8; 32])));
    }

    #[test]
    fn it_rejects_a_short_buffer() {
        assert_eq!(
            extract_word(&[0u8; 31], 0),
            Err(OutOfBounds {
                offset: 0,
                length: 31
            })
        );
    }

    #[test]
    fn it_rejects_a_far_offset() {
        let buffer = [0x12u8, 0x34];
        assert_eq!(
            extract_word(&buffer, 1000),
            Err(OutOfBounds {
                offset: 1000,
                length: 2
            })
        );
    }

    #[test]
    fn it_rejects_an_overflowing_offset() {
        assert!(extract_word(&[0u8; 64], usize::MAX - 8).is_err());
    }

    #[test]
    fn it_displays_as_hex() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xab;
        let word = Word::from(bytes);
        assert_eq!(
            word.to_string(),
            "0x00000000000000000000000000000000000000000000000000000000000000ab"
        );
    }

    #[test]
    fn hash_iter_matches_hash_of_concatenation() {
        let chunks: [&[u8]; 3] = [b"plug", b"in", b"-id"];
        assert_eq!(Word::hash_iter(chunks), Word::hash(b"plugin-id"));
    }

    proptest! {
        #[test]
        fn extraction_is_bounded_and_exact(
            buffer in proptest::collection::vec(any::<u8>(), 0..128),
            offset in 0usize..128,
        ) {
            match extract_word(&buffer, offset) {
                Ok(word) => {
                    prop_assert!(offset + WORD_SIZE <= buffer.len());
                    prop_assert_eq!(word.bytes().as_slice(), &buffer[offset..offset + WORD_SIZE]);
                }
                Err(error) => {
                    prop_assert!(offset + WORD_SIZE > buffer.len());
                    prop_assert_eq!(error, OutOfBounds { offset, length: buffer.len() });
                }
            }
        }
    }
}
