//! Mifare sector keys

use std::{fmt, str::FromStr};

/// Length of a Mifare Classic sector key in bytes
pub const KEY_LEN: usize = 6;

/// Key slot used when authenticating against a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum KeyType {
    /// Key A
    #[display("A")]
    A,
    /// Key B
    #[display("B")]
    B,
}

/// A 48-bit Mifare sector key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MifareKey([u8; KEY_LEN]);

impl MifareKey {
    /// Transport key of a factory-blank card (`FFFFFFFFFFFF`)
    pub const DEFAULT: Self = Self([0xFF; KEY_LEN]);

    /// Create a key from its raw bytes
    pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Upper-case hex form, as the reader firmware expects it
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for MifareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MifareKey").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for MifareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Errors produced when parsing a key from its hex form
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeyParseError {
    /// Wrong number of hex digits
    #[error("key must be {expected} hex digits, got {actual}")]
    Length {
        /// Required digit count
        expected: usize,
        /// Digit count found
        actual: usize,
    },

    /// Not a hex string
    #[error("invalid hex in key: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for MifareKey {
    type Err = KeyParseError;

    /// Parses `C728480273A1`, also accepting the vendor's trailing `h` marker
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits
            .strip_suffix(['h', 'H'])
            .unwrap_or(digits);

        if digits.len() != KEY_LEN * 2 {
            return Err(KeyParseError::Length {
                expected: KEY_LEN * 2,
                actual: digits.len(),
            });
        }

        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}
