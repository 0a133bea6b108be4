//! Encoding of the 16-character registration record
//!
//! Writing stores the low byte of each character's code after left-padding
//! the value with `'0'`. Reading maps each byte back to the character with
//! that code point. The two only agree for characters up to U+00FF.

use mifare_transport::{BLOCK_SIZE, Block};

use crate::error::{AcuraError, Result};

/// Maximum record length in characters
pub const RECORD_LEN: usize = BLOCK_SIZE;

/// Fill character for short values
pub const PAD: char = '0';

/// Pad `value` to [`RECORD_LEN`] characters and encode it as a block
pub fn encode(value: &str) -> Result<Block> {
    let len = value.chars().count();
    if len > RECORD_LEN {
        return Err(AcuraError::RecordTooLong {
            len,
            max: RECORD_LEN,
        });
    }

    let mut block = [char_code(PAD); RECORD_LEN];
    for (slot, c) in block[RECORD_LEN - len..].iter_mut().zip(value.chars()) {
        *slot = char_code(c);
    }
    Ok(block)
}

/// Read a block back as a string, one character per byte
pub fn decode(block: &Block) -> String {
    block.iter().copied().map(char::from).collect()
}

const fn char_code(c: char) -> u8 {
    (c as u32).to_le_bytes()[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pads_left() {
        let block = encode("42").unwrap();
        assert_eq!(&block, b"0000000000000042");
    }

    #[test]
    fn test_encode_full_length() {
        let block = encode("ABCDEFGHIJKLMNOP").unwrap();
        assert_eq!(decode(&block), "ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn test_encode_rejects_long_values() {
        assert!(matches!(
            encode("12345678901234567"),
            Err(AcuraError::RecordTooLong { len: 17, max: 16 })
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        // 16 characters, more than 16 bytes of UTF-8
        assert!(encode("éééééééééééééééé").is_ok());
    }

    #[test]
    fn test_wide_characters_do_not_round_trip() {
        // U+0141 keeps only its low byte 0x41
        let block = encode("Ł").unwrap();
        assert_eq!(block[RECORD_LEN - 1], 0x41);
        assert_eq!(decode(&block), "000000000000000A");
    }

    #[test]
    fn test_decode_is_latin1() {
        let mut block = [b'0'; RECORD_LEN];
        block[0] = 0xE9;
        let decoded = decode(&block);
        assert_eq!(decoded.chars().count(), RECORD_LEN);
        assert!(decoded.starts_with('é'));
    }
}
