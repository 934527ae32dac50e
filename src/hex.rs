//! Hexadecimal word parsing and formatting for the host surface.
//!
//! Machine parameters (memory size, initial PC, stack pointer, text range)
//! are conventionally given as bare hex words. The parser caps input at
//! eight digits so a value can never silently exceed 32 bits.

use crate::error::{EmuError, EmuResult};

/// Parse a hexadecimal word, with or without a `0x` prefix.
///
/// # Errors
///
/// Returns [`EmuError::ValueOverflow`] if the input is empty, longer than
/// eight hex digits, or contains a non-hex character.
pub fn parse_hex_word(input: &str) -> EmuResult<u32> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || digits.len() > 8 {
        return Err(EmuError::ValueOverflow {
            input: input.to_string(),
        });
    }

    u32::from_str_radix(digits, 16).map_err(|_| EmuError::ValueOverflow {
        input: input.to_string(),
    })
}

/// Format a word as eight upper-case hex digits.
#[must_use]
pub fn format_hex_word(value: u32) -> String {
    format!("{value:08X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_prefixed() {
        assert_eq!(parse_hex_word("1A40").unwrap(), 0x1A40);
        assert_eq!(parse_hex_word("0x1a40").unwrap(), 0x1A40);
        assert_eq!(parse_hex_word("  2000 ").unwrap(), 0x2000);
        assert_eq!(parse_hex_word("FFFFFFFF").unwrap(), u32::MAX);
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(matches!(
            parse_hex_word("100000000"),
            Err(EmuError::ValueOverflow { .. })
        ));
        assert!(matches!(
            parse_hex_word(""),
            Err(EmuError::ValueOverflow { .. })
        ));
        assert!(matches!(
            parse_hex_word("12G4"),
            Err(EmuError::ValueOverflow { .. })
        ));
    }

    #[test]
    fn test_format_round_trip() {
        assert_eq!(format_hex_word(0x1A40), "00001A40");
        assert_eq!(parse_hex_word(&format_hex_word(0xDEAD_BEEF)).unwrap(), 0xDEAD_BEEF);
    }
}
