//! Binary digit strings.
//!
//! Words are written most significant digit first using only `0` and `1`.

use thiserror::Error;

/// Maximum number of digits in a word.
pub const WORD_DIGITS: usize = 16;

/// Parse a string of binary digits into a word.
pub fn parse_word(digits: &str) -> Result<u16, ParseError> {
    if digits.is_empty() {
        return Err(ParseError::Empty);
    }

    let count = digits.chars().count();
    if count > WORD_DIGITS {
        return Err(ParseError::TooLong(count));
    }

    digits.chars().enumerate().try_fold(0u16, |acc, (position, digit)| {
        let bit = match digit {
            '0' => 0,
            '1' => 1,
            _ => return Err(ParseError::InvalidDigit { digit, position }),
        };
        Ok((acc << 1) | bit)
    })
}

/// Format a word as 16 binary digits.
pub fn format_word(word: u16) -> String {
    format!("{:016b}", word)
}

/// Errors from parsing a binary digit string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected binary digits, found nothing")]
    Empty,

    #[error("invalid binary digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },

    #[error("{0} digits do not fit in a {}-bit word", WORD_DIGITS)]
    TooLong(usize),
}
