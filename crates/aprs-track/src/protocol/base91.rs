/// Base-91 integers as used by compressed APRS position reports.
///
/// Each digit is one printable ASCII byte from `!` (0x21, value 0) to `{` (0x7B, value 90),
/// most-significant digit first. Widths are not fixed: coordinates use 4 digits, the csT group
/// is read one digit at a time, and anything up to [`MAX_WIDTH`] digits fits in a `u64`.
use thiserror::Error;

/// First byte of the alphabet, value 0.
pub const FIRST: u8 = 0x21;
/// Last byte of the alphabet, value 90.
pub const LAST: u8 = 0x7B;
pub const RADIX: u64 = 91;

/// Widest digit run whose maximum value (91^9 - 1) still fits in a `u64`.
pub const MAX_WIDTH: usize = 9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Base91Error {
    #[error("byte {byte:#04x} at offset {offset} is outside the base-91 alphabet")]
    InvalidCharacter { byte: u8, offset: usize },
    #[error("value does not fit in {width} base-91 digits")]
    Overflow { width: usize },
}

/// Value of a single digit, or `None` if `byte` is not in the alphabet.
pub fn digit_value(byte: u8) -> Option<u8> {
    (FIRST..=LAST).contains(&byte).then(|| byte - FIRST)
}

/// Decode a run of base-91 digits.
///
/// Leading `!` digits are zeros and contribute nothing; they are not stripped, so the
/// positional weight of every other digit is unchanged.
pub fn decode(digits: &[u8]) -> Result<u64, Base91Error> {
    if digits.len() > MAX_WIDTH {
        return Err(Base91Error::Overflow {
            width: digits.len(),
        });
    }
    digits
        .iter()
        .enumerate()
        .try_fold(0u64, |acc, (offset, &byte)| {
            let d = digit_value(byte).ok_or(Base91Error::InvalidCharacter { byte, offset })?;
            Ok(acc * RADIX + d as u64)
        })
}

/// Encode `value` as exactly `width` base-91 digits, zero padded with `!`.
pub fn encode(value: u64, width: usize) -> Result<Vec<u8>, Base91Error> {
    let mut digits = vec![FIRST; width];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        *slot = FIRST + (rest % RADIX) as u8;
        rest /= RADIX;
    }
    if rest != 0 {
        return Err(Base91Error::Overflow { width });
    }
    Ok(digits)
}
