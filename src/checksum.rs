//! Luhn checksum over the sixteen base-16 digits of an ID.
//!
//! Nibble 0 (bits 0-3) carries the check digit. Nibbles at odd positions are
//! doubled, and a doubled value above 15 is folded to the sum of its decimal
//! digits. A value is valid when the weighted sum is a multiple of 15.
//!
//! Any change to the check nibble alone is detected. Changes elsewhere can
//! go unnoticed: 0 and F weigh the same at undoubled positions (both are
//! multiples of 15), and pairs such as 1 and A fold to the same value at
//! doubled positions.

const NIBBLES: u32 = 16;
const MODULUS: u32 = 15;
const CHECK_MASK: u64 = 0xf;

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
const fn weighted_sum(value: i64) -> u32 {
    let bits = value as u64;
    let mut sum = 0;
    let mut i = 0;
    while i < NIBBLES {
        let digit = ((bits >> (i * 4)) & CHECK_MASK) as u32;
        let mut weighted = if i % 2 == 1 { digit * 2 } else { digit };
        if weighted > 15 {
            weighted = weighted / 10 + weighted % 10;
        }
        sum += weighted;
        i += 1;
    }
    sum
}

/// Replaces the lowest nibble of `value` with its Luhn-16 check digit.
///
/// Whatever was in bits 0-3 is discarded. The check digit is always in `0..=14`.
///
/// ```
/// assert_eq!(flexid::checksum_encode(0x7fff_fff0), 0x7fff_fff7);
/// ```
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn checksum_encode(value: i64) -> i64 {
    let payload = value & !0xf;
    let remainder = weighted_sum(payload) % MODULUS;
    payload | ((MODULUS - remainder) % MODULUS) as i64
}

/// Returns true if the lowest nibble of `value` is its correct check digit.
#[must_use]
pub const fn checksum_validate(value: i64) -> bool {
    weighted_sum(value) % MODULUS == 0
}
